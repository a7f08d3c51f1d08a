//! ECS components attached to actor entities.
//!
//! - [`actor`] – kind, facing, player/enemy data, animation counters
//! - [`actorstate`] – per-kind state enums and the generic state machine
//! - [`boxcollider`] – axis-aligned boxes, hurtboxes and contact boxes
//! - [`mapposition`] – world-space pivot position

pub mod actor;
pub mod actorstate;
pub mod boxcollider;
pub mod mapposition;
