//! ECS systems, grouped by concern.
//!
//! - [`actors`] – state timers, input, movement, animation
//! - [`audio`] – audio thread and cue forwarding
//! - [`backdrop`] – background scrolling
//! - [`clock`] – frame counter, difficulty ramp, hit-stop gate
//! - [`combo`] – combo decay and scoring
//! - [`feedback`] – feedback notification and aging
//! - [`hitresolve`] – attacks, contacts and escapes
//! - [`messages`] – per-tick message queue updates
//! - [`spawn`] – enemy activation

pub mod actors;
pub mod audio;
pub mod backdrop;
pub mod clock;
pub mod combo;
pub mod feedback;
pub mod hitresolve;
pub mod messages;
pub mod spawn;
