//! ECS resources shared across systems.
//!
//! - [`assets`] – background asset loading with placeholders
//! - [`audio`] – bridge to the audio thread
//! - [`backdrop`] – background scroll offset
//! - [`combo`] – combo counter and score arithmetic
//! - [`feedback`] – shake, hit-stop, floating texts, impacts
//! - [`gameconfig`] – INI-backed tuning values
//! - [`input`] – latched player command
//! - [`roster`] – per-kind configuration records
//! - [`simcontext`] – session counters (frame, difficulty, score)
//! - [`simrng`] – seeded gameplay randomness
//! - [`spawn`] – spawn cooldowns and placement

pub mod assets;
pub mod audio;
pub mod backdrop;
pub mod combo;
pub mod feedback;
pub mod gameconfig;
pub mod input;
pub mod roster;
pub mod simcontext;
pub mod simrng;
pub mod spawn;
