//! Sidebrawl library.
//!
//! A tick-driven side-scrolling combat core built on `bevy_ecs`: actor state
//! machines, frame-windowed hit resolution with parry windows, spawn
//! scheduling with a difficulty ramp, and the combo/feedback layer fed by
//! combat events. Rendering, audio playback and asset I/O are collaborators
//! behind small seams.

pub mod autoplay;
pub mod components;
pub mod engine;
pub mod error;
pub mod events;
pub mod render;
pub mod resources;
pub mod systems;
