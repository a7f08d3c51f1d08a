//! Messages exchanged between systems and collaborators.
//!
//! - [`audio`] – audio cues and the audio thread protocol
//! - [`combat`] – hit, player-hit and escape outcomes
//! - [`input`] – player commands
//! - [`score`] – applied score changes

pub mod audio;
pub mod combat;
pub mod input;
pub mod score;
