//! Audio cue messages and the audio thread protocol.
//!
//! Combat systems write [`AudioCue`] messages; the audio forwarding system
//! turns each into an [`AudioCmd::Play`] for the audio thread, which answers
//! with [`AudioMessage`]s.

use bevy_ecs::message::Message;
use serde::Serialize;

use crate::components::actor::EnemyTypeId;

/// Discrete sound cue emitted on a combat transition.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AudioCue {
    /// Player started an attack.
    Swing,
    Hit,
    Kill,
    Parry,
    PlayerHit,
    Escape,
    /// Enemy vocalization, cycled per hit.
    EnemyVoice { enemy: EnemyTypeId, index: u32 },
}

impl AudioCue {
    /// Identifier the audio backend resolves to a sound asset.
    pub fn asset_id(&self) -> String {
        match self {
            AudioCue::Swing => "swing".into(),
            AudioCue::Hit => "hit".into(),
            AudioCue::Kill => "kill".into(),
            AudioCue::Parry => "parry".into(),
            AudioCue::PlayerHit => "player_hit".into(),
            AudioCue::Escape => "escape".into(),
            AudioCue::EnemyVoice { enemy, index } => format!("voice_{}_{}", enemy.0, index),
        }
    }
}

/// Commands sent *to* the audio thread
#[derive(Debug, Clone)]
pub enum AudioCmd {
    Play(AudioCue),
    Shutdown,
}

/// Events sent *back* from the audio thread
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioMessage {
    CuePlayed { id: String },
    CueFailed { id: String, error: String },
}
