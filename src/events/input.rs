//! Player input commands.
//!
//! These abstract the physical buttons into the three combat actions. Each
//! is applicable only while the player is walking; the
//! [`InputLatch`](crate::resources::input::InputLatch) holds at most one.

use serde::{Deserialize, Serialize};

use crate::components::actorstate::AttackKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputCommand {
    /// Strike right.
    AttackPrimary,
    /// Strike left.
    AttackSecondary,
    /// Low strike / parry attempt.
    LowAction,
}

impl InputCommand {
    pub fn attack_kind(self) -> AttackKind {
        match self {
            InputCommand::AttackPrimary => AttackKind::Primary,
            InputCommand::AttackSecondary => AttackKind::Secondary,
            InputCommand::LowAction => AttackKind::Low,
        }
    }
}
