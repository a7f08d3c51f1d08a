//! Combat outcomes emitted by the hit resolver.
//!
//! One [`CombatEvent`] is written per resolved interaction. The combo
//! tracker turns them into score; the resolver itself emits the matching
//! audio cues.

use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;
use glam::Vec2;

use crate::resources::roster::HitKind;

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum CombatEvent {
    /// The player's attack connected with an enemy.
    Hit {
        attacker: Entity,
        victim: Entity,
        kind: HitKind,
        /// The victim entered `Dying`.
        lethal: bool,
        at: Vec2,
    },
    /// An approaching enemy struck the walking player.
    PlayerHit { enemy: Entity, at: Vec2 },
    /// An enemy crossed the trailing edge unharmed.
    Escaped { enemy: Entity },
}
