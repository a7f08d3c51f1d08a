//! Actor identity and per-instance combat data.
//!
//! Every combatant is an entity carrying an [`Actor`] (its kind and facing).
//! Kind-specific constants (hitboxes, thresholds, speeds) are never stored on
//! the instance: they live in the [`Roster`](crate::resources::roster::Roster)
//! and are looked up through [`ActorKind`].
//!
//! The player additionally carries [`Player`]; each enemy carries [`Enemy`].
//! Both carry a [`StateMachine`](crate::components::actorstate::StateMachine)
//! over their own state enum.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::actorstate::AttackKind;
use crate::resources::roster::HitboxSpec;

/// Index of an enemy archetype inside the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyTypeId(pub usize);

/// Tagged actor kind; the key used to look up configuration records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Enemy(EnemyTypeId),
}

/// Horizontal facing of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// +1 for right, -1 for left.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub kind: ActorKind,
    pub facing: Facing,
}

impl Actor {
    pub fn new(kind: ActorKind, facing: Facing) -> Self {
        Self { kind, facing }
    }
}

/// Hitbox pinned when an attack starts; geometry is fixed for the whole
/// action regardless of which visual variant was picked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinnedAction {
    pub kind: AttackKind,
    pub variant: u8,
    pub hitbox: HitboxSpec,
    /// Set once this action instance has scored its hit.
    pub landed: Option<Entity>,
}

/// Player-only data.
#[derive(Component, Debug, Clone, Default)]
pub struct Player {
    pub action: Option<PinnedAction>,
}

/// Enemy-only data. Enemies are recycled, never despawned.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Enemy {
    pub type_id: EnemyTypeId,
    /// Hits received since the last respawn.
    pub hit_count: u32,
    pub speed_base: f32,
    pub speed_current: f32,
    /// The current approach has already struck the player.
    pub struck_player: bool,
    /// Number of times this instance has been activated.
    pub spawns: u32,
}

impl Enemy {
    pub fn new(type_id: EnemyTypeId, speed_base: f32) -> Self {
        Self {
            type_id,
            hit_count: 0,
            speed_base,
            speed_current: speed_base,
            struck_player: false,
            spawns: 0,
        }
    }
}

/// Cosmetic animation counters; never consulted for collision.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimClock {
    pub frame: u32,
    pub timer: u32,
}

impl AnimClock {
    /// Advance one tick, wrapping over `frames`.
    pub fn step(&mut self, frames: u32, ticks_per_frame: u32) {
        self.timer += 1;
        if self.timer >= ticks_per_frame.max(1) {
            self.timer = 0;
            self.frame = (self.frame + 1) % frames.max(1);
        }
    }

    pub fn reset(&mut self) {
        self.frame = 0;
        self.timer = 0;
    }
}
