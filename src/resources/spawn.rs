//! Spawn cooldown bookkeeping and spawn placement.
//!
//! Each enemy type owns one [`SpawnSlot`]. While no instance of the type is
//! active (and the type is unlocked) its cooldown counts up; when it reaches
//! the type's [`SpawnCurve`](crate::resources::roster::SpawnCurve) interval
//! for the current difficulty, the scheduler activates an instance.

use bevy_ecs::prelude::Resource;

use crate::resources::roster::Side;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnSlot {
    pub cooldown: u32,
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SpawnScheduler {
    pub slots: Vec<SpawnSlot>,
}

impl SpawnScheduler {
    pub fn new(types: usize) -> Self {
        Self {
            slots: vec![SpawnSlot::default(); types],
        }
    }

    /// Advance the slot for one idle tick. Returns true when it is due.
    pub fn tick_slot(&mut self, index: usize, interval: u32) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        slot.cooldown += 1;
        if slot.cooldown >= interval {
            slot.cooldown = 0;
            return true;
        }
        false
    }
}

/// Push a spawn position away from the field until it keeps at least `gap`
/// from every position in `others`.
///
/// Enemies entering on the right are pushed further right, those entering
/// on the left further left. The result is never closer to the field than
/// `candidate`.
pub fn resolve_spawn_x(candidate: f32, others: &[f32], gap: f32, side: Side) -> f32 {
    let mut x = candidate;
    if gap <= 0.0 {
        return x;
    }
    while let Some(blocker) = others.iter().find(|o| (x - **o).abs() < gap) {
        x = match side {
            Side::Right => blocker + gap,
            Side::Left => blocker - gap,
        };
    }
    x
}
