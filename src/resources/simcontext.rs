//! Session-wide counters shared by every combat system.
//!
//! The [`SimulationContext`] is owned by the engine's `World` and handed to
//! systems as a resource parameter; nothing reads it through a global.
use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimulationContext {
    /// Simulated ticks so far; frozen ticks do not count.
    pub frame_count: u64,
    /// Global multiplier for enemy speed and spawn rate, starts at 1.0.
    pub difficulty: f32,
    pub score: i64,
    /// Whether the tick currently running is a frozen one.
    pub frozen: bool,
    /// Rejected double transitions, logged as they happen.
    pub invariant_violations: u32,
    pub kills: u32,
    pub misses: u32,
    pub player_hits: u32,
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self {
            frame_count: 0,
            difficulty: 1.0,
            score: 0,
            frozen: false,
            invariant_violations: 0,
            kills: 0,
            misses: 0,
            player_hits: 0,
        }
    }
}

impl SimulationContext {
    /// Apply a score delta; the score never drops below zero.
    pub fn add_score(&mut self, delta: i64) {
        self.score = (self.score + delta).max(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_floor() {
        let mut ctx = SimulationContext::default();
        ctx.add_score(15);
        ctx.add_score(-40);
        assert_eq!(ctx.score, 0);
        ctx.add_score(5);
        assert_eq!(ctx.score, 5);
    }
}
