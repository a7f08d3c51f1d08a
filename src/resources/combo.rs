//! Combo counter and score arithmetic.
//!
//! The tracker counts consecutive successful player hits. Each hit refreshes
//! a decay window; the combo drops to zero when the window runs out, when
//! the player takes a hit, or when an enemy escapes.
//!
//! Score deltas use `value * max(1, count / breakpoint)` where `count` is
//! the combo after the hit is counted.

use bevy_ecs::prelude::Resource;

use crate::resources::gameconfig::ComboConfig;

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct ComboTracker {
    pub count: u32,
    /// Ticks until the combo expires; zero while no combo is running.
    pub decay_timer: u32,
    /// Longest combo of the session.
    pub best: u32,
}

impl ComboTracker {
    /// Current score multiplier, at least 1.
    pub fn multiplier(&self, breakpoint: u32) -> i64 {
        i64::from((self.count / breakpoint.max(1)).max(1))
    }

    /// Count one hit and return its score delta.
    ///
    /// `value` is the base reward of the hit (normal or parry). A lethal hit
    /// adds the kill bonus under the same multiplier.
    pub fn register_hit(&mut self, rules: &ComboConfig, value: i64, lethal: bool) -> i64 {
        self.count += 1;
        self.decay_timer = rules.window;
        self.best = self.best.max(self.count);
        let multiplier = self.multiplier(rules.breakpoint);
        let bonus = if lethal { rules.kill_bonus } else { 0 };
        (value + bonus) * multiplier
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.decay_timer = 0;
    }

    /// One simulated tick of decay. Returns true when the combo just expired.
    pub fn tick_decay(&mut self) -> bool {
        if self.decay_timer == 0 {
            return false;
        }
        self.decay_timer -= 1;
        if self.decay_timer == 0 && self.count > 0 {
            self.count = 0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::gameconfig::GameConfig;

    fn rules() -> ComboConfig {
        GameConfig::new().combo
    }

    #[test]
    fn test_first_hit_scores_base_value() {
        let mut combo = ComboTracker::default();
        let rules = rules();
        assert_eq!(combo.register_hit(&rules, rules.hit_value, false), rules.hit_value);
        assert_eq!(combo.count, 1);
        assert_eq!(combo.decay_timer, rules.window);
    }

    #[test]
    fn test_multiplier_steps_at_breakpoint() {
        let mut combo = ComboTracker::default();
        let rules = rules();
        let mut deltas = Vec::new();
        for _ in 0..(rules.breakpoint * 2) {
            deltas.push(combo.register_hit(&rules, 10, false));
        }
        let bp = rules.breakpoint as usize;
        assert!(deltas[..bp - 1].iter().all(|d| *d == 10));
        assert_eq!(deltas[bp - 1], 10);
        assert_eq!(deltas[2 * bp - 1], 20);
    }

    #[test]
    fn test_kill_bonus_uses_same_multiplier() {
        let mut combo = ComboTracker::default();
        let rules = rules();
        combo.count = rules.breakpoint * 3 - 1;
        let delta = combo.register_hit(&rules, rules.hit_value, true);
        assert_eq!(delta, (rules.hit_value + rules.kill_bonus) * 3);
    }

    #[test]
    fn test_decay_resets_exactly_when_timer_hits_zero() {
        let mut combo = ComboTracker::default();
        let rules = rules();
        for _ in 0..3 {
            combo.register_hit(&rules, 10, false);
        }
        for _ in 0..(rules.window - 1) {
            assert!(!combo.tick_decay());
            assert_eq!(combo.count, 3);
        }
        assert!(combo.tick_decay());
        assert_eq!(combo.count, 0);
        assert_eq!(combo.decay_timer, 0);
        assert!(!combo.tick_decay());
    }

    #[test]
    fn test_reset_keeps_best() {
        let mut combo = ComboTracker::default();
        let rules = rules();
        combo.register_hit(&rules, 10, false);
        combo.register_hit(&rules, 10, false);
        combo.reset();
        assert_eq!(combo.count, 0);
        assert_eq!(combo.best, 2);
    }
}
