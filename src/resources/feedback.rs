//! Presentation effects scheduled by scoring events.
//!
//! [`FeedbackBus`] owns every transient effect: the screen shake, the
//! hit-stop counter, floating score texts and impact sparks. None of these
//! feed back into gameplay except hit-stop, which the clock reads to skip
//! the mutation phase.
//!
//! Contract:
//! - Overlapping shakes merge into the stronger and longer one; a weak shake
//!   never cuts a strong one short.
//! - Hit-stop takes the max of the running and the requested duration.
//! - Floating texts and impacts live in fixed-capacity lists; when full the
//!   oldest entry is dropped so per-tick cost stays constant.
//! - Shake jitter draws from the bus's own RNG, so presentation never
//!   perturbs the gameplay RNG.

use arrayvec::ArrayVec;
use bevy_ecs::prelude::Resource;
use glam::Vec2;
use serde::Serialize;

use crate::events::score::{ScoreCause, ScoreEvent};
use crate::resources::gameconfig::FeedbackConfig;

pub const MAX_FLOATING_TEXTS: usize = 16;
pub const MAX_IMPACTS: usize = 8;
/// Number of interchangeable impact spark images.
pub const IMPACT_VARIANTS: u8 = 3;
/// Upward drift of floating texts per tick.
const TEXT_RISE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shake {
    pub magnitude: f32,
    pub remaining: u32,
    pub duration: u32,
}

impl Shake {
    /// Magnitude scaled by the remaining fraction.
    pub fn strength(&self) -> f32 {
        if self.duration == 0 {
            return 0.0;
        }
        self.magnitude * self.remaining as f32 / self.duration as f32
    }
}

/// Colour class of a floating text; the renderer maps it to a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextTone {
    Gain,
    Bonus,
    Penalty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloatingText {
    pub text: String,
    pub pos: Vec2,
    pub tone: TextTone,
    pub age: u32,
    pub ttl: u32,
}

impl FloatingText {
    /// Opacity in `[0, 1]`, non-increasing with age.
    pub fn alpha(&self) -> f32 {
        if self.ttl == 0 {
            return 0.0;
        }
        (1.0 - self.age as f32 / self.ttl as f32).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Impact {
    pub pos: Vec2,
    pub variant: u8,
    pub age: u32,
    pub ttl: u32,
}

#[derive(Resource, Debug)]
pub struct FeedbackBus {
    shake: Option<Shake>,
    shake_offset: Vec2,
    hit_stop: u32,
    texts: ArrayVec<FloatingText, MAX_FLOATING_TEXTS>,
    impacts: ArrayVec<Impact, MAX_IMPACTS>,
    rng: fastrand::Rng,
}

impl Default for FeedbackBus {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl FeedbackBus {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            shake: None,
            shake_offset: Vec2::ZERO,
            hit_stop: 0,
            texts: ArrayVec::new(),
            impacts: ArrayVec::new(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Schedule the effects for one scoring event.
    pub fn notify(&mut self, event: &ScoreEvent, cfg: &FeedbackConfig) {
        let (magnitude, stop, tone, spark) = match event.cause {
            ScoreCause::Hit => (cfg.hit_shake, cfg.hit_stop_hit, TextTone::Gain, true),
            ScoreCause::Kill | ScoreCause::Parry => {
                (cfg.kill_shake, cfg.hit_stop_heavy, TextTone::Bonus, true)
            }
            ScoreCause::PlayerHit => (cfg.hit_shake, cfg.hit_stop_hit, TextTone::Penalty, false),
        };
        self.shake(magnitude, cfg.shake_duration);
        self.hit_stop(stop);
        let text = if event.delta >= 0 {
            format!("+{}", event.delta)
        } else {
            event.delta.to_string()
        };
        self.push_text(FloatingText {
            text,
            pos: event.at,
            tone,
            age: 0,
            ttl: cfg.text_ttl,
        });
        if spark {
            let variant = self.rng.u8(0..IMPACT_VARIANTS);
            self.push_impact(Impact {
                pos: event.at,
                variant,
                age: 0,
                ttl: cfg.impact_ttl,
            });
        }
    }

    /// Merge a shake into the running one.
    pub fn shake(&mut self, magnitude: f32, duration: u32) {
        if duration == 0 || magnitude <= 0.0 {
            return;
        }
        self.shake = Some(match self.shake {
            Some(current) => {
                let remaining = current.remaining.max(duration);
                Shake {
                    magnitude: current.magnitude.max(magnitude),
                    remaining,
                    duration: current.duration.max(remaining),
                }
            }
            None => Shake {
                magnitude,
                remaining: duration,
                duration,
            },
        });
    }

    pub fn hit_stop(&mut self, duration: u32) {
        self.hit_stop = self.hit_stop.max(duration);
    }

    /// Called by the clock at the start of a tick. Returns true when this
    /// tick is frozen, consuming one tick of hit-stop.
    pub fn consume_hit_stop(&mut self) -> bool {
        if self.hit_stop == 0 {
            return false;
        }
        self.hit_stop -= 1;
        true
    }

    fn push_text(&mut self, text: FloatingText) {
        if self.texts.is_full() {
            self.texts.remove(0);
        }
        self.texts.push(text);
    }

    fn push_impact(&mut self, impact: Impact) {
        if self.impacts.is_full() {
            self.impacts.remove(0);
        }
        self.impacts.push(impact);
    }

    /// Age every effect by one tick. Runs on frozen ticks too.
    pub fn age(&mut self) {
        self.shake = self.shake.and_then(|mut s| {
            s.remaining = s.remaining.saturating_sub(1);
            (s.remaining > 0).then_some(s)
        });
        self.shake_offset = match self.shake {
            Some(s) => {
                let strength = s.strength();
                Vec2::new(
                    (self.rng.f32() * 2.0 - 1.0) * strength,
                    (self.rng.f32() * 2.0 - 1.0) * strength,
                )
            }
            None => Vec2::ZERO,
        };
        for text in self.texts.iter_mut() {
            text.age += 1;
            text.pos.y -= TEXT_RISE;
        }
        self.texts.retain(|t| t.age < t.ttl);
        for impact in self.impacts.iter_mut() {
            impact.age += 1;
        }
        self.impacts.retain(|i| i.age < i.ttl);
    }

    pub fn current_shake(&self) -> Option<Shake> {
        self.shake
    }

    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }

    pub fn hit_stop_remaining(&self) -> u32 {
        self.hit_stop
    }

    pub fn texts(&self) -> &[FloatingText] {
        &self.texts
    }

    pub fn impacts(&self) -> &[Impact] {
        &self.impacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::gameconfig::GameConfig;

    fn event(delta: i64, cause: ScoreCause) -> ScoreEvent {
        ScoreEvent {
            delta,
            at: Vec2::new(100.0, 200.0),
            cause,
        }
    }

    #[test]
    fn test_weaker_shake_does_not_cancel_stronger() {
        let mut bus = FeedbackBus::default();
        bus.shake(9.0, 20);
        bus.age();
        bus.shake(2.0, 5);
        let s = bus.current_shake().unwrap();
        assert_eq!(s.magnitude, 9.0);
        assert_eq!(s.remaining, 19);
    }

    #[test]
    fn test_longer_shake_extends_remaining() {
        let mut bus = FeedbackBus::default();
        bus.shake(3.0, 5);
        bus.shake(1.0, 30);
        let s = bus.current_shake().unwrap();
        assert_eq!(s.magnitude, 3.0);
        assert_eq!(s.remaining, 30);
    }

    #[test]
    fn test_shake_expires_and_offset_clears() {
        let mut bus = FeedbackBus::default();
        bus.shake(5.0, 3);
        for _ in 0..3 {
            bus.age();
        }
        assert!(bus.current_shake().is_none());
        assert_eq!(bus.shake_offset(), Vec2::ZERO);
    }

    #[test]
    fn test_shake_offset_bounded_by_strength() {
        let mut bus = FeedbackBus::with_seed(7);
        bus.shake(6.0, 10);
        for _ in 0..9 {
            bus.age();
            let s = bus.current_shake().unwrap();
            let o = bus.shake_offset();
            assert!(o.x.abs() <= s.strength() + 1e-4);
            assert!(o.y.abs() <= s.strength() + 1e-4);
        }
    }

    #[test]
    fn test_hit_stop_takes_max() {
        let mut bus = FeedbackBus::default();
        bus.hit_stop(8);
        bus.hit_stop(3);
        assert_eq!(bus.hit_stop_remaining(), 8);
        let mut frozen = 0;
        while bus.consume_hit_stop() {
            frozen += 1;
        }
        assert_eq!(frozen, 8);
    }

    #[test]
    fn test_floating_texts_drop_oldest() {
        let mut bus = FeedbackBus::default();
        let cfg = GameConfig::new().feedback;
        for i in 0..(MAX_FLOATING_TEXTS as i64 + 4) {
            bus.notify(&event(i, ScoreCause::Hit), &cfg);
        }
        assert_eq!(bus.texts().len(), MAX_FLOATING_TEXTS);
        assert_eq!(bus.texts()[0].text, "+4");
        assert_eq!(bus.impacts().len(), MAX_IMPACTS);
    }

    #[test]
    fn test_floating_text_fades_monotonically_then_expires() {
        let mut bus = FeedbackBus::default();
        let cfg = GameConfig::new().feedback;
        bus.notify(&event(10, ScoreCause::Kill), &cfg);
        let mut last = bus.texts()[0].alpha();
        assert_eq!(last, 1.0);
        for _ in 1..cfg.text_ttl {
            bus.age();
            let a = bus.texts()[0].alpha();
            assert!(a <= last);
            last = a;
        }
        bus.age();
        assert!(bus.texts().is_empty());
    }

    #[test]
    fn test_penalty_text_and_no_impact() {
        let mut bus = FeedbackBus::default();
        let cfg = GameConfig::new().feedback;
        bus.notify(&event(-20, ScoreCause::PlayerHit), &cfg);
        assert_eq!(bus.texts()[0].text, "-20");
        assert_eq!(bus.texts()[0].tone, TextTone::Penalty);
        assert!(bus.impacts().is_empty());
    }

    #[test]
    fn test_kill_stops_longer_than_hit() {
        let cfg = GameConfig::new().feedback;
        let mut hit = FeedbackBus::default();
        hit.notify(&event(10, ScoreCause::Hit), &cfg);
        let mut kill = FeedbackBus::default();
        kill.notify(&event(60, ScoreCause::Kill), &cfg);
        assert!(kill.hit_stop_remaining() > hit.hit_stop_remaining());
        assert!(kill.current_shake().unwrap().magnitude > hit.current_shake().unwrap().magnitude);
    }
}
