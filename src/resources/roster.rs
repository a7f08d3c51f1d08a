//! Per-kind actor configuration records.
//!
//! The [`Roster`] resource is the single place kind-specific constants live:
//! the player's action table and one [`EnemyArchetype`] per enemy type.
//! Systems look records up through
//! [`ActorKind`](crate::components::actor::ActorKind) instead of reading
//! fields improvised on an instance.
//!
//! Offsets are authored for an actor facing right, relative to its pivot
//! (feet, on the ground line; negative `y` is up).
//!
//! A roster can be loaded from JSON:
//!
//! ```json
//! {
//!   "player": { "primary": { "duration": 30, "variants": 2, "hitbox": { ... } }, ... },
//!   "enemies": [ { "name": "walker", "side": "Right", "speed_base": 2.0, ... } ]
//! }
//! ```

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::components::actor::{ActorKind, EnemyTypeId, Facing};
use crate::components::actorstate::AttackKind;
use crate::components::boxcollider::BoxCollider;

/// Attack hitbox with its active frame window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxSpec {
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
    pub active_start: u32,
    pub active_end: u32,
    /// Last tick of the early parry window, if the action has one.
    #[serde(default)]
    pub parry_end: Option<u32>,
}

/// How a connecting hitbox is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitKind {
    Normal,
    Parry,
}

impl HitboxSpec {
    pub fn collider(&self) -> BoxCollider {
        BoxCollider::new(self.width, self.height)
            .with_offset(Vec2::new(self.offset_x, self.offset_y))
    }

    /// Classify a connection at `timer`; `None` outside the active window.
    pub fn classify(&self, timer: u32) -> Option<HitKind> {
        if timer < self.active_start || timer > self.active_end {
            return None;
        }
        match self.parry_end {
            Some(end) if timer <= end => Some(HitKind::Parry),
            _ => Some(HitKind::Normal),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Ticks the action lasts before the player reverts to walking.
    pub duration: u32,
    /// Number of interchangeable visual variants.
    #[serde(default = "one")]
    pub variants: u8,
    pub hitbox: HitboxSpec,
}

fn one() -> u8 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoxSpec {
    pub fn collider(&self) -> BoxCollider {
        BoxCollider::new(self.width, self.height)
            .with_offset(Vec2::new(self.offset_x, self.offset_y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimSpec {
    pub frames: u32,
    pub ticks_per_frame: u32,
}

/// Spawn cooldown as a function of global difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnCurve {
    /// Interval in ticks at difficulty 1.0.
    pub base_interval: u32,
    /// Ticks removed per unit of difficulty above 1.0.
    pub slope: f32,
    pub min_interval: u32,
}

impl SpawnCurve {
    /// Cooldown in ticks; non-increasing in `difficulty`, never below the floor.
    pub fn interval(&self, difficulty: f32) -> u32 {
        let floor = self.min_interval.max(1);
        let reduction = (self.slope.max(0.0) * (difficulty - 1.0).max(0.0)).floor();
        let raw = self.base_interval as f32 - reduction;
        if raw <= floor as f32 {
            floor
        } else {
            raw as u32
        }
    }
}

/// Which screen edge an enemy type enters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Facing of an enemy walking in from this side.
    pub fn approach_facing(self) -> Facing {
        match self {
            Side::Left => Facing::Right,
            Side::Right => Facing::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerArchetype {
    pub primary: ActionSpec,
    pub secondary: ActionSpec,
    pub low: ActionSpec,
    pub stagger_duration: u32,
    pub hurtbox: BoxSpec,
    pub walk_anim: AnimSpec,
}

impl PlayerArchetype {
    pub fn action(&self, kind: AttackKind) -> &ActionSpec {
        match kind {
            AttackKind::Primary => &self.primary,
            AttackKind::Secondary => &self.secondary,
            AttackKind::Low => &self.low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyArchetype {
    pub name: String,
    pub side: Side,
    pub speed_base: f32,
    /// Hits that kill an instance of this type.
    pub death_threshold: u32,
    pub stagger_duration: u32,
    pub death_duration: u32,
    pub hurtbox: BoxSpec,
    pub contact: BoxSpec,
    pub spawn: SpawnCurve,
    /// Global difficulty at which this type starts spawning.
    #[serde(default = "unlocked")]
    pub unlock_difficulty: f32,
    /// Distinct vocalization cues cycled on each hit.
    #[serde(default = "one_u32")]
    pub voices: u32,
    pub walk_anim: AnimSpec,
}

fn unlocked() -> f32 {
    1.0
}

fn one_u32() -> u32 {
    1
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub player: PlayerArchetype,
    pub enemies: Vec<EnemyArchetype>,
}

const STANDARD_HURTBOX: BoxSpec = BoxSpec {
    offset_x: -30.0,
    offset_y: -150.0,
    width: 60.0,
    height: 150.0,
};

const FRONT_CONTACT: BoxSpec = BoxSpec {
    offset_x: 30.0,
    offset_y: -120.0,
    width: 20.0,
    height: 80.0,
};

const STRIKE: ActionSpec = ActionSpec {
    duration: 30,
    variants: 2,
    hitbox: HitboxSpec {
        offset_x: 40.0,
        offset_y: -130.0,
        width: 110.0,
        height: 60.0,
        active_start: 5,
        active_end: 20,
        parry_end: None,
    },
};

impl Default for Roster {
    fn default() -> Self {
        Self {
            player: PlayerArchetype {
                primary: STRIKE,
                secondary: STRIKE,
                low: ActionSpec {
                    duration: 24,
                    variants: 1,
                    hitbox: HitboxSpec {
                        offset_x: 30.0,
                        offset_y: -60.0,
                        width: 100.0,
                        height: 50.0,
                        active_start: 3,
                        active_end: 14,
                        parry_end: Some(8),
                    },
                },
                stagger_duration: 40,
                hurtbox: STANDARD_HURTBOX,
                walk_anim: AnimSpec {
                    frames: 8,
                    ticks_per_frame: 15,
                },
            },
            enemies: vec![
                EnemyArchetype {
                    name: "walker".into(),
                    side: Side::Right,
                    speed_base: 2.0,
                    death_threshold: 6,
                    stagger_duration: 60,
                    death_duration: 45,
                    hurtbox: STANDARD_HURTBOX,
                    contact: FRONT_CONTACT,
                    spawn: SpawnCurve {
                        base_interval: 90,
                        slope: 30.0,
                        min_interval: 20,
                    },
                    unlock_difficulty: 1.0,
                    voices: 7,
                    walk_anim: AnimSpec {
                        frames: 21,
                        ticks_per_frame: 5,
                    },
                },
                EnemyArchetype {
                    name: "flanker".into(),
                    side: Side::Left,
                    speed_base: 2.6,
                    death_threshold: 3,
                    stagger_duration: 45,
                    death_duration: 40,
                    hurtbox: STANDARD_HURTBOX,
                    contact: FRONT_CONTACT,
                    spawn: SpawnCurve {
                        base_interval: 150,
                        slope: 40.0,
                        min_interval: 30,
                    },
                    unlock_difficulty: 1.5,
                    voices: 3,
                    walk_anim: AnimSpec {
                        frames: 12,
                        ticks_per_frame: 4,
                    },
                },
                EnemyArchetype {
                    name: "brute".into(),
                    side: Side::Right,
                    speed_base: 1.4,
                    death_threshold: 10,
                    stagger_duration: 50,
                    death_duration: 70,
                    hurtbox: BoxSpec {
                        offset_x: -45.0,
                        offset_y: -190.0,
                        width: 90.0,
                        height: 190.0,
                    },
                    contact: BoxSpec {
                        offset_x: 45.0,
                        offset_y: -150.0,
                        width: 25.0,
                        height: 100.0,
                    },
                    spawn: SpawnCurve {
                        base_interval: 240,
                        slope: 50.0,
                        min_interval: 60,
                    },
                    unlock_difficulty: 2.0,
                    voices: 2,
                    walk_anim: AnimSpec {
                        frames: 10,
                        ticks_per_frame: 8,
                    },
                },
            ],
        }
    }
}

impl Roster {
    pub fn enemy(&self, id: EnemyTypeId) -> Option<&EnemyArchetype> {
        self.enemies.get(id.0)
    }

    /// Hurtbox of any actor kind.
    pub fn hurtbox(&self, kind: ActorKind) -> Option<BoxCollider> {
        match kind {
            ActorKind::Player => Some(self.player.hurtbox.collider()),
            ActorKind::Enemy(id) => self.enemy(id).map(|e| e.hurtbox.collider()),
        }
    }

    pub fn walk_anim(&self, kind: ActorKind) -> Option<AnimSpec> {
        match kind {
            ActorKind::Player => Some(self.player.walk_anim),
            ActorKind::Enemy(id) => self.enemy(id).map(|e| e.walk_anim),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let roster: Roster =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse roster: {}", e))?;
        roster.validate()?;
        Ok(roster)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read roster {:?}: {}", path, e))?;
        let roster = Self::from_json_str(&json)?;
        info!(
            "Loaded roster from {:?}: {} enemy types",
            path,
            roster.enemies.len()
        );
        Ok(roster)
    }

    /// Check frame windows and thresholds.
    pub fn validate(&self) -> Result<(), String> {
        for kind in [AttackKind::Primary, AttackKind::Secondary, AttackKind::Low] {
            let action = self.player.action(kind);
            validate_action(action).map_err(|e| format!("player {:?}: {}", kind, e))?;
        }
        if self.player.stagger_duration == 0 {
            return Err("player stagger_duration must be positive".into());
        }
        validate_anim(&self.player.walk_anim).map_err(|e| format!("player: {}", e))?;
        if self.enemies.is_empty() {
            return Err("roster has no enemy types".into());
        }
        for enemy in &self.enemies {
            let err = |msg: &str| format!("enemy '{}': {}", enemy.name, msg);
            if enemy.death_threshold == 0 {
                return Err(err("death_threshold must be positive"));
            }
            if enemy.stagger_duration == 0 || enemy.death_duration == 0 {
                return Err(err("stagger and death durations must be positive"));
            }
            if enemy.speed_base < 0.0 {
                return Err(err("speed_base must not be negative"));
            }
            if enemy.voices == 0 {
                return Err(err("voices must be positive"));
            }
            validate_anim(&enemy.walk_anim).map_err(|e| err(&e))?;
        }
        Ok(())
    }
}

fn validate_action(action: &ActionSpec) -> Result<(), String> {
    let hb = &action.hitbox;
    if action.duration == 0 {
        return Err("duration must be positive".into());
    }
    if action.variants == 0 {
        return Err("variants must be positive".into());
    }
    if hb.active_start > hb.active_end {
        return Err(format!(
            "active window {}..={} is empty",
            hb.active_start, hb.active_end
        ));
    }
    if hb.active_end > action.duration {
        return Err(format!(
            "active_end {} exceeds duration {}",
            hb.active_end, action.duration
        ));
    }
    if let Some(parry_end) = hb.parry_end {
        if parry_end > hb.active_end || parry_end < hb.active_start {
            return Err(format!(
                "parry_end {} outside active window {}..={}",
                parry_end, hb.active_start, hb.active_end
            ));
        }
    }
    Ok(())
}

fn validate_anim(anim: &AnimSpec) -> Result<(), String> {
    if anim.frames == 0 || anim.ticks_per_frame == 0 {
        return Err("animation needs frames and ticks_per_frame".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_actions(roster: &Roster) -> Vec<ActionSpec> {
        vec![roster.player.primary, roster.player.secondary, roster.player.low]
    }

    #[test]
    fn test_default_roster_is_valid() {
        assert_eq!(Roster::default().validate(), Ok(()));
    }

    #[test]
    fn test_parry_window_is_subset_of_active_window() {
        for action in all_actions(&Roster::default()) {
            let hb = action.hitbox;
            if let Some(end) = hb.parry_end {
                assert!(end <= hb.active_end);
                assert_eq!(hb.classify(end), Some(HitKind::Parry));
                if end < hb.active_end {
                    assert_eq!(hb.classify(end + 1), Some(HitKind::Normal));
                }
            }
        }
    }

    #[test]
    fn test_classify_outside_window() {
        let hb = Roster::default().player.low.hitbox;
        assert_eq!(hb.classify(hb.active_start - 1), None);
        assert_eq!(hb.classify(hb.active_start), Some(HitKind::Parry));
        assert_eq!(hb.classify(hb.active_end), Some(HitKind::Normal));
        assert_eq!(hb.classify(hb.active_end + 1), None);
    }

    #[test]
    fn test_classify_without_parry_window() {
        let hb = STRIKE.hitbox;
        assert_eq!(hb.parry_end, None);
        assert_eq!(hb.classify(hb.active_start), Some(HitKind::Normal));
    }

    #[test]
    fn test_validate_rejects_parry_past_active_end() {
        let mut roster = Roster::default();
        roster.player.low.hitbox.parry_end = Some(roster.player.low.hitbox.active_end + 1);
        assert!(roster.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_active_end_past_duration() {
        let mut roster = Roster::default();
        roster.player.primary.hitbox.active_end = roster.player.primary.duration + 1;
        assert!(roster.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        let mut roster = Roster::default();
        roster.enemies[0].death_threshold = 0;
        let err = roster.validate().unwrap_err();
        assert!(err.contains("walker"));
    }

    #[test]
    fn test_spawn_interval_monotonic_with_floor() {
        for enemy in &Roster::default().enemies {
            let curve = enemy.spawn;
            let mut last = curve.interval(1.0);
            assert_eq!(last, curve.base_interval);
            let mut d = 1.0;
            while d < 50.0 {
                d += 0.05;
                let next = curve.interval(d);
                assert!(next <= last);
                assert!(next >= curve.min_interval);
                last = next;
            }
            assert_eq!(last, curve.min_interval);
        }
    }

    #[test]
    fn test_spawn_interval_floor_never_zero() {
        let curve = SpawnCurve {
            base_interval: 0,
            slope: 10.0,
            min_interval: 0,
        };
        assert_eq!(curve.interval(1.0), 1);
        assert_eq!(curve.interval(9.0), 1);
    }

    #[test]
    fn test_json_roundtrip_keeps_defaults() {
        let json = serde_json::to_string(&Roster::default()).unwrap();
        let parsed = Roster::from_json_str(&json).unwrap();
        assert_eq!(parsed, Roster::default());
    }

    #[test]
    fn test_json_optional_fields_default() {
        let mut value = serde_json::to_value(Roster::default()).unwrap();
        let enemy = value["enemies"][0].as_object_mut().unwrap();
        enemy.remove("unlock_difficulty");
        enemy.remove("voices");
        let parsed = Roster::from_json_str(&value.to_string()).unwrap();
        assert_eq!(parsed.enemies[0].unlock_difficulty, 1.0);
        assert_eq!(parsed.enemies[0].voices, 1);
    }

    #[test]
    fn test_json_invalid_is_error() {
        assert!(Roster::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_side_facing() {
        assert_eq!(Side::Right.approach_facing(), Facing::Left);
        assert_eq!(Side::Left.approach_facing(), Facing::Right);
    }
}
