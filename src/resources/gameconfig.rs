//! Game configuration resource.
//!
//! Holds the tunable numbers of the combat loop: field geometry, clock and
//! difficulty ramp, combo scoring, spawn placement and feedback strengths.
//! Defaults are safe for startup; [`GameConfig::load_from_file`] overrides
//! whatever keys the INI file provides.
//!
//! # Configuration File Format
//!
//! ```ini
//! [field]
//! width = 800
//! ground_y = 450
//! player_x = 400
//!
//! [clock]
//! difficulty_step = 0.0001
//! difficulty_cap = 4.0
//!
//! [combo]
//! window = 90
//! breakpoint = 5
//! hit_value = 10
//! parry_value = 25
//! kill_bonus = 50
//! player_hit_penalty = 20
//!
//! [spawn]
//! jitter = 500
//! min_gap = 120
//! speed_step = 0.1
//! speed_max = 12.0
//!
//! [feedback]
//! hit_shake = 4.0
//! kill_shake = 9.0
//! shake_duration = 12
//! hit_stop_hit = 3
//! hit_stop_heavy = 8
//! text_ttl = 45
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

const DEFAULT_CONFIG_PATH: &str = "./sidebrawl.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Visible field width; enemies enter at one edge and escape at the other.
    pub width: f32,
    pub ground_y: f32,
    pub player_x: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClockConfig {
    /// Added to the global difficulty every simulated tick.
    pub difficulty_step: f32,
    pub difficulty_cap: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComboConfig {
    /// Ticks a combo survives without a new hit.
    pub window: u32,
    pub breakpoint: u32,
    pub hit_value: i64,
    pub parry_value: i64,
    pub kill_bonus: i64,
    pub player_hit_penalty: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnConfig {
    /// Maximum random distance beyond the entry edge.
    pub jitter: f32,
    /// Minimum horizontal gap kept from other active enemies.
    pub min_gap: f32,
    /// Added to an enemy's base speed on every respawn.
    pub speed_step: f32,
    /// Ceiling for both base and current speed.
    pub speed_max: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackConfig {
    pub hit_shake: f32,
    pub kill_shake: f32,
    pub shake_duration: u32,
    pub hit_stop_hit: u32,
    /// Hit-stop for kills and parries.
    pub hit_stop_heavy: u32,
    pub text_ttl: u32,
    pub impact_ttl: u32,
}

/// Game configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub field: FieldConfig,
    pub clock: ClockConfig,
    pub combo: ComboConfig,
    pub spawn: SpawnConfig,
    pub feedback: FeedbackConfig,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            field: FieldConfig {
                width: 800.0,
                ground_y: 450.0,
                player_x: 400.0,
            },
            clock: ClockConfig {
                difficulty_step: 0.0001,
                difficulty_cap: 4.0,
            },
            combo: ComboConfig {
                window: 90,
                breakpoint: 5,
                hit_value: 10,
                parry_value: 25,
                kill_bonus: 50,
                player_hit_penalty: 20,
            },
            spawn: SpawnConfig {
                jitter: 500.0,
                min_gap: 120.0,
                speed_step: 0.1,
                speed_max: 12.0,
            },
            feedback: FeedbackConfig {
                hit_shake: 4.0,
                kill_shake: 9.0,
                shake_duration: 12,
                hit_stop_hit: 3,
                hit_stop_heavy: 8,
                text_ttl: 45,
                impact_ttl: 30,
            },
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&config);

        info!(
            "Loaded config: field {}x{} player_x={}, difficulty +{}/tick cap {}, combo window {}",
            self.field.width,
            self.field.ground_y,
            self.field.player_x,
            self.clock.difficulty_step,
            self.clock.difficulty_cap,
            self.combo.window
        );

        Ok(())
    }

    /// Parse INI text directly, starting from defaults.
    pub fn from_ini_str(text: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        let mut cfg = Self::new();
        cfg.apply_ini(&config);
        Ok(cfg)
    }

    fn apply_ini(&mut self, config: &Ini) {
        let float = |section: &str, key: &str| config.getfloat(section, key).ok().flatten();
        let uint = |section: &str, key: &str| config.getuint(section, key).ok().flatten();
        let int = |section: &str, key: &str| config.getint(section, key).ok().flatten();

        // [field] section
        if let Some(v) = float("field", "width") {
            self.field.width = v as f32;
        }
        if let Some(v) = float("field", "ground_y") {
            self.field.ground_y = v as f32;
        }
        if let Some(v) = float("field", "player_x") {
            self.field.player_x = v as f32;
        }

        // [clock] section
        if let Some(v) = float("clock", "difficulty_step") {
            self.clock.difficulty_step = v as f32;
        }
        if let Some(v) = float("clock", "difficulty_cap") {
            self.clock.difficulty_cap = v as f32;
        }

        // [combo] section
        if let Some(v) = uint("combo", "window") {
            self.combo.window = v as u32;
        }
        if let Some(v) = uint("combo", "breakpoint") {
            self.combo.breakpoint = v as u32;
        }
        if let Some(v) = int("combo", "hit_value") {
            self.combo.hit_value = v;
        }
        if let Some(v) = int("combo", "parry_value") {
            self.combo.parry_value = v;
        }
        if let Some(v) = int("combo", "kill_bonus") {
            self.combo.kill_bonus = v;
        }
        if let Some(v) = int("combo", "player_hit_penalty") {
            self.combo.player_hit_penalty = v;
        }

        // [spawn] section
        if let Some(v) = float("spawn", "jitter") {
            self.spawn.jitter = v as f32;
        }
        if let Some(v) = float("spawn", "min_gap") {
            self.spawn.min_gap = v as f32;
        }
        if let Some(v) = float("spawn", "speed_step") {
            self.spawn.speed_step = v as f32;
        }
        if let Some(v) = float("spawn", "speed_max") {
            self.spawn.speed_max = v as f32;
        }

        // [feedback] section
        if let Some(v) = float("feedback", "hit_shake") {
            self.feedback.hit_shake = v as f32;
        }
        if let Some(v) = float("feedback", "kill_shake") {
            self.feedback.kill_shake = v as f32;
        }
        if let Some(v) = uint("feedback", "shake_duration") {
            self.feedback.shake_duration = v as u32;
        }
        if let Some(v) = uint("feedback", "hit_stop_hit") {
            self.feedback.hit_stop_hit = v as u32;
        }
        if let Some(v) = uint("feedback", "hit_stop_heavy") {
            self.feedback.hit_stop_heavy = v as u32;
        }
        if let Some(v) = uint("feedback", "text_ttl") {
            self.feedback.text_ttl = v as u32;
        }
        if let Some(v) = uint("feedback", "impact_ttl") {
            self.feedback.impact_ttl = v as u32;
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();
        let mut set = |section: &str, key: &str, value: String| {
            config.set(section, key, Some(value));
        };

        set("field", "width", self.field.width.to_string());
        set("field", "ground_y", self.field.ground_y.to_string());
        set("field", "player_x", self.field.player_x.to_string());

        set("clock", "difficulty_step", self.clock.difficulty_step.to_string());
        set("clock", "difficulty_cap", self.clock.difficulty_cap.to_string());

        set("combo", "window", self.combo.window.to_string());
        set("combo", "breakpoint", self.combo.breakpoint.to_string());
        set("combo", "hit_value", self.combo.hit_value.to_string());
        set("combo", "parry_value", self.combo.parry_value.to_string());
        set("combo", "kill_bonus", self.combo.kill_bonus.to_string());
        set(
            "combo",
            "player_hit_penalty",
            self.combo.player_hit_penalty.to_string(),
        );

        set("spawn", "jitter", self.spawn.jitter.to_string());
        set("spawn", "min_gap", self.spawn.min_gap.to_string());
        set("spawn", "speed_step", self.spawn.speed_step.to_string());
        set("spawn", "speed_max", self.spawn.speed_max.to_string());

        set("feedback", "hit_shake", self.feedback.hit_shake.to_string());
        set("feedback", "kill_shake", self.feedback.kill_shake.to_string());
        set(
            "feedback",
            "shake_duration",
            self.feedback.shake_duration.to_string(),
        );
        set("feedback", "hit_stop_hit", self.feedback.hit_stop_hit.to_string());
        set(
            "feedback",
            "hit_stop_heavy",
            self.feedback.hit_stop_heavy.to_string(),
        );
        set("feedback", "text_ttl", self.feedback.text_ttl.to_string());
        set("feedback", "impact_ttl", self.feedback.impact_ttl.to_string());

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Check values the simulation divides by or clamps against.
    pub fn validate(&self) -> Result<(), String> {
        if self.field.width <= 0.0 {
            return Err("field.width must be positive".into());
        }
        if self.combo.breakpoint == 0 {
            return Err("combo.breakpoint must be positive".into());
        }
        if self.combo.window == 0 {
            return Err("combo.window must be positive".into());
        }
        if !self.clock.difficulty_cap.is_finite() || self.clock.difficulty_cap < 1.0 {
            return Err("clock.difficulty_cap must be at least 1.0".into());
        }
        if !self.clock.difficulty_step.is_finite() || self.clock.difficulty_step < 0.0 {
            return Err("clock.difficulty_step must be finite and not negative".into());
        }
        for (key, value) in [
            ("spawn.jitter", self.spawn.jitter),
            ("spawn.min_gap", self.spawn.min_gap),
            ("spawn.speed_max", self.spawn.speed_max),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be finite and not negative", key));
            }
        }
        Ok(())
    }
}
