//! Data-driven game balance
//!
//! Every number a designer might want to tweak between builds. Missing JSON
//! fields fall back to the shipped defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, load_json};

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player physics (per tick) ===
    /// Velocity lost each tick
    pub gravity: f32,
    /// Velocity set on jump
    pub jump_force: f32,
    /// Boost is only allowed below this height
    pub max_jump_height: f32,
    /// Scales the mid-air boost impulse
    pub air_control: f32,
    /// Seconds of invulnerability after losing a life
    pub invulnerable_duration: f32,

    // === Difficulty ===
    /// Scroll speed at level 1 (world units per tick)
    pub base_speed: f32,
    /// Obstacle spawn window at level 1 (seconds)
    pub base_spawn_min: f32,
    pub base_spawn_max: f32,
    /// Lifeline spawn window at level 1 (seconds)
    pub base_lifeline_spawn_min: f32,
    pub base_lifeline_spawn_max: f32,
    /// Level cap
    pub max_difficulty_level: u32,
    /// Score needed per level
    pub points_per_level: u64,

    // === Run ===
    pub starting_lives: u32,
    /// Score that latches the "999 forever" state
    pub forever_score: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.015,
            jump_force: 0.45,
            max_jump_height: 0.2,
            air_control: 0.9,
            invulnerable_duration: 1.5,

            base_speed: 0.12,
            base_spawn_min: 1.0,
            base_spawn_max: 2.0,
            base_lifeline_spawn_min: 6.0,
            base_lifeline_spawn_max: 10.0,
            max_difficulty_level: 15,
            points_per_level: 10,

            starting_lives: 5,
            forever_score: 999,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON string and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let tuning: Tuning = load_json(path)?;
        tuning.validate()?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_difficulty_level == 0 {
            return Err(ConfigError::Invalid("max_difficulty_level must be at least 1".into()));
        }
        if self.points_per_level == 0 {
            return Err(ConfigError::Invalid("points_per_level must be at least 1".into()));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting_lives must be at least 1".into()));
        }
        if !(self.base_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "base_speed must be positive, got {}",
                self.base_speed
            )));
        }
        if !(self.gravity > 0.0) || !(self.jump_force > 0.0) {
            return Err(ConfigError::Invalid("gravity and jump_force must be positive".into()));
        }
        let windows = [
            ("base_spawn_min", self.base_spawn_min),
            ("base_spawn_max", self.base_spawn_max),
            ("base_lifeline_spawn_min", self.base_lifeline_spawn_min),
            ("base_lifeline_spawn_max", self.base_lifeline_spawn_max),
        ];
        for (name, value) in windows {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        // Inverted windows still run: sampling collapses them to their minimum
        if self.base_spawn_min > self.base_spawn_max {
            log::warn!("base_spawn_min exceeds base_spawn_max, obstacle window will collapse");
        }
        if self.base_lifeline_spawn_min > self.base_lifeline_spawn_max {
            log::warn!(
                "base_lifeline_spawn_min exceeds base_lifeline_spawn_max, lifeline window will collapse"
            );
        }
        Ok(())
    }
}
