//! Difficulty curve
//!
//! Everything scales off a single score counter: level is a step function of
//! score, and the normalized multiplier drives speed, spawn windows and
//! obstacle animation.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Level for a given score: one level per `points_per_level`, capped
pub fn level_for_score(score: u64, points_per_level: u64, max_level: u32) -> u32 {
    let level = score / points_per_level.max(1) + 1;
    level.min(max_level as u64) as u32
}

/// Normalized progress in [0, 1]
pub fn multiplier(level: u32, max_level: u32) -> f32 {
    (level as f32 / max_level.max(1) as f32).min(1.0)
}

/// Scroll speed for a level (up to 5x base at the cap)
pub fn speed_for_level(base_speed: f32, level: u32, max_level: u32) -> f32 {
    base_speed * (1.0 + multiplier(level, max_level) * 4.0)
}

/// Cached difficulty for the current run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Current level, starts at 1
    pub level: u32,
    /// Scroll speed for `level`, only recomputed on level change
    pub speed: f32,
}

impl Difficulty {
    /// Level 1 difficulty for the given tuning
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            level: 1,
            speed: speed_for_level(tuning.base_speed, 1, tuning.max_difficulty_level),
        }
    }

    /// Normalized progress for the current level
    pub fn multiplier(&self, tuning: &Tuning) -> f32 {
        multiplier(self.level, tuning.max_difficulty_level)
    }

    /// Re-evaluate after a score change. Returns the new level if it changed.
    pub fn update(&mut self, score: u64, tuning: &Tuning) -> Option<u32> {
        let level = level_for_score(score, tuning.points_per_level, tuning.max_difficulty_level);
        if level == self.level {
            return None;
        }
        self.level = level;
        self.speed = speed_for_level(tuning.base_speed, level, tuning.max_difficulty_level);
        Some(level)
    }

    /// Speed gain over base as a whole percentage, for the HUD
    pub fn speed_percent(&self, tuning: &Tuning) -> u32 {
        // Nudge so float noise never floors 400 down to 399
        ((self.speed / tuning.base_speed - 1.0) * 100.0 + 1e-3).max(0.0) as u32
    }
}
