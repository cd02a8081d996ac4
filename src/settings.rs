//! Host settings and preferences
//!
//! Kept apart from [`Tuning`](crate::Tuning): these never change how the
//! simulation plays, only how the host paces and sounds it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, load_json};

/// Host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Frame-rate cap for the host loop
    pub target_fps: u32,

    // === Audio ===
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Silence all audio
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_fps: 144,
            music_volume: 0.5,
            muted: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = load_json(path)?;
        if settings.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be at least 1".into()));
        }
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Effective music volume (respects mute)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.music_volume.clamp(0.0, 1.0)
        }
    }

    /// Seconds per frame at the target rate
    pub fn frame_budget(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }
}
