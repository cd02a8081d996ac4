//! Lifeline Run - a side-scrolling pill-dodging runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, difficulty, game state)
//! - `game`: Fixed-step driver wiring the simulation to its collaborators
//! - `renderer`: Read-only render snapshots and the render submission seam
//! - `audio`: Music commands derived from game events
//! - `tuning`: Data-driven game balance
//! - `settings`: Host preferences (frame rate, volume)

pub mod audio;
pub mod error;
pub mod game;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use game::{Resources, Simulation};
pub use settings::Settings;
pub use tuning::Tuning;

/// World geometry and fixed per-tick constants
pub mod consts {
    /// Fixed simulation timestep (144 Hz, the cadence the per-tick constants were tuned for)
    pub const SIM_DT: f32 = 1.0 / 144.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta the driver will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player anchor - x never changes
    pub const PLAYER_X: f32 = -5.0;
    /// Ground plane the player stands on
    pub const GROUND_Y: f32 = -6.0;
    /// Visual tilt while airborne (degrees)
    pub const AIRBORNE_TILT: f32 = 10.0;
    /// Invulnerability flash rate (toggles per second of running time)
    pub const FLASH_RATE: f32 = 10.0;

    /// Entities appear here, well right of the visible range
    pub const SPAWN_X: f32 = 25.0;
    /// Entities are reaped once they pass this, well left of the visible range
    pub const DESPAWN_X: f32 = -25.0;
    /// Visible horizontal range (renderers skip anything outside)
    pub const VISIBLE_MIN_X: f32 = -15.0;
    pub const VISIBLE_MAX_X: f32 = 20.0;

    /// Obstacle hit tolerance (per axis)
    pub const OBSTACLE_TOLERANCE: f32 = 1.2;
    /// Lifeline pickup tolerance (per axis)
    pub const LIFELINE_TOLERANCE: f32 = 1.3;

    /// Obstacle (pill) size
    pub const OBSTACLE_SIZE: f32 = 1.5;
    /// Obstacle float amplitude
    pub const OBSTACLE_FLOAT: f32 = 0.3;
    /// Lifeline size before pulse scaling
    pub const LIFELINE_SIZE: f32 = 1.2;
    /// Lifeline float amplitude
    pub const LIFELINE_FLOAT: f32 = 0.4;
    /// Lifeline pulse amplitude (fraction of size, must stay below 1)
    pub const LIFELINE_PULSE: f32 = 0.2;

    /// Phase advance scale applied to each entity's animation speed per tick
    pub const PHASE_STEP: f32 = 0.02;
    /// Lifeline pulse advance per tick
    pub const PULSE_STEP: f32 = 0.05;

    /// Ground strip
    pub const GROUND_TILE_COUNT: usize = 20;
    pub const GROUND_TILE_WIDTH: f32 = 4.0;
    pub const GROUND_TILE_Y: f32 = -8.0;
    pub const GROUND_TILE_WRAP_X: f32 = -30.0;
}

/// Vertical float offset for an animation phase
#[inline]
pub fn float_offset(phase: f32, amplitude: f32) -> f32 {
    phase.sin() * amplitude
}
