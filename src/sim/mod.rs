//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, consumed by spawning alone
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{first_lifeline_pickup, first_obstacle_hit, overlaps};
pub use difficulty::{Difficulty, level_for_score, multiplier, speed_for_level};
pub use spawn::{HeightClass, Pattern, SpawnWindow};
pub use state::{
    Animation, GameEvent, GamePhase, GameState, GroundTile, Lifeline, Obstacle, Player,
};
pub use tick::{TickInput, tick};
