//! Axis-aligned overlap tests between the player and scrolling entities
//!
//! Each axis gets its own tolerance half-width, so the hit box is a square
//! around the player's centre rather than a true sprite overlap.

use glam::Vec2;

use super::state::{Lifeline, Obstacle};
use crate::consts::{LIFELINE_TOLERANCE, OBSTACLE_TOLERANCE};

/// Whether two centres are within `tolerance` on both axes
#[inline]
pub fn overlaps(a: Vec2, b: Vec2, tolerance: f32) -> bool {
    let d = (a - b).abs();
    d.x < tolerance && d.y < tolerance
}

/// Index of the first obstacle touching the player, if any
pub fn first_obstacle_hit(player: Vec2, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| overlaps(player, o.pos, OBSTACLE_TOLERANCE))
}

/// Index of the first lifeline in pickup range, if any
pub fn first_lifeline_pickup(player: Vec2, lifelines: &[Lifeline]) -> Option<usize> {
    lifelines
        .iter()
        .position(|l| overlaps(player, l.pos, LIFELINE_TOLERANCE))
}
