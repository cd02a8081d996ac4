//! Spawn scheduling and obstacle patterns
//!
//! Two independent timers run against running time. The obstacle threshold
//! is redrawn from a difficulty-scaled window on every check, so the gap
//! between spawns is itself random. Lifelines use a gentler window plus a
//! coin flip once their timer has elapsed.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::state::{Animation, GameState, Lifeline, Obstacle};
use crate::consts::*;
use crate::tuning::Tuning;

/// Shortest obstacle window the curve may reach (seconds)
pub const OBSTACLE_WINDOW_FLOOR: (f32, f32) = (0.4, 0.8);
/// Shortest lifeline window the curve may reach (seconds)
pub const LIFELINE_WINDOW_FLOOR: (f32, f32) = (5.0, 8.0);
/// How hard difficulty squeezes each window
const OBSTACLE_WINDOW_SQUEEZE: f32 = 0.7;
const LIFELINE_WINDOW_SQUEEZE: f32 = 0.3;
/// Chance a due lifeline actually appears
const LIFELINE_CHANCE: f64 = 0.5;

/// Lifeline altitude draws before falling back
pub const LIFELINE_ATTEMPTS: usize = 10;
/// Band lifeline altitudes are drawn from
pub const LIFELINE_BAND: (f32, f32) = (-5.0, -3.0);
/// Altitude used when every draw collides with an obstacle lane
pub const LIFELINE_FALLBACK_Y: f32 = -2.8;
/// Minimum vertical distance from obstacles near the spawn point
pub const LIFELINE_CLEARANCE: f32 = 1.5;
/// Obstacles within this distance of `SPAWN_X` count as near the spawn point
pub const SPAWN_NEIGHBOURHOOD: f32 = 2.0;

/// Horizontal spacing between triple obstacles
const TRIPLE_STEP: f32 = 1.8;

/// Uniform draw from [lo, hi], collapsing an inverted range onto `lo`
fn uniform(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return lo;
    }
    rng.random_range(lo..=hi)
}

/// Named obstacle altitudes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightClass {
    Ground,
    LowAir,
    MidAir,
    HighAir,
    Sky,
}

impl HeightClass {
    /// Base altitude in world units
    pub fn altitude(self) -> f32 {
        match self {
            HeightClass::Ground => -5.5,
            HeightClass::LowAir => -4.5,
            HeightClass::MidAir => -3.5,
            HeightClass::HighAir => -2.5,
            HeightClass::Sky => -1.5,
        }
    }

    fn pick(rng: &mut impl Rng, from: &[HeightClass]) -> HeightClass {
        from[rng.random_range(0..from.len())]
    }
}

/// Obstacle formations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    SingleGround,
    SingleAir,
    DoubleStack,
    GapVertical,
    Triple,
    GapHorizontal,
}

impl Pattern {
    /// Patterns available at a difficulty level.
    ///
    /// Double stacks retire at level 9 when horizontal gaps arrive.
    pub fn pool(level: u32) -> &'static [Pattern] {
        use Pattern::*;
        match level {
            9.. => &[SingleGround, SingleAir, GapVertical, GapHorizontal, Triple],
            7..=8 => &[SingleGround, SingleAir, GapVertical, DoubleStack, Triple],
            5..=6 => &[SingleGround, SingleAir, GapVertical, DoubleStack],
            3..=4 => &[SingleGround, SingleAir, DoubleStack],
            _ => &[SingleGround, SingleAir],
        }
    }

    /// Pick a pattern uniformly from the level's pool
    pub fn choose(level: u32, rng: &mut impl Rng) -> Pattern {
        let pool = Self::pool(level);
        pool[rng.random_range(0..pool.len())]
    }
}

/// Where one obstacle of a pattern goes, relative to `SPAWN_X`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x_offset: f32,
    pub base_y: f32,
}

impl Placement {
    fn at(base_y: f32) -> Self {
        Self { x_offset: 0.0, base_y }
    }
}

/// Lay out the obstacles of a pattern
pub fn compose(pattern: Pattern, rng: &mut impl Rng) -> Vec<Placement> {
    use HeightClass::*;
    match pattern {
        Pattern::SingleGround => vec![Placement::at(Ground.altitude())],
        Pattern::SingleAir => {
            let height = HeightClass::pick(rng, &[LowAir, MidAir, HighAir]);
            vec![Placement::at(height.altitude())]
        }
        Pattern::DoubleStack => vec![
            Placement::at(uniform(rng, -5.5, -4.5)),
            Placement::at(uniform(rng, -3.5, -2.5)),
        ],
        Pattern::GapVertical => {
            let gap = uniform(rng, 2.5, 3.2);
            let centre = uniform(rng, -4.0, -2.5);
            let mut placements = Vec::with_capacity(2);
            let bottom = centre - gap / 2.0;
            if bottom > -6.5 {
                placements.push(Placement::at(bottom));
            }
            let top = centre + gap / 2.0;
            if top < -0.5 {
                placements.push(Placement::at(top));
            }
            placements
        }
        Pattern::Triple => {
            let mut heights = [Ground, MidAir, HighAir];
            heights.shuffle(rng);
            heights
                .iter()
                .enumerate()
                .map(|(i, h)| Placement {
                    x_offset: i as f32 * TRIPLE_STEP,
                    base_y: h.altitude(),
                })
                .collect()
        }
        Pattern::GapHorizontal => {
            let first = HeightClass::pick(rng, &[Ground, LowAir, MidAir]);
            let second = HeightClass::pick(rng, &[LowAir, MidAir, HighAir]);
            vec![
                Placement::at(first.altitude()),
                Placement {
                    x_offset: uniform(rng, 2.0, 3.0),
                    base_y: second.altitude(),
                },
            ]
        }
    }
}

/// A sampling window for spawn intervals (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnWindow {
    pub min: f32,
    pub max: f32,
}

impl SpawnWindow {
    fn squeezed(base: (f32, f32), floor: (f32, f32), squeeze: f32) -> Self {
        let scale = 1.0 - squeeze;
        Self {
            min: (base.0 * scale).max(floor.0),
            max: (base.1 * scale).max(floor.1),
        }
    }

    /// Obstacle window for a difficulty multiplier
    pub fn obstacle(multiplier: f32, tuning: &Tuning) -> Self {
        Self::squeezed(
            (tuning.base_spawn_min, tuning.base_spawn_max),
            OBSTACLE_WINDOW_FLOOR,
            multiplier * OBSTACLE_WINDOW_SQUEEZE,
        )
    }

    /// Lifeline window for a difficulty multiplier
    pub fn lifeline(multiplier: f32, tuning: &Tuning) -> Self {
        Self::squeezed(
            (tuning.base_lifeline_spawn_min, tuning.base_lifeline_spawn_max),
            LIFELINE_WINDOW_FLOOR,
            multiplier * LIFELINE_WINDOW_SQUEEZE,
        )
    }

    /// Draw a threshold. An inverted window collapses onto its minimum.
    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        uniform(rng, self.min, self.max)
    }
}

/// Running time of the most recent spawns
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnClock {
    pub last_obstacle: f64,
    pub last_lifeline: f64,
}

/// Pick a lifeline altitude that keeps clear of obstacles near the spawn point
pub fn lifeline_altitude(obstacles: &[Obstacle], rng: &mut impl Rng) -> f32 {
    let near: Vec<f32> = obstacles
        .iter()
        .filter(|o| (o.pos.x - SPAWN_X).abs() < SPAWN_NEIGHBOURHOOD)
        .map(|o| o.anim.base_y)
        .collect();

    for _ in 0..LIFELINE_ATTEMPTS {
        let candidate = uniform(rng, LIFELINE_BAND.0, LIFELINE_BAND.1);
        if near.iter().all(|y| (candidate - y).abs() >= LIFELINE_CLEARANCE) {
            return candidate;
        }
    }
    LIFELINE_FALLBACK_Y
}

/// Spawn one obstacle with a fresh animation
pub fn spawn_obstacle(state: &mut GameState, placement: Placement) {
    let multiplier = state.multiplier();
    let speed = uniform(&mut state.rng, 1.5, 2.5) * (1.0 + multiplier * 0.5);
    let phase = uniform(&mut state.rng, 0.0, 6.28);
    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        pos: glam::Vec2::new(SPAWN_X + placement.x_offset, placement.base_y),
        size: OBSTACLE_SIZE,
        anim: Animation {
            base_y: placement.base_y,
            phase,
            speed,
        },
    });
}

/// Spawn every obstacle of a pattern
pub fn spawn_pattern(state: &mut GameState, pattern: Pattern) {
    let placements = compose(pattern, &mut state.rng);
    log::debug!(
        "Spawning {:?} ({} obstacles) at t={:.2}",
        pattern,
        placements.len(),
        state.running_time
    );
    for placement in placements {
        spawn_obstacle(state, placement);
    }
}

/// Spawn a lifeline clear of nearby obstacle lanes
pub fn spawn_lifeline(state: &mut GameState) {
    let base_y = lifeline_altitude(&state.obstacles, &mut state.rng);
    let phase = uniform(&mut state.rng, 0.0, 6.28);
    let speed = uniform(&mut state.rng, 1.5, 3.0);
    let pulse = uniform(&mut state.rng, 0.0, 6.28);
    let id = state.next_entity_id();
    log::debug!("Spawning lifeline at y={:.2}", base_y);
    state.lifelines.push(Lifeline {
        id,
        pos: glam::Vec2::new(SPAWN_X, base_y),
        size: Lifeline::pulse_size(pulse),
        anim: Animation {
            base_y,
            phase,
            speed,
        },
        pulse,
    });
}

/// Run both spawn timers against the current running time
pub fn schedule(state: &mut GameState) {
    let now = state.running_time;
    let multiplier = state.multiplier();

    let threshold = SpawnWindow::obstacle(multiplier, &state.tuning).sample(&mut state.rng);
    if now - state.spawn_clock.last_obstacle > threshold as f64 {
        let pattern = Pattern::choose(state.difficulty.level, &mut state.rng);
        spawn_pattern(state, pattern);
        state.spawn_clock.last_obstacle = now;
    }

    let threshold = SpawnWindow::lifeline(multiplier, &state.tuning).sample(&mut state.rng);
    if now - state.spawn_clock.last_lifeline > threshold as f64
        && state.rng.random_bool(LIFELINE_CHANCE)
    {
        spawn_lifeline(state);
        state.spawn_clock.last_lifeline = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::multiplier;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn obstacle_at(x: f32, base_y: f32) -> Obstacle {
        Obstacle {
            id: 0,
            pos: glam::Vec2::new(x, base_y),
            size: OBSTACLE_SIZE,
            anim: Animation {
                base_y,
                phase: 0.0,
                speed: 2.0,
            },
        }
    }

    #[test]
    fn test_pattern_pools_follow_levels() {
        assert_eq!(Pattern::pool(1), &[Pattern::SingleGround, Pattern::SingleAir]);
        assert!(Pattern::pool(3).contains(&Pattern::DoubleStack));
        assert!(!Pattern::pool(4).contains(&Pattern::GapVertical));
        assert!(Pattern::pool(5).contains(&Pattern::GapVertical));
        assert!(Pattern::pool(7).contains(&Pattern::Triple));
        assert!(!Pattern::pool(8).contains(&Pattern::GapHorizontal));
        assert!(Pattern::pool(9).contains(&Pattern::GapHorizontal));
        assert!(!Pattern::pool(15).contains(&Pattern::DoubleStack));
    }

    #[test]
    fn test_triple_layout() {
        let mut rng = Pcg32::seed_from_u64(3);
        let placements = compose(Pattern::Triple, &mut rng);
        assert_eq!(placements.len(), 3);

        let offsets: Vec<f32> = placements.iter().map(|p| p.x_offset).collect();
        assert_eq!(offsets, vec![0.0, 1.8, 3.6]);

        let mut heights: Vec<f32> = placements.iter().map(|p| p.base_y).collect();
        heights.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(heights, vec![-5.5, -3.5, -2.5]);
    }

    #[test]
    fn test_pattern_compositions() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            let ground = compose(Pattern::SingleGround, &mut rng);
            assert_eq!(ground, vec![Placement::at(-5.5)]);

            let air = compose(Pattern::SingleAir, &mut rng);
            assert_eq!(air.len(), 1);
            assert!([-4.5, -3.5, -2.5].contains(&air[0].base_y));

            let stack = compose(Pattern::DoubleStack, &mut rng);
            assert!((-5.5..=-4.5).contains(&stack[0].base_y));
            assert!((-3.5..=-2.5).contains(&stack[1].base_y));

            let gap = compose(Pattern::GapVertical, &mut rng);
            assert!(gap.len() <= 2);
            for p in &gap {
                assert!(p.base_y > -6.5 && p.base_y < -0.5);
            }
            if let [bottom, top] = gap.as_slice() {
                let width = top.base_y - bottom.base_y;
                assert!((2.5 - 1e-4..=3.2 + 1e-4).contains(&width));
            }

            let wide = compose(Pattern::GapHorizontal, &mut rng);
            assert_eq!(wide.len(), 2);
            assert_eq!(wide[0].x_offset, 0.0);
            assert!((2.0..=3.0).contains(&wide[1].x_offset));
            assert!([-5.5, -4.5, -3.5].contains(&wide[0].base_y));
            assert!([-4.5, -3.5, -2.5].contains(&wide[1].base_y));
        }
    }

    #[test]
    fn test_inverted_window_collapses() {
        let mut rng = Pcg32::seed_from_u64(1);
        let window = SpawnWindow { min: 3.0, max: 1.0 };
        assert_eq!(window.sample(&mut rng), 3.0);
    }

    #[test]
    fn test_lifeline_ignores_distant_obstacles() {
        let mut rng = Pcg32::seed_from_u64(5);
        // Blankets the whole band, but far from the spawn point
        let obstacles: Vec<_> = (0..5).map(|i| obstacle_at(0.0, -5.0 + i as f32 * 0.5)).collect();
        let y = lifeline_altitude(&obstacles, &mut rng);
        assert!((LIFELINE_BAND.0..=LIFELINE_BAND.1).contains(&y));
    }

    #[test]
    fn test_lifeline_falls_back_when_band_is_blocked() {
        let mut rng = Pcg32::seed_from_u64(5);
        let obstacles = vec![obstacle_at(24.0, -4.0)];
        // Any draw in [-5, -3] is within 1.5 of -4
        assert_eq!(lifeline_altitude(&obstacles, &mut rng), LIFELINE_FALLBACK_Y);
    }

    #[test]
    fn test_schedule_spawns_when_due() {
        let mut state = GameState::new(21, Tuning::default());
        schedule_at(&mut state, 0.0);
        assert!(state.obstacles.is_empty());

        // Level 1 window tops out below 2 seconds
        schedule_at(&mut state, 2.0);
        assert!(!state.obstacles.is_empty());
        assert_eq!(state.spawn_clock.last_obstacle, 2.0);
        assert!(state.obstacles.iter().all(|o| o.pos.x >= SPAWN_X));

        // Lifeline window tops out below 10 seconds; the coin flip decides the tick
        for _ in 0..64 {
            schedule_at(&mut state, 20.0);
            if !state.lifelines.is_empty() {
                break;
            }
        }
        assert_eq!(state.lifelines.len(), 1);
        assert_eq!(state.spawn_clock.last_lifeline, 20.0);
    }

    fn schedule_at(state: &mut GameState, now: f64) {
        state.running_time = now;
        schedule(state);
    }

    proptest! {
        #[test]
        fn prop_windows_respect_floors(level in 1u32..=15, seed in any::<u64>()) {
            let tuning = Tuning::default();
            let m = multiplier(level, tuning.max_difficulty_level);
            let mut rng = Pcg32::seed_from_u64(seed);

            let obstacle = SpawnWindow::obstacle(m, &tuning);
            prop_assert!(obstacle.min >= 0.4 && obstacle.max >= 0.8);
            prop_assert!(obstacle.min <= obstacle.max);
            let t = obstacle.sample(&mut rng);
            prop_assert!(t >= obstacle.min && t <= obstacle.max);

            let lifeline = SpawnWindow::lifeline(m, &tuning);
            prop_assert!(lifeline.min >= 5.0 && lifeline.max >= 8.0);
            prop_assert!(lifeline.min <= lifeline.max);
            let t = lifeline.sample(&mut rng);
            prop_assert!(t >= lifeline.min && t <= lifeline.max);
        }

        #[test]
        fn prop_lifeline_clears_nearby_obstacle(
            obstacle_y in -6.5f32..-1.5,
            obstacle_x in 23.1f32..26.9,
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let obstacles = vec![obstacle_at(obstacle_x, obstacle_y)];
            let y = lifeline_altitude(&obstacles, &mut rng);
            if y != LIFELINE_FALLBACK_Y {
                prop_assert!((y - obstacle_y).abs() >= LIFELINE_CLEARANCE);
                prop_assert!(y >= LIFELINE_BAND.0 && y <= LIFELINE_BAND.1);
            }
        }
    }
}
