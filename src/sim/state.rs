//! Game state and core simulation types
//!
//! Everything a single run owns lives in [`GameState`]. `reset` rebuilds it
//! in place; the seed, RNG stream and tuning survive restarts.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::spawn::SpawnClock;
use crate::consts::*;
use crate::float_offset;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Simulation frozen, waiting for the pause toggle
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

/// Something the host may want to react to (audio, HUD flashes, logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// An obstacle scrolled off screen
    ObstacleCleared { score: u64 },
    /// Difficulty level changed
    LevelUp { level: u32 },
    /// Player hit an obstacle and survived
    LifeLost { lives: u32 },
    /// Player picked up a lifeline
    LifelineCollected { lives: u32 },
    /// Last life lost
    GameOver { score: u64, level: u32 },
    /// The "999 forever" latch was set
    ForeverReached,
    Paused,
    Resumed,
    Restarted,
}

/// The player sprite. x stays at the anchor, only y moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Vertical velocity (world units per tick)
    pub vel: f32,
    /// Airborne
    pub jumping: bool,
    /// Mid-air boost already spent this jump
    pub boost_used: bool,
    pub invulnerable: bool,
    /// Seconds of invulnerability left
    pub invulnerable_timer: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, GROUND_Y),
            vel: 0.0,
            jumping: false,
            boost_used: false,
            invulnerable: false,
            invulnerable_timer: 0.0,
        }
    }
}

impl Player {
    /// Visual tilt in degrees (derived, never simulated)
    pub fn rotation(&self) -> f32 {
        if self.jumping { AIRBORNE_TILT } else { 0.0 }
    }

    /// Whether the sprite is drawn this frame (flashes while invulnerable)
    pub fn visible_at(&self, running_time: f64) -> bool {
        !self.invulnerable || ((running_time * FLASH_RATE as f64) as u64) % 2 == 1
    }
}

/// Float animation shared by every scrolling entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Altitude the entity floats around
    pub base_y: f32,
    /// Current sine phase
    pub phase: f32,
    /// Phase advance rate
    pub speed: f32,
}

impl Animation {
    /// Advance one tick and return the new altitude
    pub fn advance(&mut self, amplitude: f32) -> f32 {
        self.phase += self.speed * PHASE_STEP;
        self.base_y + float_offset(self.phase, amplitude)
    }
}

/// A pill obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub anim: Animation,
}

impl Obstacle {
    /// Scroll left by `speed` and bob
    pub fn step(&mut self, speed: f32) {
        self.pos.x -= speed;
        self.pos.y = self.anim.advance(OBSTACLE_FLOAT);
    }
}

/// A life-restoring pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lifeline {
    pub id: u32,
    pub pos: Vec2,
    /// Pulsing edge length, always positive
    pub size: f32,
    pub anim: Animation,
    /// Pulse phase, advances at a fixed rate
    pub pulse: f32,
}

impl Lifeline {
    /// Size for a pulse phase
    pub fn pulse_size(pulse: f32) -> f32 {
        LIFELINE_SIZE * (1.0 + pulse.sin() * LIFELINE_PULSE)
    }

    /// Scroll left by `speed`, bob and pulse
    pub fn step(&mut self, speed: f32) {
        self.pos.x -= speed;
        self.pos.y = self.anim.advance(LIFELINE_FLOAT);
        self.pulse += PULSE_STEP;
        self.size = Self::pulse_size(self.pulse);
    }
}

/// One segment of the scrolling floor strip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundTile {
    pub x: f32,
}

impl GroundTile {
    /// The strip centred on the origin
    pub fn strip() -> Vec<GroundTile> {
        let half_span = GROUND_TILE_COUNT as f32 * GROUND_TILE_WIDTH / 2.0;
        (0..GROUND_TILE_COUNT)
            .map(|i| GroundTile {
                x: i as f32 * GROUND_TILE_WIDTH - half_span + GROUND_TILE_WIDTH / 2.0,
            })
            .collect()
    }

    /// Scroll left, wrapping to the far right once off screen
    pub fn step(&mut self, speed: f32) {
        self.x -= speed;
        if self.x < GROUND_TILE_WRAP_X {
            self.x += GROUND_TILE_COUNT as f32 * GROUND_TILE_WIDTH;
        }
    }
}

/// Remove the marked indices from `items`, back to front.
///
/// Out-of-range and duplicate indices are ignored. Returns how many items
/// were removed.
pub fn reap<T>(items: &mut Vec<T>, mut marked: Vec<usize>) -> usize {
    marked.sort_unstable();
    marked.dedup();
    let mut removed = 0;
    for &index in marked.iter().rev() {
        if index < items.len() {
            items.remove(index);
            removed += 1;
        }
    }
    removed
}

/// Complete state of one run plus the process-wide bits it needs
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG stream was created from
    pub seed: u64,
    /// Spawn randomness; continues across restarts
    pub rng: Pcg32,
    /// Balance values, fixed for the process
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub difficulty: Difficulty,
    pub player: Player,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Live lifelines in spawn order
    pub lifelines: Vec<Lifeline>,
    pub ground: Vec<GroundTile>,
    /// Spawn timers (running-time based)
    pub spawn_clock: SpawnClock,
    /// Seconds spent in `Running` this run. f64 so a 1/144 s step still
    /// registers after days of play.
    pub running_time: f64,
    /// Simulation tick counter (running ticks only)
    pub time_ticks: u64,
    /// "999 forever" latch, cleared only by reset
    pub forever: bool,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh run with the given seed and tuning
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let difficulty = Difficulty::new(&tuning);
        let lives = tuning.starting_lives;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Running,
            score: 0,
            lives,
            difficulty,
            player: Player::default(),
            obstacles: Vec::new(),
            lifelines: Vec::new(),
            ground: GroundTile::strip(),
            spawn_clock: SpawnClock::default(),
            running_time: 0.0,
            time_ticks: 0,
            forever: false,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Throw away the current run and start over. RNG and tuning are kept.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Running;
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.difficulty = Difficulty::new(&self.tuning);
        self.player = Player::default();
        self.obstacles.clear();
        self.lifelines.clear();
        self.ground = GroundTile::strip();
        self.spawn_clock = SpawnClock::default();
        self.running_time = 0.0;
        self.time_ticks = 0;
        self.forever = false;
        self.next_id = 1;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Difficulty multiplier for the current level
    pub fn multiplier(&self) -> f32 {
        self.difficulty.multiplier(&self.tuning)
    }

    /// An obstacle made it past the player: score it
    pub fn record_clear(&mut self) {
        self.score += 1;
        self.events.push(GameEvent::ObstacleCleared { score: self.score });
        self.refresh_difficulty();
        self.latch_forever();
    }

    /// Jump straight to the forever score (debug key)
    pub fn max_out_score(&mut self) {
        self.score = self.score.max(self.tuning.forever_score);
        self.refresh_difficulty();
        self.latch_forever();
    }

    fn refresh_difficulty(&mut self) {
        if let Some(level) = self.difficulty.update(self.score, &self.tuning) {
            log::info!(
                "Level {} reached at score {} (speed {:.3})",
                level,
                self.score,
                self.difficulty.speed
            );
            self.events.push(GameEvent::LevelUp { level });
        }
    }

    fn latch_forever(&mut self) {
        if !self.forever && self.score >= self.tuning.forever_score {
            self.forever = true;
            log::info!("999 forever");
            self.events.push(GameEvent::ForeverReached);
        }
    }

    /// Player hit an obstacle
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            log::info!(
                "Game over: score {}, level {}",
                self.score,
                self.difficulty.level
            );
            self.events.push(GameEvent::GameOver {
                score: self.score,
                level: self.difficulty.level,
            });
        } else {
            self.player.invulnerable = true;
            self.player.invulnerable_timer = self.tuning.invulnerable_duration;
            self.events.push(GameEvent::LifeLost { lives: self.lives });
        }
    }

    /// Player picked up a lifeline
    pub fn collect_lifeline(&mut self) {
        self.lives += 1;
        self.events.push(GameEvent::LifelineCollected { lives: self.lives });
    }
}
