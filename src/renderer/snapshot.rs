//! Read-only view of a tick, handed to whatever draws the game

use serde::Serialize;

use crate::consts::{VISIBLE_MAX_X, VISIBLE_MIN_X};
use crate::sim::{GamePhase, GameState};

/// Which sprite an entity uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    Pill,
    Lifeline,
}

/// One scrolling entity in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntityView {
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Player sprite placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerPose {
    pub x: f32,
    pub y: f32,
    /// Tilt in degrees
    pub rotation: f32,
    pub airborne: bool,
    pub invulnerable: bool,
    /// False on the "off" half of the invulnerability flash
    pub visible: bool,
}

/// Heads-up display values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    /// Speed gain over base, hidden at zero
    pub speed_percent: Option<u32>,
    /// Show the forever banner instead of the score
    pub forever: bool,
}

impl Hud {
    /// Text for the score slot
    pub fn score_label(&self) -> String {
        if self.forever {
            "999 FOREVER".to_string()
        } else {
            format!("Score: {}", self.score)
        }
    }
}

/// Headline on the game-over panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameOverTitle {
    GameOver,
    Forever,
}

impl GameOverTitle {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverTitle::GameOver => "GAME OVER",
            GameOverTitle::Forever => "999 FOREVER",
        }
    }
}

/// Full-screen overlay to draw on top of the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Overlay {
    None,
    Paused {
        score: u64,
        lives: u32,
        level: u32,
    },
    GameOver {
        final_score: u64,
        level: u32,
        title: GameOverTitle,
    },
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub player: PlayerPose,
    /// On-screen obstacles then lifelines
    pub entities: Vec<EntityView>,
    /// On-screen ground tile centres (x only, all share one altitude)
    pub ground: Vec<f32>,
    pub hud: Hud,
    pub overlay: Overlay,
}

fn on_screen(x: f32) -> bool {
    x > VISIBLE_MIN_X && x < VISIBLE_MAX_X
}

impl RenderSnapshot {
    /// Capture the current state
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        let pose = PlayerPose {
            x: player.pos.x,
            y: player.pos.y,
            rotation: player.rotation(),
            airborne: player.jumping,
            invulnerable: player.invulnerable,
            visible: player.visible_at(state.running_time),
        };

        let obstacles = state
            .obstacles
            .iter()
            .filter(|o| on_screen(o.pos.x))
            .map(|o| EntityView {
                kind: EntityKind::Pill,
                x: o.pos.x,
                y: o.pos.y,
                size: o.size,
            });
        let lifelines = state
            .lifelines
            .iter()
            .filter(|l| on_screen(l.pos.x))
            .map(|l| EntityView {
                kind: EntityKind::Lifeline,
                x: l.pos.x,
                y: l.pos.y,
                size: l.size,
            });
        let entities = obstacles.chain(lifelines).collect();

        let speed_percent = state.difficulty.speed_percent(&state.tuning);
        let hud = Hud {
            score: state.score,
            lives: state.lives,
            level: state.difficulty.level,
            speed_percent: (speed_percent > 0).then_some(speed_percent),
            forever: state.forever,
        };

        let overlay = match state.phase {
            GamePhase::Running => Overlay::None,
            GamePhase::Paused => Overlay::Paused {
                score: state.score,
                lives: state.lives,
                level: state.difficulty.level,
            },
            GamePhase::GameOver => Overlay::GameOver {
                final_score: state.score,
                level: state.difficulty.level,
                title: if state.score >= state.tuning.forever_score {
                    GameOverTitle::Forever
                } else {
                    GameOverTitle::GameOver
                },
            },
        };

        Self {
            player: pose,
            entities,
            ground: state.ground.iter().map(|t| t.x).collect(),
            hud,
            overlay,
        }
    }
}
