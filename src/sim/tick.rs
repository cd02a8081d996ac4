//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Input is a
//! set of one-shot flags gathered by the host since the previous tick.

use super::collision::{first_lifeline_pickup, first_obstacle_hit};
use super::physics::{self, JumpOutcome};
use super::spawn;
use super::state::{GameEvent, GamePhase, GameState, reap};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump / boost
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start over after game over
    pub restart: bool,
    /// Debug: jump the score to the forever mark
    pub debug_score_max: bool,
    /// Idle/demo mode - autopilot jumps over incoming obstacles
    pub idle_mode: bool,
}

impl TickInput {
    /// Drop the one-shot flags, keep the sticky ones
    pub fn clear_one_shots(&mut self) {
        self.jump = false;
        self.pause = false;
        self.restart = false;
        self.debug_score_max = false;
    }
}

/// Lead time (in ticks) between take-off and an obstacle reaching the player.
/// Early enough to clear a ground pill, late enough not to land on it.
const AUTOPILOT_LEAD_TICKS: (f32, f32) = (8.0, 12.0);
/// Obstacles floating below this height are jumped
const AUTOPILOT_LANE_TOP: f32 = GROUND_Y + 2.0;

/// Whether the autopilot wants to jump this tick
fn autopilot_wants_jump(state: &GameState) -> bool {
    if state.player.jumping {
        return false;
    }
    let speed = state.difficulty.speed;
    let near = OBSTACLE_TOLERANCE + AUTOPILOT_LEAD_TICKS.0 * speed;
    let far = OBSTACLE_TOLERANCE + AUTOPILOT_LEAD_TICKS.1 * speed;
    let x = state.player.pos.x;
    state.obstacles.iter().any(|o| {
        let ahead = o.pos.x - x;
        ahead > near && ahead < far && o.pos.y < AUTOPILOT_LANE_TOP
    })
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at score {}", state.score);
                state.events.push(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
                log::info!("Resumed");
                state.events.push(GameEvent::Resumed);
            }
            GamePhase::GameOver => {}
        }
    }

    if input.restart && state.phase == GamePhase::GameOver {
        state.reset();
        log::info!("Run restarted");
        state.events.push(GameEvent::Restarted);
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Running {
        return;
    }

    if input.debug_score_max {
        state.max_out_score();
    }

    if input.jump || (input.idle_mode && autopilot_wants_jump(state)) {
        if physics::jump(&mut state.player, &state.tuning) == JumpOutcome::Boosted {
            log::debug!("Boost at y={:.2}", state.player.pos.y);
        }
    }

    state.time_ticks += 1;
    state.running_time += dt as f64;

    physics::tick_invulnerability(&mut state.player, dt);
    physics::integrate(&mut state.player, &state.tuning);

    let speed = state.difficulty.speed;
    for tile in &mut state.ground {
        tile.step(speed);
    }

    update_obstacles(state, speed);
    if state.phase != GamePhase::Running {
        return;
    }

    update_lifelines(state, speed);
    spawn::schedule(state);
}

/// Move, collide and reap obstacles
fn update_obstacles(state: &mut GameState, speed: f32) {
    for obstacle in &mut state.obstacles {
        obstacle.step(speed);
    }

    let mut marked = Vec::new();
    let mut hit = false;
    if !state.player.invulnerable {
        if let Some(index) = first_obstacle_hit(state.player.pos, &state.obstacles) {
            log::debug!("Hit obstacle {}", state.obstacles[index].id);
            marked.push(index);
            hit = true;
        }
    }

    let mut cleared = 0;
    for (index, obstacle) in state.obstacles.iter().enumerate() {
        if obstacle.pos.x < DESPAWN_X {
            marked.push(index);
            cleared += 1;
        }
    }

    reap(&mut state.obstacles, marked);
    for _ in 0..cleared {
        state.record_clear();
    }
    if hit {
        state.lose_life();
    }
}

/// Move, collect and reap lifelines
fn update_lifelines(state: &mut GameState, speed: f32) {
    for lifeline in &mut state.lifelines {
        lifeline.step(speed);
    }

    let mut marked = Vec::new();
    let collected = first_lifeline_pickup(state.player.pos, &state.lifelines);
    if let Some(index) = collected {
        marked.push(index);
    }
    for (index, lifeline) in state.lifelines.iter().enumerate() {
        if lifeline.pos.x < DESPAWN_X {
            marked.push(index);
        }
    }

    reap(&mut state.lifelines, marked);
    if collected.is_some() {
        state.collect_lifeline();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Animation, Lifeline, Obstacle};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn new_state() -> GameState {
        GameState::new(12345, Tuning::default())
    }

    fn obstacle_at(state: &mut GameState, x: f32, y: f32) {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(x, y),
            size: OBSTACLE_SIZE,
            anim: Animation {
                base_y: y,
                phase: 0.0,
                speed: 0.0,
            },
        });
    }

    fn lifeline_at(state: &mut GameState, x: f32, y: f32) {
        let id = state.next_entity_id();
        state.lifelines.push(Lifeline {
            id,
            pos: Vec2::new(x, y),
            size: LIFELINE_SIZE,
            anim: Animation {
                base_y: y,
                phase: 0.0,
                speed: 0.0,
            },
            pulse: 0.0,
        });
    }

    fn jump_input() -> TickInput {
        TickInput {
            jump: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_collision_costs_a_life() {
        let mut state = new_state();
        state.player.pos = Vec2::new(0.0, GROUND_Y);
        obstacle_at(&mut state, 0.0, GROUND_Y);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.lives, 4);
        assert!(state.player.invulnerable);
        assert!(state.obstacles.is_empty());
        assert!(state.events.contains(&GameEvent::LifeLost { lives: 4 }));
    }

    #[test]
    fn test_invulnerable_player_passes_through() {
        let mut state = new_state();
        state.player.pos = Vec2::new(0.0, GROUND_Y);
        state.player.invulnerable = true;
        state.player.invulnerable_timer = 1.0;
        obstacle_at(&mut state, 0.0, GROUND_Y);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.lives, 5);
        assert_eq!(state.score, 0);
        assert_eq!(state.obstacles.len(), 1);
        assert!((state.obstacles[0].pos.x - (0.0 - state.difficulty.speed)).abs() < 1e-6);
    }

    #[test]
    fn test_despawn_scores() {
        let mut state = new_state();
        obstacle_at(&mut state, DESPAWN_X + 0.01, 0.0);
        obstacle_at(&mut state, 0.0, 0.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.score, 1);
        assert_eq!(state.obstacles.len(), 1);
        assert!(state.events.contains(&GameEvent::ObstacleCleared { score: 1 }));
    }

    #[test]
    fn test_game_over_exactly_once() {
        let mut state = new_state();
        state.lives = 1;
        state.player.pos = Vec2::new(0.0, GROUND_Y);
        obstacle_at(&mut state, 0.0, GROUND_Y);
        obstacle_at(&mut state, 10.0, 0.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        assert_eq!(
            events.iter().filter(|e| matches!(e, GameEvent::GameOver { .. })).count(),
            1
        );

        let frozen_x = state.obstacles[0].pos.x;
        for _ in 0..50 {
            tick(&mut state, &jump_input(), SIM_DT);
        }
        assert_eq!(state.obstacles[0].pos.x, frozen_x);
        assert_eq!(state.score, 0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_restart_resets_run() {
        let mut state = new_state();
        state.max_out_score();
        obstacle_at(&mut state, 5.0, 0.0);
        state.lives = 0;
        state.phase = GamePhase::GameOver;

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, SIM_DT);

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 5);
        assert_eq!(state.difficulty.level, 1);
        assert!(!state.forever);
        assert!(state.obstacles.is_empty());
        assert!(state.lifelines.is_empty());
        assert!(state.events.contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut state = new_state();
        state.max_out_score();
        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(state.score, 999);
        assert!(state.forever);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = new_state();
        obstacle_at(&mut state, 10.0, 0.0);
        state.player.invulnerable = true;
        state.player.invulnerable_timer = 1.0;
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let x = state.obstacles[0].pos.x;
        let time = state.running_time;

        // Nothing moves while paused, jump is ignored
        for _ in 0..100 {
            tick(&mut state, &jump_input(), SIM_DT);
        }
        assert_eq!(state.obstacles[0].pos.x, x);
        assert_eq!(state.running_time, time);
        assert!(!state.player.jumping);
        assert!(state.player.invulnerable);
        assert_eq!(state.player.invulnerable_timer, 1.0);

        // Unpause resumes in the same tick
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.obstacles[0].pos.x < x);
    }

    #[test]
    fn test_jump_only_while_running() {
        let mut state = new_state();
        tick(&mut state, &jump_input(), SIM_DT);
        assert!(state.player.jumping);
        assert!(state.player.pos.y > GROUND_Y);
    }

    #[test]
    fn test_debug_score_max() {
        let mut state = new_state();
        let input = TickInput {
            debug_score_max: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.score, 999);
        assert_eq!(state.difficulty.level, 15);
        assert!(state.forever);
        assert!(state.events.contains(&GameEvent::ForeverReached));
    }

    #[test]
    fn test_zero_dt_never_spawns() {
        let mut state = new_state();
        for _ in 0..1000 {
            tick(&mut state, &TickInput::default(), 0.0);
        }
        assert_eq!(state.running_time, 0.0);
        assert!(state.obstacles.is_empty());
        assert!(state.lifelines.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.difficulty.level, 1);
    }

    #[test]
    fn test_lifeline_collected() {
        let mut state = new_state();
        lifeline_at(&mut state, PLAYER_X, GROUND_Y);
        lifeline_at(&mut state, 10.0, 0.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.lives, 6);
        assert_eq!(state.lifelines.len(), 1);
        assert!(state.lifelines[0].pos.x < 10.0);
        assert!(state.events.contains(&GameEvent::LifelineCollected { lives: 6 }));
    }

    #[test]
    fn test_lifeline_despawn_does_not_score() {
        let mut state = new_state();
        lifeline_at(&mut state, DESPAWN_X + 0.01, 0.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.lifelines.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 5);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_game_over_tick_leaves_lifelines_alone() {
        let mut state = new_state();
        state.lives = 1;
        obstacle_at(&mut state, PLAYER_X, GROUND_Y);
        // In pickup range, but the run ends first
        lifeline_at(&mut state, PLAYER_X + 0.5, GROUND_Y);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert_eq!(state.lifelines.len(), 1);
        assert_eq!(state.lifelines[0].pos.x, PLAYER_X + 0.5);
    }

    #[test]
    fn test_spawning_continues_late_in_a_run() {
        let mut state = new_state();
        state.running_time = 140_000.0;
        state.spawn_clock.last_obstacle = 140_000.0;
        state.spawn_clock.last_lifeline = 140_000.0;
        state.player.invulnerable = true;
        state.player.invulnerable_timer = 100.0;

        // Three seconds: longer than the level 1 obstacle window
        for _ in 0..432 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }

        assert!(state.running_time > 140_002.9);
        assert!(!state.obstacles.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = new_state();
        let mut state2 = new_state();

        let inputs = [
            TickInput::default(),
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput {
                idle_mode: true,
                ..Default::default()
            },
        ];

        for i in 0..3000 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.lives, state2.lives);
        assert_eq!(state1.obstacles.len(), state2.obstacles.len());
        for (a, b) in state1.obstacles.iter().zip(&state2.obstacles) {
            assert_eq!(a.pos, b.pos);
        }
        assert_eq!(state1.player.pos, state2.player.pos);
    }
}
