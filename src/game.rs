//! Fixed-step driver
//!
//! [`Simulation`] owns a [`GameState`] plus the collaborators it talks to.
//! The host feeds it [`InputEvent`]s and wall-clock frame deltas; it turns
//! those into fixed [`SIM_DT`] ticks and forwards state changes to audio.

use crate::audio::{AudioManager, AudioSink, NullAudio};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::renderer::{NullRenderer, RenderSink, RenderSnapshot};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Process-wide context, built once and handed to the simulation
pub struct Resources {
    pub tuning: Tuning,
    pub settings: Settings,
    pub audio: Box<dyn AudioSink>,
    pub renderer: Box<dyn RenderSink>,
}

impl Resources {
    /// No audio, no rendering
    pub fn headless(tuning: Tuning) -> Self {
        Self {
            tuning,
            settings: Settings::default(),
            audio: Box::new(NullAudio),
            renderer: Box::new(NullRenderer),
        }
    }
}

/// Discrete host input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Jump,
    PauseToggle,
    Restart,
    DebugScoreMax,
    Quit,
}

/// The simulation controller
pub struct Simulation {
    state: GameState,
    input: TickInput,
    accumulator: f32,
    audio: AudioManager,
    renderer: Box<dyn RenderSink>,
    quit: bool,
}

impl Simulation {
    pub fn new(resources: Resources, seed: u64) -> Self {
        let Resources {
            tuning,
            settings,
            audio,
            renderer,
        } = resources;

        let mut audio = AudioManager::new(audio, &settings);
        audio.start();
        log::info!("Run started (seed {seed})");

        Self {
            state: GameState::new(seed, tuning),
            input: TickInput::default(),
            accumulator: 0.0,
            audio,
            renderer,
            quit: false,
        }
    }

    /// Queue an input for the next tick
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Jump => self.input.jump = true,
            InputEvent::PauseToggle => self.input.pause = true,
            InputEvent::Restart => self.input.restart = true,
            InputEvent::DebugScoreMax => self.input.debug_score_max = true,
            InputEvent::Quit => self.quit = true,
        }
    }

    /// Let the autopilot jump for the player
    pub fn set_autopilot(&mut self, enabled: bool) {
        if self.input.idle_mode != enabled {
            log::info!("Autopilot: {enabled}");
        }
        self.input.idle_mode = enabled;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Run as many fixed ticks as `dt` covers. Returns the events they raised.
    pub fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.clear_one_shots();
        }
        // Drop backlog the cap would never catch up on
        self.accumulator = self.accumulator.min(SIM_DT * MAX_SUBSTEPS as f32);

        let events = self.state.drain_events();
        for event in &events {
            log_event(event);
            self.audio.on_event(event);
        }
        if self.state.phase == GamePhase::Running {
            self.audio.ensure_playing();
        }
        events
    }

    /// Read-only view of the current tick
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state)
    }

    /// Capture and submit a frame to the renderer
    pub fn render(&mut self) {
        let frame = self.snapshot();
        self.renderer.submit(&frame);
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::ObstacleCleared { score } => log::trace!("Score {score}"),
        GameEvent::LifeLost { lives } => log::info!("Hit! {lives} lives left"),
        GameEvent::LifelineCollected { lives } => log::info!("Lifeline! {lives} lives"),
        // Logged where they happen
        GameEvent::LevelUp { .. }
        | GameEvent::GameOver { .. }
        | GameEvent::ForeverReached
        | GameEvent::Paused
        | GameEvent::Resumed
        | GameEvent::Restarted => {}
    }
}
