//! Background music control
//!
//! The simulation only emits [`GameEvent`]s. [`AudioManager`] turns them into
//! music commands for an [`AudioSink`]; a missing or broken device is the
//! sink's problem and never reaches the simulation.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Commands a music backend must understand
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MusicCommand {
    /// Start the track from the top
    Play { volume: f32, looped: bool },
    Pause,
    Resume,
}

/// A music backend
pub trait AudioSink {
    fn apply(&mut self, command: MusicCommand);

    /// Whether the track is still playing. Backends that cannot tell report true.
    fn is_playing(&self) -> bool {
        true
    }
}

/// Silent backend (headless runs, no audio device)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn apply(&mut self, _command: MusicCommand) {}
}

/// Music state as far as the game knows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicState {
    Stopped,
    Playing,
    Paused,
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    volume: f32,
    state: MusicState,
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>, settings: &Settings) -> Self {
        Self {
            sink,
            volume: settings.effective_music_volume(),
            state: MusicState::Stopped,
        }
    }

    pub fn state(&self) -> MusicState {
        self.state
    }

    /// Start the looping track for a new session
    pub fn start(&mut self) {
        self.play();
    }

    fn play(&mut self) {
        self.sink.apply(MusicCommand::Play {
            volume: self.volume,
            looped: true,
        });
        self.state = MusicState::Playing;
    }

    /// Restart the track only if the backend says it died
    pub fn ensure_playing(&mut self) {
        if self.state == MusicState::Playing && !self.sink.is_playing() {
            log::warn!("Music stopped unexpectedly, restarting");
            self.play();
        }
    }

    /// React to a simulation event
    pub fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Paused if self.state == MusicState::Playing => {
                self.sink.apply(MusicCommand::Pause);
                self.state = MusicState::Paused;
            }
            GameEvent::Resumed if self.state == MusicState::Paused => {
                self.sink.apply(MusicCommand::Resume);
                self.state = MusicState::Playing;
            }
            // Music keeps going across restarts
            GameEvent::Restarted => self.ensure_playing(),
            _ => {}
        }
    }
}
