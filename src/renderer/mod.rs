//! Render submission
//!
//! The simulation never draws. Each frame the driver captures a
//! [`RenderSnapshot`] and hands it to a [`RenderSink`]; camera transforms,
//! textures and fallback shapes belong to the sink.

pub mod snapshot;

pub use snapshot::{
    EntityKind, EntityView, GameOverTitle, Hud, Overlay, PlayerPose, RenderSnapshot,
};

/// Anything that can present a frame
pub trait RenderSink {
    fn submit(&mut self, frame: &RenderSnapshot);
}

/// Discards every frame (headless runs, tests)
#[derive(Debug, Default)]
pub struct NullRenderer;

impl RenderSink for NullRenderer {
    fn submit(&mut self, _frame: &RenderSnapshot) {}
}

/// Logs HUD and overlay changes instead of drawing
#[derive(Debug, Default)]
pub struct LogRenderer {
    last_hud: Option<Hud>,
    last_overlay: Option<Overlay>,
    frames: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames submitted so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderSink for LogRenderer {
    fn submit(&mut self, frame: &RenderSnapshot) {
        self.frames += 1;

        if self.last_hud != Some(frame.hud) {
            let hud = &frame.hud;
            let speed = hud
                .speed_percent
                .map(|p| format!(" | Speed: +{p}%"))
                .unwrap_or_default();
            log::info!(
                "{} | Lives: {} | Level: {}{}",
                hud.score_label(),
                hud.lives,
                hud.level,
                speed
            );
            self.last_hud = Some(frame.hud);
        }

        if self.last_overlay != Some(frame.overlay) {
            match frame.overlay {
                Overlay::None => {}
                Overlay::Paused { .. } => log::info!("PAUSED - press P to resume"),
                Overlay::GameOver {
                    final_score,
                    level,
                    title,
                } => log::info!(
                    "{} - Final Score: {} - Reached Level: {} - press R to restart",
                    title.as_str(),
                    final_score,
                    level
                ),
            }
            self.last_overlay = Some(frame.overlay);
        }
    }
}
