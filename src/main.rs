//! Lifeline Run entry point
//!
//! Headless host: paces the simulation at the configured frame rate, logs
//! what a renderer would draw and lets the autopilot play.

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;

use lifeline_run::audio::NullAudio;
use lifeline_run::game::InputEvent;
use lifeline_run::renderer::LogRenderer;
use lifeline_run::sim::{GameEvent, GamePhase};
use lifeline_run::{ConfigError, Resources, Settings, Simulation, Tuning};

/// Lifeline Run - dodge the pills, grab the lifelines
#[derive(Parser, Debug)]
#[command(name = "lifeline-run", version)]
#[command(about = "Headless runner for the Lifeline Run simulation", long_about = None)]
struct Args {
    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// How long to run, in wall-clock seconds
    #[arg(long, default_value_t = 30.0)]
    seconds: f32,

    /// Tuning overrides (JSON)
    #[arg(long, value_name = "FILE")]
    tuning: Option<PathBuf>,

    /// Host settings (JSON)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Leave the player alone instead of letting the autopilot jump
    #[arg(long)]
    no_autopilot: bool,

    /// Print the final frame as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("lifeline-run: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), ConfigError> {
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let run_for = Duration::try_from_secs_f32(args.seconds).map_err(|_| {
        ConfigError::Invalid(format!(
            "--seconds must be a non-negative duration, got {}",
            args.seconds
        ))
    })?;

    let seed = args.seed.unwrap_or_else(clock_seed);
    let frame_budget = Duration::from_secs_f32(settings.frame_budget());
    let autopilot = !args.no_autopilot;

    let resources = Resources {
        tuning,
        settings,
        audio: Box::new(NullAudio),
        renderer: Box::new(LogRenderer::new()),
    };
    let mut sim = Simulation::new(resources, seed);
    sim.set_autopilot(autopilot);

    // Too far out to represent means no deadline
    let deadline = Instant::now().checked_add(run_for);
    let mut last = Instant::now();
    let mut runs = 1u32;

    while !sim.quit_requested() {
        let frame_start = Instant::now();
        if deadline.is_some_and(|d| frame_start >= d) {
            sim.handle_input(InputEvent::Quit);
            continue;
        }

        // Demo mode keeps playing
        if autopilot && sim.state().phase == GamePhase::GameOver {
            sim.handle_input(InputEvent::Restart);
        }

        let dt = frame_start.duration_since(last).as_secs_f32();
        last = frame_start;
        let events = sim.update(dt);
        if events.contains(&GameEvent::Restarted) {
            runs += 1;
        }
        sim.render();

        // Frame pacer
        let spent = frame_start.elapsed();
        if spent < frame_budget {
            thread::sleep(frame_budget - spent);
        }
    }

    let state = sim.state();
    log::info!(
        "Finished after {} run(s): score {}, level {}, lives {}",
        runs,
        state.score,
        state.difficulty.level,
        state.lives
    );

    if args.json {
        match serde_json::to_string_pretty(&sim.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize final frame: {e}"),
        }
    }
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
