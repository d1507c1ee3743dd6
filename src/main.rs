//! Drift Hazard headless runner
//!
//! Plays one autopilot session with the fixed-step accumulator loop and logs
//! what happened.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use glam::Vec2;

use drift_hazard::audio::{LogAudio, Throttled};
use drift_hazard::consts::*;
use drift_hazard::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use drift_hazard::{EffectKind, EffectSink, Hooks, Tuning};

/// Host frame length the runner pretends to render at
const FRAME_DT: f32 = 1.0 / 50.0;
/// Per-cue and global minimum intervals for sound cues
const SFX_PER_CUE: f32 = 0.05;
const SFX_GLOBAL: f32 = 0.01;

/// Effect sink that just logs requests
struct LogEffects;

impl EffectSink for LogEffects {
    fn spawn(&mut self, pos: Vec2, effect: EffectKind) {
        log::trace!("fx {effect:?} at ({:.2}, {:.2})", pos.x, pos.y);
    }
}

/// Headless autopilot session
#[derive(Parser, Debug)]
#[command(name = "drift-hazard", about = "Drift Hazard headless runner", long_about = None)]
struct Args {
    /// Run seed
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Tuning JSON file (defaults when omitted)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Wall-clock seconds to simulate
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading tuning file {}", path.display()))?;
            Tuning::from_json(&json)?
        }
        None => Tuning::default(),
    };

    log::info!("Drift Hazard (headless) starting, seed {}", args.seed);
    let mut state = GameState::with_standard_arena(args.seed, tuning);
    let mut hooks = Hooks::new()
        .with_audio(Throttled::new(LogAudio, SFX_PER_CUE, SFX_GLOBAL))
        .with_effects(LogEffects);

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let mut accumulator = 0.0;
    let mut wall_clock = 0.0;
    let mut destroyed = 0u32;
    let mut upgrades = Vec::new();

    while wall_clock < args.seconds {
        wall_clock += FRAME_DT;
        accumulator += FRAME_DT;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut state, &input, &mut hooks, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in state.drain_events() {
            match event {
                GameEvent::HazardDestroyed { .. } => destroyed += 1,
                GameEvent::UpgradeChosen { label, .. } => {
                    log::info!("[{wall_clock:6.1}s] took upgrade: {label}");
                    upgrades.push(label);
                }
                GameEvent::PlayerHurt { lives } => {
                    log::info!("[{wall_clock:6.1}s] player hit, {lives} lives left")
                }
                GameEvent::PlayerDied { score } => {
                    log::info!("[{wall_clock:6.1}s] player destroyed, score {score}")
                }
                _ => {}
            }
        }

        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "Session over after {:.1}s (sim {:.1}s): score {}, {} hazards destroyed, {} upgrades, {} currency banked",
        wall_clock,
        state.elapsed(),
        state.score(),
        destroyed,
        upgrades.len(),
        state.progression.currency()
    );
    Ok(())
}
