//! Gate Swarm entry point
//!
//! Headless native runner: the autopilot plays at the fixed tick rate and the
//! HUD is written to the log. Set `RUST_LOG=debug` to see every gate.
//!
//! Environment:
//! - `GATE_SWARM_TUNING` (or the first argument): tuning JSON file
//! - `GATE_SWARM_SEED`: RNG seed (default: from the system clock)
//! - `GATE_SWARM_TICKS`: quit after this many ticks

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use gate_swarm::consts::SIM_DT;
use gate_swarm::platform::{AutopilotInput, Clock, InputSource, MonotonicClock};
use gate_swarm::renderer::{LogRenderer, Renderer};
use gate_swarm::tuning::TUNING_ENV_VAR;
use gate_swarm::{Flow, Game, Tuning};

fn main() {
    env_logger::init();
    log::info!("Gate Swarm (native) starting...");

    let tuning = load_tuning();
    let seed = env_u64("GATE_SWARM_SEED").unwrap_or_else(clock_seed);
    let quit_after = env_u64("GATE_SWARM_TICKS");

    run(tuning, seed, quit_after);
    log::info!("Gate Swarm exiting");
}

/// Tuning from the first argument or the environment, defaults otherwise
fn load_tuning() -> Tuning {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(TUNING_ENV_VAR).ok());

    match path {
        Some(path) => Tuning::load(&path).unwrap_or_else(|e| {
            log::error!("{e}; using default tuning");
            Tuning::default()
        }),
        None => Tuning::default(),
    }
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring {name}={raw:?}: {e}");
            None
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn run(tuning: Tuning, seed: u64, quit_after: Option<u64>) {
    let clock = MonotonicClock::new();
    let mut input = AutopilotInput::new(quit_after);
    let mut renderer = LogRenderer::new();
    let mut game = Game::new(tuning, seed);
    let frame = Duration::from_secs_f32(SIM_DT);

    loop {
        match game.step(input.poll_input(), clock.now_ms()) {
            Flow::Continue => renderer.present(&game.view()),
            Flow::Quit => {
                log::info!("Quit requested");
                break;
            }
            Flow::Terminal => {
                renderer.present_terminal(&game.view());
                let hold = game.state().tuning.terminal_hold_ms;
                std::thread::sleep(Duration::from_millis(hold));
                break;
            }
        }
        std::thread::sleep(frame);
    }
}
