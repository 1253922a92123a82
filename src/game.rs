//! Fixed timestep driver
//!
//! Owns a session, feeds it input at the fixed tick rate and reports whether
//! the frontend should keep going.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::renderer::{FrameView, render};
use crate::sim::{GameEvent, GamePhase, SessionState, TickInput, tick};
use crate::tuning::Tuning;

/// What the frontend should do after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running
    Continue,
    /// Lost: show the terminal screen, then exit
    Terminal,
    /// Quit requested
    Quit,
}

/// Game instance holding the session and loop bookkeeping
#[derive(Debug)]
pub struct Game {
    state: SessionState,
    accumulator: f32,
    input: TickInput,
    last_phase: GamePhase,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        log::info!("New session (seed {seed})");
        Self {
            state: SessionState::new(tuning, seed),
            accumulator: 0.0,
            input: TickInput::default(),
            last_phase: GamePhase::Running,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Current frame for the renderer
    pub fn view(&self) -> FrameView {
        render(&self.state)
    }

    /// Record freshly polled input. Held state is replaced; reset and quit
    /// latch until a tick consumes them.
    pub fn set_input(&mut self, input: TickInput) {
        self.input.steer = input.steer;
        self.input.autopilot = input.autopilot;
        self.input.reset |= input.reset;
        self.input.quit |= input.quit;
    }

    /// Run as many fixed ticks as `dt` seconds of frame time allow
    pub fn update(&mut self, dt: f32, now_ms: u64) -> Flow {
        if self.input.quit {
            return Flow::Quit;
        }

        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.run_tick(now_ms);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        self.flow()
    }

    /// Poll-and-tick once; for frontends that pace themselves at the tick rate
    pub fn step(&mut self, input: TickInput, now_ms: u64) -> Flow {
        self.set_input(input);
        if self.input.quit {
            return Flow::Quit;
        }
        self.run_tick(now_ms);
        self.flow()
    }

    /// Reset game state for restart
    pub fn restart(&mut self, seed: u64) {
        let tuning = self.state.tuning.clone();
        self.state = SessionState::new(tuning, seed);
        self.accumulator = 0.0;
        self.input = TickInput::default();
        self.last_phase = GamePhase::Running;
    }

    /// Events raised since the last call (for audio/UI cues)
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn run_tick(&mut self, now_ms: u64) {
        tick(&mut self.state, &self.input, now_ms);

        // Clear one-shot inputs after processing
        self.input.reset = false;

        for event in self.state.drain_events() {
            if let GameEvent::GatePassed { op, count, .. } = &event {
                log::debug!("Gate {op} -> {count}");
            }
            self.events.push(event);
        }

        let phase = self.state.phase();
        if phase != self.last_phase {
            log::info!(
                "Round {}: {:?} -> {:?}",
                self.state.round.round_number,
                self.last_phase,
                phase
            );
            self.last_phase = phase;
        }
    }

    fn flow(&self) -> Flow {
        if self.state.phase() == GamePhase::Terminated {
            Flow::Terminal
        } else {
            Flow::Continue
        }
    }
}
