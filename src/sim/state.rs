//! Game state and core simulation types
//!
//! Everything the simulation needs to replay a session lives in
//! [`SessionState`].

use std::fmt;
use std::num::NonZeroU32;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::round::RoundController;
use crate::tuning::Tuning;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Gates are falling, player steers the swarm
    Running,
    /// Boss descends, swarm auto-centres
    Boss,
    /// Outcome on screen, waiting out the dwell time
    Result,
    /// Lost; nothing advances until a reset
    Terminated,
}

/// Horizontal steering command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Steer {
    #[default]
    None,
    Left,
    Right,
}

impl Steer {
    fn sign(self) -> i32 {
        match self {
            Steer::None => 0,
            Steer::Left => -1,
            Steer::Right => 1,
        }
    }
}

/// Whether a gate helps or hurts the swarm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Good,
    Bad,
}

/// Arithmetic carried by a gate
///
/// Multiply and divide take a non-zero factor, so a gate can never zero the
/// swarm by multiplication or divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateOp {
    Add(u32),
    Subtract(u32),
    Multiply(NonZeroU32),
    Divide(NonZeroU32),
}

impl GateOp {
    /// Multiply gate, `None` for a zero factor
    pub fn multiply(factor: u32) -> Option<Self> {
        NonZeroU32::new(factor).map(GateOp::Multiply)
    }

    /// Divide gate, `None` for a zero divisor
    pub fn divide(divisor: u32) -> Option<Self> {
        NonZeroU32::new(divisor).map(GateOp::Divide)
    }

    pub fn polarity(&self) -> Polarity {
        match self {
            GateOp::Add(_) | GateOp::Multiply(_) => Polarity::Good,
            GateOp::Subtract(_) | GateOp::Divide(_) => Polarity::Bad,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            GateOp::Add(_) => '+',
            GateOp::Subtract(_) => '-',
            GateOp::Multiply(_) => 'x',
            GateOp::Divide(_) => '/',
        }
    }

    pub fn value(&self) -> u32 {
        match *self {
            GateOp::Add(v) | GateOp::Subtract(v) => v,
            GateOp::Multiply(v) | GateOp::Divide(v) => v.get(),
        }
    }

    /// Apply to a swarm count. Saturates at both ends, never below zero.
    pub fn apply(&self, count: u64) -> u64 {
        match *self {
            GateOp::Add(v) => count.saturating_add(u64::from(v)),
            GateOp::Subtract(v) => count.saturating_sub(u64::from(v)),
            GateOp::Multiply(v) => count.saturating_mul(u64::from(v.get())),
            GateOp::Divide(v) => count / u64::from(v.get()),
        }
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.symbol(), self.value())
    }
}

/// Which half of the playfield a gate occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lane {
    Left,
    Right,
}

/// A falling gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// Shared with the other gate spawned in the same tick
    pub pair_id: u32,
    pub lane: Lane,
    pub op: GateOp,
    pub rect: Rect,
}

impl Gate {
    /// Place a gate in its lane at the spawn line above the playfield
    pub fn new(pair_id: u32, lane: Lane, op: GateOp, tuning: &Tuning) -> Self {
        let x = match lane {
            Lane::Left => tuning.gate_lane_inset,
            Lane::Right => tuning.playfield_width / 2 + tuning.gate_lane_inset,
        };
        Self {
            pair_id,
            lane,
            op,
            rect: Rect::new(x, tuning.gate_spawn_y, tuning.gate_width(), tuning.gate_height),
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.op.polarity()
    }

    /// Move down by `dy`. Returns true once the gate has fallen off the field.
    pub fn advance(&mut self, dy: i32, field_height: i32) -> bool {
        self.rect.pos.y += dy;
        self.rect.top() > field_height
    }
}

/// The player's swarm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swarm {
    pub count: u64,
    pub rect: Rect,
}

impl Swarm {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            count: tuning.swarm_start_count,
            rect: tuning.swarm_start_rect(),
        }
    }

    /// Back to bottom-centre
    pub fn reset_position(&mut self, tuning: &Tuning) {
        self.rect = tuning.swarm_start_rect();
    }

    /// Shift by `delta` in `steer` direction, staying inside `[0, width]`
    pub fn steer(&mut self, steer: Steer, delta: i32, width: i32) {
        self.rect.pos.x += steer.sign() * delta;
        self.rect.clamp_x(width);
    }

    /// Step toward `center_x` by at most `step`. Returns true when centred.
    pub fn recenter(&mut self, step: i32, center_x: i32) -> bool {
        let offset = center_x - self.rect.center_x();
        let shift = offset.clamp(-step, step);
        self.rect.pos.x += shift;
        offset == shift
    }

    pub fn apply_effect(&mut self, op: GateOp) {
        self.count = op.apply(self.count);
    }

    pub fn is_wiped_out(&self) -> bool {
        self.count == 0
    }
}

/// The round's boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub hp: u64,
    pub rect: Rect,
    /// False until the gate phase ends; an idle boss is neither drawn nor moved
    pub engaged: bool,
}

impl Boss {
    pub fn new(hp: u64, tuning: &Tuning) -> Self {
        Self {
            hp,
            rect: tuning.boss_entry_rect(),
            engaged: false,
        }
    }

    /// Bring the boss in from above the playfield
    pub fn enter(&mut self, tuning: &Tuning) {
        self.rect = tuning.boss_entry_rect();
        self.engaged = true;
    }

    /// Descend by `dy`, holding at the combat line
    pub fn advance(&mut self, dy: i32, stop_top: i32) {
        if self.rect.top() < stop_top {
            self.rect.pos.y = (self.rect.pos.y + dy).min(stop_top);
        }
    }

    pub fn at_combat_line(&self, stop_top: i32) -> bool {
        self.rect.top() >= stop_top
    }
}

/// How a round was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultCause {
    /// Swarm reached the boss
    BossContact,
    /// Swarm count hit zero
    Wipeout,
}

/// Outcome of a round, fixed once decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub won: bool,
    /// Survivors over the boss's HP on a win, shortfall on a loss, 0 on a wipeout
    pub margin: u64,
    pub cause: ResultCause,
}

impl RoundResult {
    pub fn boss_contact(count: u64, hp: u64) -> Self {
        let won = count >= hp;
        Self {
            won,
            margin: count.abs_diff(hp),
            cause: ResultCause::BossContact,
        }
    }

    pub fn wipeout() -> Self {
        Self {
            won: false,
            margin: 0,
            cause: ResultCause::Wipeout,
        }
    }
}

/// Things that happened during a tick (for logging/audio/UI, never read back by the sim)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GatePairSpawned { pair_id: u32, left: GateOp, right: GateOp },
    GatePassed { pair_id: u32, lane: Lane, op: GateOp, count: u64 },
    GatesExpired { pair_id: u32 },
    BossEngaged { round: u32, hp: u64 },
    RoundResolved { round: u32, result: RoundResult },
    RoundStarted { round: u32, count: u64 },
    SessionTerminated { round: u32 },
    SessionReset { seed: u64 },
}

/// RNG state wrapper for serialization
///
/// Each draw site takes a fresh generator on the next stream, so the state
/// stays two integers and replays exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Generator for the next draw site
    pub fn next_rng(&mut self) -> Pcg32 {
        let state = self
            .seed
            .wrapping_add(self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let rng = Pcg32::new(state, self.stream);
        self.stream += 1;
        rng
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub tuning: Tuning,
    pub rng_state: RngState,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub swarm: Swarm,
    pub round: RoundController,
    /// Events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl SessionState {
    /// Fresh session at round 1
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut rng_state = RngState::new(seed);
        let swarm = Swarm::new(&tuning);
        let round = RoundController::new(&tuning, &mut rng_state);
        Self {
            tuning,
            rng_state,
            time_ticks: 0,
            swarm,
            round,
            events: Vec::new(),
        }
    }

    /// Start over at round 1 with the same tuning. The new seed comes from
    /// the current RNG so replays stay deterministic.
    pub fn reset(&mut self) {
        let seed = self.rng_state.next_rng().random::<u64>();
        let events = std::mem::take(&mut self.events);
        *self = Self::new(self.tuning.clone(), seed);
        self.events = events;
        self.events.push(GameEvent::SessionReset { seed });
        log::info!("Session reset (seed {seed})");
    }

    pub fn phase(&self) -> GamePhase {
        self.round.phase
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
