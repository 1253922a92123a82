//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (wall clock is read only for the result dwell)
//! - Seeded RNG only
//! - Stable iteration order (gates in spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod round;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use round::{RoundController, roll_boss, roll_gate_op};
pub use state::{
    Boss, GameEvent, GamePhase, Gate, GateOp, Lane, Polarity, ResultCause, RngState,
    RoundResult, SessionState, Steer, Swarm,
};
pub use tick::{TickInput, autopilot_steer, tick};
