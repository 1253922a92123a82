//! Platform abstraction layer
//!
//! Keeps the frontend's details out of the simulation:
//! - Time: monotonic milliseconds for the result dwell
//! - Input: held keys and clicks sampled into a `TickInput` once per tick

pub mod input;
pub mod time;

pub use input::{
    AutopilotInput, HeldKeys, InputSource, ScriptedInput, click_requests_reset, reset_button,
    sample_input,
};
pub use time::{Clock, ManualClock, MonotonicClock};
