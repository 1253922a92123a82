//! Input sampling
//!
//! Frontends report held keys and click positions; this module turns them
//! into one [`TickInput`] per tick. The only clickable thing is the reset
//! button on the promotional overlay.

use std::collections::VecDeque;

use glam::IVec2;

use crate::sim::{Rect, Steer, TickInput};
use crate::tuning::Tuning;

/// Side of the reset button (pixels)
pub const RESET_BUTTON_SIZE: i32 = 64;

/// Reset button: top edge of the overlay, inset from the overlay's right side
pub fn reset_button(tuning: &Tuning) -> Rect {
    let w = tuning.playfield_width;
    Rect::new(
        w / 4 + w / 2 - 72,
        0,
        RESET_BUTTON_SIZE,
        RESET_BUTTON_SIZE,
    )
}

/// Whether a left click at `pos` hits the reset button
pub fn click_requests_reset(pos: IVec2, tuning: &Tuning) -> bool {
    reset_button(tuning).contains(pos)
}

/// Arrow keys currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    /// Both keys cancel out
    pub fn steer(&self) -> Steer {
        match (self.left, self.right) {
            (true, false) => Steer::Left,
            (false, true) => Steer::Right,
            _ => Steer::None,
        }
    }
}

/// Build a tick's input from raw frontend state
pub fn sample_input(
    keys: HeldKeys,
    left_clicks: &[IVec2],
    quit: bool,
    tuning: &Tuning,
) -> TickInput {
    TickInput {
        steer: keys.steer(),
        reset: left_clicks
            .iter()
            .any(|&pos| click_requests_reset(pos, tuning)),
        quit,
        autopilot: false,
    }
}

/// Where the driver gets input each tick
pub trait InputSource {
    fn poll_input(&mut self) -> TickInput;
}

/// Replays a fixed list of inputs, then idles
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<TickInput>,
}

impl ScriptedInput {
    pub fn new(inputs: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            queue: inputs.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll_input(&mut self) -> TickInput {
        self.queue.pop_front().unwrap_or_default()
    }
}

/// Demo mode: the autopilot plays, optionally quitting after a number of polls
#[derive(Debug, Clone, Default)]
pub struct AutopilotInput {
    polls: u64,
    quit_after: Option<u64>,
}

impl AutopilotInput {
    pub fn new(quit_after: Option<u64>) -> Self {
        Self {
            polls: 0,
            quit_after,
        }
    }
}

impl InputSource for AutopilotInput {
    fn poll_input(&mut self) -> TickInput {
        self.polls += 1;
        TickInput {
            autopilot: true,
            quit: self.quit_after.is_some_and(|limit| self.polls > limit),
            ..Default::default()
        }
    }
}
