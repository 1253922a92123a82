//! Gate Swarm - A vertical lane-runner arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (swarm, gates, boss, round state machine)
//! - `renderer`: Frame view and CPU-side geometry for an external display
//! - `platform`: Clock and input abstraction
//! - `tuning`: Data-driven game balance
//! - `game`: Fixed timestep driver around `sim::tick`

pub mod game;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use game::{Flow, Game};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Reference tick rate
    pub const TICK_RATE_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (pixels)
    pub const PLAYFIELD_WIDTH: i32 = 600;
    pub const PLAYFIELD_HEIGHT: i32 = 800;

    /// Gate pairs per round
    pub const GATES_PER_ROUND: u32 = 7;
    /// Ticks between gate pair spawns (60 is about one second)
    pub const GATE_SPAWN_TIME: u32 = 90;

    /// Swarm defaults
    pub const SWARM_SIZE: i32 = 50;
    pub const SWARM_SPEED: i32 = 8;
    pub const SWARM_RECENTER_SPEED: i32 = 2;
    /// Gap between the swarm's bottom edge and the playfield bottom
    pub const SWARM_BOTTOM_MARGIN: i32 = 100;
    pub const SWARM_START_COUNT: u64 = 1;

    /// Gate defaults
    pub const GATE_HEIGHT: i32 = 80;
    /// Horizontal inset of each gate inside its lane
    pub const GATE_LANE_INSET: i32 = 5;
    pub const GATE_SPAWN_Y: i32 = -100;
    pub const GATE_SPEED: i32 = 5;
    /// `+`/`-` gate values
    pub const ADDITIVE_MIN: u32 = 10;
    pub const ADDITIVE_MAX: u32 = 50;
    /// `x`/`/` gate values
    pub const SCALING_MIN: u32 = 1;
    pub const SCALING_MAX: u32 = 3;

    /// Boss defaults
    pub const BOSS_SIZE: i32 = 150;
    /// Boss bottom edge when it enters (above the visible area)
    pub const BOSS_ENTRY_BOTTOM: i32 = -50;
    pub const BOSS_SPEED: i32 = 4;

    /// Boss HP scaling: min = BASE_MIN + MIN_PER_ROUND * (round - 1)
    pub const BOSS_HP_BASE_MIN: u64 = 500;
    pub const BOSS_HP_MIN_PER_ROUND: u64 = 500;
    /// Boss HP scaling: max = BASE_MAX + MAX_PER_ROUND * (round - 1)
    pub const BOSS_HP_BASE_MAX: u64 = 1000;
    pub const BOSS_HP_MAX_PER_ROUND: u64 = 10_000;

    /// Result screen dwell (wall-clock milliseconds)
    pub const RESULT_DWELL_MS: u64 = 3000;
    /// How long the terminal screen stays up after a loss
    pub const TERMINAL_HOLD_MS: u64 = 20_000;

    /// Crowd rendering cap
    pub const MAX_CROWD_SPRITES: usize = 200;
}
