//! Data-driven game balance
//!
//! Every gameplay number lives in [`Tuning`]. Defaults come from
//! [`crate::consts`]; a JSON file can override any subset of fields.

use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::collision::Rect;

/// Environment variable naming a tuning JSON file
pub const TUNING_ENV_VAR: &str = "GATE_SWARM_TUNING";

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Boss HP growth per round
///
/// Both bounds grow linearly, the upper one faster, so later rounds are
/// harder and more varied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HpScaling {
    pub base_min: u64,
    pub min_per_round: u64,
    pub base_max: u64,
    pub max_per_round: u64,
}

impl Default for HpScaling {
    fn default() -> Self {
        Self {
            base_min: BOSS_HP_BASE_MIN,
            min_per_round: BOSS_HP_MIN_PER_ROUND,
            base_max: BOSS_HP_BASE_MAX,
            max_per_round: BOSS_HP_MAX_PER_ROUND,
        }
    }
}

impl HpScaling {
    /// Inclusive HP range for a 1-based round number
    pub fn range_for_round(&self, round: u32) -> RangeInclusive<u64> {
        let steps = u64::from(round.max(1) - 1);
        let min = self
            .base_min
            .saturating_add(self.min_per_round.saturating_mul(steps));
        let max = self
            .base_max
            .saturating_add(self.max_per_round.saturating_mul(steps));
        min..=max.max(min)
    }
}

/// Game balance and playfield layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub playfield_width: i32,
    pub playfield_height: i32,

    pub gates_per_round: u32,
    /// Spawn fires once the timer exceeds this many ticks
    pub gate_spawn_ticks: u32,

    pub swarm_size: i32,
    pub swarm_speed: i32,
    pub swarm_recenter_speed: i32,
    pub swarm_bottom_margin: i32,
    pub swarm_start_count: u64,

    pub gate_height: i32,
    pub gate_lane_inset: i32,
    pub gate_spawn_y: i32,
    pub gate_speed: i32,
    pub additive_min: u32,
    pub additive_max: u32,
    pub scaling_min: u32,
    pub scaling_max: u32,

    pub boss_size: i32,
    pub boss_entry_bottom: i32,
    pub boss_speed: i32,
    pub boss_hp: HpScaling,

    pub result_dwell_ms: u64,
    pub terminal_hold_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            gates_per_round: GATES_PER_ROUND,
            gate_spawn_ticks: GATE_SPAWN_TIME,
            swarm_size: SWARM_SIZE,
            swarm_speed: SWARM_SPEED,
            swarm_recenter_speed: SWARM_RECENTER_SPEED,
            swarm_bottom_margin: SWARM_BOTTOM_MARGIN,
            swarm_start_count: SWARM_START_COUNT,
            gate_height: GATE_HEIGHT,
            gate_lane_inset: GATE_LANE_INSET,
            gate_spawn_y: GATE_SPAWN_Y,
            gate_speed: GATE_SPEED,
            additive_min: ADDITIVE_MIN,
            additive_max: ADDITIVE_MAX,
            scaling_min: SCALING_MIN,
            scaling_max: SCALING_MAX,
            boss_size: BOSS_SIZE,
            boss_entry_bottom: BOSS_ENTRY_BOTTOM,
            boss_speed: BOSS_SPEED,
            boss_hp: HpScaling::default(),
            result_dwell_ms: RESULT_DWELL_MS,
            terminal_hold_ms: TERMINAL_HOLD_MS,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        for (field, value) in [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("swarm_size", self.swarm_size),
            ("gate_height", self.gate_height),
            ("boss_size", self.boss_size),
            ("gate_speed", self.gate_speed),
            ("boss_speed", self.boss_speed),
            ("swarm_recenter_speed", self.swarm_recenter_speed),
        ] {
            if value <= 0 {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }
        if self.swarm_speed < 0 {
            return Err(invalid("swarm_speed", "must not be negative"));
        }
        if self.gates_per_round == 0 {
            return Err(invalid("gates_per_round", "a round needs at least one gate pair"));
        }
        if self.swarm_start_count == 0 {
            return Err(invalid("swarm_start_count", "an empty swarm loses immediately"));
        }
        if self.gate_width() <= 0 {
            return Err(invalid("gate_lane_inset", "leaves no room for a gate in its lane"));
        }
        if self.swarm_size > self.playfield_width || self.boss_size > self.playfield_width {
            return Err(invalid("playfield_width", "narrower than the swarm or boss"));
        }
        if self.additive_min > self.additive_max {
            return Err(invalid("additive_min", "greater than additive_max"));
        }
        if self.scaling_min == 0 {
            return Err(invalid("scaling_min", "multiply/divide values must be at least 1"));
        }
        if self.scaling_min > self.scaling_max {
            return Err(invalid("scaling_min", "greater than scaling_max"));
        }
        if self.boss_hp.base_min > self.boss_hp.base_max {
            return Err(invalid("boss_hp.base_min", "greater than boss_hp.base_max"));
        }
        if self.boss_hp.min_per_round > self.boss_hp.max_per_round {
            return Err(invalid(
                "boss_hp.min_per_round",
                "lower bound would overtake the upper bound in later rounds",
            ));
        }
        if self.swarm_bottom_margin < 0
            || self.swarm_bottom_margin > self.playfield_height - self.swarm_size
        {
            return Err(invalid("swarm_bottom_margin", "puts the swarm outside the playfield"));
        }
        // The boss only descends, so it has to enter at or above the combat line
        if self.boss_entry_rect().top() > self.boss_stop_top() {
            return Err(invalid(
                "boss_entry_bottom",
                format!(
                    "boss would enter below its combat line (top {} > {})",
                    self.boss_entry_rect().top(),
                    self.boss_stop_top()
                ),
            ));
        }
        Ok(())
    }

    /// Width of one gate inside its lane
    pub fn gate_width(&self) -> i32 {
        self.playfield_width / 2 - 2 * self.gate_lane_inset
    }

    /// Horizontal centre of the playfield
    pub fn center_x(&self) -> i32 {
        self.playfield_width / 2
    }

    /// Swarm box at the start of a round: bottom-centre of the field
    pub fn swarm_start_rect(&self) -> Rect {
        let mut rect = Rect::new(0, 0, self.swarm_size, self.swarm_size);
        rect.set_center_x(self.center_x());
        rect.set_bottom(self.playfield_height - self.swarm_bottom_margin);
        rect
    }

    /// Boss box when it enters the playfield
    pub fn boss_entry_rect(&self) -> Rect {
        let mut rect = Rect::new(0, 0, self.boss_size, self.boss_size);
        rect.set_center_x(self.center_x());
        rect.set_bottom(self.boss_entry_bottom);
        rect
    }

    /// Combat line: the boss stops with its bottom edge level with the swarm's
    pub fn boss_stop_top(&self) -> i32 {
        self.playfield_height - self.swarm_bottom_margin - self.boss_size
    }
}
