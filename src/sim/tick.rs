//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically.

use super::round::RoundController;
use super::state::{GamePhase, Gate, SessionState, Steer, Swarm};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Horizontal steering (ignored outside the gate phase)
    pub steer: Steer,
    /// Reset button clicked: back to round 1 from any phase
    pub reset: bool,
    /// Window closed / quit key. The driver acts on it; the sim ignores it.
    pub quit: bool,
    /// Idle/demo mode - the autopilot steers
    pub autopilot: bool,
}

/// Advance the session by one fixed tick.
///
/// `now_ms` is a monotonic wall clock used only for the result dwell.
pub fn tick(state: &mut SessionState, input: &TickInput, now_ms: u64) {
    // A reset replaces the whole session before anything else runs
    if input.reset {
        state.reset();
        return;
    }

    if state.round.phase == GamePhase::Terminated {
        return;
    }

    state.time_ticks += 1;

    let SessionState {
        tuning,
        rng_state,
        swarm,
        round,
        events,
        ..
    } = state;

    match round.phase {
        GamePhase::Running => {
            round.spawn_step(tuning, rng_state, events);

            let steer = if input.autopilot {
                autopilot_steer(swarm, round)
            } else {
                input.steer
            };
            swarm.steer(steer, tuning.swarm_speed, tuning.playfield_width);

            round.advance_gates(tuning, events);
            round.resolve_gate_hits(swarm, events);

            if !round.check_wipeout(swarm, now_ms, events) {
                round.check_boss_entry(tuning, events);
            }
        }

        GamePhase::Boss => {
            // Manual control is locked out while the boss approaches
            swarm.recenter(tuning.swarm_recenter_speed, tuning.center_x());
            round.boss_step(tuning);

            if !round.check_wipeout(swarm, now_ms, events) {
                round.check_boss_contact(swarm, now_ms, events);
            }
        }

        GamePhase::Result => {
            round.result_step(swarm, tuning, rng_state, now_ms, events);
        }

        GamePhase::Terminated => {}
    }
}

/// Pick a lane for the nearest pair still ahead of the swarm: whichever gate
/// leaves the bigger swarm. Holds still once inside the chosen gate.
pub fn autopilot_steer(swarm: &Swarm, round: &RoundController) -> Steer {
    let Some(nearest) = round
        .gates
        .iter()
        .filter(|g| g.rect.top() < swarm.rect.bottom())
        .max_by_key(|g| (g.rect.bottom(), std::cmp::Reverse(g.pair_id)))
    else {
        return Steer::None;
    };

    let target: &Gate = round
        .gates
        .iter()
        .filter(|g| g.pair_id == nearest.pair_id)
        .max_by_key(|g| g.op.apply(swarm.count))
        .unwrap_or(nearest);

    if swarm.rect.left() >= target.rect.left() && swarm.rect.right() <= target.rect.right() {
        Steer::None
    } else if swarm.rect.center_x() < target.rect.center_x() {
        Steer::Right
    } else {
        Steer::Left
    }
}
