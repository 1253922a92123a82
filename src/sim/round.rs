//! Round state machine
//!
//! `Running -> Boss -> Result -> (Running | Terminated)`. The controller owns
//! the phase, the spawn timer and counters, the live gates and the boss. The
//! swarm belongs to the session and is passed in.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{
    Boss, GameEvent, GamePhase, Gate, GateOp, Lane, RngState, RoundResult, Swarm,
};
use crate::tuning::Tuning;

/// Operator draw table for lane gates. `+` and `x` are twice as likely as
/// `-`; `/` is never drawn.
const LANE_OPERATORS: [char; 5] = ['+', 'x', '-', '+', 'x'];

/// Roll a random lane gate
pub fn roll_gate_op(tuning: &Tuning, rng: &mut impl Rng) -> GateOp {
    let symbol = LANE_OPERATORS[rng.random_range(0..LANE_OPERATORS.len())];
    match symbol {
        '+' => GateOp::Add(rng.random_range(tuning.additive_min..=tuning.additive_max)),
        '-' => GateOp::Subtract(rng.random_range(tuning.additive_min..=tuning.additive_max)),
        _ => {
            let factor = rng.random_range(tuning.scaling_min..=tuning.scaling_max);
            GateOp::multiply(factor).unwrap_or(GateOp::Add(0))
        }
    }
}

/// Roll a boss for a 1-based round number
pub fn roll_boss(round: u32, tuning: &Tuning, rng_state: &mut RngState) -> Boss {
    let hp = rng_state
        .next_rng()
        .random_range(tuning.boss_hp.range_for_round(round));
    Boss::new(hp, tuning)
}

/// Best gate of a pair the swarm is touching this tick
#[derive(Debug, Clone, Copy)]
struct PairHit {
    pair_id: u32,
    lane: Lane,
    op: GateOp,
    overlap: i32,
}

/// Owns phase, timers, counters, gates and boss for the current round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundController {
    pub phase: GamePhase,
    /// 1-based
    pub round_number: u32,
    pub gates_spawned: u32,
    pub gates_passed: u32,
    /// Ticks since the last spawn
    pub spawn_timer: u32,
    /// Live gates in spawn order
    pub gates: Vec<Gate>,
    pub boss: Boss,
    pub result: Option<RoundResult>,
    /// `now_ms` when the result was decided
    pub result_started_ms: Option<u64>,
    /// Operator pairs (left, right) used before falling back to random rolls
    #[serde(default)]
    pub gate_queue: VecDeque<[GateOp; 2]>,
    next_pair_id: u32,
}

impl RoundController {
    /// Round 1, gate phase, boss rolled but idle
    pub fn new(tuning: &Tuning, rng_state: &mut RngState) -> Self {
        Self {
            phase: GamePhase::Running,
            round_number: 1,
            gates_spawned: 0,
            gates_passed: 0,
            spawn_timer: 0,
            gates: Vec::new(),
            boss: roll_boss(1, tuning, rng_state),
            result: None,
            result_started_ms: None,
            gate_queue: VecDeque::new(),
            next_pair_id: 1,
        }
    }

    /// Script the operators of upcoming gate pairs as `[left, right]`
    pub fn queue_gates(&mut self, pairs: impl IntoIterator<Item = [GateOp; 2]>) {
        self.gate_queue.extend(pairs);
    }

    /// Passed pairs over the round target, capped at 1
    pub fn progress(&self, tuning: &Tuning) -> f32 {
        (self.gates_passed as f32 / tuning.gates_per_round as f32).min(1.0)
    }

    /// Allocate a pair id
    fn next_pair_id(&mut self) -> u32 {
        let id = self.next_pair_id;
        self.next_pair_id += 1;
        id
    }

    /// Advance the spawn timer; spawn a left/right pair when it runs out
    pub fn spawn_step(
        &mut self,
        tuning: &Tuning,
        rng_state: &mut RngState,
        events: &mut Vec<GameEvent>,
    ) {
        self.spawn_timer += 1;
        if self.spawn_timer <= tuning.gate_spawn_ticks
            || self.gates_spawned >= tuning.gates_per_round
        {
            return;
        }
        self.spawn_timer = 0;

        let [left, right] = match self.gate_queue.pop_front() {
            Some(pair) => pair,
            None => {
                let mut rng = rng_state.next_rng();
                [roll_gate_op(tuning, &mut rng), roll_gate_op(tuning, &mut rng)]
            }
        };

        let pair_id = self.next_pair_id();
        self.gates.push(Gate::new(pair_id, Lane::Left, left, tuning));
        self.gates.push(Gate::new(pair_id, Lane::Right, right, tuning));
        self.gates_spawned += 1;

        log::debug!(
            "Round {} pair {}: [{}] [{}] ({}/{})",
            self.round_number,
            pair_id,
            left,
            right,
            self.gates_spawned,
            tuning.gates_per_round
        );
        events.push(GameEvent::GatePairSpawned {
            pair_id,
            left,
            right,
        });
    }

    /// Move gates down and drop the ones that left the playfield
    pub fn advance_gates(&mut self, tuning: &Tuning, events: &mut Vec<GameEvent>) {
        let mut expired: Vec<u32> = Vec::new();
        for gate in &mut self.gates {
            if gate.advance(tuning.gate_speed, tuning.playfield_height)
                && !expired.contains(&gate.pair_id)
            {
                expired.push(gate.pair_id);
            }
        }
        if expired.is_empty() {
            return;
        }

        let height = tuning.playfield_height;
        self.gates.retain(|g| g.rect.top() <= height);
        for pair_id in expired {
            events.push(GameEvent::GatesExpired { pair_id });
        }
    }

    /// Apply at most one gate per pair the swarm touches, then remove those
    /// pairs. Returns the number of pairs consumed.
    ///
    /// When the swarm straddles both gates of a pair, the gate with the larger
    /// horizontal overlap wins; ties go to the left lane.
    pub fn resolve_gate_hits(&mut self, swarm: &mut Swarm, events: &mut Vec<GameEvent>) -> u32 {
        // Collect
        let mut hits: Vec<PairHit> = Vec::new();
        for gate in &self.gates {
            if !gate.rect.overlaps(&swarm.rect) {
                continue;
            }
            let candidate = PairHit {
                pair_id: gate.pair_id,
                lane: gate.lane,
                op: gate.op,
                overlap: gate.rect.horizontal_overlap(&swarm.rect),
            };
            match hits.iter_mut().find(|h| h.pair_id == gate.pair_id) {
                Some(best) => {
                    if candidate.overlap > best.overlap
                        || (candidate.overlap == best.overlap && candidate.lane == Lane::Left)
                    {
                        *best = candidate;
                    }
                }
                None => hits.push(candidate),
            }
        }

        // Apply
        for hit in &hits {
            swarm.apply_effect(hit.op);
            self.gates_passed += 1;
            log::debug!(
                "Passed {} in {:?} lane (pair {}), swarm now {}",
                hit.op,
                hit.lane,
                hit.pair_id,
                swarm.count
            );
            events.push(GameEvent::GatePassed {
                pair_id: hit.pair_id,
                lane: hit.lane,
                op: hit.op,
                count: swarm.count,
            });
        }
        self.gates
            .retain(|g| !hits.iter().any(|h| h.pair_id == g.pair_id));

        hits.len() as u32
    }

    /// Gate phase is over: every pair passed, or every pair spawned and gone
    pub fn gate_phase_complete(&self, tuning: &Tuning) -> bool {
        self.gates_passed >= tuning.gates_per_round
            || (self.gates_spawned >= tuning.gates_per_round && self.gates.is_empty())
    }

    /// `Running -> Boss` once the gate phase is complete
    pub fn check_boss_entry(&mut self, tuning: &Tuning, events: &mut Vec<GameEvent>) -> bool {
        if self.phase != GamePhase::Running || !self.gate_phase_complete(tuning) {
            return false;
        }
        self.phase = GamePhase::Boss;
        self.boss.enter(tuning);
        log::info!(
            "Round {}: boss appears with {} HP ({}/{} gates passed)",
            self.round_number,
            self.boss.hp,
            self.gates_passed,
            tuning.gates_per_round
        );
        events.push(GameEvent::BossEngaged {
            round: self.round_number,
            hp: self.boss.hp,
        });
        true
    }

    pub fn boss_step(&mut self, tuning: &Tuning) {
        if self.boss.engaged {
            self.boss.advance(tuning.boss_speed, tuning.boss_stop_top());
        }
    }

    /// `Boss -> Result` when swarm and boss touch. The outcome is fixed here.
    pub fn check_boss_contact(
        &mut self,
        swarm: &Swarm,
        now_ms: u64,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if self.phase != GamePhase::Boss || !swarm.rect.overlaps(&self.boss.rect) {
            return false;
        }
        self.decide(RoundResult::boss_contact(swarm.count, self.boss.hp), now_ms, events);
        true
    }

    /// `Running/Boss -> Result` (loss) when the swarm is gone. Takes
    /// precedence over every other transition in the same tick.
    pub fn check_wipeout(
        &mut self,
        swarm: &Swarm,
        now_ms: u64,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let active = matches!(self.phase, GamePhase::Running | GamePhase::Boss);
        if !active || !swarm.is_wiped_out() {
            return false;
        }
        self.decide(RoundResult::wipeout(), now_ms, events);
        true
    }

    fn decide(&mut self, result: RoundResult, now_ms: u64, events: &mut Vec<GameEvent>) {
        self.phase = GamePhase::Result;
        self.result = Some(result);
        self.result_started_ms = Some(now_ms);
        if result.won {
            log::info!(
                "Round {} won by {} (boss HP {})",
                self.round_number,
                result.margin,
                self.boss.hp
            );
        } else {
            log::info!("Round {} lost ({:?})", self.round_number, result.cause);
        }
        events.push(GameEvent::RoundResolved {
            round: self.round_number,
            result,
        });
    }

    /// True once the result has been on screen for the dwell time
    pub fn dwell_elapsed(&self, tuning: &Tuning, now_ms: u64) -> bool {
        self.result_started_ms
            .is_some_and(|start| now_ms.saturating_sub(start) >= tuning.result_dwell_ms)
    }

    /// After the dwell: next round on a win, terminate on a loss
    pub fn result_step(
        &mut self,
        swarm: &mut Swarm,
        tuning: &Tuning,
        rng_state: &mut RngState,
        now_ms: u64,
        events: &mut Vec<GameEvent>,
    ) {
        if self.phase != GamePhase::Result || !self.dwell_elapsed(tuning, now_ms) {
            return;
        }
        let Some(result) = self.result else {
            return;
        };

        if !result.won {
            self.phase = GamePhase::Terminated;
            log::info!("Game over at round {}", self.round_number);
            events.push(GameEvent::SessionTerminated {
                round: self.round_number,
            });
            return;
        }

        // Pay the boss's HP, but a win never empties the swarm
        swarm.count = swarm.count.saturating_sub(self.boss.hp).max(1);
        swarm.reset_position(tuning);

        self.round_number += 1;
        self.phase = GamePhase::Running;
        self.gates_spawned = 0;
        self.gates_passed = 0;
        self.spawn_timer = 0;
        self.gates.clear();
        self.result = None;
        self.result_started_ms = None;
        self.boss = roll_boss(self.round_number, tuning, rng_state);

        log::info!(
            "Round {} begins with {} units",
            self.round_number,
            swarm.count
        );
        events.push(GameEvent::RoundStarted {
            round: self.round_number,
            count: swarm.count,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Rect;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (Tuning, RngState, Swarm, RoundController) {
        let tuning = Tuning::default();
        let mut rng_state = RngState::new(7);
        let swarm = Swarm::new(&tuning);
        let round = RoundController::new(&tuning, &mut rng_state);
        (tuning, rng_state, swarm, round)
    }

    /// Drop a pair straight onto the swarm's row
    fn place_pair(
        round: &mut RoundController,
        tuning: &Tuning,
        left: GateOp,
        right: GateOp,
    ) -> u32 {
        let pair_id = round.next_pair_id();
        for (lane, op) in [(Lane::Left, left), (Lane::Right, right)] {
            let mut gate = Gate::new(pair_id, lane, op, tuning);
            gate.rect.pos.y = tuning.swarm_start_rect().top() - 10;
            round.gates.push(gate);
        }
        round.gates_spawned += 1;
        pair_id
    }

    #[test]
    fn test_lane_operators_never_divide() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut counts = [0u32; 3];
        for _ in 0..5000 {
            match roll_gate_op(&tuning, &mut rng) {
                GateOp::Add(v) => {
                    assert!((10..=50).contains(&v));
                    counts[0] += 1;
                }
                GateOp::Multiply(v) => {
                    assert!((1..=3).contains(&v.get()));
                    counts[1] += 1;
                }
                GateOp::Subtract(v) => {
                    assert!((10..=50).contains(&v));
                    counts[2] += 1;
                }
                GateOp::Divide(_) => panic!("divide gates are never spawned"),
            }
        }
        // 2:2:1 weighting, loosely
        assert!(counts[0] > counts[2] * 3 / 2);
        assert!(counts[1] > counts[2] * 3 / 2);
    }

    #[test]
    fn test_spawn_timing_and_quota() {
        let (tuning, mut rng_state, _, mut round) = setup();
        let mut events = Vec::new();

        for _ in 0..tuning.gate_spawn_ticks {
            round.spawn_step(&tuning, &mut rng_state, &mut events);
        }
        assert!(round.gates.is_empty());

        round.spawn_step(&tuning, &mut rng_state, &mut events);
        assert_eq!(round.gates.len(), 2);
        assert_eq!(round.spawn_timer, 0);
        assert_eq!(round.gates_spawned, 1);
        assert_eq!(round.gates[0].pair_id, round.gates[1].pair_id);
        assert_eq!(round.gates[0].lane, Lane::Left);
        assert_eq!(round.gates[1].lane, Lane::Right);

        for _ in 0..10_000 {
            round.spawn_step(&tuning, &mut rng_state, &mut events);
        }
        assert_eq!(round.gates_spawned, tuning.gates_per_round);
        assert_eq!(round.gates.len(), 2 * tuning.gates_per_round as usize);
        let spawned = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GatePairSpawned { .. }))
            .count();
        assert_eq!(spawned, tuning.gates_per_round as usize);
    }

    #[test]
    fn test_queued_gates_are_used_first() {
        let (tuning, mut rng_state, _, mut round) = setup();
        let mut events = Vec::new();
        round.queue_gates([[GateOp::Subtract(11), GateOp::Add(22)]]);
        round.spawn_timer = tuning.gate_spawn_ticks;
        round.spawn_step(&tuning, &mut rng_state, &mut events);
        assert_eq!(round.gates[0].op, GateOp::Subtract(11));
        assert_eq!(round.gates[1].op, GateOp::Add(22));
        assert!(round.gate_queue.is_empty());
    }

    #[test]
    fn test_pair_consumed_once_and_partner_removed() {
        let (tuning, _, mut swarm, mut round) = setup();
        let mut events = Vec::new();
        swarm.count = 10;
        swarm.rect.pos.x = 50; // squarely in the left lane
        place_pair(&mut round, &tuning, GateOp::Add(20), GateOp::multiply(3).unwrap());

        let consumed = round.resolve_gate_hits(&mut swarm, &mut events);
        assert_eq!(consumed, 1);
        assert_eq!(swarm.count, 30);
        assert_eq!(round.gates_passed, 1);
        assert!(round.gates.is_empty());
    }

    #[test]
    fn test_straddling_applies_only_one_gate() {
        let (tuning, _, mut swarm, mut round) = setup();
        let mut events = Vec::new();
        swarm.count = 10;
        // Centred swarm overlaps both lanes by 20px: tie goes left
        place_pair(&mut round, &tuning, GateOp::Add(5), GateOp::Add(100));
        round.resolve_gate_hits(&mut swarm, &mut events);
        assert_eq!(swarm.count, 15);
        assert_eq!(round.gates_passed, 1);

        // Shifted right: right gate has the larger overlap
        swarm.rect.pos.x += 4;
        place_pair(&mut round, &tuning, GateOp::Add(5), GateOp::Add(100));
        round.resolve_gate_hits(&mut swarm, &mut events);
        assert_eq!(swarm.count, 115);
        assert_eq!(round.gates_passed, 2);
        assert!(round.gates.is_empty());
    }

    #[test]
    fn test_multiple_pairs_in_one_tick_each_count() {
        let (tuning, _, mut swarm, mut round) = setup();
        let mut events = Vec::new();
        swarm.rect.pos.x = 50;
        place_pair(&mut round, &tuning, GateOp::Add(10), GateOp::Add(1));
        place_pair(&mut round, &tuning, GateOp::Add(20), GateOp::Add(1));

        assert_eq!(round.resolve_gate_hits(&mut swarm, &mut events), 2);
        assert_eq!(swarm.count, 31);
        assert_eq!(round.gates_passed, 2);
        assert!(round.gates.is_empty());
    }

    #[test]
    fn test_boss_entry_after_gates_fall_off() {
        let (tuning, mut rng_state, _, mut round) = setup();
        let mut events = Vec::new();

        while round.gates_spawned < tuning.gates_per_round {
            round.spawn_step(&tuning, &mut rng_state, &mut events);
            round.advance_gates(&tuning, &mut events);
            assert!(!round.check_boss_entry(&tuning, &mut events));
        }
        while !round.gates.is_empty() {
            round.advance_gates(&tuning, &mut events);
        }
        assert_eq!(round.gates_passed, 0);
        assert!(round.check_boss_entry(&tuning, &mut events));
        assert_eq!(round.phase, GamePhase::Boss);
        assert!(round.boss.engaged);
        assert_eq!(round.boss.rect, tuning.boss_entry_rect());
        let expired = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GatesExpired { .. }))
            .count();
        assert_eq!(expired, tuning.gates_per_round as usize);
    }

    #[test]
    fn test_boss_contact_decides_once() {
        let (tuning, _, mut swarm, mut round) = setup();
        let mut events = Vec::new();
        round.phase = GamePhase::Boss;
        round.boss = Boss::new(100, &tuning);
        round.boss.enter(&tuning);
        swarm.count = 100;

        let mut ticks = 0;
        while !round.check_boss_contact(&swarm, 5_000, &mut events) {
            round.boss_step(&tuning);
            ticks += 1;
            assert!(ticks < 1000);
        }
        let result = round.result.expect("decided");
        assert!(result.won);
        assert_eq!(round.result_started_ms, Some(5_000));

        // Later changes to the swarm don't touch the decided outcome
        swarm.count = 0;
        assert!(!round.check_boss_contact(&swarm, 6_000, &mut events));
        assert!(!round.check_wipeout(&swarm, 6_000, &mut events));
        assert_eq!(round.result, Some(result));
    }

    #[test]
    fn test_win_stages_next_round_after_dwell() {
        let (tuning, mut rng_state, mut swarm, mut round) = setup();
        let mut events = Vec::new();
        round.phase = GamePhase::Boss;
        round.boss = Boss::new(1000, &tuning);
        round.boss.enter(&tuning);
        round.gates_spawned = 7;
        round.gates_passed = 5;
        swarm.count = 1004;
        swarm.rect = Rect::new(round.boss.rect.left(), round.boss.rect.top(), 50, 50);

        assert!(round.check_boss_contact(&swarm, 1_000, &mut events));
        round.result_step(&mut swarm, &tuning, &mut rng_state, 3_999, &mut events);
        assert_eq!(round.phase, GamePhase::Result);

        round.result_step(&mut swarm, &tuning, &mut rng_state, 4_000, &mut events);
        assert_eq!(round.phase, GamePhase::Running);
        assert_eq!(round.round_number, 2);
        assert_eq!(swarm.count, 4);
        assert_eq!(swarm.rect, tuning.swarm_start_rect());
        assert_eq!(round.gates_spawned, 0);
        assert_eq!(round.gates_passed, 0);
        assert_eq!(round.spawn_timer, 0);
        assert!(round.result.is_none());
        assert!(!round.boss.engaged);
        assert!(tuning.boss_hp.range_for_round(2).contains(&round.boss.hp));
    }

    #[test]
    fn test_exact_win_floors_swarm_at_one() {
        let (tuning, mut rng_state, mut swarm, mut round) = setup();
        let mut events = Vec::new();
        round.boss = Boss::new(500, &tuning);
        swarm.count = 500;
        round.decide(RoundResult::boss_contact(swarm.count, round.boss.hp), 0, &mut events);
        round.result_step(&mut swarm, &tuning, &mut rng_state, tuning.result_dwell_ms, &mut events);
        assert_eq!(swarm.count, 1);
        assert_eq!(round.round_number, 2);
    }

    #[test]
    fn test_loss_terminates_after_dwell() {
        let (tuning, mut rng_state, mut swarm, mut round) = setup();
        let mut events = Vec::new();
        swarm.count = 0;
        assert!(round.check_wipeout(&swarm, 10, &mut events));
        assert_eq!(round.result, Some(RoundResult::wipeout()));

        round.result_step(
            &mut swarm,
            &tuning,
            &mut rng_state,
            10 + tuning.result_dwell_ms,
            &mut events,
        );
        assert_eq!(round.phase, GamePhase::Terminated);
        assert_eq!(round.round_number, 1);
        assert!(matches!(
            events.last(),
            Some(GameEvent::SessionTerminated { round: 1 })
        ));
    }

    #[test]
    fn test_progress_is_capped() {
        let (tuning, _, _, mut round) = setup();
        round.gates_passed = 3;
        assert!((round.progress(&tuning) - 3.0 / 7.0).abs() < 1e-6);
        round.gates_passed = 100;
        assert_eq!(round.progress(&tuning), 1.0);
    }
}
