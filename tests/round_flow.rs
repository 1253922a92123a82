//! Whole-session scenarios driven through `tick`

use gate_swarm::Tuning;
use gate_swarm::sim::{
    Boss, GameEvent, GamePhase, GateOp, SessionState, Steer, TickInput, tick,
};
use proptest::prelude::*;

const FRAME_MS: u64 = 17;

/// Tick until `done` holds; returns the clock afterwards
fn run_until(
    state: &mut SessionState,
    input: &TickInput,
    mut now_ms: u64,
    done: impl Fn(&SessionState) -> bool,
) -> u64 {
    for _ in 0..200_000 {
        if done(state) {
            return now_ms;
        }
        tick(state, input, now_ms);
        now_ms += FRAME_MS;
    }
    panic!("condition never reached");
}

#[test]
fn seven_plus_twenty_gates_beat_a_hundred_hp_boss() {
    let mut state = SessionState::new(Tuning::default(), 2024);
    state.round.boss = Boss::new(100, &state.tuning);
    state
        .round
        .queue_gates(std::iter::repeat_n([GateOp::Add(20), GateOp::Add(20)], 7));
    assert_eq!(state.swarm.count, 1);

    let idle = TickInput::default();
    let now = run_until(&mut state, &idle, 0, |s| s.phase() != GamePhase::Running);
    assert_eq!(state.phase(), GamePhase::Boss);
    assert_eq!(state.round.gates_passed, 7);
    assert_eq!(state.swarm.count, 141);

    let passed: Vec<u64> = state
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::GatePassed { count, .. } => Some(count),
            _ => None,
        })
        .collect();
    assert_eq!(passed, vec![21, 41, 61, 81, 101, 121, 141]);

    let now = run_until(&mut state, &idle, now, |s| s.phase() == GamePhase::Result);
    let result = state.round.result.expect("decided at contact");
    assert!(result.won);
    assert_eq!(result.margin, 41);

    run_until(&mut state, &idle, now, |s| s.phase() != GamePhase::Result);
    assert_eq!(state.phase(), GamePhase::Running);
    assert_eq!(state.round.round_number, 2);
    assert_eq!(state.swarm.count, 41);
    assert!(state.round.gates.is_empty());
    assert!(
        state
            .tuning
            .boss_hp
            .range_for_round(2)
            .contains(&state.round.boss.hp)
    );
}

#[test]
fn losing_at_the_boss_ends_the_session() {
    let mut state = SessionState::new(Tuning::default(), 8);
    state.round.boss = Boss::new(10_000, &state.tuning);
    state
        .round
        .queue_gates(std::iter::repeat_n([GateOp::Add(10), GateOp::Add(10)], 7));

    let idle = TickInput::default();
    let now = run_until(&mut state, &idle, 0, |s| s.phase() == GamePhase::Terminated);
    let result = state.round.result.expect("decided");
    assert!(!result.won);
    assert_eq!(result.margin, 10_000 - 71);

    for i in 0..1_000 {
        tick(&mut state, &idle, now + i * 100);
    }
    assert_eq!(state.phase(), GamePhase::Terminated);
    assert_eq!(state.round.round_number, 1);
}

#[test]
fn identical_inputs_replay_identically() {
    let mut a = SessionState::new(Tuning::default(), 31_337);
    let mut b = SessionState::new(Tuning::default(), 31_337);
    let inputs = [
        TickInput {
            steer: Steer::Left,
            ..Default::default()
        },
        TickInput {
            autopilot: true,
            ..Default::default()
        },
        TickInput {
            steer: Steer::Right,
            ..Default::default()
        },
    ];

    for i in 0..4_000u64 {
        let input = &inputs[(i / 200) as usize % inputs.len()];
        tick(&mut a, input, i * FRAME_MS);
        tick(&mut b, input, i * FRAME_MS);
    }

    let snapshot_a = serde_json::to_string(&a).expect("serialize");
    let snapshot_b = serde_json::to_string(&b).expect("serialize");
    assert_eq!(snapshot_a, snapshot_b);

    let restored: SessionState = serde_json::from_str(&snapshot_a).expect("deserialize");
    assert_eq!(restored.round, a.round);
    assert_eq!(restored.swarm, a.swarm);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Whatever the gates and however the player steers, the gate phase ends
    #[test]
    fn every_round_reaches_the_boss_or_a_result(seed in any::<u64>(), lane in 0u8..3) {
        let mut state = SessionState::new(Tuning::default(), seed);
        let steer = match lane {
            0 => Steer::Left,
            1 => Steer::Right,
            _ => Steer::None,
        };
        let input = TickInput { steer, ..Default::default() };

        let mut ticks = 0;
        while state.phase() == GamePhase::Running {
            tick(&mut state, &input, ticks * FRAME_MS);
            ticks += 1;
            prop_assert!(ticks < 2_000);
        }
        prop_assert!(state.round.gates_passed <= state.tuning.gates_per_round);
        prop_assert!(matches!(state.phase(), GamePhase::Boss | GamePhase::Result));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any boss placement that passes validation ends up touching the swarm
    #[test]
    fn valid_boss_placement_always_reaches_the_swarm(
        entry_bottom in -600i32..1000,
        boss_size in 10i32..400,
    ) {
        let tuning = Tuning {
            boss_entry_bottom: entry_bottom,
            boss_size,
            ..Tuning::default()
        };
        prop_assume!(tuning.validate().is_ok());

        let mut state = SessionState::new(tuning, 1);
        state.round.phase = GamePhase::Boss;
        state.round.boss.enter(&state.tuning);

        let mut ticks = 0;
        while state.phase() == GamePhase::Boss {
            tick(&mut state, &TickInput::default(), ticks * FRAME_MS);
            ticks += 1;
            prop_assert!(ticks < 5_000, "boss stuck at {:?}", state.round.boss.rect);
        }
        prop_assert_eq!(state.phase(), GamePhase::Result);
    }
}
