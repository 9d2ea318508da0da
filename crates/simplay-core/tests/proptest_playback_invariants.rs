//! Property-based invariant tests for the playback state machine.
//!
//! ## Invariants
//!
//! 1. Monotonic progress: without seek/stop, progress never decreases.
//! 2. Re-anchor invariance: elapsed = Σ(run_time × speed), independent of
//!    how the run time is split by pauses.
//! 3. Seek idempotence: seeking to the same point twice changes nothing.
//! 4. Completion boundary: reaching the end yields exactly total / 100%.
//! 5. Stop resets cleanly from any reachable state.
//! 6. Cursor stays inside the bounding box of origin and action targets.
//! 7. Elapsed time always lies in [0, total].

use std::time::Duration;

use proptest::prelude::*;
use simplay_core::{
    ActionKind, ActionSequence, CursorInterpolator, Point, SequenceBuilder, Simulation,
    SimulationStatus,
};

// ── Strategies ────────────────────────────────────────────────────────────

/// Dyadic speeds keep float arithmetic on whole milliseconds exact.
const SPEEDS: [f64; 6] = [0.5, 1.0, 1.5, 2.0, 3.0, 4.0];

fn arb_kind() -> impl Strategy<Value = ActionKind> {
    prop::sample::select(ActionKind::ALL.to_vec())
}

fn arb_sequence() -> impl Strategy<Value = ActionSequence> {
    prop::collection::vec(
        (
            0u16..400,
            1u16..1500,
            arb_kind(),
            prop::option::of((0u16..1280, 0u16..720)),
        ),
        1..12,
    )
    .prop_map(|steps| {
        let mut builder = SequenceBuilder::new();
        for (gap, duration, kind, pos) in steps {
            builder = builder
                .gap(f64::from(gap))
                .push(kind, f64::from(duration), kind.label());
            if let Some((x, y)) = pos {
                builder = builder.at(f64::from(x), f64::from(y));
            }
        }
        builder.build().expect("generated sequence is valid")
    })
}

#[derive(Debug, Clone)]
enum Op {
    Advance(u16),
    Speed(usize),
    Pause,
    Resume,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u16..800).prop_map(Op::Advance),
        1 => (0..SPEEDS.len()).prop_map(Op::Speed),
        1 => Just(Op::Pause),
        1 => Just(Op::Resume),
    ]
}

fn apply(sim: &mut Simulation, now: &mut Duration, op: &Op) {
    match *op {
        Op::Advance(ms) => {
            *now += Duration::from_millis(u64::from(ms));
            sim.tick(*now);
        }
        Op::Speed(i) => {
            let _ = sim.set_speed(*now, SPEEDS[i]);
        }
        Op::Pause => {
            sim.pause(*now);
        }
        Op::Resume => {
            sim.resume(*now);
        }
    }
}

// ── 1. Monotonic progress ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn progress_is_monotonic(seq in arb_sequence(), ops in prop::collection::vec(arb_op(), 1..60)) {
        let mut sim = Simulation::new(seq);
        let mut now = Duration::from_millis(17);
        sim.start(now);
        let mut prev = sim.state().progress;
        for op in &ops {
            apply(&mut sim, &mut now, op);
            let progress = sim.state().progress;
            prop_assert!(progress >= prev, "progress fell from {prev} to {progress} after {op:?}");
            prop_assert!((0.0..=100.0).contains(&progress));
            prev = progress;
        }
    }
}

// ── 2. Re-anchor invariance ───────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn pauses_do_not_change_elapsed(
        segments in prop::collection::vec(
            (0..SPEEDS.len(), 0u32..2000, prop::collection::vec((0u32..100, 0u32..5000), 0..4)),
            1..6,
        )
    ) {
        // A timeline long enough that playback never completes.
        let seq = SequenceBuilder::new()
            .push(ActionKind::Wait, 1.0e9, "long wait")
            .build()
            .expect("valid");

        let mut with_pauses = Simulation::new(seq.clone());
        let mut straight = Simulation::new(seq);
        let mut now_a = Duration::ZERO;
        let mut now_b = Duration::ZERO;
        with_pauses.start(now_a);
        straight.start(now_b);
        let mut expected = 0.0_f64;

        for (speed_idx, run_ms, pauses) in &segments {
            let speed = SPEEDS[*speed_idx];
            with_pauses.set_speed(now_a, speed).expect("valid speed");
            straight.set_speed(now_b, speed).expect("valid speed");

            // Split the run at each pause point (percent of run time).
            let mut remaining = *run_ms;
            for (pct, pause_ms) in pauses {
                let part = run_ms * pct / 100;
                let part = part.min(remaining);
                remaining -= part;
                now_a += Duration::from_millis(u64::from(part));
                with_pauses.pause(now_a);
                now_a += Duration::from_millis(u64::from(*pause_ms));
                with_pauses.tick(now_a);
                with_pauses.resume(now_a);
            }
            now_a += Duration::from_millis(u64::from(remaining));
            with_pauses.tick(now_a);

            now_b += Duration::from_millis(u64::from(*run_ms));
            straight.tick(now_b);

            expected += f64::from(*run_ms) * speed;
        }

        prop_assert_eq!(with_pauses.elapsed_ms(), expected);
        prop_assert_eq!(straight.elapsed_ms(), expected);
    }
}

// ── 3. Seek idempotence ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn seek_twice_is_seek_once(
        seq in arb_sequence(),
        ops in prop::collection::vec(arb_op(), 0..20),
        frac in 0.0f64..1.2,
    ) {
        let total = seq.total_duration_ms();
        let mut sim = Simulation::new(seq);
        let mut now = Duration::ZERO;
        sim.start(now);
        for op in &ops {
            apply(&mut sim, &mut now, op);
        }
        let target = total * frac;
        sim.seek(now, target);
        let elapsed = sim.elapsed_ms();
        let index = sim.state().current_action_index;
        let status = sim.status();
        sim.seek(now, target);
        prop_assert_eq!(sim.elapsed_ms(), elapsed);
        prop_assert_eq!(sim.state().current_action_index, index);
        prop_assert_eq!(sim.status(), status);
    }
}

// ── 4. Completion boundary ────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn running_to_the_end_completes_exactly(
        seq in arb_sequence(),
        speed_idx in 0..SPEEDS.len(),
        step in 1u16..400,
    ) {
        let total = seq.total_duration_ms();
        let mut sim = Simulation::new(seq);
        let mut now = Duration::ZERO;
        sim.start(now);
        sim.set_speed(now, SPEEDS[speed_idx]).expect("valid speed");
        let mut guard = 0;
        while sim.status() == SimulationStatus::Running {
            now += Duration::from_millis(u64::from(step));
            sim.tick(now);
            prop_assert!(sim.elapsed_ms() <= total);
            guard += 1;
            prop_assert!(guard < 100_000, "did not complete");
        }
        prop_assert_eq!(sim.status(), SimulationStatus::Completed);
        prop_assert_eq!(sim.state().progress, 100.0);
        prop_assert_eq!(sim.elapsed_ms(), total);
    }

    #[test]
    fn seek_to_total_completes(seq in arb_sequence(), ops in prop::collection::vec(arb_op(), 0..20)) {
        let total = seq.total_duration_ms();
        let mut sim = Simulation::new(seq);
        let mut now = Duration::ZERO;
        sim.start(now);
        for op in &ops {
            apply(&mut sim, &mut now, op);
        }
        sim.seek(now, total);
        prop_assert_eq!(sim.status(), SimulationStatus::Completed);
        prop_assert_eq!(sim.state().progress, 100.0);
        prop_assert_eq!(sim.elapsed_ms(), total);
    }
}

// ── 5. Stop resets cleanly ────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn stop_always_resets(seq in arb_sequence(), ops in prop::collection::vec(arb_op(), 0..30)) {
        let mut sim = Simulation::new(seq);
        let mut now = Duration::ZERO;
        sim.start(now);
        for op in &ops {
            apply(&mut sim, &mut now, op);
        }
        sim.stop();
        prop_assert_eq!(sim.status(), SimulationStatus::Idle);
        prop_assert_eq!(sim.elapsed_ms(), 0.0);
        prop_assert_eq!(sim.state().current_action_index_i64(), -1);
        prop_assert!(!sim.state().cursor.is_visible);
    }
}

// ── 6. Cursor bounds ──────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn cursor_stays_within_target_hull(seq in arb_sequence(), frac in 0.0f64..1.0) {
        let origin = Point::new(640.0, 360.0);
        let interp = CursorInterpolator::new(origin);
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (origin.x, origin.x, origin.y, origin.y);
        for p in seq.iter().filter_map(|a| a.position) {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        let t = seq.total_duration_ms() * frac;
        let cursor = interp.resolve(&seq, t, SimulationStatus::Running);
        prop_assert!(cursor.position.x >= min_x - 1e-9 && cursor.position.x <= max_x + 1e-9);
        prop_assert!(cursor.position.y >= min_y - 1e-9 && cursor.position.y <= max_y + 1e-9);
    }
}
