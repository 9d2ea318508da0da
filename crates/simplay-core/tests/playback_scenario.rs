//! End-to-end scenario for the simulation state machine.
//!
//! Three actions at 0, 1000, 2000ms, 500ms each (total 2500ms), driven by an
//! explicit virtual wall clock.
//!
//! Run:
//!   cargo test -p simplay-core --test playback_scenario

use std::time::Duration;

use simplay_core::{
    ActionKind, ActionSequence, SimulationAction, Simulation, SimulationStatus,
};

fn three_step() -> ActionSequence {
    ActionSequence::new(vec![
        SimulationAction::new("open", ActionKind::Click, 0.0, 500.0, "Open menu").at(100.0, 80.0),
        SimulationAction::new("search", ActionKind::Type, 1000.0, 500.0, "Type query")
            .at(400.0, 80.0)
            .on("input[name=q]"),
        SimulationAction::new("submit", ActionKind::Click, 2000.0, 500.0, "Submit")
            .at(640.0, 80.0),
    ])
    .expect("valid sequence")
}

/// Virtual wall clock for the scenario.
struct Wall(Duration);

impl Wall {
    fn advance(&mut self, ms: u64) -> Duration {
        self.0 += Duration::from_millis(ms);
        self.0
    }
}

#[test]
fn speed_pause_resume_seek_scenario() {
    let mut wall = Wall(Duration::from_millis(5_000));
    let mut sim = Simulation::new(three_step());

    assert!(sim.start(wall.0));
    let now = wall.advance(1200);
    sim.tick(now);
    assert_eq!(sim.state().current_action_index, Some(1));
    assert!((sim.state().progress - 48.0).abs() < 1e-9);

    sim.set_speed(now, 2.0).expect("positive speed");
    let now = wall.advance(400);
    sim.tick(now);
    assert_eq!(sim.elapsed_ms(), 2000.0);
    assert_eq!(sim.state().current_action_index, Some(2));

    assert!(sim.pause(now));
    let now = wall.advance(10_000);
    sim.tick(now);
    assert_eq!(sim.elapsed_ms(), 2000.0, "paused clock must not move");

    // Drop back to real time before resuming.
    sim.set_speed(now, 1.0).expect("positive speed");
    assert!(sim.resume(now));
    let now = wall.advance(250);
    sim.tick(now);
    assert_eq!(sim.elapsed_ms(), 2250.0);
    assert_eq!(sim.status(), SimulationStatus::Running);

    sim.seek(now, 2500.0);
    assert_eq!(sim.status(), SimulationStatus::Completed);
    assert_eq!(sim.state().progress, 100.0);
    assert_eq!(sim.elapsed_ms(), 2500.0);
}

#[test]
fn resuming_at_double_speed_reaches_the_end() {
    let mut wall = Wall(Duration::from_millis(5_000));
    let mut sim = Simulation::new(three_step());

    sim.start(wall.0);
    let now = wall.advance(1200);
    sim.tick(now);
    sim.set_speed(now, 2.0).expect("positive speed");
    let now = wall.advance(400);
    sim.tick(now);
    assert!(sim.pause(now));
    let now = wall.advance(10_000);
    assert!(sim.resume(now));
    let now = wall.advance(250);
    let refresh = sim.tick(now);
    assert!(refresh.completed);
    assert_eq!(sim.status(), SimulationStatus::Completed);
    assert_eq!(sim.elapsed_ms(), 2500.0);
}

#[test]
fn resume_keeps_speed_set_before_pause() {
    let mut wall = Wall(Duration::ZERO);
    let mut sim = Simulation::new(three_step());

    sim.start(wall.0);
    let now = wall.advance(1200);
    sim.set_speed(now, 2.0).expect("positive speed");
    let now = wall.advance(400);
    sim.pause(now);
    let now = wall.advance(10_000);
    sim.resume(now);
    let now = wall.advance(200);
    sim.tick(now);
    // 1200 + 400*2 + 200*2
    assert_eq!(sim.elapsed_ms(), 2400.0);
}

#[test]
fn restart_after_completion_replays_from_zero() {
    let mut wall = Wall(Duration::ZERO);
    let mut sim = Simulation::new(three_step());

    sim.start(wall.0);
    let now = wall.advance(3000);
    sim.tick(now);
    assert_eq!(sim.status(), SimulationStatus::Completed);

    assert!(sim.start(now));
    assert_eq!(sim.status(), SimulationStatus::Running);
    assert_eq!(sim.elapsed_ms(), 0.0);
    assert_eq!(sim.state().current_action_index, Some(0));
    let now = wall.advance(100);
    sim.tick(now);
    assert_eq!(sim.elapsed_ms(), 100.0);
}

#[test]
fn independent_simulations_do_not_share_time() {
    let mut a = Simulation::new(three_step());
    let mut b = Simulation::new(three_step());

    a.start(Duration::ZERO);
    b.start(Duration::from_millis(1000));
    a.set_speed(Duration::ZERO, 4.0).expect("positive speed");

    let now = Duration::from_millis(1500);
    a.tick(now);
    b.tick(now);
    assert_eq!(a.status(), SimulationStatus::Completed);
    assert_eq!(b.elapsed_ms(), 500.0);
    assert_eq!(b.state().speed, 1.0);
}
