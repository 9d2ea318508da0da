#![forbid(unsafe_code)]

//! Simulation state machine.
//!
//! A [`Simulation`] owns one [`ActionSequence`], one [`PlaybackClock`], and
//! the derived [`SimulationState`]. Every operation takes the current wall
//! time explicitly, so the machine itself is deterministic: the same
//! `(command, now)` history always yields the same state.
//!
//! # Invariants
//!
//! 1. `elapsed_ms()` is always within `[0, total_duration_ms()]`.
//! 2. While `Running`, successive `tick`s never decrease `progress`.
//! 3. `Completed` implies `elapsed_ms() == total_duration_ms()` and
//!    `progress == 100.0` exactly.
//! 4. `stop()` from any state yields `Idle`, elapsed 0, no current action,
//!    hidden cursor.
//! 5. Commands issued from a state that does not accept them return `false`
//!    and change nothing.
//! 6. `Error` is left only through `stop()`.
//!
//! # Failure Modes
//!
//! - A non-finite sequence time (internal invariant violation) moves the
//!   machine to `Error`; the last valid derived state is kept for display.

use web_time::Duration;

use crate::clock::{PlaybackClock, SpeedBounds, SpeedRejected};
use crate::cursor::{CursorInterpolator, CursorState};
use crate::sequence::ActionSequence;
use crate::state::{SimulationState, SimulationStatus};

/// What a refresh changed, so renderers can skip redundant redraws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Refresh {
    /// Any observable field changed.
    pub changed: bool,
    /// The current action index changed.
    pub action_changed: bool,
    /// This refresh moved the machine into `Completed`.
    pub completed: bool,
}

/// Deterministic playback state machine over one action sequence.
#[derive(Debug, Clone)]
pub struct Simulation {
    sequence: ActionSequence,
    clock: PlaybackClock,
    interpolator: CursorInterpolator,
    state: SimulationState,
    elapsed_ms: f64,
    needs_preview: bool,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Simulation {
    /// Create an idle simulation at time 0.
    pub fn new(sequence: ActionSequence) -> Self {
        let clock = PlaybackClock::new(sequence.total_duration_ms());
        let interpolator = CursorInterpolator::default();
        let state = SimulationState::idle(CursorState::hidden(interpolator.origin()), clock.speed());
        Self {
            sequence,
            clock,
            interpolator,
            state,
            elapsed_ms: 0.0,
            needs_preview: false,
        }
    }

    /// Use a custom cursor interpolator (builder pattern).
    #[must_use]
    pub fn with_interpolator(mut self, interpolator: CursorInterpolator) -> Self {
        self.interpolator = interpolator;
        self.state.cursor = CursorState::hidden(interpolator.origin());
        self
    }

    /// Set the allowed speed range (builder pattern).
    #[must_use]
    pub fn with_speed_bounds(mut self, bounds: SpeedBounds) -> Self {
        self.clock = self.clock.with_bounds(bounds);
        self.state.speed = self.clock.speed();
        self
    }

    /// Set the initial speed (builder pattern). Invalid speeds are ignored.
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.clock = self.clock.with_speed(speed);
        self.state.speed = self.clock.speed();
        self
    }

    /// Enter `Loading` on start until [`finish_loading`](Self::finish_loading)
    /// is called (builder pattern).
    #[must_use]
    pub fn with_preview(mut self, needs_preview: bool) -> Self {
        self.needs_preview = needs_preview;
        self
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl Simulation {
    #[inline]
    pub fn sequence(&self) -> &ActionSequence {
        &self.sequence
    }

    #[inline]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    #[inline]
    pub fn status(&self) -> SimulationStatus {
        self.state.status
    }

    /// Sequence time as of the last command or tick.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    #[inline]
    pub fn total_duration_ms(&self) -> f64 {
        self.sequence.total_duration_ms()
    }

    #[inline]
    pub fn interpolator(&self) -> &CursorInterpolator {
        &self.interpolator
    }

    #[inline]
    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    #[inline]
    pub fn needs_preview(&self) -> bool {
        self.needs_preview
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

impl Simulation {
    /// Start (or restart) from 0. Valid from `Idle` and `Completed`.
    pub fn start(&mut self, now: Duration) -> bool {
        if !matches!(
            self.state.status,
            SimulationStatus::Idle | SimulationStatus::Completed
        ) {
            return false;
        }
        self.clock.reset();
        self.state.error = None;
        if self.needs_preview {
            self.state.status = SimulationStatus::Loading;
        } else {
            self.clock.start(now);
            self.state.status = SimulationStatus::Running;
        }
        self.refresh(now);
        true
    }

    /// Leave `Loading` and start the clock at `now`.
    pub fn finish_loading(&mut self, now: Duration) -> bool {
        if self.state.status != SimulationStatus::Loading {
            return false;
        }
        self.clock.start(now);
        self.state.status = SimulationStatus::Running;
        self.refresh(now);
        true
    }

    /// Freeze the clock. Valid only from `Running`.
    ///
    /// A running clock already past the end completes instead and the pause
    /// is not applied.
    pub fn pause(&mut self, now: Duration) -> bool {
        if self.state.status != SimulationStatus::Running || self.complete_if_due(now) {
            return false;
        }
        self.clock.pause(now);
        self.state.status = SimulationStatus::Paused;
        self.refresh(now);
        true
    }

    /// Continue from the frozen position. Valid only from `Paused`.
    pub fn resume(&mut self, now: Duration) -> bool {
        if self.state.status != SimulationStatus::Paused {
            return false;
        }
        self.clock.resume(now);
        self.state.status = SimulationStatus::Running;
        if !self.complete_if_due(now) {
            self.refresh(now);
        }
        true
    }

    /// Return to `Idle` from any state. The sequence and speed are kept.
    pub fn stop(&mut self) {
        self.clock.reset();
        self.elapsed_ms = 0.0;
        self.state = SimulationState::idle(
            CursorState::hidden(self.interpolator.origin()),
            self.clock.speed(),
        );
    }

    /// Change playback speed without moving sequence time.
    ///
    /// Accepted in every state; the new speed applies from `now` on.
    pub fn set_speed(&mut self, now: Duration, speed: f64) -> Result<f64, SpeedRejected> {
        self.clock.bounds().apply(speed)?;
        if self.state.status == SimulationStatus::Running {
            self.complete_if_due(now);
        }
        let applied = self.clock.set_speed(now, speed)?;
        self.state.speed = applied;
        if self.state.status == SimulationStatus::Running {
            self.refresh(now);
        }
        Ok(applied)
    }

    /// Jump to sequence time `t` (clamped to `[0, total]`).
    ///
    /// Valid from `Running`, `Paused`, and `Completed`. Returns the clamped
    /// target, or `None` when ignored (including a NaN target). Reaching the
    /// end completes; seeking back from `Completed` lands in `Paused`.
    pub fn seek(&mut self, now: Duration, t: f64) -> Option<f64> {
        let status = self.state.status;
        if t.is_nan() {
            return None;
        }
        if !matches!(
            status,
            SimulationStatus::Running | SimulationStatus::Paused | SimulationStatus::Completed
        ) {
            return None;
        }
        let target = self.clock.seek(now, t);
        if target >= self.total_duration_ms() {
            self.complete(now);
            return Some(target);
        }
        if status == SimulationStatus::Completed {
            self.state.status = SimulationStatus::Paused;
        }
        self.refresh(now);
        Some(target)
    }

    /// Advance derived state to `now`. Only acts while `Running`.
    pub fn tick(&mut self, now: Duration) -> Refresh {
        if self.state.status != SimulationStatus::Running {
            return Refresh::default();
        }
        let raw = self.clock.unclamped_time(now);
        if raw >= self.total_duration_ms() {
            return self.complete(now);
        }
        self.refresh(now)
    }

    /// Complete when a running clock has reached the end at `now`.
    ///
    /// Returns whether the simulation completed. Frame callbacks do this in
    /// [`tick`](Self::tick); commands call it first so a re-anchor never
    /// strands a finished run outside `Completed`.
    pub fn complete_if_due(&mut self, now: Duration) -> bool {
        if self.state.status != SimulationStatus::Running {
            return false;
        }
        if self.clock.unclamped_time(now) < self.total_duration_ms() {
            return false;
        }
        self.complete(now);
        true
    }

    /// Move to `Error`, freezing the clock and keeping the last derived state.
    pub fn fail(&mut self, now: Duration, reason: impl Into<String>) -> bool {
        if self.state.status == SimulationStatus::Error {
            return false;
        }
        let reason = reason.into();
        #[cfg(feature = "tracing")]
        tracing::warn!(sim_event = "simulation_error", reason = %reason, elapsed_ms = self.elapsed_ms);
        self.clock.pause(now);
        self.state.status = SimulationStatus::Error;
        self.state.error = Some(reason);
        true
    }

    fn complete(&mut self, now: Duration) -> Refresh {
        let total = self.total_duration_ms();
        self.clock.freeze_at(total);
        self.state.status = SimulationStatus::Completed;
        #[cfg(feature = "tracing")]
        tracing::debug!(sim_event = "simulation_complete", total_ms = total);
        let mut refresh = self.refresh(now);
        refresh.completed = true;
        refresh.changed = true;
        refresh
    }

    /// Recompute derived state from the clock.
    fn refresh(&mut self, now: Duration) -> Refresh {
        let t = self.clock.sequence_time(now);
        if !t.is_finite() || t < 0.0 {
            self.fail(now, format!("sequence time left the timeline: {t}"));
            return Refresh {
                changed: true,
                ..Refresh::default()
            };
        }

        let total = self.total_duration_ms();
        let status = self.state.status;
        let index = self.sequence.active_index_at(t);
        let pending = if index.is_none() {
            self.sequence.pending_index_at(t)
        } else {
            None
        };
        let progress = if status == SimulationStatus::Completed {
            100.0
        } else {
            (100.0 * t / total).clamp(0.0, 100.0)
        };
        let cursor = self.interpolator.resolve(&self.sequence, t, status);

        let action_changed = index != self.state.current_action_index;
        if action_changed {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                sim_event = "action_change",
                from = ?self.state.current_action_index,
                to = ?index,
                elapsed_ms = t,
            );
            self.state.current_action_index = index;
            self.state.highlighted_element = index
                .and_then(|i| self.sequence.get(i))
                .and_then(|a| a.element.clone());
        }

        let changed = action_changed
            || pending != self.state.pending_action_index
            || progress != self.state.progress
            || cursor != self.state.cursor
            || t != self.elapsed_ms;

        self.state.pending_action_index = pending;
        self.state.progress = progress;
        self.state.cursor = cursor;
        self.elapsed_ms = t;

        Refresh {
            changed,
            action_changed,
            completed: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, SimulationAction};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn three_step() -> ActionSequence {
        ActionSequence::new(vec![
            SimulationAction::new("a", ActionKind::Click, 0.0, 500.0, "a").at(10.0, 10.0),
            SimulationAction::new("b", ActionKind::Type, 1000.0, 500.0, "b")
                .at(20.0, 20.0)
                .on("#b"),
            SimulationAction::new("c", ActionKind::Hover, 2000.0, 500.0, "c").at(30.0, 30.0),
        ])
        .unwrap()
    }

    #[test]
    fn starts_running_and_tracks_action() {
        let mut sim = Simulation::new(three_step());
        assert!(sim.start(ms(0)));
        assert_eq!(sim.status(), SimulationStatus::Running);
        sim.tick(ms(1200));
        assert_eq!(sim.state().current_action_index, Some(1));
        assert!((sim.state().progress - 48.0).abs() < 1e-9);
        assert_eq!(
            sim.state().highlighted_element.as_ref().map(|e| e.selector.as_str()),
            Some("#b")
        );
    }

    #[test]
    fn start_is_noop_while_running_or_paused() {
        let mut sim = Simulation::new(three_step());
        sim.start(ms(0));
        sim.tick(ms(300));
        assert!(!sim.start(ms(300)));
        sim.pause(ms(300));
        assert!(!sim.start(ms(400)));
        assert_eq!(sim.elapsed_ms(), 300.0);
    }

    #[test]
    fn pause_and_resume_only_from_valid_states() {
        let mut sim = Simulation::new(three_step());
        assert!(!sim.pause(ms(0)));
        assert!(!sim.resume(ms(0)));
        sim.start(ms(0));
        assert!(!sim.resume(ms(10)));
        assert!(sim.pause(ms(10)));
        assert!(!sim.pause(ms(20)));
        assert!(sim.resume(ms(20)));
    }

    #[test]
    fn natural_completion_is_exact() {
        let mut sim = Simulation::new(three_step());
        sim.start(ms(0));
        let refresh = sim.tick(ms(9999));
        assert!(refresh.completed);
        assert_eq!(sim.status(), SimulationStatus::Completed);
        assert_eq!(sim.elapsed_ms(), 2500.0);
        assert_eq!(sim.state().progress, 100.0);
        // Further ticks are inert.
        assert_eq!(sim.tick(ms(20_000)), Refresh::default());
    }

    #[test]
    fn seek_to_end_completes() {
        let mut sim = Simulation::new(three_step());
        sim.start(ms(0));
        assert_eq!(sim.seek(ms(5), 2500.0), Some(2500.0));
        assert_eq!(sim.status(), SimulationStatus::Completed);
        assert_eq!(sim.state().progress, 100.0);
    }

    #[test]
    fn seek_back_from_completed_pauses() {
        let mut sim = Simulation::new(three_step());
        sim.start(ms(0));
        sim.tick(ms(3000));
        sim.seek(ms(3000), 1000.0);
        assert_eq!(sim.status(), SimulationStatus::Paused);
        assert_eq!(sim.elapsed_ms(), 1000.0);
        assert_eq!(sim.state().current_action_index, Some(1));
    }

    #[test]
    fn seek_ignored_while_idle() {
        let mut sim = Simulation::new(three_step());
        assert_eq!(sim.seek(ms(0), 1000.0), None);
        assert_eq!(sim.elapsed_ms(), 0.0);
    }

    #[test]
    fn stop_resets_from_any_state() {
        let mut sim = Simulation::new(three_step());
        sim.start(ms(0));
        sim.tick(ms(1200));
        sim.stop();
        assert_eq!(sim.status(), SimulationStatus::Idle);
        assert_eq!(sim.elapsed_ms(), 0.0);
        assert_eq!(sim.state().current_action_index_i64(), -1);
        assert!(!sim.state().cursor.is_visible);
        assert!(sim.state().highlighted_element.is_none());
    }

    #[test]
    fn error_requires_stop() {
        let mut sim = Simulation::new(three_step());
        sim.start(ms(0));
        sim.tick(ms(1200));
        assert!(sim.fail(ms(1200), "preview crashed"));
        assert_eq!(sim.status(), SimulationStatus::Error);
        // Last valid state is preserved for display.
        assert_eq!(sim.state().current_action_index, Some(1));
        assert!(!sim.start(ms(1300)));
        assert!(!sim.resume(ms(1300)));
        sim.stop();
        assert!(sim.start(ms(1400)));
        assert!(sim.state().error.is_none());
    }

    #[test]
    fn loading_waits_for_preview() {
        let mut sim = Simulation::new(three_step()).with_preview(true);
        sim.start(ms(0));
        assert_eq!(sim.status(), SimulationStatus::Loading);
        assert_eq!(sim.tick(ms(800)), Refresh::default());
        assert_eq!(sim.elapsed_ms(), 0.0);
        assert!(sim.finish_loading(ms(1000)));
        sim.tick(ms(1100));
        assert_eq!(sim.elapsed_ms(), 100.0);
    }

    #[test]
    fn gap_reports_pending_action() {
        let mut sim = Simulation::new(three_step());
        sim.start(ms(0));
        sim.tick(ms(700));
        assert_eq!(sim.state().current_action_index, None);
        assert_eq!(sim.state().pending_action_index, Some(1));
    }

    #[test]
    fn refresh_reports_unchanged_when_paused_time_passes() {
        let mut sim = Simulation::new(three_step());
        sim.start(ms(0));
        let first = sim.tick(ms(100));
        assert!(first.changed);
        sim.pause(ms(100));
        sim.resume(ms(100));
        let again = sim.tick(ms(100));
        assert!(!again.changed);
    }

    #[test]
    fn pause_past_the_end_completes_instead() {
        let mut sim = Simulation::new(three_step());
        sim.start(ms(0));
        assert!(!sim.pause(ms(3000)));
        assert_eq!(sim.status(), SimulationStatus::Completed);
        assert_eq!(sim.elapsed_ms(), 2500.0);
        assert_eq!(sim.state().progress, 100.0);
        assert!(!sim.resume(ms(3100)));
    }

    #[test]
    fn speed_change_past_the_end_completes_first() {
        let mut sim = Simulation::new(three_step());
        sim.start(ms(0));
        assert_eq!(sim.set_speed(ms(3000), 2.0), Ok(2.0));
        assert_eq!(sim.status(), SimulationStatus::Completed);
        assert_eq!(sim.elapsed_ms(), 2500.0);
        assert_eq!(sim.state().speed, 2.0);
    }

    #[test]
    fn rejected_speed_past_the_end_leaves_state_alone() {
        let mut sim = Simulation::new(three_step());
        sim.start(ms(0));
        assert!(sim.set_speed(ms(3000), f64::NAN).is_err());
        assert_eq!(sim.status(), SimulationStatus::Running);
        assert!(sim.tick(ms(3000)).completed);
    }

    #[test]
    fn nan_seek_is_ignored() {
        let mut sim = Simulation::new(three_step());
        sim.start(ms(0));
        sim.tick(ms(700));
        assert_eq!(sim.seek(ms(700), f64::NAN), None);
        assert_eq!(sim.elapsed_ms(), 700.0);
        assert_eq!(sim.status(), SimulationStatus::Running);
    }
}
