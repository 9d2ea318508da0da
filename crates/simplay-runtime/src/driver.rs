#![forbid(unsafe_code)]

//! Frame driver: the recurring per-frame callback.
//!
//! Playback is cooperative. Nothing advances on its own; a driver sleeps one
//! frame interval, calls [`PlaybackController::tick`], and repeats while the
//! controller reports [`is_driving`](PlaybackController::is_driving). Pausing
//! or stopping therefore suspends the callback rather than any thread.
//!
//! The sleep function is injectable so tests and the headless demo can drive
//! a [`ManualTimeSource`](simplay_core::ManualTimeSource) without real waits:
//!
//! ```rust,ignore
//! let clock = ManualTimeSource::new();
//! let mut controller = PlaybackController::with_time_source(config, seq, clock.clone());
//! controller.start();
//! let report = FrameDriver::default().run_with_sleeper(&mut controller, |d| clock.advance(d));
//! ```

use web_time::Duration;

use simplay_core::{SimulationStatus, TimeSource};

use crate::config::{DEFAULT_FRAME_INTERVAL_MS, PlaybackPolicy};
use crate::controller::{PlaybackController, TickOutcome};

/// Summary of one drive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveReport {
    /// Frames ticked.
    pub frames: u64,
    /// Status when the drive ended.
    pub final_status: SimulationStatus,
    /// Sequence time when the drive ended.
    pub elapsed_ms: f64,
    /// Times the current action index changed.
    pub action_changes: u64,
}

/// Drives a controller at a fixed frame interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDriver {
    /// Wall time between frames.
    pub frame_interval: Duration,
    /// Upper bound on frames per drive; `None` is unbounded.
    pub max_frames: Option<u64>,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(DEFAULT_FRAME_INTERVAL_MS),
            max_frames: None,
        }
    }
}

impl FrameDriver {
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            frame_interval,
            max_frames: None,
        }
    }

    /// Driver at the policy's frame interval.
    pub fn from_policy(policy: &PlaybackPolicy) -> Self {
        Self::new(policy.frame_interval())
    }

    /// Cap the number of frames (builder pattern).
    #[must_use]
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// Drive in real time, sleeping the calling thread between frames.
    pub fn run<T: TimeSource>(&self, controller: &mut PlaybackController<T>) -> DriveReport {
        self.run_with_sleeper(controller, std::thread::sleep)
    }

    /// Drive with a custom sleep function until the controller stops driving
    /// or `max_frames` is reached.
    pub fn run_with_sleeper<T, F>(&self, controller: &mut PlaybackController<T>, sleep: F) -> DriveReport
    where
        T: TimeSource,
        F: FnMut(Duration),
    {
        self.drive(controller, None, sleep, |_, _, _| {})
    }

    /// Like [`run_with_sleeper`](Self::run_with_sleeper), but stops before
    /// any frame that would take the total slept time past `until`.
    pub fn run_until<T, F>(
        &self,
        controller: &mut PlaybackController<T>,
        until: Duration,
        sleep: F,
    ) -> DriveReport
    where
        T: TimeSource,
        F: FnMut(Duration),
    {
        self.drive(controller, Some(until), sleep, |_, _, _| {})
    }

    /// Drive and call `on_frame(frame, outcome, controller)` after each tick.
    pub fn run_observed<T, F, O>(
        &self,
        controller: &mut PlaybackController<T>,
        sleep: F,
        on_frame: O,
    ) -> DriveReport
    where
        T: TimeSource,
        F: FnMut(Duration),
        O: FnMut(u64, TickOutcome, &PlaybackController<T>),
    {
        self.drive(controller, None, sleep, on_frame)
    }

    fn drive<T, F, O>(
        &self,
        controller: &mut PlaybackController<T>,
        until: Option<Duration>,
        mut sleep: F,
        mut on_frame: O,
    ) -> DriveReport
    where
        T: TimeSource,
        F: FnMut(Duration),
        O: FnMut(u64, TickOutcome, &PlaybackController<T>),
    {
        let mut frames = 0u64;
        let mut action_changes = 0u64;
        let mut slept = Duration::ZERO;
        let mut last_index = controller.state().current_action_index;

        while controller.is_driving() {
            if self.max_frames.is_some_and(|max| frames >= max) {
                break;
            }
            let next = slept.saturating_add(self.frame_interval);
            if until.is_some_and(|until| next > until) {
                break;
            }
            if self.frame_interval > Duration::ZERO {
                sleep(self.frame_interval);
            }
            slept = next;

            let outcome = controller.tick();
            frames += 1;
            let index = controller.state().current_action_index;
            if index != last_index {
                action_changes += 1;
                last_index = index;
            }
            on_frame(frames, outcome, controller);
        }

        tracing::debug!(
            sim_event = "drive_end",
            frames,
            action_changes,
            status = %controller.status(),
            elapsed_ms = controller.elapsed_time(),
        );
        DriveReport {
            frames,
            final_status: controller.status(),
            elapsed_ms: controller.elapsed_time(),
            action_changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simplay_core::{ActionKind, ManualTimeSource, SequenceBuilder};

    use crate::config::SimulationConfig;

    fn controller() -> (PlaybackController<ManualTimeSource>, ManualTimeSource) {
        let seq = SequenceBuilder::new()
            .push(ActionKind::Click, 100.0, "a")
            .push(ActionKind::Type, 100.0, "b")
            .push(ActionKind::Hover, 100.0, "c")
            .build()
            .unwrap();
        let mut config = SimulationConfig::default();
        config.playback.needs_preview = false;
        let clock = ManualTimeSource::new();
        let c = PlaybackController::with_time_source(config, seq, clock.clone());
        (c, clock)
    }

    #[test]
    fn drives_to_completion() {
        let (mut c, clock) = controller();
        c.start();
        let driver = FrameDriver::new(Duration::from_millis(10));
        let report = driver.run_with_sleeper(&mut c, |d| clock.advance(d));
        assert_eq!(report.final_status, SimulationStatus::Completed);
        assert_eq!(report.frames, 30);
        assert_eq!(report.elapsed_ms, 300.0);
        // a -> b -> c -> none: the end of c is outside its half-open span.
        assert_eq!(report.action_changes, 3);
    }

    #[test]
    fn idle_controller_is_not_driven() {
        let (mut c, clock) = controller();
        let report = FrameDriver::default().run_with_sleeper(&mut c, |d| clock.advance(d));
        assert_eq!(report.frames, 0);
        assert_eq!(report.final_status, SimulationStatus::Idle);
    }

    #[test]
    fn max_frames_caps_the_drive() {
        let (mut c, clock) = controller();
        c.start();
        let driver = FrameDriver::new(Duration::from_millis(10)).with_max_frames(5);
        let report = driver.run_with_sleeper(&mut c, |d| clock.advance(d));
        assert_eq!(report.frames, 5);
        assert_eq!(report.final_status, SimulationStatus::Running);
        assert_eq!(report.elapsed_ms, 50.0);
    }

    #[test]
    fn run_until_respects_wall_budget() {
        let (mut c, clock) = controller();
        c.start();
        let driver = FrameDriver::new(Duration::from_millis(16));
        let report = driver.run_until(&mut c, Duration::from_millis(100), |d| clock.advance(d));
        assert_eq!(report.frames, 6);
        assert_eq!(report.elapsed_ms, 96.0);
    }

    #[test]
    fn observer_sees_every_frame() {
        let (mut c, clock) = controller();
        c.start();
        let mut seen = Vec::new();
        let driver = FrameDriver::new(Duration::from_millis(50));
        driver.run_observed(&mut c, |d| clock.advance(d), |frame, outcome, ctl| {
            seen.push((frame, outcome.status, ctl.elapsed_time()));
        });
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[0], (1, SimulationStatus::Running, 50.0));
        assert_eq!(seen[5].1, SimulationStatus::Completed);
    }
}
