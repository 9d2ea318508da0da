#![forbid(unsafe_code)]

//! Playback controller: one simulator instance bound to a time source.
//!
//! The [`PlaybackController`] wraps a [`Simulation`] and supplies the wall
//! time for every command from its [`TimeSource`]. It adds what the pure
//! state machine leaves out: preview loading with a bounded wait, the
//! configured speed limits and cursor behaviour, and structured logging of
//! every accepted transition.
//!
//! # Commands
//!
//! Every command is synchronous and returns `true` when it was accepted.
//! A command issued from a state that does not accept it is a no-op that
//! returns `false` and logs at `debug`. Nothing here panics or returns an
//! error at runtime: unrecoverable problems move the simulation to
//! [`SimulationStatus::Error`] with a message.
//!
//! # Driving
//!
//! Call [`tick`](PlaybackController::tick) once per rendered frame while
//! [`is_driving`](PlaybackController::is_driving) is true. `tick` only acts
//! in `Loading` (checking the preview timeout) and `Running` (advancing the
//! clock); in every other state it returns an unchanged outcome.
//!
//! # Logging
//!
//! Accepted transitions emit `info!` events with `sim_event` set to
//! `playback_start`, `playback_pause`, `playback_resume`, `playback_stop`,
//! `playback_seek`, `playback_speed`, or `playback_complete`; failures emit
//! `warn!` with `playback_error`. All events are recorded inside a
//! `simulation` span carrying the agent id.

use tracing::Span;

use simplay_core::{
    ActionSequence, SequenceError, Simulation, SimulationAction, SimulationState,
    SimulationStatus, SystemTimeSource, TimeSource,
};

use crate::config::SimulationConfig;
use crate::preview::{PreviewStatus, PreviewTracker};

/// Result of one frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Observable state changed; a renderer should repaint.
    pub changed: bool,
    /// Status after the tick.
    pub status: SimulationStatus,
}

/// One simulator instance driven by a wall-clock source.
#[derive(Debug)]
pub struct PlaybackController<T: TimeSource = SystemTimeSource> {
    sim: Simulation,
    source: T,
    preview: PreviewTracker,
    config: SimulationConfig,
    span: Span,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl PlaybackController<SystemTimeSource> {
    /// Controller on the system clock.
    pub fn new(config: SimulationConfig, sequence: ActionSequence) -> Self {
        Self::with_time_source(config, sequence, SystemTimeSource::new())
    }

    /// Validate raw actions and build a controller on the system clock.
    ///
    /// Malformed input fails here, before `start` can be called.
    pub fn from_actions(
        config: SimulationConfig,
        actions: Vec<SimulationAction>,
    ) -> Result<Self, SequenceError> {
        let sequence = ActionSequence::new(actions)?;
        Ok(Self::new(config, sequence))
    }
}

impl<T: TimeSource> PlaybackController<T> {
    /// Controller on an explicit time source.
    ///
    /// Starts immediately when `config.auto_start` is set.
    pub fn with_time_source(config: SimulationConfig, sequence: ActionSequence, source: T) -> Self {
        let policy = config.playback;
        let sim = Simulation::new(sequence)
            .with_interpolator(config.interpolator())
            .with_speed_bounds(policy.speed_bounds())
            .with_speed(policy.default_speed)
            .with_preview(policy.needs_preview);
        let span = tracing::info_span!(
            "simulation",
            agent_id = %config.agent_id,
            actions = sim.sequence().len(),
            total_ms = sim.total_duration_ms(),
        );
        let mut controller = Self {
            sim,
            source,
            preview: PreviewTracker::new(),
            config,
            span,
        };
        if controller.config.auto_start {
            controller.start();
        }
        controller
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

impl<T: TimeSource> PlaybackController<T> {
    /// Snapshot as of the last command or tick.
    #[inline]
    pub fn state(&self) -> &SimulationState {
        self.sim.state()
    }

    #[inline]
    pub fn status(&self) -> SimulationStatus {
        self.sim.status()
    }

    #[inline]
    pub fn sequence(&self) -> &ActionSequence {
        self.sim.sequence()
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Sequence time in ms; always `<= total_duration()`.
    #[inline]
    pub fn elapsed_time(&self) -> f64 {
        self.sim.elapsed_ms()
    }

    /// Total sequence duration in ms.
    #[inline]
    pub fn total_duration(&self) -> f64 {
        self.sim.total_duration_ms()
    }

    #[inline]
    pub fn preview(&self) -> &PreviewTracker {
        &self.preview
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.sim.state().speed
    }

    #[inline]
    pub fn time_source(&self) -> &T {
        &self.source
    }

    /// Whether a frame callback should be scheduled.
    #[inline]
    pub fn is_driving(&self) -> bool {
        self.sim.status().is_driving()
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

impl<T: TimeSource> PlaybackController<T> {
    /// Start from 0. Valid from `Idle` and `Completed`.
    ///
    /// Waits in `Loading` when the preview is required and has not yet
    /// reported; otherwise runs immediately.
    pub fn start(&mut self) -> bool {
        let span = self.span.clone();
        let _guard = span.enter();
        let now = self.source.now();
        let from = self.sim.status();
        if !self.sim.start(now) {
            self.rejected("start");
            return false;
        }
        if self.sim.status() == SimulationStatus::Loading {
            self.preview.begin(now);
            if self.preview.status().is_settled() {
                self.sim.finish_loading(now);
            }
        }
        tracing::info!(
            sim_event = "playback_start",
            from = %from,
            status = %self.sim.status(),
            speed = self.speed(),
            preview = ?self.preview.status(),
        );
        true
    }

    /// Freeze the clock. Valid only from `Running`.
    ///
    /// Once the clock has passed the end the run completes instead and this
    /// returns `false`.
    pub fn pause(&mut self) -> bool {
        let span = self.span.clone();
        let _guard = span.enter();
        let now = self.source.now();
        if !self.sim.pause(now) {
            if self.sim.status() == SimulationStatus::Completed {
                self.log_complete();
            } else {
                self.rejected("pause");
            }
            return false;
        }
        tracing::info!(
            sim_event = "playback_pause",
            elapsed_ms = self.elapsed_time(),
            action_index = self.state().current_action_index_i64(),
        );
        true
    }

    /// Continue from the frozen position. Valid only from `Paused`.
    pub fn resume(&mut self) -> bool {
        let span = self.span.clone();
        let _guard = span.enter();
        let now = self.source.now();
        if !self.sim.resume(now) {
            self.rejected("resume");
            return false;
        }
        tracing::info!(
            sim_event = "playback_resume",
            elapsed_ms = self.elapsed_time(),
            speed = self.speed(),
        );
        if self.sim.status() == SimulationStatus::Completed {
            self.log_complete();
        }
        true
    }

    /// Return to `Idle` from any state. Always accepted.
    ///
    /// The sequence, speed, and preview surface are kept.
    pub fn stop(&mut self) -> bool {
        let span = self.span.clone();
        let _guard = span.enter();
        let from = self.sim.status();
        let elapsed_ms = self.elapsed_time();
        self.sim.stop();
        tracing::info!(sim_event = "playback_stop", from = %from, elapsed_ms);
        true
    }

    /// Change the speed multiplier without moving sequence time.
    ///
    /// Non-finite or non-positive speeds are rejected; others are clamped
    /// to the configured range.
    pub fn set_speed(&mut self, speed: f64) -> bool {
        let span = self.span.clone();
        let _guard = span.enter();
        let now = self.source.now();
        let was_running = self.sim.status() == SimulationStatus::Running;
        match self.sim.set_speed(now, speed) {
            Ok(applied) => {
                if was_running && self.sim.status() == SimulationStatus::Completed {
                    self.log_complete();
                }
                tracing::info!(
                    sim_event = "playback_speed",
                    requested = speed,
                    speed = applied,
                    elapsed_ms = self.elapsed_time(),
                );
                true
            }
            Err(err) => {
                tracing::debug!(sim_event = "command_rejected", command = "set_speed", reason = %err);
                false
            }
        }
    }

    /// Jump to `ms` (clamped to `[0, total]`). Valid from `Running`,
    /// `Paused`, and `Completed`.
    pub fn seek_to(&mut self, ms: f64) -> bool {
        let span = self.span.clone();
        let _guard = span.enter();
        if ms.is_nan() {
            tracing::debug!(sim_event = "command_rejected", command = "seek", reason = "NaN target");
            return false;
        }
        let now = self.source.now();
        match self.sim.seek(now, ms) {
            Some(target) => {
                tracing::info!(
                    sim_event = "playback_seek",
                    requested_ms = ms,
                    elapsed_ms = target,
                    status = %self.sim.status(),
                    action_index = self.state().current_action_index_i64(),
                );
                if self.sim.status() == SimulationStatus::Completed {
                    self.log_complete();
                }
                true
            }
            None => {
                self.rejected("seek");
                false
            }
        }
    }

    /// `stop` followed by `start`.
    pub fn restart(&mut self) -> bool {
        self.stop();
        self.start()
    }

    /// Pause when running, resume when paused.
    pub fn toggle(&mut self) -> bool {
        match self.sim.status() {
            SimulationStatus::Running => self.pause(),
            SimulationStatus::Paused => self.resume(),
            _ => {
                let span = self.span.clone();
                let _guard = span.enter();
                self.rejected("toggle");
                false
            }
        }
    }

    /// Per-frame callback.
    pub fn tick(&mut self) -> TickOutcome {
        let span = self.span.clone();
        let _guard = span.enter();
        let now = self.source.now();
        let changed = match self.sim.status() {
            SimulationStatus::Loading => {
                let timeout = self.config.playback.preview_timeout();
                if self.preview.timed_out(now, timeout) {
                    let notice = format!(
                        "Preview did not load within {} ms",
                        self.config.playback.preview_timeout_ms
                    );
                    self.settle_preview_failure(now, notice);
                    true
                } else {
                    false
                }
            }
            SimulationStatus::Running => {
                let refresh = self.sim.tick(now);
                if refresh.completed {
                    self.log_complete();
                } else if self.sim.status() == SimulationStatus::Error {
                    self.log_error();
                }
                refresh.changed
            }
            _ => false,
        };
        TickOutcome {
            changed,
            status: self.sim.status(),
        }
    }
}

// ---------------------------------------------------------------------------
// Preview collaboration
// ---------------------------------------------------------------------------

impl<T: TimeSource> PlaybackController<T> {
    /// The preview surface reported a successful load.
    ///
    /// Ends a pending `Loading` wait. Returns `true` if anything changed.
    pub fn preview_loaded(&mut self) -> bool {
        let span = self.span.clone();
        let _guard = span.enter();
        let now = self.source.now();
        let changed = self.preview.mark_loaded();
        if changed {
            tracing::info!(sim_event = "preview_loaded", status = %self.sim.status());
        }
        if self.sim.finish_loading(now) {
            tracing::info!(
                sim_event = "playback_resume",
                reason = "preview_loaded",
                speed = self.speed(),
            );
            return true;
        }
        changed
    }

    /// The preview surface failed to load (e.g. framing was refused).
    ///
    /// Outside `Loading` this only switches to the placeholder and sets a
    /// notice; the simulation status is untouched. While `Loading` it ends
    /// the wait the same way a timeout does.
    pub fn preview_failed(&mut self, reason: impl Into<String>) -> bool {
        let span = self.span.clone();
        let _guard = span.enter();
        let now = self.source.now();
        let reason = reason.into();
        if self.sim.status() == SimulationStatus::Loading {
            self.settle_preview_failure(now, reason);
            return true;
        }
        let changed = self.preview.mark_failed(reason);
        tracing::warn!(
            sim_event = "preview_fallback",
            status = %self.sim.status(),
            notice = self.preview.notice().unwrap_or_default(),
        );
        changed
    }

    /// Leave `Loading` after the preview gave up: run over the placeholder,
    /// or fail when no placeholder is allowed.
    fn settle_preview_failure(&mut self, now: web_time::Duration, reason: String) {
        if self.config.playback.placeholder_fallback {
            self.preview.mark_failed(reason);
            tracing::warn!(
                sim_event = "preview_fallback",
                notice = self.preview.notice().unwrap_or_default(),
            );
            if self.sim.finish_loading(now) {
                tracing::info!(
                    sim_event = "playback_resume",
                    reason = "preview_fallback",
                    speed = self.speed(),
                );
            }
        } else {
            self.preview.mark_failed(reason.clone());
            self.sim.fail(now, reason);
            self.log_error();
        }
    }
}

// ---------------------------------------------------------------------------
// Logging helpers
// ---------------------------------------------------------------------------

impl<T: TimeSource> PlaybackController<T> {
    fn rejected(&self, command: &'static str) {
        tracing::debug!(
            sim_event = "command_rejected",
            command,
            status = %self.sim.status(),
        );
    }

    fn log_complete(&self) {
        tracing::info!(
            sim_event = "playback_complete",
            elapsed_ms = self.elapsed_time(),
            total_ms = self.total_duration(),
        );
    }

    fn log_error(&self) {
        tracing::warn!(
            sim_event = "playback_error",
            elapsed_ms = self.elapsed_time(),
            reason = self.state().error.as_deref().unwrap_or_default(),
        );
    }
}

impl<T: TimeSource> PlaybackController<T> {
    /// Whether the placeholder replaces the live preview.
    pub fn uses_placeholder(&self) -> bool {
        self.preview.status() == PreviewStatus::Fallback
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
