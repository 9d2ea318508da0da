#![forbid(unsafe_code)]

//! Playback clock: wall time in, sequence time out.
//!
//! The clock keeps an anchor pair `(anchor_wall, anchor_sequence_ms)`. While
//! running, sequence time is
//!
//! ```text
//! anchor_sequence_ms + (now - anchor_wall) * speed
//! ```
//!
//! and while paused it is frozen at `anchor_sequence_ms`. Every operation
//! that changes rate or position first folds the time elapsed under the old
//! speed into the anchor, then moves the wall anchor to `now`. Playing `T1`
//! at `s1` and `T2` at `s2` therefore always lands on `T1*s1 + T2*s2`,
//! however many pause/resume or speed changes happen in between.
//!
//! # Invariants
//!
//! 1. Sequence time is always within `[0, limit_ms]`.
//! 2. A paused clock returns the same value for every `now`.
//! 3. `speed` is finite and within `[min_speed, max_speed]`.
//! 4. A wall time earlier than the anchor counts as zero elapsed.
//!
//! # Failure Modes
//!
//! - Non-finite or non-positive speed: rejected with [`SpeedRejected`],
//!   previous speed kept.
//! - Speed outside the bounds: clamped.

use web_time::Duration;

/// Default lower speed bound.
pub const DEFAULT_MIN_SPEED: f64 = 0.1;

/// Default upper speed bound.
pub const DEFAULT_MAX_SPEED: f64 = 16.0;

/// Source of monotonic wall time, measured from an arbitrary origin.
pub trait TimeSource {
    fn now(&self) -> Duration;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Wall time from the platform monotonic clock (works on wasm via `web-time`).
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: web_time::Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced wall time for deterministic tests.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// give another to a controller.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    nanos: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, d: Duration) {
        let nanos = u64::try_from(d.as_nanos()).unwrap_or(u64::MAX);
        self.nanos
            .fetch_add(nanos, std::sync::atomic::Ordering::SeqCst);
    }

    /// Move time forward by whole milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Jump to an absolute time (may go backwards).
    pub fn set(&self, d: Duration) {
        let nanos = u64::try_from(d.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.store(nanos, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl TimeSource for ManualTimeSource {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(std::sync::atomic::Ordering::SeqCst))
    }
}

/// Convert a wall-clock span to fractional milliseconds.
///
/// Exact for whole-millisecond spans.
#[inline]
pub fn wall_ms(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

/// A speed that was not finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("playback speed must be finite and positive, got {0}")]
pub struct SpeedRejected(pub f64);

/// Allowed speed range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedBounds {
    pub min: f64,
    pub max: f64,
}

impl SpeedBounds {
    /// Create bounds; a reversed or invalid range falls back to defaults.
    pub fn new(min: f64, max: f64) -> Self {
        if min.is_finite() && max.is_finite() && min > 0.0 && min <= max {
            Self { min, max }
        } else {
            Self::default()
        }
    }

    /// Validate and clamp a requested speed.
    pub fn apply(&self, speed: f64) -> Result<f64, SpeedRejected> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(SpeedRejected(speed));
        }
        Ok(speed.clamp(self.min, self.max))
    }
}

impl Default for SpeedBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_SPEED,
            max: DEFAULT_MAX_SPEED,
        }
    }
}

/// Maps wall time to sequence time under a mutable speed multiplier.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    anchor_wall: Duration,
    anchor_sequence_ms: f64,
    speed: f64,
    running: bool,
    limit_ms: f64,
    bounds: SpeedBounds,
}

impl PlaybackClock {
    /// Create a stopped clock at 0 that saturates at `limit_ms`.
    pub fn new(limit_ms: f64) -> Self {
        Self {
            anchor_wall: Duration::ZERO,
            anchor_sequence_ms: 0.0,
            speed: 1.0,
            running: false,
            limit_ms: sanitize_limit(limit_ms),
            bounds: SpeedBounds::default(),
        }
    }

    /// Set the allowed speed range (builder pattern).
    ///
    /// The current speed is re-clamped into the new range.
    #[must_use]
    pub fn with_bounds(mut self, bounds: SpeedBounds) -> Self {
        self.bounds = bounds;
        self.speed = self.speed.clamp(bounds.min, bounds.max);
        self
    }

    /// Set the initial speed (builder pattern). Invalid speeds are ignored.
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        if let Ok(speed) = self.bounds.apply(speed) {
            self.speed = speed;
        }
        self
    }

    /// Sequence time at wall time `now`, clamped to `[0, limit]`.
    pub fn sequence_time(&self, now: Duration) -> f64 {
        self.unclamped_time(now).clamp(0.0, self.limit_ms)
    }

    /// Sequence time at `now` without the upper clamp.
    ///
    /// Used to detect that playback has run past the end.
    pub fn unclamped_time(&self, now: Duration) -> f64 {
        if !self.running {
            return self.anchor_sequence_ms;
        }
        let dt = now.saturating_sub(self.anchor_wall);
        self.anchor_sequence_ms + wall_ms(dt) * self.speed
    }

    /// Fold elapsed time into the anchor and move the wall anchor to `now`.
    pub fn reanchor(&mut self, now: Duration) {
        if self.running {
            self.anchor_sequence_ms = self.sequence_time(now);
        }
        self.anchor_wall = now;
    }

    /// Reset to 0 and start running.
    pub fn start(&mut self, now: Duration) {
        self.anchor_sequence_ms = 0.0;
        self.anchor_wall = now;
        self.running = true;
    }

    /// Freeze at the current sequence time. No-op if already paused.
    pub fn pause(&mut self, now: Duration) {
        if !self.running {
            return;
        }
        self.reanchor(now);
        self.running = false;
    }

    /// Continue from the frozen position. No-op if already running.
    pub fn resume(&mut self, now: Duration) {
        if self.running {
            return;
        }
        self.anchor_wall = now;
        self.running = true;
    }

    /// Change speed without moving sequence time.
    ///
    /// Returns the applied (possibly clamped) speed.
    pub fn set_speed(&mut self, now: Duration, speed: f64) -> Result<f64, SpeedRejected> {
        let speed = self.bounds.apply(speed)?;
        self.reanchor(now);
        self.speed = speed;
        Ok(speed)
    }

    /// Jump to sequence time `t`, clamped to `[0, limit]`.
    ///
    /// Running state is preserved. Returns the clamped target.
    pub fn seek(&mut self, now: Duration, t: f64) -> f64 {
        let target = if t.is_nan() {
            0.0
        } else {
            t.clamp(0.0, self.limit_ms)
        };
        self.anchor_sequence_ms = target;
        self.anchor_wall = now;
        target
    }

    /// Stop and hold exactly at `t` (clamped).
    pub fn freeze_at(&mut self, t: f64) {
        self.anchor_sequence_ms = if t.is_nan() {
            0.0
        } else {
            t.clamp(0.0, self.limit_ms)
        };
        self.running = false;
    }

    /// Stop and return to 0. Speed is kept.
    pub fn reset(&mut self) {
        self.anchor_sequence_ms = 0.0;
        self.anchor_wall = Duration::ZERO;
        self.running = false;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[inline]
    pub fn limit_ms(&self) -> f64 {
        self.limit_ms
    }

    #[inline]
    pub fn bounds(&self) -> SpeedBounds {
        self.bounds
    }
}

fn sanitize_limit(limit_ms: f64) -> f64 {
    if limit_ms.is_finite() && limit_ms > 0.0 {
        limit_ms
    } else {
        0.0
    }
}
