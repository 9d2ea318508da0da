#![forbid(unsafe_code)]

//! Preview-surface loading state.
//!
//! The embedded preview of the target page loads independently of playback
//! and may never load at all (framing restrictions, slow hosts). The
//! [`PreviewTracker`] records what the surface last reported and when the
//! current wait began, so the controller can bound the `Loading` phase.
//!
//! A failed preview never stops playback on its own: it moves the tracker to
//! [`PreviewStatus::Fallback`] with a notice, and the cursor and narration
//! keep playing over a placeholder.

use web_time::Duration;

/// What the preview surface last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewStatus {
    /// No preview has been requested.
    #[default]
    NotRequested,
    /// Waiting for the surface to report.
    Pending,
    /// The surface loaded.
    Loaded,
    /// The surface failed or timed out; a placeholder is shown.
    Fallback,
}

impl PreviewStatus {
    /// The surface has reported (or been given up on).
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Loaded | Self::Fallback)
    }
}

/// Tracks one preview surface.
#[derive(Debug, Clone, Default)]
pub struct PreviewTracker {
    status: PreviewStatus,
    waiting_since: Option<Duration>,
    notice: Option<String>,
}

impl PreviewTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn status(&self) -> PreviewStatus {
        self.status
    }

    /// User-facing notice while in [`PreviewStatus::Fallback`].
    #[inline]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// When the current wait began.
    #[inline]
    pub fn waiting_since(&self) -> Option<Duration> {
        self.waiting_since
    }

    /// Begin (or restart) the wait at `now`. Settled surfaces are kept.
    pub fn begin(&mut self, now: Duration) {
        if self.status.is_settled() {
            return;
        }
        self.status = PreviewStatus::Pending;
        self.waiting_since = Some(now);
    }

    /// Record a successful load. Clears any earlier fallback notice.
    ///
    /// Returns `true` if the status changed.
    pub fn mark_loaded(&mut self) -> bool {
        if self.status == PreviewStatus::Loaded {
            return false;
        }
        self.status = PreviewStatus::Loaded;
        self.waiting_since = None;
        self.notice = None;
        true
    }

    /// Record a failure and switch to the placeholder.
    ///
    /// Returns `true` if the status changed.
    pub fn mark_failed(&mut self, reason: impl Into<String>) -> bool {
        let changed = self.status != PreviewStatus::Fallback;
        self.status = PreviewStatus::Fallback;
        self.waiting_since = None;
        self.notice = Some(reason.into());
        changed
    }

    /// Whether a pending wait has lasted at least `timeout` at `now`.
    pub fn timed_out(&self, now: Duration, timeout: Duration) -> bool {
        match (self.status, self.waiting_since) {
            (PreviewStatus::Pending, Some(since)) => now.saturating_sub(since) >= timeout,
            _ => false,
        }
    }
}
