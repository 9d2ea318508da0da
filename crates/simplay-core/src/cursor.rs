#![forbid(unsafe_code)]

//! Synthetic cursor interpolation.
//!
//! Given a sequence and a sequence time, [`CursorInterpolator::resolve`]
//! produces the on-screen cursor position and its interaction flags. The
//! result depends only on `(sequence, t, status)`, never on frame history, so
//! seeking and speed changes cannot desynchronise the cursor.
//!
//! # Rules
//!
//! - Moving toward an action: eased interpolation from the last known
//!   position (or the origin) to the action's target across the action's
//!   duration.
//! - Between actions: the cursor rests at the last known position.
//! - Positionless actions (wait, navigate, ...) hold the last known position.
//! - Click presses last `click_window_ms` of *sequence* time, so they shrink
//!   under fast playback instead of outlasting the action. A double-click
//!   opens a second window after a gap of one window.

use crate::action::SimulationAction;
use crate::easing::Easing;
use crate::geometry::Point;
use crate::sequence::ActionSequence;
use crate::state::SimulationStatus;

/// Default press window for click ripples, in sequence milliseconds.
pub const DEFAULT_CLICK_WINDOW_MS: f64 = 150.0;

/// Derived cursor state. Never set directly by callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorState {
    pub position: Point,
    pub is_visible: bool,
    pub is_clicking: bool,
    pub is_typing: bool,
}

impl CursorState {
    /// Hidden cursor parked at `origin`.
    pub const fn hidden(origin: Point) -> Self {
        Self {
            position: origin,
            is_visible: false,
            is_clicking: false,
            is_typing: false,
        }
    }
}

impl Default for CursorState {
    fn default() -> Self {
        Self::hidden(Point::default())
    }
}

/// Computes cursor state from the sequence and sequence time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorInterpolator {
    origin: Point,
    click_window_ms: f64,
    easing: Easing,
}

impl CursorInterpolator {
    /// Interpolator resting at `origin` before the first positioned action.
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            click_window_ms: DEFAULT_CLICK_WINDOW_MS,
            easing: Easing::default(),
        }
    }

    /// Set the click press window (builder pattern). Non-positive or
    /// non-finite values keep the default.
    #[must_use]
    pub fn with_click_window(mut self, ms: f64) -> Self {
        if ms.is_finite() && ms > 0.0 {
            self.click_window_ms = ms;
        }
        self
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    #[inline]
    pub fn click_window_ms(&self) -> f64 {
        self.click_window_ms
    }

    #[inline]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Resolve the cursor at sequence time `t`.
    pub fn resolve(&self, sequence: &ActionSequence, t: f64, status: SimulationStatus) -> CursorState {
        let is_visible = status != SimulationStatus::Idle && t >= sequence.first_start_ms();

        if let Some(index) = sequence.active_index_at(t) {
            let Some(action) = sequence.get(index) else {
                return CursorState::hidden(self.origin);
            };
            let from = sequence.previous_position(index).unwrap_or(self.origin);
            let position = match action.position {
                Some(to) if to != from => from.lerp(to, self.easing.apply(action.fraction_at(t))),
                Some(to) => to,
                None => from,
            };
            return CursorState {
                position,
                is_visible,
                is_clicking: self.press_phase(action, t).is_some(),
                is_typing: action.kind.is_typing(),
            };
        }

        let position = match sequence.pending_index_at(t) {
            Some(pending) => sequence.previous_position(pending).unwrap_or(self.origin),
            None => self.settled_position(sequence, sequence.len().saturating_sub(1)),
        };
        CursorState {
            position,
            is_visible,
            is_clicking: false,
            is_typing: false,
        }
    }

    /// Where the cursor sits once action `index` has finished.
    fn settled_position(&self, sequence: &ActionSequence, index: usize) -> Point {
        sequence
            .get(index)
            .and_then(|a| a.position)
            .or_else(|| sequence.previous_position(index))
            .unwrap_or(self.origin)
    }

    /// Fraction `[0, 1)` through the current press window of a click-like
    /// action, or `None` when no press is showing at `t`.
    pub fn press_phase(&self, action: &SimulationAction, t: f64) -> Option<f64> {
        if !action.kind.is_click() || !action.contains(t) {
            return None;
        }
        let elapsed = t - action.start_ms;
        let window = self.click_window_ms;
        (0..action.kind.press_count()).find_map(|press| {
            let press_start = f64::from(press) * window * 2.0;
            let into = elapsed - press_start;
            (into >= 0.0 && into < window).then_some(into / window)
        })
    }
}

impl Default for CursorInterpolator {
    fn default() -> Self {
        Self::new(Point::default())
    }
}
