#![forbid(unsafe_code)]

//! Observable simulation state.

use std::fmt;

use crate::action::ElementTarget;
use crate::cursor::CursorState;

/// Lifecycle status of a simulation.
///
/// ```text
/// Idle ──start──▶ Loading ──loaded/timeout──▶ Running ⇄ Paused
///   ▲                                           │
///   └────────────────stop (any)─────────────────┤
///                                               ▼
///                                   Completed / Error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SimulationStatus {
    /// Constructed or stopped; clock at 0.
    #[default]
    Idle,
    /// Waiting for the preview resource before the clock starts.
    Loading,
    /// Clock advancing.
    Running,
    /// Clock frozen, state retained.
    Paused,
    /// Clock at total duration.
    Completed,
    /// Unrecoverable failure; requires `stop` before `start`.
    Error,
}

impl SimulationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    /// Completed and Error only leave via `stop` or `start`.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Whether a frame callback should keep firing.
    pub const fn is_driving(self) -> bool {
        matches!(self, Self::Loading | Self::Running)
    }
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Full observable state, owned exclusively by the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub status: SimulationStatus,
    /// Action whose interval contains the current time; `None` before the
    /// first action starts and in gaps.
    pub current_action_index: Option<usize>,
    /// Next action to start, set while no action is current.
    pub pending_action_index: Option<usize>,
    pub cursor: CursorState,
    pub speed: f64,
    /// Percentage in `[0, 100]`.
    pub progress: f64,
    pub highlighted_element: Option<ElementTarget>,
    /// Human-readable cause when `status == Error`.
    pub error: Option<String>,
}

impl SimulationState {
    /// Fresh idle state.
    pub fn idle(cursor: CursorState, speed: f64) -> Self {
        Self {
            status: SimulationStatus::Idle,
            current_action_index: None,
            pending_action_index: None,
            cursor,
            speed,
            progress: 0.0,
            highlighted_element: None,
            error: None,
        }
    }

    /// Current action index with `-1` meaning "none".
    pub fn current_action_index_i64(&self) -> i64 {
        self.current_action_index
            .and_then(|i| i64::try_from(i).ok())
            .unwrap_or(-1)
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::idle(CursorState::default(), 1.0)
    }
}
