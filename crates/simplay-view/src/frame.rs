#![forbid(unsafe_code)]

//! One paintable frame of the simulator.
//!
//! [`SimulatorView::build`] is a pure function of the controller's read
//! accessors: it never mutates playback state, so a renderer may call it as
//! often as it likes (typically once per `TickOutcome { changed: true }`).

use simplay_core::{ActionSequence, SimulationState, SimulationStatus, TimeSource};
use simplay_runtime::{PlaybackController, PreviewStatus, PreviewTracker, SimulationConfig};

use crate::badge::AgentBadge;
use crate::banner::Banner;
use crate::overlay::{CursorView, HighlightBox, Ripple};
use crate::timeline::{TimelineRow, timeline_rows};

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ViewFrame {
    pub status: SimulationStatus,
    pub status_label: &'static str,
    /// Whole percent, rounded down: `"48%"`.
    pub progress_label: String,
    /// `"0:01.2 / 0:02.5"`.
    pub elapsed_label: String,
    /// `"2x"`, `"0.5x"`.
    pub speed_label: String,
    pub target_url: String,
    /// The live preview is replaced by a placeholder.
    pub placeholder: bool,
    pub cursor: Option<CursorView>,
    pub ripple: Option<Ripple>,
    pub highlight: Option<HighlightBox>,
    pub timeline: Vec<TimelineRow>,
    pub banner: Option<Banner>,
    pub badge: AgentBadge,
}

/// Builds [`ViewFrame`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatorView;

impl SimulatorView {
    /// Frame for the given snapshot.
    pub fn build(
        state: &SimulationState,
        sequence: &ActionSequence,
        elapsed_ms: f64,
        preview: &PreviewTracker,
        config: &SimulationConfig,
    ) -> ViewFrame {
        let total_ms = sequence.total_duration_ms();
        let current = state.current_action_index.and_then(|i| sequence.get(i));
        let cursor = CursorView::from_state(state, current);
        let interpolator = config.interpolator();
        let ripple = match (current, cursor) {
            (Some(action), Some(cursor)) => Ripple::at(&interpolator, action, cursor.position, elapsed_ms),
            _ => None,
        };

        ViewFrame {
            status: state.status,
            status_label: status_title(state.status),
            progress_label: format!("{}%", state.progress.clamp(0.0, 100.0).floor() as u32),
            elapsed_label: format!("{} / {}", format_clock(elapsed_ms), format_clock(total_ms)),
            speed_label: format!("{}x", state.speed),
            target_url: config.target_url.clone(),
            placeholder: preview.status() == PreviewStatus::Fallback,
            cursor,
            ripple,
            highlight: HighlightBox::from_state(state),
            timeline: timeline_rows(state, sequence, elapsed_ms),
            banner: Banner::for_state(state, preview, sequence.len(), total_ms),
            badge: AgentBadge::for_agent(&config.agent_id).with_name(&config.agent_name),
        }
    }

    /// Frame for a controller's current snapshot.
    pub fn from_controller<T: TimeSource>(controller: &PlaybackController<T>) -> ViewFrame {
        Self::build(
            controller.state(),
            controller.sequence(),
            controller.elapsed_time(),
            controller.preview(),
            controller.config(),
        )
    }
}

/// Header label for a status.
pub const fn status_title(status: SimulationStatus) -> &'static str {
    match status {
        SimulationStatus::Idle => "Ready",
        SimulationStatus::Loading => "Loading preview",
        SimulationStatus::Running => "Playing",
        SimulationStatus::Paused => "Paused",
        SimulationStatus::Completed => "Completed",
        SimulationStatus::Error => "Error",
    }
}

/// Sequence milliseconds as `m:ss.d` (tenths truncated).
///
/// Negative and non-finite inputs render as `0:00.0`.
pub fn format_clock(ms: f64) -> String {
    let tenths = if ms.is_finite() && ms > 0.0 {
        (ms / 100.0).floor() as u64
    } else {
        0
    };
    let minutes = tenths / 600;
    let seconds = (tenths % 600) / 10;
    let tenth = tenths % 10;
    format!("{minutes}:{seconds:02}.{tenth}")
}
