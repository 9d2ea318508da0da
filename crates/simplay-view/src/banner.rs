#![forbid(unsafe_code)]

//! Status banners above the preview.

use simplay_core::{SimulationState, SimulationStatus};
use simplay_runtime::{PreviewStatus, PreviewTracker};

/// Message strip shown over the simulator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", content = "detail", rename_all = "kebab-case")
)]
pub enum Banner {
    /// Playback failed.
    Error(String),
    /// The preview is blocked; narration continues over a placeholder.
    PreviewFallback(String),
    /// Playback finished.
    Completed { actions: usize, total_ms: f64 },
}

impl Banner {
    /// Banner for the current state. An error outranks a preview notice,
    /// which outranks the completion summary.
    pub fn for_state(
        state: &SimulationState,
        preview: &PreviewTracker,
        actions: usize,
        total_ms: f64,
    ) -> Option<Self> {
        if state.status == SimulationStatus::Error {
            let message = state
                .error
                .clone()
                .unwrap_or_else(|| "Playback failed".to_string());
            return Some(Self::Error(message));
        }
        if preview.status() == PreviewStatus::Fallback {
            let notice = preview
                .notice()
                .unwrap_or("Live preview unavailable")
                .to_string();
            return Some(Self::PreviewFallback(notice));
        }
        (state.status == SimulationStatus::Completed)
            .then_some(Self::Completed { actions, total_ms })
    }

    /// One-line text rendering.
    pub fn text(&self) -> String {
        match self {
            Self::Error(message) => format!("Error: {message}"),
            Self::PreviewFallback(notice) => {
                format!("Live preview unavailable ({notice}); showing narration only")
            }
            Self::Completed { actions, total_ms } => format!(
                "Completed {actions} actions in {}",
                crate::frame::format_clock(*total_ms)
            ),
        }
    }
}
