#![forbid(unsafe_code)]

//! simplay public facade crate.
//!
//! Plays back a recorded (or generated) agent UI test session as a
//! time-controlled simulation: a cursor moving between targets, click
//! ripples, typing indicators, and a narrated timeline, under play, pause,
//! seek, and speed control.
//!
//! This crate re-exports the common types from the internal crates and
//! offers a prelude for day-to-day usage.
//!
//! ```rust,ignore
//! use simplay::prelude::*;
//!
//! let sequence = SequenceBuilder::new()
//!     .push(ActionKind::Navigate, 800.0, "Open the login page")
//!     .push(ActionKind::Click, 400.0, "Focus the email field")
//!     .at(640.0, 320.0)
//!     .build()?;
//! let mut controller = PlaybackController::new(SimulationConfig::default(), sequence);
//! controller.start();
//! // once per frame:
//! if controller.tick().changed {
//!     let frame = SimulatorView::from_controller(&controller);
//! }
//! ```

// --- Core re-exports -------------------------------------------------------

pub use simplay_core::{
    ActionId, ActionKind, ActionSequence, Bounds, CursorInterpolator, CursorState, Easing,
    ElementTarget, Point, SequenceBuilder, SequenceError, SimulationAction, SimulationState,
    SimulationStatus, SpeedBounds, SystemTimeSource, TimeSource, Viewport,
};
#[cfg(feature = "test-helpers")]
pub use simplay_core::ManualTimeSource;

// --- Runtime re-exports ----------------------------------------------------

pub use simplay_runtime::{
    ConfigError, DriveReport, FrameDriver, PlaybackController, PlaybackPolicy, PreviewStatus,
    PreviewTracker, SimulationConfig, TickOutcome,
};
#[cfg(feature = "tracing-subscriber")]
pub use simplay_runtime::{LogFormat, init_logging};

// --- View re-exports -------------------------------------------------------

#[cfg(feature = "view")]
pub use simplay_view::{
    AgentBadge, AgentPersona, Banner, CursorIcon, RowStatus, SimulatorView, TimelineRow, ViewFrame,
    format_clock,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for simplay setup.
///
/// Playback itself never fails with an error value; this covers building a
/// sequence and loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Standard result type for simplay setup APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Validate `config` and `actions` together and build a controller on the
/// system clock.
pub fn controller(
    config: SimulationConfig,
    actions: Vec<SimulationAction>,
) -> Result<PlaybackController> {
    let config = config.validated()?;
    Ok(PlaybackController::from_actions(config, actions)?)
}

// --- Prelude ---------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActionKind, ActionSequence, Error, FrameDriver, PlaybackController, Result,
        SequenceBuilder, SimulationAction, SimulationConfig, SimulationStatus,
    };

    #[cfg(feature = "view")]
    pub use crate::{SimulatorView, ViewFrame};

    pub use crate::{core, runtime};
    #[cfg(feature = "view")]
    pub use crate::view;
}

pub use simplay_core as core;
pub use simplay_runtime as runtime;
#[cfg(feature = "view")]
pub use simplay_view as view;
