#![forbid(unsafe_code)]

//! Runtime: playback controller, preview tracking, frame driving, and
//! configuration.
//!
//! # Role in simplay
//! `simplay-runtime` binds the deterministic [`simplay_core::Simulation`] to
//! a wall clock. It owns the pieces that touch the outside world: the time
//! source, the preview surface's loading state, configuration files, and
//! the log subscriber.
//!
//! # Primary responsibilities
//! - **PlaybackController**: the command surface (`start`, `pause`,
//!   `resume`, `stop`, `set_speed`, `seek_to`) plus the per-frame `tick`.
//! - **PreviewTracker**: bounded wait for the preview with placeholder
//!   fallback.
//! - **FrameDriver**: the cooperative frame loop, with an injectable sleep.
//! - **SimulationConfig**: policy-as-data loaded from TOML or JSON.
//!
//! # Feature flags
//! - `config`: TOML/JSON loading for [`SimulationConfig`].
//! - `tracing-subscriber`: [`logging::init_logging`].
//! - `test-helpers`: re-export [`ManualTimeSource`](simplay_core::ManualTimeSource).

pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
#[cfg(feature = "tracing-subscriber")]
pub mod logging;
pub mod preview;

pub use config::{PlaybackPolicy, SimulationConfig};
pub use controller::{PlaybackController, TickOutcome};
pub use driver::{DriveReport, FrameDriver};
pub use error::ConfigError;
#[cfg(feature = "tracing-subscriber")]
pub use logging::{LogFormat, init_logging};
pub use preview::{PreviewStatus, PreviewTracker};

#[cfg(feature = "test-helpers")]
pub use simplay_core::ManualTimeSource;
