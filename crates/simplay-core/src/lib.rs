#![forbid(unsafe_code)]

//! Core: action sequences, the playback clock, cursor interpolation, and the
//! simulation state machine.
//!
//! # Role in simplay
//! `simplay-core` is the deterministic heart of the playback engine. It does
//! no I/O and never reads a clock on its own: every operation that depends on
//! time receives the current wall time as an argument.
//!
//! # Primary responsibilities
//! - **ActionSequence**: validated, immutable list of timestamped actions.
//! - **PlaybackClock**: wall time → sequence time under a speed multiplier,
//!   re-anchored on every rate or position change.
//! - **CursorInterpolator**: eased cursor position and press/typing flags.
//! - **Simulation**: the `idle → loading → running ⇄ paused → completed`
//!   state machine, with `error` as the absorbing failure state.
//!
//! # How it fits in the system
//! `simplay-runtime` wraps a [`Simulation`] with a real [`TimeSource`],
//! preview loading, and logging. `simplay-view` turns the resulting
//! [`SimulationState`] into a paintable view model.

pub mod action;
pub mod clock;
pub mod cursor;
pub mod easing;
pub mod geometry;
pub mod sequence;
pub mod simulation;
pub mod state;

pub use action::{ActionId, ActionKind, ElementTarget, SimulationAction, UnknownActionKind};
#[cfg(any(test, feature = "test-helpers"))]
pub use clock::ManualTimeSource;
pub use clock::{PlaybackClock, SpeedBounds, SpeedRejected, SystemTimeSource, TimeSource};
pub use cursor::{CursorInterpolator, CursorState};
pub use easing::Easing;
pub use geometry::{Bounds, Point, Viewport};
pub use sequence::{ActionSequence, SequenceBuilder, SequenceError};
pub use simulation::{Refresh, Simulation};
pub use state::{SimulationState, SimulationStatus};
