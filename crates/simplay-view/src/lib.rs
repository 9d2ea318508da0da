#![forbid(unsafe_code)]

//! View models for painting a simulator.
//!
//! # Role in simplay
//! `simplay-view` is the renderer contract. It reads a controller snapshot
//! and produces plain data: where the cursor is and which icon it shows, the
//! click ripple, the highlighted element, timeline rows, banners, and the
//! agent badge. Nothing here mutates playback state, and nothing here
//! depends on a particular drawing backend.
//!
//! # Feature flags
//! - `serde`: `Serialize` for [`ViewFrame`] and its parts.

pub mod badge;
pub mod banner;
pub mod frame;
pub mod icon;
pub mod overlay;
pub mod timeline;

pub use badge::{AgentBadge, AgentPersona, Rgb};
pub use banner::Banner;
pub use frame::{SimulatorView, ViewFrame, format_clock, status_title};
pub use icon::CursorIcon;
pub use overlay::{CursorView, HighlightBox, Ripple};
pub use timeline::{RowStatus, TimelineRow, timeline_rows};
