#![forbid(unsafe_code)]

//! Headless simplay player.
//!
//! `simplay-demo play` drives a controller on a virtual clock, so a run is
//! deterministic and finishes as fast as the frames can be printed.

pub mod cli;
pub mod error;
pub mod fixture;
pub mod play;

pub use cli::{Cli, Commands, run, run_from_env};
pub use error::{DemoError, Result};
