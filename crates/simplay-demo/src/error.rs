#![forbid(unsafe_code)]

use simplay::{ConfigError, SequenceError};

/// Errors surfaced by the demo CLI.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid sequence: {0}")]
    Sequence(#[from] SequenceError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Usage(String),
}

impl DemoError {
    /// Process exit code for this error.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Usage(_) => 2,
            Self::Json(_) | Self::Sequence(_) => 3,
            Self::Config(_) => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, DemoError>;
