#![forbid(unsafe_code)]

//! Errors raised while loading or validating a [`SimulationConfig`].
//!
//! [`SimulationConfig`]: crate::config::SimulationConfig

/// Errors from configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse or encode error.
    #[cfg(feature = "config")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// One message per rejected field.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl ConfigError {
    /// Validation messages, if this is a validation failure.
    pub fn validation_messages(&self) -> &[String] {
        match self {
            Self::Validation(messages) => messages,
            _ => &[],
        }
    }
}
