#![forbid(unsafe_code)]

//! Simulation configuration as data.
//!
//! A [`SimulationConfig`] describes one simulator instance: the page under
//! test, the agent persona, the viewport, and the [`PlaybackPolicy`] knobs
//! that govern speed limits, click feedback, and preview loading. It can be
//! loaded from TOML or JSON when the `config` feature is enabled.
//!
//! # Loading
//!
//! ```toml
//! # simplay.toml
//! target_url = "https://shop.example/login"
//! agent_id = "tester"
//! agent_name = "Checkout Tester"
//!
//! [viewport]
//! width = 1440
//! height = 900
//!
//! [playback]
//! default_speed = 2.0
//! preview_timeout_ms = 3000
//! easing = "ease-out-cubic"
//! ```
//!
//! ```rust,ignore
//! let config = SimulationConfig::from_toml_file("simplay.toml")?;
//! let config = SimulationConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! Every field has a default, so a partial file only overrides what it
//! names and `SimulationConfig::default()` is a valid configuration.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

use simplay_core::clock::{DEFAULT_MAX_SPEED, DEFAULT_MIN_SPEED};
use simplay_core::cursor::DEFAULT_CLICK_WINDOW_MS;
use simplay_core::{CursorInterpolator, Easing, SpeedBounds, Viewport};

use crate::error::ConfigError;

/// Default wait for the preview before falling back.
pub const DEFAULT_PREVIEW_TIMEOUT_MS: u64 = 5_000;

/// Default frame interval (~60 fps).
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

// ---------------------------------------------------------------------------
// SimulationConfig
// ---------------------------------------------------------------------------

/// Configuration for one simulator instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SimulationConfig {
    /// Page the agent is exercising; shown in the preview frame.
    pub target_url: String,
    /// Stable agent identifier, used to pick the persona badge.
    pub agent_id: String,
    /// Human-readable agent name.
    pub agent_name: String,
    /// Coordinate space of action positions.
    pub viewport: Viewport,
    /// Start playback as soon as the controller is constructed.
    pub auto_start: bool,
    /// Playback tuning.
    pub playback: PlaybackPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            target_url: "about:blank".into(),
            agent_id: "explorer".into(),
            agent_name: "Explorer".into(),
            viewport: Viewport::default(),
            auto_start: false,
            playback: PlaybackPolicy::default(),
        }
    }
}

impl SimulationConfig {
    /// Builder: set the agent identity.
    #[must_use]
    pub fn with_agent(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.agent_id = id.into();
        self.agent_name = name.into();
        self
    }

    /// Builder: set the target page.
    #[must_use]
    pub fn with_target_url(mut self, url: impl Into<String>) -> Self {
        self.target_url = url.into();
        self
    }

    /// Builder: replace the playback policy.
    #[must_use]
    pub fn with_playback(mut self, playback: PlaybackPolicy) -> Self {
        self.playback = playback;
        self
    }

    /// Builder: start on construction.
    #[must_use]
    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    /// Cursor interpolator resting at the viewport centre.
    pub fn interpolator(&self) -> CursorInterpolator {
        CursorInterpolator::new(self.viewport.center())
            .with_click_window(self.playback.click_window_ms)
            .with_easing(self.playback.easing)
    }

    /// Validate all fields. Returns one message per problem; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.agent_id.trim().is_empty() {
            errors.push("agent_id must not be empty".into());
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            errors.push(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width, self.viewport.height
            ));
        }
        errors.extend(self.playback.validate());
        errors
    }

    /// Return `self` if valid, otherwise every validation message.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

#[cfg(feature = "config")]
impl SimulationConfig {
    /// Parse from a TOML string and validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file and validate.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse from a JSON string and validate.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file and validate.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Pretty JSON rendering, for `--dump-config` style output.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// PlaybackPolicy
// ---------------------------------------------------------------------------

/// Playback tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PlaybackPolicy {
    /// Speed at construction. Default: 1.0.
    pub default_speed: f64,
    /// Lower speed clamp. Default: 0.1.
    pub min_speed: f64,
    /// Upper speed clamp. Default: 16.0.
    pub max_speed: f64,
    /// Length of one press phase in sequence ms. Default: 150.
    pub click_window_ms: f64,
    /// Wall time to wait in `Loading` before giving up. Default: 5000.
    pub preview_timeout_ms: u64,
    /// On preview timeout, keep playing over a placeholder instead of failing.
    pub placeholder_fallback: bool,
    /// Whether `start` waits in `Loading` for the preview.
    pub needs_preview: bool,
    /// Cursor easing curve.
    pub easing: Easing,
    /// Frame driver interval. Default: 16.
    pub frame_interval_ms: u64,
}

impl Default for PlaybackPolicy {
    fn default() -> Self {
        Self {
            default_speed: 1.0,
            min_speed: DEFAULT_MIN_SPEED,
            max_speed: DEFAULT_MAX_SPEED,
            click_window_ms: DEFAULT_CLICK_WINDOW_MS,
            preview_timeout_ms: DEFAULT_PREVIEW_TIMEOUT_MS,
            placeholder_fallback: true,
            needs_preview: true,
            easing: Easing::default(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

impl PlaybackPolicy {
    /// Speed clamp range.
    pub fn speed_bounds(&self) -> SpeedBounds {
        SpeedBounds::new(self.min_speed, self.max_speed)
    }

    pub fn preview_timeout(&self) -> Duration {
        Duration::from_millis(self.preview_timeout_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Validate all fields. Returns one message per problem.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let bounds_ok = self.min_speed.is_finite()
            && self.max_speed.is_finite()
            && self.min_speed > 0.0
            && self.min_speed <= self.max_speed;
        if !bounds_ok {
            errors.push(format!(
                "playback.min_speed/max_speed must satisfy 0 < min <= max, got {}..{}",
                self.min_speed, self.max_speed
            ));
        }
        if !self.default_speed.is_finite() || self.default_speed <= 0.0 {
            errors.push(format!(
                "playback.default_speed must be finite and positive, got {}",
                self.default_speed
            ));
        } else if bounds_ok
            && !(self.min_speed..=self.max_speed).contains(&self.default_speed)
        {
            errors.push(format!(
                "playback.default_speed {} outside {}..={}",
                self.default_speed, self.min_speed, self.max_speed
            ));
        }
        if !self.click_window_ms.is_finite() || self.click_window_ms <= 0.0 {
            errors.push(format!(
                "playback.click_window_ms must be finite and positive, got {}",
                self.click_window_ms
            ));
        }
        if self.preview_timeout_ms == 0 {
            errors.push("playback.preview_timeout_ms must be > 0".into());
        }
        if self.frame_interval_ms == 0 {
            errors.push("playback.frame_interval_ms must be > 0".into());
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
