#![forbid(unsafe_code)]

//! Discrete, timestamped UI actions.
//!
//! An [`ActionKind`] is a closed enumeration: every table keyed on it is an
//! exhaustive `match`, so adding a kind fails to compile until each mapping
//! handles it.

use std::fmt;
use std::str::FromStr;

use crate::geometry::{Bounds, Point};

/// The kind of UI step an action represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ActionKind {
    Click,
    DoubleClick,
    Hover,
    Type,
    Drag,
    Scroll,
    Navigate,
    Wait,
    Screenshot,
}

impl ActionKind {
    /// Every kind, in declaration order.
    pub const ALL: [ActionKind; 9] = [
        ActionKind::Click,
        ActionKind::DoubleClick,
        ActionKind::Hover,
        ActionKind::Type,
        ActionKind::Drag,
        ActionKind::Scroll,
        ActionKind::Navigate,
        ActionKind::Wait,
        ActionKind::Screenshot,
    ];

    /// Wire name (`"double-click"`, `"type"`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::DoubleClick => "double-click",
            Self::Hover => "hover",
            Self::Type => "type",
            Self::Drag => "drag",
            Self::Scroll => "scroll",
            Self::Navigate => "navigate",
            Self::Wait => "wait",
            Self::Screenshot => "screenshot",
        }
    }

    /// Human-readable label for timeline rows.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Click => "Click",
            Self::DoubleClick => "Double-click",
            Self::Hover => "Hover",
            Self::Type => "Type",
            Self::Drag => "Drag",
            Self::Scroll => "Scroll",
            Self::Navigate => "Navigate",
            Self::Wait => "Wait",
            Self::Screenshot => "Screenshot",
        }
    }

    /// Whether this kind normally targets a cursor position.
    pub const fn is_pointer(self) -> bool {
        match self {
            Self::Click | Self::DoubleClick | Self::Hover | Self::Type | Self::Drag => true,
            Self::Scroll | Self::Navigate | Self::Wait | Self::Screenshot => false,
        }
    }

    /// Click-like kinds produce a ripple at their start.
    pub const fn is_click(self) -> bool {
        match self {
            Self::Click | Self::DoubleClick => true,
            Self::Hover
            | Self::Type
            | Self::Drag
            | Self::Scroll
            | Self::Navigate
            | Self::Wait
            | Self::Screenshot => false,
        }
    }

    /// Number of press windows a click-like kind shows.
    pub const fn press_count(self) -> u8 {
        match self {
            Self::Click => 1,
            Self::DoubleClick => 2,
            Self::Hover
            | Self::Type
            | Self::Drag
            | Self::Scroll
            | Self::Navigate
            | Self::Wait
            | Self::Screenshot => 0,
        }
    }

    /// Typing indicator is shown for the whole action.
    pub const fn is_typing(self) -> bool {
        match self {
            Self::Type => true,
            Self::Click
            | Self::DoubleClick
            | Self::Hover
            | Self::Drag
            | Self::Scroll
            | Self::Navigate
            | Self::Wait
            | Self::Screenshot => false,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by [`ActionKind::from_str`] for names outside the enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action kind `{0}`")]
pub struct UnknownActionKind(pub String);

impl FromStr for ActionKind {
    type Err = UnknownActionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownActionKind(s.to_string()))
    }
}

/// Stable identifier of an action within its sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActionId(pub String);

impl ActionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// DOM target of an action, mirrored into the highlight overlay.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementTarget {
    pub selector: String,
    /// Optional on-screen box for the highlight; absent means "selector only".
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub bounds: Option<Bounds>,
}

impl ElementTarget {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            bounds: None,
        }
    }
}

/// One step of a simulated test run.
///
/// Times are sequence-relative milliseconds. Validation (non-negative, sorted,
/// unique ids) happens when actions are assembled into an
/// [`ActionSequence`](crate::sequence::ActionSequence).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SimulationAction {
    pub id: ActionId,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: ActionKind,
    #[cfg_attr(feature = "serde", serde(rename = "startTime"))]
    pub start_ms: f64,
    #[cfg_attr(feature = "serde", serde(rename = "duration"))]
    pub duration_ms: f64,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub position: Option<Point>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub element: Option<ElementTarget>,
    pub description: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub agent_thought: Option<String>,
}

impl SimulationAction {
    /// Create an action with no position, element, or thought.
    pub fn new(
        id: impl Into<ActionId>,
        kind: ActionKind,
        start_ms: f64,
        duration_ms: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            start_ms,
            duration_ms,
            position: None,
            element: None,
            description: description.into(),
            agent_thought: None,
        }
    }

    /// Set the cursor target (builder pattern).
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }

    /// Set the DOM target selector (builder pattern).
    #[must_use]
    pub fn on(mut self, selector: impl Into<String>) -> Self {
        self.element = Some(ElementTarget::new(selector));
        self
    }

    /// Attach a highlight box to the element target (builder pattern).
    ///
    /// Creates an element with an empty selector if none was set.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.element
            .get_or_insert_with(|| ElementTarget::new(String::new()))
            .bounds = Some(bounds);
        self
    }

    /// Set the agent's narration of why it takes this step (builder pattern).
    #[must_use]
    pub fn thinking(mut self, thought: impl Into<String>) -> Self {
        self.agent_thought = Some(thought.into());
        self
    }

    /// End of the action in sequence time.
    #[inline]
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    /// Whether sequence time `t` falls inside `[start, end)`.
    ///
    /// A zero-duration action contains exactly its start instant.
    #[inline]
    pub fn contains(&self, t: f64) -> bool {
        if self.duration_ms <= 0.0 {
            return t == self.start_ms;
        }
        t >= self.start_ms && t < self.end_ms()
    }

    /// Fraction of the action elapsed at `t`, clamped to `[0, 1]`.
    pub fn fraction_at(&self, t: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return if t >= self.start_ms { 1.0 } else { 0.0 };
        }
        ((t - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }
}
