#![forbid(unsafe_code)]

//! Cursor, click ripple, and element highlight overlays.

use simplay_core::{Bounds, CursorInterpolator, Point, SimulationAction, SimulationState};

use crate::icon::CursorIcon;

/// Cursor as drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CursorView {
    pub position: Point,
    pub icon: CursorIcon,
    pub is_clicking: bool,
    pub is_typing: bool,
}

impl CursorView {
    /// Visible cursor for `state`, iconed after the current action.
    pub fn from_state(state: &SimulationState, current: Option<&SimulationAction>) -> Option<Self> {
        if !state.cursor.is_visible {
            return None;
        }
        Some(Self {
            position: state.cursor.position,
            icon: current.map(|a| CursorIcon::from(a.kind)).unwrap_or_default(),
            is_clicking: state.cursor.is_clicking,
            is_typing: state.cursor.is_typing,
        })
    }
}

/// Expanding ring under a press.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Ripple {
    pub center: Point,
    /// Grows from 0 to 1 across the press window.
    pub radius_fraction: f64,
    /// Fades from 1 to 0 across the press window.
    pub opacity: f64,
}

impl Ripple {
    /// Ripple for `action` at sequence time `t`, if a press is showing.
    pub fn at(
        interpolator: &CursorInterpolator,
        action: &SimulationAction,
        center: Point,
        t: f64,
    ) -> Option<Self> {
        let phase = interpolator.press_phase(action, t)?;
        Some(Self {
            center,
            radius_fraction: phase,
            opacity: 1.0 - phase,
        })
    }
}

/// Outline around the targeted element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HighlightBox {
    pub selector: String,
    pub bounds: Option<Bounds>,
}

impl HighlightBox {
    pub fn from_state(state: &SimulationState) -> Option<Self> {
        state.highlighted_element.as_ref().map(|el| Self {
            selector: el.selector.clone(),
            bounds: el.bounds,
        })
    }
}
