#![forbid(unsafe_code)]

//! Cursor icon per action kind.

use simplay_core::ActionKind;

/// Icon drawn for the cursor and in timeline rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CursorIcon {
    #[default]
    Pointer,
    Hand,
    IBeam,
    Grab,
    Scroll,
    Globe,
    Hourglass,
    Camera,
}

impl CursorIcon {
    /// CSS `cursor` keyword closest to this icon.
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Pointer => "default",
            Self::Hand => "pointer",
            Self::IBeam => "text",
            Self::Grab => "grabbing",
            Self::Scroll => "all-scroll",
            Self::Globe => "default",
            Self::Hourglass => "wait",
            Self::Camera => "crosshair",
        }
    }

    /// Single-glyph rendering for text surfaces.
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Pointer => "➤",
            Self::Hand => "☝",
            Self::IBeam => "⌶",
            Self::Grab => "✊",
            Self::Scroll => "⇕",
            Self::Globe => "🌐",
            Self::Hourglass => "⌛",
            Self::Camera => "📷",
        }
    }
}

impl From<ActionKind> for CursorIcon {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Click | ActionKind::DoubleClick => Self::Hand,
            ActionKind::Hover => Self::Pointer,
            ActionKind::Type => Self::IBeam,
            ActionKind::Drag => Self::Grab,
            ActionKind::Scroll => Self::Scroll,
            ActionKind::Navigate => Self::Globe,
            ActionKind::Wait => Self::Hourglass,
            ActionKind::Screenshot => Self::Camera,
        }
    }
}
