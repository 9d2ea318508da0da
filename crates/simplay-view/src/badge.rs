#![forbid(unsafe_code)]

//! Agent persona badges.
//!
//! The known demo agents form a closed [`AgentPersona`] enum; any other id
//! maps to [`AgentPersona::Generic`] rather than a silent default colour.

/// 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Known agent personas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AgentPersona {
    Explorer,
    Tester,
    Auditor,
    Accessibility,
    Performance,
    /// Any agent id not in the list above.
    Generic,
}

impl AgentPersona {
    /// Persona for an agent id (case-insensitive).
    pub fn from_agent_id(agent_id: &str) -> Self {
        match agent_id.trim().to_ascii_lowercase().as_str() {
            "explorer" => Self::Explorer,
            "tester" => Self::Tester,
            "auditor" => Self::Auditor,
            "accessibility" => Self::Accessibility,
            "performance" => Self::Performance,
            _ => Self::Generic,
        }
    }

    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Explorer => "🧭",
            Self::Tester => "🧪",
            Self::Auditor => "🛡",
            Self::Accessibility => "♿",
            Self::Performance => "⚡",
            Self::Generic => "🤖",
        }
    }

    pub const fn color(self) -> Rgb {
        match self {
            Self::Explorer => Rgb::new(0x25, 0x63, 0xeb),
            Self::Tester => Rgb::new(0x16, 0xa3, 0x4a),
            Self::Auditor => Rgb::new(0xdc, 0x26, 0x26),
            Self::Accessibility => Rgb::new(0x93, 0x33, 0xea),
            Self::Performance => Rgb::new(0xea, 0x58, 0x0c),
            Self::Generic => Rgb::new(0x6b, 0x72, 0x80),
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Explorer => "Explorer",
            Self::Tester => "Tester",
            Self::Auditor => "Auditor",
            Self::Accessibility => "Accessibility",
            Self::Performance => "Performance",
            Self::Generic => "Agent",
        }
    }
}

/// Badge shown next to the simulator title.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AgentBadge {
    pub persona: AgentPersona,
    pub name: String,
    pub emoji: &'static str,
    pub color: Rgb,
}

impl AgentBadge {
    /// Badge for an agent id, named after its persona.
    pub fn for_agent(agent_id: &str) -> Self {
        let persona = AgentPersona::from_agent_id(agent_id);
        Self {
            persona,
            name: persona.title().to_string(),
            emoji: persona.emoji(),
            color: persona.color(),
        }
    }

    /// Override the display name (builder pattern). Blank names are ignored.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        if !name.trim().is_empty() {
            self.name = name.trim().to_string();
        }
        self
    }
}
