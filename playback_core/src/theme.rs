// Theme resolution: identifier -> static configuration bundle.
// Total lookup; unknown identifiers fall back to the cartoon theme.

use serde::{Deserialize, Serialize};

/// Known theme identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKey {
    Cartoon,
    Elegant,
    Minimal,
    Festive,
}

impl ThemeKey {
    pub const ALL: [ThemeKey; 4] = [
        ThemeKey::Cartoon,
        ThemeKey::Elegant,
        ThemeKey::Minimal,
        ThemeKey::Festive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeKey::Cartoon => "cartoon",
            ThemeKey::Elegant => "elegant",
            ThemeKey::Minimal => "minimal",
            ThemeKey::Festive => "festive",
        }
    }

    /// Exact, case-sensitive match on the trimmed identifier.
    pub fn parse(id: &str) -> Option<ThemeKey> {
        let id = id.trim();
        ThemeKey::ALL.into_iter().find(|k| k.as_str() == id)
    }
}

/// The seven theme colors as CSS hex strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeColors {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub text_muted: &'static str,
}

/// Resolved, immutable theme bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeConfig {
    pub key: ThemeKey,
    pub name: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    pub colors: ThemeColors,
    pub font: &'static str,
}

pub const DEFAULT_THEME: ThemeKey = ThemeKey::Cartoon;

static CARTOON: ThemeConfig = ThemeConfig {
    key: ThemeKey::Cartoon,
    name: "Cartoon",
    description: "Fun and playful with vibrant colors",
    emoji: "🎨",
    colors: ThemeColors {
        primary: "#FF6B6B",
        secondary: "#4ECDC4",
        accent: "#FFE66D",
        background: "#1a1a2e",
        surface: "#16213e",
        text: "#ffffff",
        text_muted: "#a0a0b8",
    },
    font: "Outfit",
};

static ELEGANT: ThemeConfig = ThemeConfig {
    key: ThemeKey::Elegant,
    name: "Elegant",
    description: "Sophisticated and refined",
    emoji: "✨",
    colors: ThemeColors {
        primary: "#C9A96E",
        secondary: "#8B7355",
        accent: "#F5E6CC",
        background: "#0D0D0D",
        surface: "#1A1A1A",
        text: "#F5F0EB",
        text_muted: "#A89B8C",
    },
    font: "Playfair Display",
};

static MINIMAL: ThemeConfig = ThemeConfig {
    key: ThemeKey::Minimal,
    name: "Minimal",
    description: "Clean and modern simplicity",
    emoji: "🤍",
    colors: ThemeColors {
        primary: "#6C63FF",
        secondary: "#3F3D56",
        accent: "#A8A5FF",
        background: "#0F0E17",
        surface: "#1A1929",
        text: "#FFFFFE",
        text_muted: "#94A1B2",
    },
    font: "Inter",
};

static FESTIVE: ThemeConfig = ThemeConfig {
    key: ThemeKey::Festive,
    name: "Festive",
    description: "Bright and celebratory vibes",
    emoji: "🎉",
    colors: ThemeColors {
        primary: "#FF4081",
        secondary: "#7C4DFF",
        accent: "#FFD740",
        background: "#120338",
        surface: "#1B0A4A",
        text: "#FFFFFF",
        text_muted: "#B0A0D0",
    },
    font: "Outfit",
};

/// Configuration for a known key.
pub fn config_for(key: ThemeKey) -> &'static ThemeConfig {
    match key {
        ThemeKey::Cartoon => &CARTOON,
        ThemeKey::Elegant => &ELEGANT,
        ThemeKey::Minimal => &MINIMAL,
        ThemeKey::Festive => &FESTIVE,
    }
}

/// Resolve any identifier. Never fails.
pub fn resolve(id: &str) -> &'static ThemeConfig {
    match ThemeKey::parse(id) {
        Some(key) => config_for(key),
        None => {
            log::debug!("unknown theme {:?}, using {}", id, DEFAULT_THEME.as_str());
            config_for(DEFAULT_THEME)
        }
    }
}
