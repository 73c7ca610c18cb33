//! Free-positioned blocks living inside a wrapper row.

use serde::{Deserialize, Serialize};

use crate::style::TextStyle;

/// Longest accepted positioned-block name
pub const MAX_NAME_LEN: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionedKind {
    EmojiInteractive,
    HeadingInteractive,
}

impl PositionedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionedKind::EmojiInteractive => "emoji-interactive",
            PositionedKind::HeadingInteractive => "heading-interactive",
        }
    }

    /// Prefix used when generating default names (`Emoji-1`, `Titulo-2`)
    pub fn name_prefix(&self) -> &'static str {
        match self {
            PositionedKind::EmojiInteractive => "Emoji",
            PositionedKind::HeadingInteractive => "Titulo",
        }
    }
}

/// Type-specific fields of a positioned block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PositionedContent {
    EmojiInteractive {
        emoji: String,
        /// Pixels before scaling
        size: f64,
    },
    HeadingInteractive {
        text: String,
        styles: TextStyle,
    },
}

impl PositionedContent {
    pub fn kind(&self) -> PositionedKind {
        match self {
            PositionedContent::EmojiInteractive { .. } => PositionedKind::EmojiInteractive,
            PositionedContent::HeadingInteractive { .. } => PositionedKind::HeadingInteractive,
        }
    }

    pub fn emoji(emoji: impl Into<String>) -> Self {
        PositionedContent::EmojiInteractive {
            emoji: emoji.into(),
            size: 48.0,
        }
    }

    pub fn heading() -> Self {
        PositionedContent::HeadingInteractive {
            text: "Titulo".to_string(),
            styles: TextStyle::heading(),
        }
    }
}

/// A block inside a wrapper, placed by the percentage position of its center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedBlock {
    pub id: String,
    /// Unique among the blocks of one wrapper
    pub name: String,
    /// Percent of wrapper width
    pub x: f64,
    /// Percent of wrapper height
    pub y: f64,
    #[serde(default = "unit_scale")]
    pub scale: f64,
    /// Degrees
    #[serde(default)]
    pub rotate: f64,
    #[serde(flatten)]
    pub content: PositionedContent,
}

fn unit_scale() -> f64 {
    1.0
}

impl PositionedBlock {
    pub fn new(id: impl Into<String>, name: impl Into<String>, x: f64, y: f64, content: PositionedContent) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            x: x.clamp(0.0, 100.0),
            y: y.clamp(0.0, 100.0),
            scale: unit_scale(),
            rotate: 0.0,
            content,
        }
    }

    pub fn kind(&self) -> PositionedKind {
        self.content.kind()
    }
}
