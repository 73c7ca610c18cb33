//! # Primitive Blocks
//!
//! Content units placed inside a column. On the wire a block is
//! `{ "id", "type", "payload" }`; in memory the `type` tag and the payload
//! shape are one enum variant, so they can never disagree.
//!
//! Blocks whose `type` is not known to this schema are kept as
//! [`BlockContent::Unsupported`] with their raw payload. They survive a
//! load/save round trip untouched and render as a visible placeholder.

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;
use crate::style::{Align, TextStyle};

/// The closed set of primitive block tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading,
    Text,
    Image,
    Button,
    Separator,
    Youtube,
    Timer,
    EmojiStatic,
    Rating,
    Switch,
    Shapes,
    Gif,
}

impl BlockKind {
    pub const ALL: [BlockKind; 12] = [
        BlockKind::Heading,
        BlockKind::Text,
        BlockKind::Image,
        BlockKind::Button,
        BlockKind::Separator,
        BlockKind::Youtube,
        BlockKind::Timer,
        BlockKind::EmojiStatic,
        BlockKind::Rating,
        BlockKind::Switch,
        BlockKind::Shapes,
        BlockKind::Gif,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Button => "button",
            BlockKind::Separator => "separator",
            BlockKind::Youtube => "youtube",
            BlockKind::Timer => "timer",
            BlockKind::EmojiStatic => "emoji-static",
            BlockKind::Rating => "rating",
            BlockKind::Switch => "switch",
            BlockKind::Shapes => "shapes",
            BlockKind::Gif => "gif",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingPayload {
    pub text: String,
    pub styles: TextStyle,
}

impl Default for HeadingPayload {
    fn default() -> Self {
        Self {
            text: "Your heading here".to_string(),
            styles: TextStyle::heading(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPayload {
    pub text: String,
    pub styles: TextStyle,
    #[serde(default = "default_line_height")]
    pub line_height: f64,
}

fn default_line_height() -> f64 {
    1.5
}

impl Default for TextPayload {
    fn default() -> Self {
        Self {
            text: "Write something your readers will enjoy.".to_string(),
            styles: TextStyle::body(),
            line_height: default_line_height(),
        }
    }
}

/// Sizing shared by image-like blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaStyle {
    /// Percent of the column width
    pub width: f64,
    pub align: Align,
    pub border_radius: f64,
}

impl Default for MediaStyle {
    fn default() -> Self {
        Self {
            width: 100.0,
            align: Align::Center,
            border_radius: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub src: String,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub styles: MediaStyle,
}

impl Default for ImagePayload {
    fn default() -> Self {
        Self {
            src: "https://placehold.co/600x300?text=Image".to_string(),
            alt: "Image".to_string(),
            link: None,
            styles: MediaStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GifPayload {
    pub src: String,
    pub alt: String,
    pub styles: MediaStyle,
}

impl Default for GifPayload {
    fn default() -> Self {
        Self {
            src: "https://media.giphy.com/media/ICOgUNjpvO0PC/giphy.gif".to_string(),
            alt: "Animated GIF".to_string(),
            styles: MediaStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonStyle {
    pub background: String,
    pub color: String,
    pub font_size: f64,
    pub border_radius: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub align: Align,
    #[serde(default)]
    pub full_width: bool,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            background: "#2563eb".to_string(),
            color: "#ffffff".to_string(),
            font_size: 16.0,
            border_radius: 6.0,
            padding_x: 24.0,
            padding_y: 12.0,
            align: Align::Center,
            full_width: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonPayload {
    pub text: String,
    pub url: String,
    pub styles: ButtonStyle,
}

impl Default for ButtonPayload {
    fn default() -> Self {
        Self {
            text: "Click here".to_string(),
            url: "https://example.com".to_string(),
            styles: ButtonStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    pub fn as_css(&self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::Dotted => "dotted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeparatorStyle {
    pub color: String,
    pub thickness: f64,
    pub line_style: LineStyle,
    /// Percent of the column width
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeparatorPayload {
    pub styles: SeparatorStyle,
}

impl Default for SeparatorPayload {
    fn default() -> Self {
        Self {
            styles: SeparatorStyle {
                color: "#d1d5db".to_string(),
                thickness: 1.0,
                line_style: LineStyle::Solid,
                width: 100.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YoutubePayload {
    pub url: String,
    pub styles: MediaStyle,
}

impl YoutubePayload {
    /// Extract the video id from watch, short and embed URLs
    pub fn video_id(&self) -> Option<&str> {
        let url = self.url.trim();
        let rest = if let Some(idx) = url.find("v=") {
            &url[idx + 2..]
        } else if let Some(idx) = url.find("youtu.be/") {
            &url[idx + "youtu.be/".len()..]
        } else if let Some(idx) = url.find("/embed/") {
            &url[idx + "/embed/".len()..]
        } else {
            return None;
        };

        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        let id = &rest[..end];
        (!id.is_empty()).then_some(id)
    }

    pub fn thumbnail_url(&self) -> Option<String> {
        self.video_id()
            .map(|id| format!("https://img.youtube.com/vi/{}/hqdefault.jpg", id))
    }
}

impl Default for YoutubePayload {
    fn default() -> Self {
        Self {
            url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            styles: MediaStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerLabels {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl Default for TimerLabels {
    fn default() -> Self {
        Self {
            days: "Days".to_string(),
            hours: "Hours".to_string(),
            minutes: "Minutes".to_string(),
            seconds: "Seconds".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStyle {
    pub color: String,
    pub background: String,
    pub font_size: f64,
    pub align: Align,
}

impl Default for TimerStyle {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_string(),
            background: "#111827".to_string(),
            font_size: 24.0,
            align: Align::Center,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerPayload {
    pub target: DateTime<Utc>,
    #[serde(default)]
    pub labels: TimerLabels,
    pub styles: TimerStyle,
}

impl TimerPayload {
    /// Remaining `(days, hours, minutes, seconds)` at `now`, saturating at zero
    pub fn remaining_at(&self, now: DateTime<Utc>) -> (i64, i64, i64, i64) {
        let total = (self.target - now).num_seconds().max(0);
        (total / 86_400, (total % 86_400) / 3_600, (total % 3_600) / 60, total % 60)
    }
}

impl Default for TimerPayload {
    fn default() -> Self {
        let next_week = Utc::now() + Duration::days(7);
        Self {
            target: next_week.duration_trunc(Duration::hours(1)).unwrap_or(next_week),
            labels: TimerLabels::default(),
            styles: TimerStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmojiPayload {
    pub emoji: String,
    /// Pixels
    pub size: f64,
    pub align: Align,
}

impl Default for EmojiPayload {
    fn default() -> Self {
        Self {
            emoji: "😀".to_string(),
            size: 48.0,
            align: Align::Center,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStyle {
    pub color: String,
    pub empty_color: String,
    pub size: f64,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingPayload {
    pub value: u8,
    pub max: u8,
    pub styles: RatingStyle,
}

impl Default for RatingPayload {
    fn default() -> Self {
        Self {
            value: 4,
            max: 5,
            styles: RatingStyle {
                color: "#f59e0b".to_string(),
                empty_color: "#d1d5db".to_string(),
                size: 24.0,
                align: Align::Center,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchStyle {
    pub on_color: String,
    pub off_color: String,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPayload {
    pub checked: bool,
    pub label: String,
    pub styles: SwitchStyle,
}

impl Default for SwitchPayload {
    fn default() -> Self {
        Self {
            checked: true,
            label: "Subscribed".to_string(),
            styles: SwitchStyle {
                on_color: "#10b981".to_string(),
                off_color: "#9ca3af".to_string(),
                align: Align::Center,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    Star,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub fill: String,
    /// Pixels
    pub width: f64,
    /// Pixels
    pub height: f64,
    pub align: Align,
    pub border_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapePayload {
    pub shape: Shape,
    pub styles: ShapeStyle,
}

impl Default for ShapePayload {
    fn default() -> Self {
        Self {
            shape: Shape::Rectangle,
            styles: ShapeStyle {
                fill: "#6366f1".to_string(),
                width: 120.0,
                height: 80.0,
                align: Align::Center,
                border_radius: 0.0,
            },
        }
    }
}

/// Per-type payload of a primitive block
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Heading(HeadingPayload),
    Text(TextPayload),
    Image(ImagePayload),
    Button(ButtonPayload),
    Separator(SeparatorPayload),
    Youtube(YoutubePayload),
    Timer(TimerPayload),
    EmojiStatic(EmojiPayload),
    Rating(RatingPayload),
    Switch(SwitchPayload),
    Shapes(ShapePayload),
    Gif(GifPayload),
    /// A `type` this schema does not know; kept verbatim
    Unsupported { kind: String, payload: Value },
}

impl BlockContent {
    /// Fully defaulted payload for `kind`
    pub fn default_for(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Heading => BlockContent::Heading(HeadingPayload::default()),
            BlockKind::Text => BlockContent::Text(TextPayload::default()),
            BlockKind::Image => BlockContent::Image(ImagePayload::default()),
            BlockKind::Button => BlockContent::Button(ButtonPayload::default()),
            BlockKind::Separator => BlockContent::Separator(SeparatorPayload::default()),
            BlockKind::Youtube => BlockContent::Youtube(YoutubePayload::default()),
            BlockKind::Timer => BlockContent::Timer(TimerPayload::default()),
            BlockKind::EmojiStatic => BlockContent::EmojiStatic(EmojiPayload::default()),
            BlockKind::Rating => BlockContent::Rating(RatingPayload::default()),
            BlockKind::Switch => BlockContent::Switch(SwitchPayload::default()),
            BlockKind::Shapes => BlockContent::Shapes(ShapePayload::default()),
            BlockKind::Gif => BlockContent::Gif(GifPayload::default()),
        }
    }

    /// `None` for unsupported content
    pub fn kind(&self) -> Option<BlockKind> {
        Some(match self {
            BlockContent::Heading(_) => BlockKind::Heading,
            BlockContent::Text(_) => BlockKind::Text,
            BlockContent::Image(_) => BlockKind::Image,
            BlockContent::Button(_) => BlockKind::Button,
            BlockContent::Separator(_) => BlockKind::Separator,
            BlockContent::Youtube(_) => BlockKind::Youtube,
            BlockContent::Timer(_) => BlockKind::Timer,
            BlockContent::EmojiStatic(_) => BlockKind::EmojiStatic,
            BlockContent::Rating(_) => BlockKind::Rating,
            BlockContent::Switch(_) => BlockKind::Switch,
            BlockContent::Shapes(_) => BlockKind::Shapes,
            BlockContent::Gif(_) => BlockKind::Gif,
            BlockContent::Unsupported { .. } => return None,
        })
    }

    /// The wire `type` tag
    pub fn type_name(&self) -> &str {
        match self {
            BlockContent::Unsupported { kind, .. } => kind,
            other => other.kind().map(|k| k.as_str()).unwrap_or_default(),
        }
    }

    fn from_wire(kind: &str, payload: Value) -> Result<Self, SchemaError> {
        let Some(known) = BlockKind::parse(kind) else {
            return Ok(BlockContent::Unsupported {
                kind: kind.to_string(),
                payload,
            });
        };

        let invalid = |e: serde_json::Error| SchemaError::invalid_payload(kind, e.to_string());
        Ok(match known {
            BlockKind::Heading => BlockContent::Heading(serde_json::from_value(payload).map_err(invalid)?),
            BlockKind::Text => BlockContent::Text(serde_json::from_value(payload).map_err(invalid)?),
            BlockKind::Image => BlockContent::Image(serde_json::from_value(payload).map_err(invalid)?),
            BlockKind::Button => BlockContent::Button(serde_json::from_value(payload).map_err(invalid)?),
            BlockKind::Separator => BlockContent::Separator(serde_json::from_value(payload).map_err(invalid)?),
            BlockKind::Youtube => BlockContent::Youtube(serde_json::from_value(payload).map_err(invalid)?),
            BlockKind::Timer => BlockContent::Timer(serde_json::from_value(payload).map_err(invalid)?),
            BlockKind::EmojiStatic => BlockContent::EmojiStatic(serde_json::from_value(payload).map_err(invalid)?),
            BlockKind::Rating => BlockContent::Rating(serde_json::from_value(payload).map_err(invalid)?),
            BlockKind::Switch => BlockContent::Switch(serde_json::from_value(payload).map_err(invalid)?),
            BlockKind::Shapes => BlockContent::Shapes(serde_json::from_value(payload).map_err(invalid)?),
            BlockKind::Gif => BlockContent::Gif(serde_json::from_value(payload).map_err(invalid)?),
        })
    }

    fn to_wire(&self) -> Value {
        let encoded = match self {
            BlockContent::Heading(p) => serde_json::to_value(p),
            BlockContent::Text(p) => serde_json::to_value(p),
            BlockContent::Image(p) => serde_json::to_value(p),
            BlockContent::Button(p) => serde_json::to_value(p),
            BlockContent::Separator(p) => serde_json::to_value(p),
            BlockContent::Youtube(p) => serde_json::to_value(p),
            BlockContent::Timer(p) => serde_json::to_value(p),
            BlockContent::EmojiStatic(p) => serde_json::to_value(p),
            BlockContent::Rating(p) => serde_json::to_value(p),
            BlockContent::Switch(p) => serde_json::to_value(p),
            BlockContent::Shapes(p) => serde_json::to_value(p),
            BlockContent::Gif(p) => serde_json::to_value(p),
            BlockContent::Unsupported { payload, .. } => return payload.clone(),
        };
        // Payloads are plain structs with string keys; encoding cannot fail.
        encoded.unwrap_or(Value::Null)
    }
}

/// A content block inside a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBlock", into = "RawBlock")]
pub struct PrimitiveBlock {
    pub id: String,
    pub content: BlockContent,
}

impl PrimitiveBlock {
    /// New block of `kind` with a fully defaulted payload
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            content: BlockContent::default_for(kind),
        }
    }

    pub fn with_content(id: impl Into<String>, content: BlockContent) -> Self {
        Self {
            id: id.into(),
            content,
        }
    }

    pub fn kind(&self) -> Option<BlockKind> {
        self.content.kind()
    }

    pub fn type_name(&self) -> &str {
        self.content.type_name()
    }

    /// Whether `other` carries the same `type` tag
    pub fn same_type(&self, other: &PrimitiveBlock) -> bool {
        self.type_name() == other.type_name()
    }
}

#[derive(Serialize, Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

impl TryFrom<RawBlock> for PrimitiveBlock {
    type Error = SchemaError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        Ok(Self {
            content: BlockContent::from_wire(&raw.kind, raw.payload)?,
            id: raw.id,
        })
    }
}

impl From<PrimitiveBlock> for RawBlock {
    fn from(block: PrimitiveBlock) -> Self {
        RawBlock {
            kind: block.type_name().to_string(),
            payload: block.content.to_wire(),
            id: block.id,
        }
    }
}
