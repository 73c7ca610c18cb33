//! Style payloads shared by containers and blocks.

use serde::{Deserialize, Serialize};

/// Horizontal alignment of a block inside its column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

impl Align {
    pub fn as_css(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// Text alignment (adds `justify` on top of [`Align`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

/// Typography shared by heading, text and interactive heading blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub color: String,
    pub font_family: String,
    /// Pixels
    pub font_size: f64,
    pub text_align: TextAlign,
    pub font_weight: String,
    pub font_style: String,
    pub text_decoration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

impl TextStyle {
    pub fn heading() -> Self {
        Self {
            color: "#111827".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            font_size: 28.0,
            text_align: TextAlign::Left,
            font_weight: "bold".to_string(),
            font_style: "normal".to_string(),
            text_decoration: "none".to_string(),
            highlight: None,
        }
    }

    pub fn body() -> Self {
        Self {
            color: "#374151".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            font_size: 16.0,
            text_align: TextAlign::Left,
            font_weight: "normal".to_string(),
            font_style: "normal".to_string(),
            text_decoration: "none".to_string(),
            highlight: None,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::body()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    #[default]
    Solid,
    Gradient,
}

/// Solid or two-stop gradient fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    pub color1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color2: Option<String>,
    /// CSS gradient direction, e.g. `to bottom` or `45deg`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

impl Background {
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            kind: BackgroundKind::Solid,
            color1: color.into(),
            color2: None,
            direction: None,
        }
    }

    pub fn gradient(from: impl Into<String>, to: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            kind: BackgroundKind::Gradient,
            color1: from.into(),
            color2: Some(to.into()),
            direction: Some(direction.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

impl ImageFit {
    pub fn as_css(&self) -> &'static str {
        match self {
            ImageFit::Cover => "cover",
            ImageFit::Contain => "contain",
            ImageFit::Fill => "100% 100%",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundImage {
    pub url: String,
    #[serde(default)]
    pub fit: ImageFit,
    /// Percent
    #[serde(default = "centered")]
    pub position_x: f64,
    /// Percent
    #[serde(default = "centered")]
    pub position_y: f64,
    #[serde(default = "unit_zoom")]
    pub zoom: f64,
}

fn centered() -> f64 {
    50.0
}

fn unit_zoom() -> f64 {
    1.0
}

impl BackgroundImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fit: ImageFit::Cover,
            position_x: centered(),
            position_y: centered(),
            zoom: unit_zoom(),
        }
    }
}

/// Styles of a column or wrapper.
///
/// `background_image` wins over `background` when rendered, but both are kept.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<BackgroundImage>,
}

impl ContainerStyle {
    /// Default style of a freshly added wrapper: translucent solid fill
    pub fn wrapper_default() -> Self {
        Self {
            border_radius: None,
            background: Some(Background::solid("rgba(229, 231, 235, 0.5)")),
            background_image: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_style_omits_empty_fields() {
        let json = serde_json::to_string(&ContainerStyle::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_background_uses_type_key() {
        let bg = Background::gradient("#fff", "#000", "to bottom");
        let value = serde_json::to_value(&bg).unwrap();
        assert_eq!(value["type"], "gradient");
        assert_eq!(value["color2"], "#000");
    }

    #[test]
    fn test_background_image_defaults() {
        let image: BackgroundImage = serde_json::from_str(r#"{"url":"https://x/y.png"}"#).unwrap();
        assert_eq!(image, BackgroundImage::new("https://x/y.png"));
    }
}
