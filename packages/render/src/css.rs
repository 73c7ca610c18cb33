//! CSS declarations derived from schema styles.
//!
//! Both renderers take their geometry, color and typography from here.

use mailcraft_schema::style::{Background, BackgroundKind, ContainerStyle, TextStyle};

pub type Declarations = Vec<(&'static str, String)>;

pub fn px(value: f64) -> String {
    format!("{}px", value)
}

pub fn percent(value: f64) -> String {
    format!("{}%", value)
}

pub fn background_css(background: &Background) -> String {
    match (background.kind, &background.color2) {
        (BackgroundKind::Gradient, Some(to)) => format!(
            "linear-gradient({}, {}, {})",
            background.direction.as_deref().unwrap_or("to bottom"),
            background.color1,
            to
        ),
        _ => background.color1.clone(),
    }
}

/// Styles of a column or wrapper. A background image hides the fill.
pub fn container(styles: &ContainerStyle) -> Declarations {
    let mut out = Declarations::new();

    if let Some(radius) = styles.border_radius {
        out.push(("border-radius", px(radius)));
        out.push(("overflow", "hidden".to_string()));
    }

    if let Some(image) = &styles.background_image {
        out.push(("background-image", css_url(&image.url)));
        let size = if (image.zoom - 1.0).abs() > f64::EPSILON {
            percent(image.zoom * 100.0)
        } else {
            image.fit.as_css().to_string()
        };
        out.push(("background-size", size));
        out.push((
            "background-position",
            format!("{} {}", percent(image.position_x), percent(image.position_y)),
        ));
        out.push(("background-repeat", "no-repeat".to_string()));
    } else if let Some(background) = &styles.background {
        out.push(("background", background_css(background)));
    }

    out
}

pub fn text(styles: &TextStyle) -> Declarations {
    let mut out = vec![
        ("color", styles.color.clone()),
        ("font-family", styles.font_family.clone()),
        ("font-size", px(styles.font_size)),
        ("text-align", styles.text_align.as_css().to_string()),
        ("font-weight", styles.font_weight.clone()),
        ("font-style", styles.font_style.clone()),
        ("text-decoration", styles.text_decoration.clone()),
        ("margin", "0".to_string()),
    ];
    if let Some(highlight) = &styles.highlight {
        out.push(("background-color", highlight.clone()));
    }
    out
}

/// Transform that centers a positioned block on its (x, y) anchor
pub fn positioned_transform(scale: f64, rotate: f64) -> String {
    format!("translate(-50%, -50%) scale({}) rotate({}deg)", scale, rotate)
}

/// Quoted `url(...)` value; quotes, backslashes and line breaks in `url`
/// are escaped so it cannot end the string early
pub fn css_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len() + 7);
    out.push_str("url('");
    for c in url.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\a "),
            '\r' | '\u{c}' => {}
            c => out.push(c),
        }
    }
    out.push_str("')");
    out
}
