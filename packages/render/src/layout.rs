//! # Read Path
//!
//! Node builders for every row, column and block variant. The preview
//! renderer is just these builders composed; the editor canvas composes the
//! same builders and adds its affordances around them, so both views agree
//! on geometry, color and text layout.
//!
//! Every node that renders a document entity is keyed by that entity's id.

use chrono::{DateTime, Utc};
use mailcraft_schema::block::{
    ButtonPayload, EmojiPayload, GifPayload, HeadingPayload, ImagePayload, MediaStyle, RatingPayload,
    SeparatorPayload, Shape, ShapePayload, SwitchPayload, TextPayload, TimerPayload, YoutubePayload,
};
use mailcraft_schema::{
    Align, BlockContent, Column, ColumnsRow, PositionedBlock, PositionedContent, PrimitiveBlock, Row, WrapperRow,
};

use crate::css::{self, percent, px};
use crate::vdom::VNode;

pub const DEFAULT_CONTENT_WIDTH: f64 = 600.0;

/// Knobs for the read path
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Pixels
    pub content_width: f64,
    /// Reference time for countdown timers; without it timers show their
    /// target instead of a running countdown
    pub now: Option<DateTime<Utc>>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            content_width: DEFAULT_CONTENT_WIDTH,
            now: None,
        }
    }
}

/// Outer element of one row
pub fn row_shell(row: &Row) -> VNode {
    let kind = match row {
        Row::Columns(_) => "columns",
        Row::Wrapper(_) => "wrapper",
    };
    VNode::element("div")
        .with_class("mc-row")
        .with_attr("data-row-type", kind)
        .with_key(row.id())
        .with_style("width", "100%")
}

/// `<table><tr>cells</tr></table>` for a columns row
pub fn columns_table(row: &ColumnsRow, cells: Vec<VNode>) -> VNode {
    VNode::element("table")
        .with_attr("role", "presentation")
        .with_attr("width", "100%")
        .with_attr("cellpadding", "0")
        .with_attr("cellspacing", "0")
        .with_key(format!("{}:table", row.id))
        .with_styles([("border-collapse", "collapse"), ("table-layout", "fixed"), ("width", "100%")])
        .with_child(VNode::element("tr").with_children(cells))
}

pub fn column_cell(column: &Column, children: Vec<VNode>) -> VNode {
    VNode::element("td")
        .with_class("mc-column")
        .with_key(column.id.as_str())
        .with_attr("valign", "top")
        .with_attr("width", percent(column.width))
        .with_style("width", percent(column.width))
        .with_style("vertical-align", "top")
        .with_style("padding", "8px")
        .with_styles(css::container(&column.styles))
        .with_children(children)
}

pub fn wrapper_frame(row: &WrapperRow, children: Vec<VNode>) -> VNode {
    VNode::element("div")
        .with_class("mc-wrapper")
        .with_key(format!("{}:frame", row.id))
        .with_styles([
            ("position", "relative".to_string()),
            ("width", "100%".to_string()),
            ("height", px(row.height)),
            ("overflow", "hidden".to_string()),
        ])
        .with_styles(css::container(&row.styles))
        .with_children(children)
}

/// A positioned block; z-order follows `index` in the wrapper's list
pub fn positioned(block: &PositionedBlock, index: usize) -> VNode {
    let body = match &block.content {
        PositionedContent::EmojiInteractive { emoji, size } => VNode::element("span")
            .with_style("font-size", px(*size))
            .with_style("line-height", "1")
            .with_child(VNode::text(emoji.as_str())),
        PositionedContent::HeadingInteractive { text, styles } => VNode::element("div")
            .with_styles(css::text(styles))
            .with_style("white-space", "nowrap")
            .with_child(VNode::text(text.as_str())),
    };

    VNode::element("div")
        .with_class("mc-positioned")
        .with_class(&format!("mc-{}", block.kind().as_str()))
        .with_key(block.id.as_str())
        .with_attr("data-name", block.name.as_str())
        .with_styles([
            ("position", "absolute".to_string()),
            ("left", percent(block.x)),
            ("top", percent(block.y)),
            ("transform", css::positioned_transform(block.scale, block.rotate)),
            ("transform-origin", "center".to_string()),
            ("z-index", (index + 1).to_string()),
        ])
        .with_child(body)
}

/// A primitive block, or a visible placeholder for unknown types
pub fn primitive(block: &PrimitiveBlock, options: &RenderOptions) -> VNode {
    let body = match &block.content {
        BlockContent::Heading(p) => heading(p),
        BlockContent::Text(p) => text(p),
        BlockContent::Image(p) => image(p),
        BlockContent::Button(p) => button(p),
        BlockContent::Separator(p) => separator(p),
        BlockContent::Youtube(p) => youtube(p),
        BlockContent::Timer(p) => timer(p, options.now),
        BlockContent::EmojiStatic(p) => emoji(p),
        BlockContent::Rating(p) => rating(p),
        BlockContent::Switch(p) => switch(p),
        BlockContent::Shapes(p) => shape(p),
        BlockContent::Gif(p) => gif(p),
        BlockContent::Unsupported { kind, .. } => {
            return VNode::placeholder(kind.as_str(), Some(block.id.clone()));
        }
    };

    VNode::element("div")
        .with_class("mc-block")
        .with_class(&format!("mc-block-{}", block.type_name()))
        .with_key(block.id.as_str())
        .with_style("padding", "4px 0")
        .with_child(body)
}

/// Read-only rendering of a whole row
pub fn render_row(row: &Row, options: &RenderOptions) -> VNode {
    let inner = match row {
        Row::Columns(columns) => {
            let cells = columns
                .columns
                .iter()
                .map(|column| {
                    let blocks = column.blocks.iter().map(|b| primitive(b, options)).collect();
                    column_cell(column, blocks)
                })
                .collect();
            columns_table(columns, cells)
        }
        Row::Wrapper(wrapper) => {
            let blocks = wrapper
                .blocks
                .iter()
                .enumerate()
                .map(|(index, block)| positioned(block, index))
                .collect();
            wrapper_frame(wrapper, blocks)
        }
    };
    row_shell(row).with_child(inner)
}

fn aligned(align: Align) -> VNode {
    VNode::element("div").with_style("text-align", align.as_css())
}

fn heading(p: &HeadingPayload) -> VNode {
    VNode::element("h2")
        .with_styles(css::text(&p.styles))
        .with_style("line-height", "1.2")
        .with_child(VNode::text(p.text.as_str()))
}

fn text(p: &TextPayload) -> VNode {
    let mut children = Vec::new();
    for (i, line) in p.text.split('\n').enumerate() {
        if i > 0 {
            children.push(VNode::element("br"));
        }
        children.push(VNode::text(line));
    }
    VNode::element("p")
        .with_styles(css::text(&p.styles))
        .with_style("line-height", p.line_height.to_string())
        .with_children(children)
}

fn media_img(src: &str, alt: &str, styles: &MediaStyle) -> VNode {
    VNode::element("img")
        .with_attr("src", src)
        .with_attr("alt", alt)
        .with_styles([
            ("width", percent(styles.width)),
            ("max-width", "100%".to_string()),
            ("height", "auto".to_string()),
            ("display", "inline-block".to_string()),
            ("border", "0".to_string()),
            ("border-radius", px(styles.border_radius)),
        ])
}

fn image(p: &ImagePayload) -> VNode {
    let img = media_img(&p.src, &p.alt, &p.styles);
    let content = match &p.link {
        Some(href) => VNode::element("a").with_attr("href", href.as_str()).with_child(img),
        None => img,
    };
    aligned(p.styles.align).with_child(content)
}

fn gif(p: &GifPayload) -> VNode {
    aligned(p.styles.align).with_child(media_img(&p.src, &p.alt, &p.styles))
}

fn button(p: &ButtonPayload) -> VNode {
    let s = &p.styles;
    let link = VNode::element("a")
        .with_attr("href", p.url.as_str())
        .with_styles([
            ("display", if s.full_width { "block" } else { "inline-block" }.to_string()),
            ("background", s.background.clone()),
            ("color", s.color.clone()),
            ("font-size", px(s.font_size)),
            ("border-radius", px(s.border_radius)),
            ("padding", format!("{} {}", px(s.padding_y), px(s.padding_x))),
            ("text-decoration", "none".to_string()),
            ("font-family", "Arial, sans-serif".to_string()),
        ])
        .with_child(VNode::text(p.text.as_str()));
    aligned(s.align).with_child(link)
}

fn separator(p: &SeparatorPayload) -> VNode {
    let s = &p.styles;
    VNode::element("hr").with_styles([
        ("border", "none".to_string()),
        (
            "border-top",
            format!("{} {} {}", px(s.thickness), s.line_style.as_css(), s.color),
        ),
        ("width", percent(s.width)),
        ("margin", "12px auto".to_string()),
    ])
}

fn youtube(p: &YoutubePayload) -> VNode {
    let preview = match p.thumbnail_url() {
        Some(thumbnail) => media_img(&thumbnail, "Watch on YouTube", &p.styles),
        None => VNode::element("span")
            .with_style("color", "#6b7280")
            .with_child(VNode::text("Watch video")),
    };
    aligned(p.styles.align).with_child(
        VNode::element("a")
            .with_attr("href", p.url.as_str())
            .with_child(preview),
    )
}

fn timer(p: &TimerPayload, now: Option<DateTime<Utc>>) -> VNode {
    let s = &p.styles;
    let container = aligned(s.align).with_attr("data-target", p.target.to_rfc3339());

    let Some(now) = now else {
        return container.with_child(
            VNode::element("span")
                .with_styles([("color", s.background.clone()), ("font-size", px(s.font_size))])
                .with_child(VNode::text(format!("Ends {}", p.target.format("%Y-%m-%d %H:%M UTC")))),
        );
    };

    let (days, hours, minutes, seconds) = p.remaining_at(now);
    let units = [
        (days, &p.labels.days),
        (hours, &p.labels.hours),
        (minutes, &p.labels.minutes),
        (seconds, &p.labels.seconds),
    ];
    let cells = units.into_iter().map(|(value, label)| {
        VNode::element("td")
            .with_styles([
                ("background", s.background.clone()),
                ("color", s.color.clone()),
                ("padding", "8px 12px".to_string()),
                ("text-align", "center".to_string()),
            ])
            .with_child(
                VNode::element("div")
                    .with_style("font-size", px(s.font_size))
                    .with_child(VNode::text(format!("{:02}", value))),
            )
            .with_child(
                VNode::element("div")
                    .with_style("font-size", "11px")
                    .with_child(VNode::text(label.as_str())),
            )
    });

    container.with_child(
        VNode::element("table")
            .with_attr("role", "presentation")
            .with_style("display", "inline-table")
            .with_child(VNode::element("tr").with_children(cells)),
    )
}

fn emoji(p: &EmojiPayload) -> VNode {
    aligned(p.align).with_child(
        VNode::element("span")
            .with_style("font-size", px(p.size))
            .with_style("line-height", "1")
            .with_child(VNode::text(p.emoji.as_str())),
    )
}

fn rating(p: &RatingPayload) -> VNode {
    let s = &p.styles;
    let stars = (0..p.max).map(|i| {
        let color = if i < p.value { &s.color } else { &s.empty_color };
        VNode::element("span")
            .with_style("color", color.as_str())
            .with_child(VNode::text("★"))
    });
    aligned(s.align)
        .with_attr("aria-label", format!("{} out of {}", p.value.min(p.max), p.max))
        .with_style("font-size", px(s.size))
        .with_children(stars)
}

fn switch(p: &SwitchPayload) -> VNode {
    let s = &p.styles;
    let track_color = if p.checked { &s.on_color } else { &s.off_color };
    let knob_offset = if p.checked { "20px" } else { "2px" };
    let track = VNode::element("span")
        .with_attr("role", "switch")
        .with_attr("aria-checked", p.checked.to_string())
        .with_styles([
            ("display", "inline-block".to_string()),
            ("position", "relative".to_string()),
            ("width", "40px".to_string()),
            ("height", "22px".to_string()),
            ("border-radius", "11px".to_string()),
            ("background", track_color.clone()),
            ("vertical-align", "middle".to_string()),
        ])
        .with_child(VNode::element("span").with_styles([
            ("position", "absolute"),
            ("top", "2px"),
            ("left", knob_offset),
            ("width", "18px"),
            ("height", "18px"),
            ("border-radius", "50%"),
            ("background", "#ffffff"),
        ]));
    let label = VNode::element("span")
        .with_style("margin-left", "8px")
        .with_style("vertical-align", "middle")
        .with_child(VNode::text(p.label.as_str()));
    aligned(s.align).with_child(track).with_child(label)
}

fn shape(p: &ShapePayload) -> VNode {
    let s = &p.styles;
    let figure = match p.shape {
        Shape::Rectangle => VNode::element("div").with_styles([
            ("width", px(s.width)),
            ("height", px(s.height)),
            ("background", s.fill.clone()),
            ("border-radius", px(s.border_radius)),
        ]),
        Shape::Circle => VNode::element("div").with_styles([
            ("width", px(s.width)),
            ("height", px(s.height)),
            ("background", s.fill.clone()),
            ("border-radius", "50%".to_string()),
        ]),
        Shape::Triangle => VNode::element("div").with_styles([
            ("width", "0".to_string()),
            ("height", "0".to_string()),
            ("border-left", format!("{} solid transparent", px(s.width / 2.0))),
            ("border-right", format!("{} solid transparent", px(s.width / 2.0))),
            ("border-bottom", format!("{} solid {}", px(s.height), s.fill)),
        ]),
        Shape::Star => VNode::element("div")
            .with_styles([
                ("color", s.fill.clone()),
                ("font-size", px(s.height)),
                ("line-height", "1".to_string()),
            ])
            .with_child(VNode::text("★")),
    };
    aligned(s.align).with_child(figure.with_style("display", "inline-block"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use mailcraft_schema::{BlockKind, PositionedContent};

    #[test]
    fn test_every_kind_renders_keyed_node() {
        let options = RenderOptions::default();
        for kind in BlockKind::ALL {
            let block = PrimitiveBlock::new("b-1", kind);
            let node = primitive(&block, &options);
            assert_eq!(node.key(), Some("b-1"), "{}", kind);
            assert!(node.has_class(&format!("mc-block-{}", kind)));
        }
    }

    #[test]
    fn test_unknown_block_is_placeholder() {
        let block = PrimitiveBlock::with_content(
            "b-1",
            BlockContent::Unsupported {
                kind: "quantum-hologram".to_string(),
                payload: serde_json::Value::Null,
            },
        );
        let node = primitive(&block, &RenderOptions::default());
        assert!(matches!(node, VNode::Placeholder { ref kind, .. } if kind == "quantum-hologram"));
    }

    #[test]
    fn test_positioned_geometry() {
        let mut block = PositionedBlock::new("p-1", "Emoji-1", 25.0, 40.0, PositionedContent::emoji("🎉"));
        block.scale = 2.0;
        block.rotate = 15.0;
        let node = positioned(&block, 2);

        assert_eq!(node.style("left"), Some("25%"));
        assert_eq!(node.style("top"), Some("40%"));
        assert_eq!(node.style("z-index"), Some("3"));
        assert_eq!(
            node.style("transform"),
            Some("translate(-50%, -50%) scale(2) rotate(15deg)")
        );
    }

    #[test]
    fn test_text_line_breaks() {
        let mut block = PrimitiveBlock::new("b-1", BlockKind::Text);
        if let BlockContent::Text(p) = &mut block.content {
            p.text = "one\ntwo".to_string();
        }
        let node = primitive(&block, &RenderOptions::default());
        assert_eq!(node.count(|n| n.tag() == Some("br")), 1);
        assert_eq!(node.text_content(), "onetwo");
    }

    #[test]
    fn test_timer_countdown_with_reference_time() {
        let mut block = PrimitiveBlock::new("b-1", BlockKind::Timer);
        let now = Utc::now();
        if let BlockContent::Timer(p) = &mut block.content {
            p.target = now + Duration::days(2) + Duration::minutes(5);
        }

        let static_view = primitive(&block, &RenderOptions::default());
        assert!(static_view.text_content().starts_with("Ends "));

        let live = primitive(
            &block,
            &RenderOptions {
                now: Some(now),
                ..Default::default()
            },
        );
        assert!(live.text_content().starts_with("02Days00Hours05Minutes"));
    }

    #[test]
    fn test_rating_star_colors() {
        let block = PrimitiveBlock::new("b-1", BlockKind::Rating);
        let node = primitive(&block, &RenderOptions::default());
        let filled = node.count(|n| n.style("color") == Some("#f59e0b"));
        let empty = node.count(|n| n.style("color") == Some("#d1d5db"));
        assert_eq!((filled, empty), (4, 1));
    }
}
