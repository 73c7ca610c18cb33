//! # Preview Renderer
//!
//! Pure function from a document to its read-only visual tree. No
//! selection, no history, no handlers: the same document always yields the
//! same tree.

use mailcraft_schema::{BlockContent, Document, Row};
use tracing::{debug, instrument, warn};

use crate::css::px;
use crate::layout::{self, RenderOptions};
use crate::vdom::VNode;

/// Render `doc` with default options
pub fn render(doc: &Document) -> VNode {
    render_with(doc, &RenderOptions::default())
}

#[instrument(skip_all, fields(rows = doc.rows.len()))]
pub fn render_with(doc: &Document, options: &RenderOptions) -> VNode {
    let unsupported = count_unsupported(doc);
    if unsupported > 0 {
        warn!(blocks = unsupported, "Rendering placeholders for unsupported blocks");
    }

    let rows: Vec<VNode> = doc.rows.iter().map(|row| layout::render_row(row, options)).collect();
    debug!(rows = rows.len(), "Preview render complete");

    template_root(options).with_children(rows)
}

/// Root container shared by preview and canvas
pub fn template_root(options: &RenderOptions) -> VNode {
    VNode::element("div")
        .with_class("mc-template")
        .with_styles([
            ("width", px(options.content_width)),
            ("max-width", "100%".to_string()),
            ("margin", "0 auto".to_string()),
            ("background", "#ffffff".to_string()),
        ])
}

fn count_unsupported(doc: &Document) -> usize {
    doc.rows
        .iter()
        .filter_map(Row::as_columns)
        .flat_map(|row| &row.columns)
        .flat_map(|column| &column.blocks)
        .filter(|block| matches!(block.content, BlockContent::Unsupported { .. }))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_schema::{BlockKind, Column, PrimitiveBlock};

    #[test]
    fn test_empty_document() {
        let tree = render(&Document::new());
        assert!(tree.has_class("mc-template"));
        assert!(tree.children().is_empty());
        assert_eq!(tree.style("width"), Some("600px"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut column = Column::new("c-1", 100.0);
        column.blocks.push(PrimitiveBlock::new("b-1", BlockKind::Button));
        let doc = Document {
            rows: vec![Row::columns("r-1", vec![column]), Row::wrapper("w-1")],
        };

        assert_eq!(render(&doc), render(&doc.clone()));
    }
}
