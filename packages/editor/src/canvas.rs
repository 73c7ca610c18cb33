//! # Canvas Renderer
//!
//! Projects an [`EditSession`] into an editable tree. The document part is
//! built from the same `mailcraft_render::layout` builders the preview
//! uses, then decorated:
//!
//! - hit targets (`data-mc-target`) on rows, columns, blocks, wrappers and
//!   positioned blocks
//! - a selection ring on the selected entity
//! - row toolbars, add-block buttons, width sliders
//! - drag handles on positioned blocks and a resize handle under wrappers
//! - a layer panel for the selected wrapper
//! - whichever chooser or confirmation dialog the session is waiting on

use mailcraft_render::layout::{column_cell, columns_table, positioned, primitive, row_shell, wrapper_frame};
use mailcraft_render::preview::template_root;
use mailcraft_render::{RenderOptions, VNode};
use mailcraft_schema::{BlockKind, ColumnsRow, PrimitiveBlock, Row, SelectedElement, WrapperRow};

use crate::events::{CanvasAction, Handle, HitTarget};
use crate::mutations::Direction;
use crate::selection::{DeleteTarget, InteractionMode};
use crate::session::EditSession;
use crate::widths::max_width;

pub const TARGET_ATTR: &str = "data-mc-target";
pub const HANDLE_ATTR: &str = "data-mc-handle";
pub const ACTION_ATTR: &str = "data-mc-action";

/// Emoji offered by the picker
pub const EMOJI_PALETTE: [&str; 12] = [
    "😀", "😍", "🎉", "🔥", "⭐", "❤️", "👍", "🎁", "🛒", "📣", "✅", "💡",
];

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasOptions {
    pub render: RenderOptions,
    /// CSS color of selection rings
    pub accent: String,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            accent: "#2563eb".to_string(),
        }
    }
}

/// Render the editable canvas for `session`
pub fn render_canvas(session: &EditSession, options: &CanvasOptions) -> VNode {
    let doc = session.document();
    let count = doc.rows.len();

    let canvas = Canvas { session, options };
    let rows: Vec<VNode> = doc
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| canvas.row(row, index, count))
        .collect();

    let mut root = template_root(&options.render)
        .with_class("mc-canvas")
        .with_attr(TARGET_ATTR, HitTarget::Canvas.to_string())
        .with_children(rows)
        .with_child(button("mc-add-row", "+ Add row", &CanvasAction::AddRow));

    if let Some(modal) = canvas.modal() {
        root = root.with_child(modal);
    }
    root
}

struct Canvas<'a> {
    session: &'a EditSession,
    options: &'a CanvasOptions,
}

impl Canvas<'_> {
    fn is_selected(&self, element: SelectedElement) -> bool {
        self.session.selection().is_selected(&element)
    }

    fn ring(&self, node: VNode, selected: bool) -> VNode {
        if !selected {
            return node;
        }
        node.with_class("mc-selected")
            .with_style("outline", format!("2px solid {}", self.options.accent))
            .with_style("outline-offset", "-2px")
    }

    fn row(&self, row: &Row, index: usize, count: usize) -> VNode {
        let row_id = row.id().to_string();
        let inner = match row {
            Row::Columns(columns) => self.columns(columns),
            Row::Wrapper(wrapper) => self.wrapper(wrapper),
        };

        let mut shell = row_shell(row)
            .with_class("mc-editable-row")
            .with_attr(TARGET_ATTR, HitTarget::Row { row_id: row_id.clone() }.to_string())
            .with_style("position", "relative")
            .with_child(row_toolbar(&row_id, index, count))
            .with_child(inner);

        if let Row::Wrapper(wrapper) = row {
            if self.session.selection().touches_wrapper(&wrapper.id) {
                shell = shell.with_child(self.layer_panel(wrapper));
            }
        }
        shell
    }

    fn columns(&self, row: &ColumnsRow) -> VNode {
        let count = row.columns.len();
        let cells = row
            .columns
            .iter()
            .map(|column| {
                let mut children: Vec<VNode> = column.blocks.iter().map(|b| self.block(row, &column.id, b)).collect();
                children.push(button(
                    "mc-add-block",
                    "+ Add block",
                    &CanvasAction::OpenBlockChooser {
                        row_id: row.id.clone(),
                        column_id: column.id.clone(),
                    },
                ));
                if count > 1 {
                    children.push(width_slider(row, &column.id, column.width, count));
                }

                let target = HitTarget::Column {
                    row_id: row.id.clone(),
                    column_id: column.id.clone(),
                };
                let selected = self.is_selected(SelectedElement::Column {
                    row_id: row.id.clone(),
                    column_id: column.id.clone(),
                });
                self.ring(column_cell(column, children).with_attr(TARGET_ATTR, target.to_string()), selected)
            })
            .collect();
        columns_table(row, cells)
    }

    fn block(&self, row: &ColumnsRow, column_id: &str, block: &PrimitiveBlock) -> VNode {
        let target = HitTarget::Block {
            row_id: row.id.clone(),
            column_id: column_id.to_string(),
            block_id: block.id.clone(),
        };
        let selected = self.is_selected(SelectedElement::Primitive {
            row_id: row.id.clone(),
            column_id: column_id.to_string(),
            block_id: block.id.clone(),
        });

        // placeholders for unknown types take no attributes; the hit box wraps them
        let mut hit = VNode::element("div")
            .with_class("mc-hit")
            .with_key(format!("{}:hit", block.id))
            .with_attr(TARGET_ATTR, target.to_string())
            .with_style("cursor", "pointer")
            .with_child(primitive(block, &self.options.render));

        if selected {
            let move_action = |direction| CanvasAction::MoveBlock {
                row_id: row.id.clone(),
                column_id: column_id.to_string(),
                block_id: block.id.clone(),
                direction,
            };
            hit = hit.with_child(
                VNode::element("div")
                    .with_class("mc-block-toolbar")
                    .with_child(button("mc-move-up", "↑", &move_action(Direction::Up)))
                    .with_child(button("mc-move-down", "↓", &move_action(Direction::Down)))
                    .with_child(button(
                        "mc-delete",
                        "Delete",
                        &CanvasAction::DeleteBlock {
                            row_id: row.id.clone(),
                            column_id: column_id.to_string(),
                            block_id: block.id.clone(),
                        },
                    )),
            );
        }
        self.ring(hit, selected)
    }

    fn wrapper(&self, row: &WrapperRow) -> VNode {
        let mut children: Vec<VNode> = row
            .blocks
            .iter()
            .enumerate()
            .map(|(index, block)| {
                let selected = self.is_selected(SelectedElement::WrapperPrimitive {
                    row_id: row.id.clone(),
                    block_id: block.id.clone(),
                });
                let target = HitTarget::Positioned {
                    row_id: row.id.clone(),
                    block_id: block.id.clone(),
                };
                let handle = Handle::Drag {
                    row_id: row.id.clone(),
                    block_id: block.id.clone(),
                };
                let node = positioned(block, index)
                    .with_attr(TARGET_ATTR, target.to_string())
                    .with_attr(HANDLE_ATTR, handle.to_string())
                    .with_style("cursor", "move");
                self.ring(node, selected)
            })
            .collect();

        if let Some((x, y)) = self.pending_point(&row.id) {
            children.push(
                VNode::element("div")
                    .with_class("mc-pending-marker")
                    .with_styles([
                        ("position", "absolute".to_string()),
                        ("left", format!("{}%", x)),
                        ("top", format!("{}%", y)),
                        ("width", "12px".to_string()),
                        ("height", "12px".to_string()),
                        ("border-radius", "50%".to_string()),
                        ("transform", "translate(-50%, -50%)".to_string()),
                        ("background", self.options.accent.clone()),
                    ]),
            );
        }

        children.push(
            VNode::element("div")
                .with_class("mc-resize-handle")
                .with_attr(HANDLE_ATTR, Handle::Resize { row_id: row.id.clone() }.to_string())
                .with_styles([
                    ("position", "absolute"),
                    ("left", "0"),
                    ("bottom", "0"),
                    ("width", "100%"),
                    ("height", "8px"),
                    ("cursor", "ns-resize"),
                ]),
        );

        let selected = self.is_selected(SelectedElement::Wrapper { row_id: row.id.clone() });
        let target = HitTarget::Wrapper { row_id: row.id.clone() };
        let frame = wrapper_frame(row, children).with_attr(TARGET_ATTR, target.to_string());
        self.ring(frame, selected)
    }

    fn pending_point(&self, row_id: &str) -> Option<(f64, f64)> {
        match self.session.mode() {
            InteractionMode::ChoosingWrapperAction { row_id: r, x, y }
            | InteractionMode::ChoosingWrapperBlock { row_id: r, x, y }
            | InteractionMode::PickingEmoji { row_id: r, x, y }
                if r == row_id =>
            {
                Some((*x, *y))
            }
            _ => None,
        }
    }

    /// Layers listed top-most first
    fn layer_panel(&self, row: &WrapperRow) -> VNode {
        let last = row.blocks.len().saturating_sub(1);
        let items = row.blocks.iter().enumerate().rev().map(|(index, block)| {
            let selected = self.is_selected(SelectedElement::WrapperPrimitive {
                row_id: row.id.clone(),
                block_id: block.id.clone(),
            });
            let reorder = |to_index| CanvasAction::ReorderLayer {
                row_id: row.id.clone(),
                block_id: block.id.clone(),
                to_index,
            };

            let mut raise = button("mc-layer-up", "↑", &reorder((index + 1).min(last)));
            if index == last {
                raise = raise.with_attr("disabled", "disabled");
            }
            let mut lower = button("mc-layer-down", "↓", &reorder(index.saturating_sub(1)));
            if index == 0 {
                lower = lower.with_attr("disabled", "disabled");
            }

            let rename = CanvasAction::RenameLayer {
                row_id: row.id.clone(),
                block_id: block.id.clone(),
                name: block.name.clone(),
            };
            let item = VNode::element("li")
                .with_class("mc-layer")
                .with_key(format!("{}:layer", block.id))
                .with_attr(
                    TARGET_ATTR,
                    HitTarget::Positioned {
                        row_id: row.id.clone(),
                        block_id: block.id.clone(),
                    }
                    .to_string(),
                )
                .with_child(
                    VNode::element("input")
                        .with_attr("type", "text")
                        .with_attr("value", block.name.as_str())
                        .with_attr("maxlength", mailcraft_schema::MAX_NAME_LEN.to_string())
                        .with_attr(ACTION_ATTR, rename.encode()),
                )
                .with_child(raise)
                .with_child(lower)
                .with_child(button(
                    "mc-delete",
                    "Delete",
                    &CanvasAction::DeletePositioned {
                        row_id: row.id.clone(),
                        block_id: block.id.clone(),
                    },
                ));
            if selected {
                item.with_class("mc-selected")
            } else {
                item
            }
        });

        VNode::element("ul")
            .with_class("mc-layer-panel")
            .with_key(format!("{}:layers", row.id))
            .with_children(items)
    }

    fn modal(&self) -> Option<VNode> {
        let (title, buttons): (String, Vec<VNode>) = match self.session.mode() {
            InteractionMode::Idle | InteractionMode::Continuous(_) => return None,

            InteractionMode::ChoosingColumnCount => {
                let mut buttons: Vec<VNode> = (1..=4)
                    .map(|count| {
                        let label = if count == 1 {
                            "1 column".to_string()
                        } else {
                            format!("{} columns", count)
                        };
                        button("mc-choice", &label, &CanvasAction::ChooseColumns { count })
                    })
                    .collect();
                buttons.push(button("mc-choice", "Free container", &CanvasAction::ChooseWrapperRow));
                ("Add row".to_string(), buttons)
            }

            InteractionMode::ChoosingBlockKind { .. } => {
                let buttons = BlockKind::ALL
                    .iter()
                    .map(|kind| {
                        button(
                            "mc-choice",
                            kind.as_str(),
                            &CanvasAction::ChooseBlock {
                                kind: kind.as_str().to_string(),
                            },
                        )
                    })
                    .collect();
                ("Add block".to_string(), buttons)
            }

            InteractionMode::ChoosingWrapperAction { .. } => (
                "Container".to_string(),
                vec![
                    button("mc-choice", "Edit container", &CanvasAction::EditContainer),
                    button("mc-choice", "Add block", &CanvasAction::AddToContainer),
                ],
            ),

            InteractionMode::ChoosingWrapperBlock { .. } => (
                "Add block".to_string(),
                vec![
                    button("mc-choice", "Heading", &CanvasAction::ChooseHeading),
                    button("mc-choice", "Emoji", &CanvasAction::ChooseEmoji),
                ],
            ),

            InteractionMode::PickingEmoji { .. } => {
                let buttons = EMOJI_PALETTE
                    .iter()
                    .map(|emoji| {
                        button(
                            "mc-emoji",
                            emoji,
                            &CanvasAction::PickEmoji {
                                emoji: emoji.to_string(),
                            },
                        )
                    })
                    .collect();
                ("Pick an emoji".to_string(), buttons)
            }

            InteractionMode::ConfirmingDelete(target) => {
                let what = match target {
                    DeleteTarget::Row { .. } => "this row",
                    DeleteTarget::Block { .. } | DeleteTarget::Positioned { .. } => "this block",
                };
                (
                    format!("Delete {}?", what),
                    vec![button("mc-danger", "Delete", &CanvasAction::ConfirmDelete)],
                )
            }
        };

        Some(
            VNode::element("div")
                .with_class("mc-modal")
                .with_key("modal")
                .with_attr("role", "dialog")
                .with_child(VNode::element("h3").with_child(VNode::text(title)))
                .with_child(VNode::element("div").with_class("mc-modal-choices").with_children(buttons))
                .with_child(button("mc-cancel", "Cancel", &CanvasAction::Cancel)),
        )
    }
}

fn button(class: &str, label: &str, action: &CanvasAction) -> VNode {
    VNode::element("button")
        .with_class(class)
        .with_attr("type", "button")
        .with_attr(ACTION_ATTR, action.encode())
        .with_child(VNode::text(label))
}

fn row_toolbar(row_id: &str, index: usize, count: usize) -> VNode {
    let move_action = |direction| CanvasAction::MoveRow {
        row_id: row_id.to_string(),
        direction,
    };

    let mut up = button("mc-move-up", "↑", &move_action(Direction::Up));
    if index == 0 {
        up = up.with_attr("disabled", "disabled");
    }
    let mut down = button("mc-move-down", "↓", &move_action(Direction::Down));
    if index + 1 >= count {
        down = down.with_attr("disabled", "disabled");
    }

    VNode::element("div")
        .with_class("mc-row-toolbar")
        .with_key(format!("{}:toolbar", row_id))
        .with_child(up)
        .with_child(down)
        .with_child(button(
            "mc-duplicate",
            "Duplicate",
            &CanvasAction::DuplicateRow {
                row_id: row_id.to_string(),
            },
        ))
        .with_child(button(
            "mc-delete",
            "Delete",
            &CanvasAction::DeleteRow {
                row_id: row_id.to_string(),
            },
        ))
}

fn width_slider(row: &ColumnsRow, column_id: &str, width: f64, count: usize) -> VNode {
    let action = CanvasAction::SetColumnWidth {
        row_id: row.id.clone(),
        column_id: column_id.to_string(),
        width,
    };
    VNode::element("input")
        .with_class("mc-width-slider")
        .with_attr("type", "range")
        .with_attr("min", mailcraft_schema::MIN_COLUMN_WIDTH.to_string())
        .with_attr("max", max_width(count).to_string())
        .with_attr("step", "1")
        .with_attr("value", width.to_string())
        .with_attr(ACTION_ATTR, action.encode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_canvas_has_add_row() {
        let session = EditSession::new("s");
        let tree = render_canvas(&session, &CanvasOptions::default());
        assert!(tree.has_class("mc-canvas"));
        assert_eq!(tree.count(|n| n.has_class("mc-add-row")), 1);
        assert_eq!(tree.count(|n| n.has_class("mc-modal")), 0);
    }

    #[test]
    fn test_boundary_move_buttons_disabled() {
        let mut session = EditSession::new("s");
        session.add_columns_row(1).unwrap();
        session.add_wrapper_row().unwrap();
        let tree = render_canvas(&session, &CanvasOptions::default());

        let disabled = |class: &str| {
            let mut states = Vec::new();
            tree.walk(&mut |n: &VNode| {
                if n.has_class(class) && n.tag() == Some("button") {
                    states.push(n.attr("disabled").is_some());
                }
            });
            states
        };
        // first row: up disabled; last row: down disabled
        assert_eq!(disabled("mc-move-up"), vec![true, false]);
        assert_eq!(disabled("mc-move-down"), vec![false, true]);
    }

    #[test]
    fn test_single_column_has_no_slider() {
        let mut session = EditSession::new("s");
        session.add_columns_row(1).unwrap();
        session.add_columns_row(3).unwrap();
        let tree = render_canvas(&session, &CanvasOptions::default());
        assert_eq!(tree.count(|n| n.has_class("mc-width-slider")), 3);
    }
}
