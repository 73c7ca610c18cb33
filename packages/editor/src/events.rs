//! Host events and the single update function that applies them.
//!
//! The canvas tags every interactive node with `data-mc-target`,
//! `data-mc-handle` or `data-mc-action`. A host parses the attribute of the
//! node under the pointer back into a [`HitTarget`], [`Handle`] or
//! [`CanvasAction`] and hands the resulting [`CanvasEvent`] to
//! [`EditSession::dispatch`].

use std::fmt;
use std::str::FromStr;

use mailcraft_schema::{BlockKind, PositionedKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{Point, Rect};
use crate::mutations::{Direction, Mutation};
use crate::selection::DeleteTarget;
use crate::session::EditSession;
use crate::EditorError;

/// Clickable surface, encoded in `data-mc-target`
///
/// Ids are joined with `/`, so ids must not contain it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum HitTarget {
    /// Background outside every row
    Canvas,
    Row {
        row_id: String,
    },
    Column {
        row_id: String,
        column_id: String,
    },
    Block {
        row_id: String,
        column_id: String,
        block_id: String,
    },
    Wrapper {
        row_id: String,
    },
    Positioned {
        row_id: String,
        block_id: String,
    },
}

impl fmt::Display for HitTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HitTarget::Canvas => write!(f, "canvas"),
            HitTarget::Row { row_id } => write!(f, "row:{}", row_id),
            HitTarget::Column { row_id, column_id } => write!(f, "column:{}/{}", row_id, column_id),
            HitTarget::Block {
                row_id,
                column_id,
                block_id,
            } => write!(f, "block:{}/{}/{}", row_id, column_id, block_id),
            HitTarget::Wrapper { row_id } => write!(f, "wrapper:{}", row_id),
            HitTarget::Positioned { row_id, block_id } => write!(f, "positioned:{}/{}", row_id, block_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTargetError(pub String);

impl fmt::Display for ParseTargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized canvas target {:?}", self.0)
    }
}

impl std::error::Error for ParseTargetError {}

impl FromStr for HitTarget {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "canvas" {
            return Ok(HitTarget::Canvas);
        }
        let err = || ParseTargetError(s.to_string());
        let (kind, rest) = s.split_once(':').ok_or_else(err)?;
        let ids: Vec<String> = rest.split('/').map(str::to_string).collect();
        if ids.iter().any(String::is_empty) {
            return Err(err());
        }

        match (kind, ids.as_slice()) {
            ("row", [row_id]) => Ok(HitTarget::Row { row_id: row_id.clone() }),
            ("column", [row_id, column_id]) => Ok(HitTarget::Column {
                row_id: row_id.clone(),
                column_id: column_id.clone(),
            }),
            ("block", [row_id, column_id, block_id]) => Ok(HitTarget::Block {
                row_id: row_id.clone(),
                column_id: column_id.clone(),
                block_id: block_id.clone(),
            }),
            ("wrapper", [row_id]) => Ok(HitTarget::Wrapper { row_id: row_id.clone() }),
            ("positioned", [row_id, block_id]) => Ok(HitTarget::Positioned {
                row_id: row_id.clone(),
                block_id: block_id.clone(),
            }),
            _ => Err(err()),
        }
    }
}

/// Draggable handle, encoded in `data-mc-handle`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Handle {
    Drag { row_id: String, block_id: String },
    Resize { row_id: String },
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::Drag { row_id, block_id } => write!(f, "drag:{}/{}", row_id, block_id),
            Handle::Resize { row_id } => write!(f, "resize:{}", row_id),
        }
    }
}

impl FromStr for Handle {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTargetError(s.to_string());
        match s.split_once(':').ok_or_else(err)? {
            ("drag", rest) => {
                let (row_id, block_id) = rest.split_once('/').ok_or_else(err)?;
                Ok(Handle::Drag {
                    row_id: row_id.to_string(),
                    block_id: block_id.to_string(),
                })
            }
            ("resize", row_id) if !row_id.is_empty() => Ok(Handle::Resize {
                row_id: row_id.to_string(),
            }),
            _ => Err(err()),
        }
    }
}

/// Button press, encoded as JSON in `data-mc-action`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum CanvasAction {
    /// Open the add-row modal
    AddRow,
    ChooseColumns { count: usize },
    ChooseWrapperRow,

    OpenBlockChooser { row_id: String, column_id: String },
    /// A [`BlockKind`] tag such as `"heading"` or `"emoji-static"`
    ChooseBlock { kind: String },

    EditContainer,
    AddToContainer,
    ChooseHeading,
    ChooseEmoji,
    PickEmoji { emoji: String },

    MoveRow { row_id: String, direction: Direction },
    DuplicateRow { row_id: String },
    MoveBlock {
        row_id: String,
        column_id: String,
        block_id: String,
        direction: Direction,
    },

    DeleteRow { row_id: String },
    DeleteBlock {
        row_id: String,
        column_id: String,
        block_id: String,
    },
    DeletePositioned { row_id: String, block_id: String },
    ConfirmDelete,

    /// Width slider; hosts put the slider value in `width`
    SetColumnWidth { row_id: String, column_id: String, width: f64 },
    ReorderLayer { row_id: String, block_id: String, to_index: usize },
    /// Layer rename field; hosts put the typed text in `name`
    RenameLayer { row_id: String, block_id: String, name: String },

    Cancel,
}

impl CanvasAction {
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn decode(attr: &str) -> Option<Self> {
        serde_json::from_str(attr).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CanvasEvent {
    /// `pointer` and the clicked element's `bounds` are needed for wrappers
    Click {
        target: HitTarget,
        #[serde(default)]
        pointer: Option<Point>,
        #[serde(default)]
        bounds: Option<Rect>,
    },
    /// `bounds` is the wrapper's box
    PointerDown { handle: Handle, pointer: Point, bounds: Rect },
    PointerMove { pointer: Point },
    PointerUp,
    Action(CanvasAction),
    Undo,
    Redo,
}

impl EditSession {
    /// Apply one host event
    pub fn dispatch(&mut self, event: CanvasEvent) -> Result<(), EditorError> {
        match event {
            CanvasEvent::Click {
                target,
                pointer,
                bounds,
            } => {
                self.click(target, pointer, bounds);
                Ok(())
            }

            CanvasEvent::PointerDown {
                handle,
                pointer,
                bounds,
            } => {
                let token = match &handle {
                    Handle::Drag { row_id, block_id } => self.begin_drag(row_id, block_id, pointer, bounds),
                    Handle::Resize { row_id } => self.begin_resize(row_id, pointer),
                };
                if token.is_none() {
                    debug!(%handle, "Pointer down on stale handle");
                }
                Ok(())
            }

            CanvasEvent::PointerMove { pointer } => {
                if let Some(token) = self.active_gesture().map(|edit| edit.token) {
                    self.update_pointer(token, pointer);
                }
                Ok(())
            }

            CanvasEvent::PointerUp => {
                if let Some(token) = self.active_gesture().map(|edit| edit.token) {
                    self.end_continuous(token);
                }
                Ok(())
            }

            CanvasEvent::Action(action) => self.perform(action),

            CanvasEvent::Undo => {
                self.undo();
                Ok(())
            }

            CanvasEvent::Redo => {
                self.redo();
                Ok(())
            }
        }
    }

    fn click(&mut self, target: HitTarget, pointer: Option<Point>, bounds: Option<Rect>) {
        match target {
            HitTarget::Canvas => {
                if self.mode().is_idle() {
                    self.clear_selection();
                }
            }
            HitTarget::Row { .. } => {}
            HitTarget::Column { row_id, column_id } => {
                self.click_column(&row_id, &column_id);
            }
            HitTarget::Block {
                row_id,
                column_id,
                block_id,
            } => {
                self.click_primitive(&row_id, &column_id, &block_id);
            }
            HitTarget::Wrapper { row_id } => {
                let (x, y) = match (pointer, bounds) {
                    (Some(pointer), Some(bounds)) => bounds.to_percent(pointer),
                    _ => (50.0, 50.0),
                };
                self.click_wrapper(&row_id, x, y);
            }
            HitTarget::Positioned { row_id, block_id } => {
                self.click_positioned(&row_id, &block_id);
            }
        }
    }

    fn perform(&mut self, action: CanvasAction) -> Result<(), EditorError> {
        debug!(?action, "Canvas action");
        match action {
            CanvasAction::AddRow => self.open_add_row(),
            CanvasAction::ChooseColumns { count } => {
                if self.mode() == &crate::InteractionMode::ChoosingColumnCount {
                    self.add_columns_row(count)?;
                }
            }
            CanvasAction::ChooseWrapperRow => {
                if self.mode() == &crate::InteractionMode::ChoosingColumnCount {
                    self.add_wrapper_row()?;
                }
            }

            CanvasAction::OpenBlockChooser { row_id, column_id } => self.open_block_chooser(&row_id, &column_id),
            CanvasAction::ChooseBlock { kind } => match BlockKind::parse(&kind) {
                Some(kind) => {
                    self.choose_block_kind(kind)?;
                }
                None => debug!(%kind, "Unknown block kind chosen"),
            },

            CanvasAction::EditContainer => self.choose_wrapper_edit(),
            CanvasAction::AddToContainer => self.choose_wrapper_add(),
            CanvasAction::ChooseHeading => {
                self.choose_wrapper_block(PositionedKind::HeadingInteractive)?;
            }
            CanvasAction::ChooseEmoji => {
                self.choose_wrapper_block(PositionedKind::EmojiInteractive)?;
            }
            CanvasAction::PickEmoji { emoji } => {
                self.pick_emoji(&emoji)?;
            }

            CanvasAction::MoveRow { row_id, direction } => {
                self.move_row(&row_id, direction)?;
            }
            CanvasAction::DuplicateRow { row_id } => {
                self.duplicate_row(&row_id)?;
            }
            CanvasAction::MoveBlock {
                row_id,
                column_id,
                block_id,
                direction,
            } => {
                self.apply(Mutation::MoveBlock {
                    row_id,
                    column_id,
                    block_id,
                    direction,
                })?;
            }

            CanvasAction::DeleteRow { row_id } => {
                self.request_delete(DeleteTarget::Row { row_id });
            }
            CanvasAction::DeleteBlock {
                row_id,
                column_id,
                block_id,
            } => {
                self.request_delete(DeleteTarget::Block {
                    row_id,
                    column_id,
                    block_id,
                });
            }
            CanvasAction::DeletePositioned { row_id, block_id } => {
                self.request_delete(DeleteTarget::Positioned { row_id, block_id });
            }
            CanvasAction::ConfirmDelete => {
                self.confirm_delete()?;
            }

            CanvasAction::SetColumnWidth {
                row_id,
                column_id,
                width,
            } => {
                self.apply(Mutation::SetColumnWidth {
                    row_id,
                    column_id,
                    width,
                })?;
            }
            CanvasAction::ReorderLayer {
                row_id,
                block_id,
                to_index,
            } => {
                self.apply(Mutation::ReorderPositioned {
                    row_id,
                    block_id,
                    to_index,
                })?;
            }
            CanvasAction::RenameLayer { row_id, block_id, name } => {
                self.apply(Mutation::RenamePositioned { row_id, block_id, name })?;
            }

            CanvasAction::Cancel => self.cancel(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_round_trip() {
        let targets = [
            HitTarget::Canvas,
            HitTarget::Row {
                row_id: "r-1".to_string(),
            },
            HitTarget::Block {
                row_id: "r-1".to_string(),
                column_id: "c-1".to_string(),
                block_id: "b-1".to_string(),
            },
            HitTarget::Positioned {
                row_id: "w-1".to_string(),
                block_id: "p-1".to_string(),
            },
        ];
        for target in targets {
            assert_eq!(target.to_string().parse::<HitTarget>(), Ok(target));
        }
    }

    #[test]
    fn test_bad_targets() {
        assert!("column:r-1".parse::<HitTarget>().is_err());
        assert!("block:r-1//b-1".parse::<HitTarget>().is_err());
        assert!("nonsense".parse::<HitTarget>().is_err());
    }

    #[test]
    fn test_handle_round_trip() {
        let handle = Handle::Drag {
            row_id: "w-1".to_string(),
            block_id: "p-1".to_string(),
        };
        assert_eq!(handle.to_string(), "drag:w-1/p-1");
        assert_eq!("drag:w-1/p-1".parse::<Handle>(), Ok(handle));
        assert!("resize:".parse::<Handle>().is_err());
    }

    #[test]
    fn test_action_encoding() {
        let action = CanvasAction::MoveRow {
            row_id: "r-1".to_string(),
            direction: Direction::Down,
        };
        let encoded = action.encode();
        assert_eq!(encoded, r#"{"action":"move-row","row_id":"r-1","direction":"down"}"#);
        assert_eq!(CanvasAction::decode(&encoded), Some(action));
        assert_eq!(CanvasAction::decode("{}"), None);
    }
}
