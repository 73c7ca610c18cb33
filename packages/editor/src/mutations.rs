//! # Document Mutations
//!
//! Every discrete edit the editor can make, as a serializable value.
//!
//! ## Design Principles
//!
//! 1. **Addressed by id**: mutations carry the full id path of their target,
//!    so they can be checked against any snapshot.
//! 2. **Validated**: `apply` runs `validate` first and leaves the document
//!    untouched when it fails.
//! 3. **Two kinds of failure**: a target that no longer exists is a
//!    [stale reference](MutationError::is_stale); anything else is a rule
//!    violation the user should hear about.
//!
//! ## Mutation Semantics
//!
//! ### Widths
//! - `SetColumnWidth` reshapes the whole row through [`redistribute`], so
//!   the row still sums to 100 afterwards.
//!
//! ### Wrappers
//! - Positions are clamped to 0..=100 (non-finite ones are rejected), heights
//!   to at least 50px.
//! - Names are trimmed, at most 30 characters, unique within the wrapper.
//! - Block order is paint order; `ReorderPositioned` moves one layer.

use mailcraft_schema::{
    ColumnsRow, ContainerStyle, Document, PositionedBlock, PrimitiveBlock, Row, WrapperRow, MAX_COLUMNS,
    MAX_NAME_LEN, MIN_COLUMNS, MIN_WRAPPER_HEIGHT,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::widths::redistribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Semantic edits on a template document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert a row at `index`, or append when `index` is `None`
    InsertRow { row: Row, index: Option<usize> },

    DeleteRow { row_id: String },

    /// Swap a row with its neighbour
    MoveRow { row_id: String, direction: Direction },

    /// Insert `copy` (a clone of `row_id` with fresh ids) right after it
    DuplicateRow { row_id: String, copy: Row },

    AddBlock {
        row_id: String,
        column_id: String,
        block: PrimitiveBlock,
    },

    /// Replace a block's payload; the type must stay the same
    UpdateBlock {
        row_id: String,
        column_id: String,
        block: PrimitiveBlock,
    },

    DeleteBlock {
        row_id: String,
        column_id: String,
        block_id: String,
    },

    /// Swap a block with its neighbour inside the same column
    MoveBlock {
        row_id: String,
        column_id: String,
        block_id: String,
        direction: Direction,
    },

    SetColumnWidth {
        row_id: String,
        column_id: String,
        width: f64,
    },

    SetColumnStyles {
        row_id: String,
        column_id: String,
        styles: ContainerStyle,
    },

    /// Append a block on top of the wrapper's layers
    AddPositioned { row_id: String, block: PositionedBlock },

    UpdatePositioned { row_id: String, block: PositionedBlock },

    MovePositioned {
        row_id: String,
        block_id: String,
        x: f64,
        y: f64,
    },

    DeletePositioned { row_id: String, block_id: String },

    ReorderPositioned {
        row_id: String,
        block_id: String,
        to_index: usize,
    },

    RenamePositioned {
        row_id: String,
        block_id: String,
        name: String,
    },

    ResizeWrapper { row_id: String, height: f64 },

    SetWrapperStyles { row_id: String, styles: ContainerStyle },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NameError {
    #[error("Name cannot be empty")]
    Empty,

    #[error("Name is longer than {max} characters")]
    TooLong { max: usize },

    #[error("Name {0:?} is already used in this wrapper")]
    Duplicate(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Row not found: {0}")]
    RowNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Row {0} is not a columns row")]
    NotAColumnsRow(String),

    #[error("Row {0} is not a wrapper")]
    NotAWrapperRow(String),

    #[error("Already at the boundary")]
    AtBoundary,

    #[error("Block type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("A row needs 1 to 4 columns, got {0}")]
    InvalidColumnCount(usize),

    #[error("Id already in use: {0}")]
    DuplicateId(String),

    #[error("Position ({x}, {y}) is not a finite point")]
    InvalidPosition { x: f64, y: f64 },

    #[error(transparent)]
    Name(#[from] NameError),
}

impl MutationError {
    /// The target no longer exists in the document
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            MutationError::RowNotFound(_) | MutationError::ColumnNotFound(_) | MutationError::BlockNotFound(_)
        )
    }
}

pub type MutationResult<T> = Result<T, MutationError>;

impl Mutation {
    /// Apply mutation to the document with validation
    pub fn apply(&self, doc: &mut Document) -> MutationResult<()> {
        self.validate(doc)?;

        match self {
            Mutation::InsertRow { row, index } => {
                let index = index.unwrap_or(doc.rows.len()).min(doc.rows.len());
                doc.rows.insert(index, row.clone());
            }

            Mutation::DeleteRow { row_id } => {
                let index = row_index(doc, row_id)?;
                doc.rows.remove(index);
            }

            Mutation::MoveRow { row_id, direction } => {
                let index = row_index(doc, row_id)?;
                let other = neighbour(index, doc.rows.len(), *direction)?;
                doc.rows.swap(index, other);
            }

            Mutation::DuplicateRow { row_id, copy } => {
                let index = row_index(doc, row_id)?;
                doc.rows.insert(index + 1, copy.clone());
            }

            Mutation::AddBlock {
                row_id,
                column_id,
                block,
            } => {
                column_mut(doc, row_id, column_id)?.blocks.push(block.clone());
            }

            Mutation::UpdateBlock {
                row_id,
                column_id,
                block,
            } => {
                let column = column_mut(doc, row_id, column_id)?;
                let slot = column
                    .blocks
                    .iter_mut()
                    .find(|b| b.id == block.id)
                    .ok_or_else(|| MutationError::BlockNotFound(block.id.clone()))?;
                *slot = block.clone();
            }

            Mutation::DeleteBlock {
                row_id,
                column_id,
                block_id,
            } => {
                column_mut(doc, row_id, column_id)?.blocks.retain(|b| &b.id != block_id);
            }

            Mutation::MoveBlock {
                row_id,
                column_id,
                block_id,
                direction,
            } => {
                let column = column_mut(doc, row_id, column_id)?;
                let index = column
                    .blocks
                    .iter()
                    .position(|b| &b.id == block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                let other = neighbour(index, column.blocks.len(), *direction)?;
                column.blocks.swap(index, other);
            }

            Mutation::SetColumnWidth {
                row_id,
                column_id,
                width,
            } => {
                let row = columns_row_mut(doc, row_id)?;
                let index = row
                    .columns
                    .iter()
                    .position(|c| &c.id == column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;
                let widths = redistribute(&row.widths(), index, *width);
                for (column, width) in row.columns.iter_mut().zip(widths) {
                    column.width = width;
                }
            }

            Mutation::SetColumnStyles {
                row_id,
                column_id,
                styles,
            } => {
                column_mut(doc, row_id, column_id)?.styles = styles.clone();
            }

            Mutation::AddPositioned { row_id, block } => {
                let mut block = block.clone();
                block.name = block.name.trim().to_string();
                wrapper_mut(doc, row_id)?.blocks.push(block);
            }

            Mutation::UpdatePositioned { row_id, block } => {
                let slot = positioned_mut(wrapper_mut(doc, row_id)?, &block.id)?;
                *slot = PositionedBlock {
                    name: block.name.trim().to_string(),
                    x: block.x.clamp(0.0, 100.0),
                    y: block.y.clamp(0.0, 100.0),
                    ..block.clone()
                };
            }

            Mutation::MovePositioned { row_id, block_id, x, y } => {
                let block = positioned_mut(wrapper_mut(doc, row_id)?, block_id)?;
                block.x = x.clamp(0.0, 100.0);
                block.y = y.clamp(0.0, 100.0);
            }

            Mutation::DeletePositioned { row_id, block_id } => {
                wrapper_mut(doc, row_id)?.blocks.retain(|b| &b.id != block_id);
            }

            Mutation::ReorderPositioned {
                row_id,
                block_id,
                to_index,
            } => {
                let wrapper = wrapper_mut(doc, row_id)?;
                let from = wrapper
                    .blocks
                    .iter()
                    .position(|b| &b.id == block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                let block = wrapper.blocks.remove(from);
                let to = (*to_index).min(wrapper.blocks.len());
                wrapper.blocks.insert(to, block);
            }

            Mutation::RenamePositioned {
                row_id,
                block_id,
                name,
            } => {
                positioned_mut(wrapper_mut(doc, row_id)?, block_id)?.name = name.trim().to_string();
            }

            Mutation::ResizeWrapper { row_id, height } => {
                wrapper_mut(doc, row_id)?.height = clamp_height(*height);
            }

            Mutation::SetWrapperStyles { row_id, styles } => {
                wrapper_mut(doc, row_id)?.styles = styles.clone();
            }
        }

        Ok(())
    }

    /// Check that the mutation can be applied to `doc`
    pub fn validate(&self, doc: &Document) -> MutationResult<()> {
        match self {
            Mutation::InsertRow { row, .. } => check_new_row(doc, row),

            Mutation::DeleteRow { row_id } => row_index(doc, row_id).map(|_| ()),

            Mutation::MoveRow { row_id, direction } => {
                let index = row_index(doc, row_id)?;
                neighbour(index, doc.rows.len(), *direction).map(|_| ())
            }

            Mutation::DuplicateRow { row_id, copy } => {
                let original = doc
                    .find_row(row_id)
                    .ok_or_else(|| MutationError::RowNotFound(row_id.clone()))?;
                if std::mem::discriminant(original) != std::mem::discriminant(copy) {
                    return Err(MutationError::TypeMismatch {
                        expected: row_kind(original).to_string(),
                        found: row_kind(copy).to_string(),
                    });
                }
                check_new_row(doc, copy)
            }

            Mutation::AddBlock {
                row_id,
                column_id,
                block,
            } => {
                column(doc, row_id, column_id)?;
                check_new_ids(doc, [block.id.as_str()])
            }

            Mutation::UpdateBlock {
                row_id,
                column_id,
                block,
            } => {
                let existing = column(doc, row_id, column_id)?
                    .find_block(&block.id)
                    .ok_or_else(|| MutationError::BlockNotFound(block.id.clone()))?;
                if !existing.same_type(block) {
                    return Err(MutationError::TypeMismatch {
                        expected: existing.type_name().to_string(),
                        found: block.type_name().to_string(),
                    });
                }
                Ok(())
            }

            Mutation::DeleteBlock {
                row_id,
                column_id,
                block_id,
            } => column(doc, row_id, column_id)?
                .find_block(block_id)
                .map(|_| ())
                .ok_or_else(|| MutationError::BlockNotFound(block_id.clone())),

            Mutation::MoveBlock {
                row_id,
                column_id,
                block_id,
                direction,
            } => {
                let column = column(doc, row_id, column_id)?;
                let index = column
                    .blocks
                    .iter()
                    .position(|b| &b.id == block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                neighbour(index, column.blocks.len(), *direction).map(|_| ())
            }

            Mutation::SetColumnWidth { row_id, column_id, .. }
            | Mutation::SetColumnStyles { row_id, column_id, .. } => {
                column(doc, row_id, column_id).map(|_| ())
            }

            Mutation::AddPositioned { row_id, block } => {
                let wrapper = wrapper(doc, row_id)?;
                check_new_ids(doc, [block.id.as_str()])?;
                check_position(block.x, block.y)?;
                check_name(wrapper, &block.name, None)
            }

            Mutation::UpdatePositioned { row_id, block } => {
                let wrapper = wrapper(doc, row_id)?;
                let existing = wrapper
                    .find_block(&block.id)
                    .ok_or_else(|| MutationError::BlockNotFound(block.id.clone()))?;
                if existing.kind() != block.kind() {
                    return Err(MutationError::TypeMismatch {
                        expected: existing.kind().as_str().to_string(),
                        found: block.kind().as_str().to_string(),
                    });
                }
                check_position(block.x, block.y)?;
                check_name(wrapper, &block.name, Some(&block.id))
            }

            Mutation::MovePositioned { row_id, block_id, x, y } => {
                wrapper(doc, row_id)?
                    .find_block(block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                check_position(*x, *y)
            }

            Mutation::DeletePositioned { row_id, block_id }
            | Mutation::ReorderPositioned { row_id, block_id, .. } => wrapper(doc, row_id)?
                .find_block(block_id)
                .map(|_| ())
                .ok_or_else(|| MutationError::BlockNotFound(block_id.clone())),

            Mutation::RenamePositioned {
                row_id,
                block_id,
                name,
            } => {
                let wrapper = wrapper(doc, row_id)?;
                wrapper
                    .find_block(block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                check_name(wrapper, name, Some(block_id))
            }

            Mutation::ResizeWrapper { row_id, .. } | Mutation::SetWrapperStyles { row_id, .. } => {
                wrapper(doc, row_id).map(|_| ())
            }
        }
    }

    /// Short name for logs
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::InsertRow { .. } => "insert-row",
            Mutation::DeleteRow { .. } => "delete-row",
            Mutation::MoveRow { .. } => "move-row",
            Mutation::DuplicateRow { .. } => "duplicate-row",
            Mutation::AddBlock { .. } => "add-block",
            Mutation::UpdateBlock { .. } => "update-block",
            Mutation::DeleteBlock { .. } => "delete-block",
            Mutation::MoveBlock { .. } => "move-block",
            Mutation::SetColumnWidth { .. } => "set-column-width",
            Mutation::SetColumnStyles { .. } => "set-column-styles",
            Mutation::AddPositioned { .. } => "add-positioned",
            Mutation::UpdatePositioned { .. } => "update-positioned",
            Mutation::MovePositioned { .. } => "move-positioned",
            Mutation::DeletePositioned { .. } => "delete-positioned",
            Mutation::ReorderPositioned { .. } => "reorder-positioned",
            Mutation::RenamePositioned { .. } => "rename-positioned",
            Mutation::ResizeWrapper { .. } => "resize-wrapper",
            Mutation::SetWrapperStyles { .. } => "set-wrapper-styles",
        }
    }
}

/// Percent coordinates must be finite; range is handled by clamping
pub fn check_position(x: f64, y: f64) -> MutationResult<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(MutationError::InvalidPosition { x, y })
    }
}

pub fn clamp_height(height: f64) -> f64 {
    if height.is_finite() {
        height.max(MIN_WRAPPER_HEIGHT)
    } else {
        MIN_WRAPPER_HEIGHT
    }
}

/// Trimmed, non-empty, at most 30 characters, unused by other blocks
pub fn check_name(wrapper: &WrapperRow, name: &str, except_id: Option<&str>) -> MutationResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MutationError::Name(NameError::Empty));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(NameError::TooLong { max: MAX_NAME_LEN }.into());
    }
    if wrapper.name_taken(name, except_id) {
        return Err(NameError::Duplicate(name.to_string()).into());
    }
    Ok(())
}

fn row_kind(row: &Row) -> &'static str {
    match row {
        Row::Columns(_) => "columns",
        Row::Wrapper(_) => "wrapper",
    }
}

fn neighbour(index: usize, len: usize, direction: Direction) -> MutationResult<usize> {
    match direction {
        Direction::Up if index > 0 => Ok(index - 1),
        Direction::Down if index + 1 < len => Ok(index + 1),
        _ => Err(MutationError::AtBoundary),
    }
}

fn check_new_row(doc: &Document, row: &Row) -> MutationResult<()> {
    if let Row::Columns(columns) = row {
        let count = columns.columns.len();
        if !(MIN_COLUMNS..=MAX_COLUMNS).contains(&count) {
            return Err(MutationError::InvalidColumnCount(count));
        }
    }
    let scratch = Document { rows: vec![row.clone()] };
    check_new_ids(doc, scratch.ids())
}

fn check_new_ids<'a>(doc: &Document, ids: impl IntoIterator<Item = &'a str>) -> MutationResult<()> {
    let existing: std::collections::HashSet<&str> = doc.ids().collect();
    match ids.into_iter().find(|id| existing.contains(id)) {
        Some(id) => Err(MutationError::DuplicateId(id.to_string())),
        None => Ok(()),
    }
}

fn row_index(doc: &Document, row_id: &str) -> MutationResult<usize> {
    doc.row_index(row_id)
        .ok_or_else(|| MutationError::RowNotFound(row_id.to_string()))
}

fn columns_row<'a>(doc: &'a Document, row_id: &str) -> MutationResult<&'a ColumnsRow> {
    doc.find_row(row_id)
        .ok_or_else(|| MutationError::RowNotFound(row_id.to_string()))?
        .as_columns()
        .ok_or_else(|| MutationError::NotAColumnsRow(row_id.to_string()))
}

fn columns_row_mut<'a>(doc: &'a mut Document, row_id: &str) -> MutationResult<&'a mut ColumnsRow> {
    doc.find_row_mut(row_id)
        .ok_or_else(|| MutationError::RowNotFound(row_id.to_string()))?
        .as_columns_mut()
        .ok_or_else(|| MutationError::NotAColumnsRow(row_id.to_string()))
}

fn column<'a>(doc: &'a Document, row_id: &str, column_id: &str) -> MutationResult<&'a mailcraft_schema::Column> {
    columns_row(doc, row_id)?
        .find_column(column_id)
        .ok_or_else(|| MutationError::ColumnNotFound(column_id.to_string()))
}

fn column_mut<'a>(
    doc: &'a mut Document,
    row_id: &str,
    column_id: &str,
) -> MutationResult<&'a mut mailcraft_schema::Column> {
    columns_row_mut(doc, row_id)?
        .find_column_mut(column_id)
        .ok_or_else(|| MutationError::ColumnNotFound(column_id.to_string()))
}

fn wrapper<'a>(doc: &'a Document, row_id: &str) -> MutationResult<&'a WrapperRow> {
    doc.find_row(row_id)
        .ok_or_else(|| MutationError::RowNotFound(row_id.to_string()))?
        .as_wrapper()
        .ok_or_else(|| MutationError::NotAWrapperRow(row_id.to_string()))
}

fn wrapper_mut<'a>(doc: &'a mut Document, row_id: &str) -> MutationResult<&'a mut WrapperRow> {
    doc.find_row_mut(row_id)
        .ok_or_else(|| MutationError::RowNotFound(row_id.to_string()))?
        .as_wrapper_mut()
        .ok_or_else(|| MutationError::NotAWrapperRow(row_id.to_string()))
}

fn positioned_mut<'a>(wrapper: &'a mut WrapperRow, block_id: &str) -> MutationResult<&'a mut PositionedBlock> {
    wrapper
        .find_block_mut(block_id)
        .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))
}
