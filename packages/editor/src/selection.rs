//! # Selection Model
//!
//! What is selected, and which multi-step interaction (if any) is pending.
//!
//! ## Transitions
//!
//! ```text
//! click column surface        → Column
//! click primitive             → Primitive
//! click empty wrapper space   → mode ChoosingWrapperAction
//!   "edit container"          → Wrapper
//!   "add block"               → mode ChoosingWrapperBlock → (PickingEmoji) → new block
//! click positioned block      → WrapperPrimitive
//! click it again              → Wrapper
//! undo / redo / delete        → revalidate (cleared if the target is gone)
//! ```

use mailcraft_schema::{block_type_of, BlockType, Document, SelectedElement};

use crate::continuous::ContinuousEdit;
use crate::mutations::Mutation;

/// The current selection; `None` means nothing is selected
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    current: Option<SelectedElement>,
}

impl Selection {
    pub fn get(&self) -> Option<&SelectedElement> {
        self.current.as_ref()
    }

    pub fn is_selected(&self, element: &SelectedElement) -> bool {
        self.current.as_ref() == Some(element)
    }

    pub fn select(&mut self, element: SelectedElement) {
        self.current = Some(element);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Select a positioned block, or its wrapper when it is already selected
    pub fn click_positioned(&mut self, row_id: &str, block_id: &str) {
        let element = SelectedElement::WrapperPrimitive {
            row_id: row_id.to_string(),
            block_id: block_id.to_string(),
        };
        if self.is_selected(&element) {
            self.current = Some(SelectedElement::Wrapper {
                row_id: row_id.to_string(),
            });
        } else {
            self.current = Some(element);
        }
    }

    /// Drop a selection that no longer resolves in `doc`. Returns whether
    /// anything was cleared.
    pub fn revalidate(&mut self, doc: &Document) -> bool {
        match &self.current {
            Some(element) if !element.resolves_in(doc) => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Which style editor the selection calls for
    pub fn block_type(&self, doc: &Document) -> Option<BlockType> {
        block_type_of(self.current.as_ref(), doc)
    }

    /// Whether the wrapper `row_id` or one of its blocks is selected
    pub fn touches_wrapper(&self, row_id: &str) -> bool {
        matches!(
            &self.current,
            Some(SelectedElement::Wrapper { row_id: r }) | Some(SelectedElement::WrapperPrimitive { row_id: r, .. })
                if r == row_id
        )
    }
}

/// Something the user asked to delete, waiting for confirmation
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteTarget {
    Row {
        row_id: String,
    },
    Block {
        row_id: String,
        column_id: String,
        block_id: String,
    },
    Positioned {
        row_id: String,
        block_id: String,
    },
}

impl DeleteTarget {
    pub fn to_mutation(&self) -> Mutation {
        match self.clone() {
            DeleteTarget::Row { row_id } => Mutation::DeleteRow { row_id },
            DeleteTarget::Block {
                row_id,
                column_id,
                block_id,
            } => Mutation::DeleteBlock {
                row_id,
                column_id,
                block_id,
            },
            DeleteTarget::Positioned { row_id, block_id } => Mutation::DeletePositioned { row_id, block_id },
        }
    }

    /// The delete target matching a selection, if the selection is deletable
    pub fn for_selection(element: &SelectedElement) -> Option<Self> {
        match element.clone() {
            SelectedElement::Primitive {
                row_id,
                column_id,
                block_id,
            } => Some(DeleteTarget::Block {
                row_id,
                column_id,
                block_id,
            }),
            SelectedElement::WrapperPrimitive { row_id, block_id } => {
                Some(DeleteTarget::Positioned { row_id, block_id })
            }
            SelectedElement::Wrapper { row_id } => Some(DeleteTarget::Row { row_id }),
            SelectedElement::Column { .. } => None,
        }
    }
}

/// Pending multi-step interaction. Only one can be active at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionMode {
    #[default]
    Idle,

    /// Add-row modal: 1–4 columns or a wrapper
    ChoosingColumnCount,

    /// Block-type chooser for a column
    ChoosingBlockKind { row_id: String, column_id: String },

    /// Empty wrapper space was clicked at (`x`%, `y`%)
    ChoosingWrapperAction { row_id: String, x: f64, y: f64 },

    /// "Add block" was chosen; waiting for heading vs emoji
    ChoosingWrapperBlock { row_id: String, x: f64, y: f64 },

    PickingEmoji { row_id: String, x: f64, y: f64 },

    ConfirmingDelete(DeleteTarget),

    /// A drag or resize is in flight
    Continuous(ContinuousEdit),
}

impl InteractionMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionMode::Idle)
    }

    /// Wrapper row this mode is anchored to, if any
    pub fn wrapper_row(&self) -> Option<&str> {
        match self {
            InteractionMode::ChoosingWrapperAction { row_id, .. }
            | InteractionMode::ChoosingWrapperBlock { row_id, .. }
            | InteractionMode::PickingEmoji { row_id, .. } => Some(row_id),
            _ => None,
        }
    }
}
