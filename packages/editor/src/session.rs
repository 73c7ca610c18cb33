//! # Edit Session
//!
//! One user's editing state for one template: document history, selection,
//! the pending interaction, id minting, template metadata and save state.
//!
//! Every change goes through a method on [`EditSession`]; the canvas is a
//! pure projection of it (see [`crate::canvas`]). Edits whose target has
//! disappeared are dropped quietly, rule violations come back as errors.

use chrono::{DateTime, Utc};
use mailcraft_schema::{
    BlockKind, BlockType, Column, Document, IdGenerator, PositionedBlock, PositionedContent, PositionedKind,
    PrimitiveBlock, Row, SelectedElement, WrapperRow, MAX_COLUMNS, MIN_COLUMNS,
};
use tracing::{debug, instrument};

use crate::history::{History, DEFAULT_MAX_LEVELS};
use crate::mutations::{Direction, Mutation, MutationError};
use crate::selection::{DeleteTarget, InteractionMode, Selection};
use crate::widths::equal_widths;
use crate::EditorError;

/// What a stored template carries besides its content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateMeta {
    /// `None` until the first successful save
    pub id: Option<String>,
    pub name: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveState {
    #[default]
    Idle,
    Saving,
}

/// Result of an edit whose rules were satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Recorded as a history step
    Committed,
    /// Target no longer exists; nothing changed
    Ignored,
}

/// Single editing session
pub struct EditSession {
    /// Unique session identifier; also seeds the id generator
    pub id: String,

    pub(crate) history: History<Document>,
    pub(crate) selection: Selection,
    pub(crate) mode: InteractionMode,
    pub(crate) ids: IdGenerator,
    pub(crate) meta: TemplateMeta,

    pub(crate) saved_generation: u64,
    pub(crate) save_state: SaveState,
    pub(crate) last_saved_at: Option<DateTime<Utc>>,
    pub(crate) last_error: Option<String>,
    pub(crate) needs_name: bool,

    pub(crate) next_token: u64,
}

impl EditSession {
    /// Create a session over an empty, unnamed template
    pub fn new(id: impl Into<String>) -> Self {
        let mut session = Self::with_document(id, Document::new());
        session.needs_name = true;
        session
    }

    /// Create a session over an existing document
    pub fn with_document(id: impl Into<String>, document: Document) -> Self {
        let id = id.into();
        let ids = IdGenerator::resume(&id, &document);
        let history = History::with_max_levels(document, DEFAULT_MAX_LEVELS);
        Self {
            saved_generation: history.generation(),
            id,
            history,
            selection: Selection::default(),
            mode: InteractionMode::Idle,
            ids,
            meta: TemplateMeta::default(),
            save_state: SaveState::Idle,
            last_saved_at: None,
            last_error: None,
            needs_name: false,
            next_token: 0,
        }
    }

    /// Keep at most `max_levels` snapshots (0 = unlimited). Resets history.
    pub fn with_history_limit(mut self, max_levels: usize) -> Self {
        let present = self.document().clone();
        self.history = History::with_max_levels(present, max_levels);
        self.saved_generation = self.history.generation();
        self
    }

    pub fn document(&self) -> &Document {
        self.history.present()
    }

    pub fn history(&self) -> &History<Document> {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected(&self) -> Option<&SelectedElement> {
        self.selection.get()
    }

    /// Which style editor to show
    pub fn selected_block_type(&self) -> Option<BlockType> {
        self.selection.block_type(self.document())
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    pub fn meta(&self) -> &TemplateMeta {
        &self.meta
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.meta.name = name.into();
        if !self.meta.name.trim().is_empty() {
            self.needs_name = false;
        }
    }

    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.meta.categories = categories;
    }

    /// Unsaved changes since the last successful save or load
    pub fn is_dirty(&self) -> bool {
        self.history.generation() != self.saved_generation
    }

    pub fn new_id(&mut self) -> String {
        self.ids.new_id()
    }

    /// Apply a discrete edit as one history step.
    ///
    /// An in-flight drag or resize is cancelled first.
    #[instrument(skip_all, fields(op = mutation.label()))]
    pub fn apply(&mut self, mutation: Mutation) -> Result<Applied, EditorError> {
        self.abort_gesture();

        let mut next = self.document().clone();
        match mutation.apply(&mut next) {
            Ok(()) => {
                self.history.push(next);
                self.selection.revalidate(self.history.present());
                debug!(snapshots = self.history.len(), "Edit committed");
                Ok(Applied::Committed)
            }
            Err(e) if e.is_stale() => {
                debug!(error = %e, "Ignoring edit on stale target");
                self.selection.revalidate(self.history.present());
                Ok(Applied::Ignored)
            }
            Err(e) => {
                debug!(error = %e, "Edit rejected");
                Err(e.into())
            }
        }
    }

    /// Step back one snapshot. Clears the selection.
    pub fn undo(&mut self) -> bool {
        self.abort_gesture();
        self.mode = InteractionMode::Idle;
        self.selection.clear();
        if !self.history.can_undo() {
            return false;
        }
        self.history.undo();
        debug!(cursor = self.history.cursor(), "Undo");
        true
    }

    /// Step forward one snapshot. Clears the selection.
    pub fn redo(&mut self) -> bool {
        self.abort_gesture();
        self.mode = InteractionMode::Idle;
        self.selection.clear();
        if !self.history.can_redo() {
            return false;
        }
        self.history.redo();
        debug!(cursor = self.history.cursor(), "Redo");
        true
    }

    /// Close whatever chooser, dialog or gesture is pending
    pub fn cancel(&mut self) {
        self.abort_gesture();
        self.mode = InteractionMode::Idle;
    }

    // ---- rows ----

    pub fn open_add_row(&mut self) {
        if self.mode.is_idle() {
            self.mode = InteractionMode::ChoosingColumnCount;
        }
    }

    /// Append a row of `count` equal-width columns; returns its id
    pub fn add_columns_row(&mut self, count: usize) -> Result<String, EditorError> {
        if !(MIN_COLUMNS..=MAX_COLUMNS).contains(&count) {
            return Err(MutationError::InvalidColumnCount(count).into());
        }
        let row_id = self.new_id();
        let columns = equal_widths(count)
            .into_iter()
            .map(|width| Column::new(self.ids.new_id(), width))
            .collect();
        self.apply(Mutation::InsertRow {
            row: Row::columns(row_id.clone(), columns),
            index: None,
        })?;
        self.mode = InteractionMode::Idle;
        Ok(row_id)
    }

    /// Append a wrapper with the default height and background; returns its id
    pub fn add_wrapper_row(&mut self) -> Result<String, EditorError> {
        let row_id = self.new_id();
        self.apply(Mutation::InsertRow {
            row: Row::Wrapper(WrapperRow::new(row_id.clone())),
            index: None,
        })?;
        self.mode = InteractionMode::Idle;
        Ok(row_id)
    }

    pub fn move_row(&mut self, row_id: &str, direction: Direction) -> Result<Applied, EditorError> {
        self.apply(Mutation::MoveRow {
            row_id: row_id.to_string(),
            direction,
        })
    }

    /// Insert a copy of `row_id` with fresh ids right after it
    pub fn duplicate_row(&mut self, row_id: &str) -> Result<Option<String>, EditorError> {
        let Some(original) = self.document().find_row(row_id) else {
            debug!(row_id, "Ignoring duplicate of missing row");
            return Ok(None);
        };
        let mut copy = original.clone();
        reassign_ids(&mut copy, &mut self.ids);
        let copy_id = copy.id().to_string();

        let applied = self.apply(Mutation::DuplicateRow {
            row_id: row_id.to_string(),
            copy,
        })?;
        Ok((applied == Applied::Committed).then_some(copy_id))
    }

    // ---- column blocks ----

    pub fn open_block_chooser(&mut self, row_id: &str, column_id: &str) {
        if self.mode.is_idle() && self.document().find_column(row_id, column_id).is_some() {
            self.mode = InteractionMode::ChoosingBlockKind {
                row_id: row_id.to_string(),
                column_id: column_id.to_string(),
            };
        }
    }

    pub fn choose_block_kind(&mut self, kind: BlockKind) -> Result<Option<String>, EditorError> {
        let InteractionMode::ChoosingBlockKind { row_id, column_id } = std::mem::take(&mut self.mode) else {
            return Ok(None);
        };
        self.add_block(&row_id, &column_id, kind)
    }

    /// Append a default block of `kind` to a column; returns its id
    pub fn add_block(&mut self, row_id: &str, column_id: &str, kind: BlockKind) -> Result<Option<String>, EditorError> {
        let block = PrimitiveBlock::new(self.new_id(), kind);
        let block_id = block.id.clone();
        let applied = self.apply(Mutation::AddBlock {
            row_id: row_id.to_string(),
            column_id: column_id.to_string(),
            block,
        })?;
        Ok((applied == Applied::Committed).then_some(block_id))
    }

    // ---- selection ----

    /// Select a column surface
    pub fn click_column(&mut self, row_id: &str, column_id: &str) -> bool {
        self.select_if_idle(SelectedElement::Column {
            row_id: row_id.to_string(),
            column_id: column_id.to_string(),
        })
    }

    pub fn click_primitive(&mut self, row_id: &str, column_id: &str, block_id: &str) -> bool {
        self.select_if_idle(SelectedElement::Primitive {
            row_id: row_id.to_string(),
            column_id: column_id.to_string(),
            block_id: block_id.to_string(),
        })
    }

    /// Select a positioned block, or promote to its wrapper when already selected
    pub fn click_positioned(&mut self, row_id: &str, block_id: &str) -> bool {
        if !self.mode.is_idle() || self.document().find_positioned(row_id, block_id).is_none() {
            return false;
        }
        self.selection.click_positioned(row_id, block_id);
        true
    }

    /// Empty wrapper space clicked at (`x`%, `y`%): open the action chooser
    pub fn click_wrapper(&mut self, row_id: &str, x: f64, y: f64) -> bool {
        if !self.mode.is_idle() || self.document().find_wrapper(row_id).is_none() {
            return false;
        }
        self.mode = InteractionMode::ChoosingWrapperAction {
            row_id: row_id.to_string(),
            x: x.clamp(0.0, 100.0),
            y: y.clamp(0.0, 100.0),
        };
        true
    }

    /// "Edit container" in the wrapper action chooser
    pub fn choose_wrapper_edit(&mut self) {
        if let InteractionMode::ChoosingWrapperAction { row_id, .. } = std::mem::take(&mut self.mode) {
            if self.document().find_wrapper(&row_id).is_some() {
                self.selection.select(SelectedElement::Wrapper { row_id });
            }
        }
    }

    /// "Add block" in the wrapper action chooser
    pub fn choose_wrapper_add(&mut self) {
        self.mode = match std::mem::take(&mut self.mode) {
            InteractionMode::ChoosingWrapperAction { row_id, x, y } => {
                InteractionMode::ChoosingWrapperBlock { row_id, x, y }
            }
            other => other,
        };
    }

    /// Pick the positioned block type. Headings are created right away,
    /// emoji wait for [`pick_emoji`](Self::pick_emoji).
    pub fn choose_wrapper_block(&mut self, kind: PositionedKind) -> Result<Option<String>, EditorError> {
        let InteractionMode::ChoosingWrapperBlock { row_id, x, y } = std::mem::take(&mut self.mode) else {
            return Ok(None);
        };
        match kind {
            PositionedKind::HeadingInteractive => self.add_positioned(&row_id, x, y, PositionedContent::heading()),
            PositionedKind::EmojiInteractive => {
                self.mode = InteractionMode::PickingEmoji { row_id, x, y };
                Ok(None)
            }
        }
    }

    pub fn pick_emoji(&mut self, emoji: &str) -> Result<Option<String>, EditorError> {
        let InteractionMode::PickingEmoji { row_id, x, y } = std::mem::take(&mut self.mode) else {
            return Ok(None);
        };
        self.add_positioned(&row_id, x, y, PositionedContent::emoji(emoji))
    }

    /// Add a positioned block at (`x`%, `y`%) with the next free name
    pub fn add_positioned(
        &mut self,
        row_id: &str,
        x: f64,
        y: f64,
        content: PositionedContent,
    ) -> Result<Option<String>, EditorError> {
        let Some(wrapper) = self.document().find_wrapper(row_id) else {
            debug!(row_id, "Ignoring add to missing wrapper");
            return Ok(None);
        };
        let name = wrapper.next_name(content.kind());
        let block = PositionedBlock::new(self.new_id(), name, x, y, content);
        let block_id = block.id.clone();
        let applied = self.apply(Mutation::AddPositioned {
            row_id: row_id.to_string(),
            block,
        })?;
        Ok((applied == Applied::Committed).then_some(block_id))
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn select_if_idle(&mut self, element: SelectedElement) -> bool {
        if !self.mode.is_idle() || !element.resolves_in(self.document()) {
            return false;
        }
        self.selection.select(element);
        true
    }

    // ---- delete ----

    /// Ask for confirmation before deleting `target`
    pub fn request_delete(&mut self, target: DeleteTarget) -> bool {
        if !self.mode.is_idle() || target.to_mutation().validate(self.document()).is_err() {
            return false;
        }
        self.mode = InteractionMode::ConfirmingDelete(target);
        true
    }

    /// Ask to delete whatever is selected
    pub fn request_delete_selection(&mut self) -> bool {
        match self.selected().and_then(DeleteTarget::for_selection) {
            Some(target) => self.request_delete(target),
            None => false,
        }
    }

    /// Commit the pending delete as one history step
    pub fn confirm_delete(&mut self) -> Result<Applied, EditorError> {
        match std::mem::take(&mut self.mode) {
            InteractionMode::ConfirmingDelete(target) => self.apply(target.to_mutation()),
            other => {
                self.mode = other;
                Ok(Applied::Ignored)
            }
        }
    }

    pub fn pending_delete(&self) -> Option<&DeleteTarget> {
        match &self.mode {
            InteractionMode::ConfirmingDelete(target) => Some(target),
            _ => None,
        }
    }
}

/// Give a copied row and everything inside it fresh ids
fn reassign_ids(row: &mut Row, ids: &mut IdGenerator) {
    match row {
        Row::Columns(columns_row) => {
            columns_row.id = ids.new_id();
            for column in &mut columns_row.columns {
                column.id = ids.new_id();
                for block in &mut column.blocks {
                    block.id = ids.new_id();
                }
            }
        }
        Row::Wrapper(wrapper) => {
            wrapper.id = ids.new_id();
            for block in &mut wrapper.blocks {
                block.id = ids.new_id();
            }
        }
    }
}
