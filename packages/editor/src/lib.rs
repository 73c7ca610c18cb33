//! # Mailcraft Editor
//!
//! Editing engine for email templates.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host: pointer + button events               │
//! └─────────────────────────────────────────────┘
//!                     ↓ CanvasEvent
//! ┌─────────────────────────────────────────────┐
//! │ EditSession::dispatch                       │
//! │  - mutations → History (one step per edit)  │
//! │  - selection + interaction mode             │
//! │  - drags/resizes as continuous edits        │
//! │  - load/save through a TemplateStore        │
//! └─────────────────────────────────────────────┘
//!                     ↓ render_canvas
//! ┌─────────────────────────────────────────────┐
//! │ VNode tree (read path + affordances)        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Documents are values**: every edit produces a new snapshot; undo
//!    and redo only move a cursor.
//! 2. **One update function**: hosts feed events to
//!    [`EditSession::dispatch`] and re-render; nothing else mutates state.
//! 3. **Stale is quiet**: edits on ids that no longer exist are dropped,
//!    rule violations are returned as errors.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mailcraft_editor::{render_canvas, CanvasEvent, CanvasOptions, EditSession};
//!
//! let mut session = EditSession::new("session-1");
//! session.add_columns_row(2)?;
//! session.dispatch(CanvasEvent::Undo)?;
//! let tree = render_canvas(&session, &CanvasOptions::default());
//! ```

pub mod canvas;
mod continuous;
mod errors;
mod events;
mod geometry;
mod history;
mod mutations;
mod persistence;
mod selection;
mod session;
pub mod widths;

pub use canvas::{render_canvas, CanvasOptions};
pub use continuous::{ContinuousEdit, ContinuousToken, ContinuousValue, Gesture};
pub use errors::EditorError;
pub use events::{CanvasAction, CanvasEvent, Handle, HitTarget, ParseTargetError};
pub use geometry::{Point, Rect};
pub use history::{History, DEFAULT_MAX_LEVELS};
pub use mutations::{check_name, check_position, Direction, Mutation, MutationError, MutationResult, NameError};
pub use persistence::SaveTicket;
pub use selection::{DeleteTarget, InteractionMode, Selection};
pub use session::{Applied, EditSession, SaveState, TemplateMeta};

// Re-export common types for convenience
pub use mailcraft_schema::{Document, SelectedElement};
