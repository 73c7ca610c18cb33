//! # Mailcraft Schema
//!
//! Typed model of an email template: rows of columns or free-positioning
//! wrappers, holding primitive and positioned blocks. The JSON shape of
//! [`Document`] is the storage format; discriminators are the `type` tags
//! documented on each enum.

pub mod block;
pub mod document;
pub mod error;
pub mod id_generator;
pub mod pointer;
pub mod positioned;
pub mod style;
pub mod validate;

pub use block::{BlockContent, BlockKind, PrimitiveBlock};
pub use document::{
    Column, ColumnsRow, Document, Row, WrapperRow, DEFAULT_WRAPPER_HEIGHT, MAX_COLUMNS, MIN_COLUMNS,
    MIN_COLUMN_WIDTH, MIN_WRAPPER_HEIGHT,
};
pub use error::{SchemaError, SchemaResult};
pub use id_generator::IdGenerator;
pub use pointer::{block_type_of, BlockType, SelectedElement};
pub use positioned::{PositionedBlock, PositionedContent, PositionedKind, MAX_NAME_LEN};
pub use style::{Align, Background, BackgroundImage, ContainerStyle, TextAlign, TextStyle};
pub use validate::{validate, Issue};
