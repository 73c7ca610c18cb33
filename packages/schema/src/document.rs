//! # Template Document
//!
//! ```text
//! Document
//!  └─ Row (columns | wrapper)
//!      ├─ ColumnsRow → Column[1..=4] → PrimitiveBlock*
//!      └─ WrapperRow → PositionedBlock*   (free positioning, z-order = index)
//! ```
//!
//! Documents are plain values. Editing code clones and replaces them; nothing
//! in here mutates behind a shared reference.

use serde::{Deserialize, Serialize};

use crate::block::PrimitiveBlock;
use crate::error::SchemaResult;
use crate::positioned::{PositionedBlock, PositionedKind};
use crate::style::ContainerStyle;

pub const MIN_COLUMNS: usize = 1;
pub const MAX_COLUMNS: usize = 4;
/// Percent
pub const MIN_COLUMN_WIDTH: f64 = 10.0;
pub const DEFAULT_WRAPPER_HEIGHT: f64 = 300.0;
pub const MIN_WRAPPER_HEIGHT: f64 = 50.0;

/// Root of a template
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Row {
    Columns(ColumnsRow),
    Wrapper(WrapperRow),
}

/// Horizontal layout of 1–4 columns whose widths sum to 100
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnsRow {
    pub id: String,
    pub columns: Vec<Column>,
}

/// Free-positioning canvas region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrapperRow {
    pub id: String,
    #[serde(default)]
    pub blocks: Vec<PositionedBlock>,
    pub height: f64,
    #[serde(default)]
    pub styles: ContainerStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    /// Percent of the row
    pub width: f64,
    #[serde(default)]
    pub blocks: Vec<PrimitiveBlock>,
    #[serde(default)]
    pub styles: ContainerStyle,
}

impl Column {
    pub fn new(id: impl Into<String>, width: f64) -> Self {
        Self {
            id: id.into(),
            width,
            blocks: Vec::new(),
            styles: ContainerStyle::default(),
        }
    }

    pub fn find_block(&self, block_id: &str) -> Option<&PrimitiveBlock> {
        self.blocks.iter().find(|b| b.id == block_id)
    }
}

impl ColumnsRow {
    pub fn find_column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn find_column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }

    pub fn widths(&self) -> Vec<f64> {
        self.columns.iter().map(|c| c.width).collect()
    }
}

impl WrapperRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            blocks: Vec::new(),
            height: DEFAULT_WRAPPER_HEIGHT,
            styles: ContainerStyle::wrapper_default(),
        }
    }

    pub fn find_block(&self, block_id: &str) -> Option<&PositionedBlock> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    pub fn find_block_mut(&mut self, block_id: &str) -> Option<&mut PositionedBlock> {
        self.blocks.iter_mut().find(|b| b.id == block_id)
    }

    /// Whether `name` is taken by a block other than `except_id`
    pub fn name_taken(&self, name: &str, except_id: Option<&str>) -> bool {
        self.blocks
            .iter()
            .any(|b| b.name == name && Some(b.id.as_str()) != except_id)
    }

    /// First free `<Prefix>-<n>` name for a new block of `kind`
    pub fn next_name(&self, kind: PositionedKind) -> String {
        let prefix = kind.name_prefix();
        (1..)
            .map(|n| format!("{}-{}", prefix, n))
            .find(|name| !self.name_taken(name, None))
            .unwrap_or_else(|| prefix.to_string())
    }
}

impl Row {
    pub fn columns(id: impl Into<String>, columns: Vec<Column>) -> Self {
        Row::Columns(ColumnsRow {
            id: id.into(),
            columns,
        })
    }

    pub fn wrapper(id: impl Into<String>) -> Self {
        Row::Wrapper(WrapperRow::new(id))
    }

    pub fn id(&self) -> &str {
        match self {
            Row::Columns(row) => &row.id,
            Row::Wrapper(row) => &row.id,
        }
    }

    pub fn as_columns(&self) -> Option<&ColumnsRow> {
        match self {
            Row::Columns(row) => Some(row),
            Row::Wrapper(_) => None,
        }
    }

    pub fn as_columns_mut(&mut self) -> Option<&mut ColumnsRow> {
        match self {
            Row::Columns(row) => Some(row),
            Row::Wrapper(_) => None,
        }
    }

    pub fn as_wrapper(&self) -> Option<&WrapperRow> {
        match self {
            Row::Wrapper(row) => Some(row),
            Row::Columns(_) => None,
        }
    }

    pub fn as_wrapper_mut(&mut self) -> Option<&mut WrapperRow> {
        match self {
            Row::Wrapper(row) => Some(row),
            Row::Columns(_) => None,
        }
    }

    fn collect_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(self.id());
        match self {
            Row::Columns(row) => {
                for column in &row.columns {
                    out.push(&column.id);
                    out.extend(column.blocks.iter().map(|b| b.id.as_str()));
                }
            }
            Row::Wrapper(row) => out.extend(row.blocks.iter().map(|b| b.id.as_str())),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn from_json(json: &str) -> SchemaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> SchemaResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> SchemaResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> SchemaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_index(&self, row_id: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.id() == row_id)
    }

    pub fn find_row(&self, row_id: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.id() == row_id)
    }

    pub fn find_row_mut(&mut self, row_id: &str) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.id() == row_id)
    }

    pub fn find_column(&self, row_id: &str, column_id: &str) -> Option<&Column> {
        self.find_row(row_id)?.as_columns()?.find_column(column_id)
    }

    pub fn find_block(&self, row_id: &str, column_id: &str, block_id: &str) -> Option<&PrimitiveBlock> {
        self.find_column(row_id, column_id)?.find_block(block_id)
    }

    pub fn find_wrapper(&self, row_id: &str) -> Option<&WrapperRow> {
        self.find_row(row_id)?.as_wrapper()
    }

    pub fn find_positioned(&self, row_id: &str, block_id: &str) -> Option<&PositionedBlock> {
        self.find_wrapper(row_id)?.find_block(block_id)
    }

    /// Every row, column and block id in document order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        let mut ids = Vec::new();
        for row in &self.rows {
            row.collect_ids(&mut ids);
        }
        ids.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;
    use crate::positioned::PositionedContent;

    fn sample() -> Document {
        let mut column = Column::new("c-1", 100.0);
        column.blocks.push(PrimitiveBlock::new("b-1", BlockKind::Heading));

        let mut wrapper = WrapperRow::new("w-1");
        wrapper.blocks.push(PositionedBlock::new(
            "p-1",
            "Titulo-1",
            50.0,
            50.0,
            PositionedContent::heading(),
        ));

        Document {
            rows: vec![Row::columns("r-1", vec![column]), Row::Wrapper(wrapper)],
        }
    }

    #[test]
    fn test_lookups() {
        let doc = sample();
        assert_eq!(doc.row_index("w-1"), Some(1));
        assert!(doc.find_block("r-1", "c-1", "b-1").is_some());
        assert!(doc.find_block("r-1", "c-1", "missing").is_none());
        assert!(doc.find_column("w-1", "c-1").is_none());
        assert_eq!(doc.find_positioned("w-1", "p-1").map(|b| b.name.as_str()), Some("Titulo-1"));
    }

    #[test]
    fn test_ids_in_document_order() {
        let doc = sample();
        let ids: Vec<&str> = doc.ids().collect();
        assert_eq!(ids, vec!["r-1", "c-1", "b-1", "w-1", "p-1"]);
    }

    #[test]
    fn test_row_wire_tag() {
        let doc = sample();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["rows"][0]["type"], "columns");
        assert_eq!(value["rows"][1]["type"], "wrapper");
        assert_eq!(value["rows"][1]["height"], 300.0);

        let back = Document::from_value(value).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_next_name_skips_taken() {
        let doc = sample();
        let wrapper = doc.find_wrapper("w-1").unwrap();
        assert_eq!(wrapper.next_name(PositionedKind::HeadingInteractive), "Titulo-2");
        assert_eq!(wrapper.next_name(PositionedKind::EmojiInteractive), "Emoji-1");
        assert!(wrapper.name_taken("Titulo-1", None));
        assert!(!wrapper.name_taken("Titulo-1", Some("p-1")));
    }
}
