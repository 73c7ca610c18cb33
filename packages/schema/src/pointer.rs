//! Pointers into a document and the block-type lookup behind the style panel.

use serde::{Deserialize, Serialize};

use crate::block::BlockKind;
use crate::document::Document;
use crate::positioned::PositionedKind;

/// What is currently selected in the editor.
///
/// Each variant carries every id needed to re-locate its target, so a
/// pointer can be checked against any snapshot of the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SelectedElement {
    Column {
        row_id: String,
        column_id: String,
    },
    Primitive {
        row_id: String,
        column_id: String,
        block_id: String,
    },
    Wrapper {
        row_id: String,
    },
    WrapperPrimitive {
        row_id: String,
        block_id: String,
    },
}

impl SelectedElement {
    pub fn row_id(&self) -> &str {
        match self {
            SelectedElement::Column { row_id, .. }
            | SelectedElement::Primitive { row_id, .. }
            | SelectedElement::Wrapper { row_id }
            | SelectedElement::WrapperPrimitive { row_id, .. } => row_id,
        }
    }

    /// Whether the pointer still resolves in `doc`
    pub fn resolves_in(&self, doc: &Document) -> bool {
        block_type_of(Some(self), doc).is_some()
    }
}

/// Which style editor a selection calls for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Column,
    Wrapper,
    Primitive(BlockKind),
    /// A primitive whose `type` this schema does not know
    UnsupportedPrimitive,
    Positioned(PositionedKind),
}

/// Resolve a selection to the kind of entity it points at.
///
/// Returns `None` when nothing is selected or when the pointer no longer
/// resolves in `doc`; callers treat that as "deselect".
pub fn block_type_of(selection: Option<&SelectedElement>, doc: &Document) -> Option<BlockType> {
    match selection? {
        SelectedElement::Column { row_id, column_id } => {
            doc.find_column(row_id, column_id).map(|_| BlockType::Column)
        }
        SelectedElement::Primitive {
            row_id,
            column_id,
            block_id,
        } => doc
            .find_block(row_id, column_id, block_id)
            .map(|block| block.kind().map_or(BlockType::UnsupportedPrimitive, BlockType::Primitive)),
        SelectedElement::Wrapper { row_id } => doc.find_wrapper(row_id).map(|_| BlockType::Wrapper),
        SelectedElement::WrapperPrimitive { row_id, block_id } => doc
            .find_positioned(row_id, block_id)
            .map(|block| BlockType::Positioned(block.kind())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::PrimitiveBlock;
    use crate::document::{Column, Row, WrapperRow};
    use crate::positioned::{PositionedBlock, PositionedContent};

    fn doc() -> Document {
        let mut column = Column::new("c-1", 100.0);
        column.blocks.push(PrimitiveBlock::new("b-1", BlockKind::Button));
        let mut wrapper = WrapperRow::new("w-1");
        wrapper
            .blocks
            .push(PositionedBlock::new("p-1", "Emoji-1", 10.0, 10.0, PositionedContent::emoji("⭐")));
        Document {
            rows: vec![Row::columns("r-1", vec![column]), Row::Wrapper(wrapper)],
        }
    }

    #[test]
    fn test_block_type_of_each_variant() {
        let doc = doc();
        let column = SelectedElement::Column {
            row_id: "r-1".into(),
            column_id: "c-1".into(),
        };
        let primitive = SelectedElement::Primitive {
            row_id: "r-1".into(),
            column_id: "c-1".into(),
            block_id: "b-1".into(),
        };
        let wrapper = SelectedElement::Wrapper { row_id: "w-1".into() };
        let positioned = SelectedElement::WrapperPrimitive {
            row_id: "w-1".into(),
            block_id: "p-1".into(),
        };

        assert_eq!(block_type_of(Some(&column), &doc), Some(BlockType::Column));
        assert_eq!(
            block_type_of(Some(&primitive), &doc),
            Some(BlockType::Primitive(BlockKind::Button))
        );
        assert_eq!(block_type_of(Some(&wrapper), &doc), Some(BlockType::Wrapper));
        assert_eq!(
            block_type_of(Some(&positioned), &doc),
            Some(BlockType::Positioned(PositionedKind::EmojiInteractive))
        );
        assert_eq!(block_type_of(None, &doc), None);
    }

    #[test]
    fn test_stale_pointer_resolves_to_none() {
        let doc = doc();
        let stale = SelectedElement::Primitive {
            row_id: "r-1".into(),
            column_id: "c-1".into(),
            block_id: "deleted".into(),
        };
        assert_eq!(block_type_of(Some(&stale), &doc), None);
        assert!(!stale.resolves_in(&doc));

        // A wrapper id used as a column row does not resolve either
        let wrong_row = SelectedElement::Wrapper { row_id: "r-1".into() };
        assert!(!wrong_row.resolves_in(&doc));
    }
}
