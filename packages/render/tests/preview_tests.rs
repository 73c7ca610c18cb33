use mailcraft_render::{render, VNode};
use mailcraft_schema::{
    BlockContent, BlockKind, Column, Document, PositionedBlock, PositionedContent, PrimitiveBlock, Row, WrapperRow,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn every_kind_document() -> Document {
    let mut left = Column::new("c-1", 50.0);
    let mut right = Column::new("c-2", 50.0);
    for (i, kind) in BlockKind::ALL.into_iter().enumerate() {
        // Timers default to "a week from now"; pin them so renders compare equal
        let mut block = PrimitiveBlock::new(format!("b-{}", i), kind);
        if let BlockContent::Timer(timer) = &mut block.content {
            timer.target = "2030-01-01T00:00:00Z".parse().unwrap();
        }
        if i % 2 == 0 {
            left.blocks.push(block);
        } else {
            right.blocks.push(block);
        }
    }

    let mut wrapper = WrapperRow::new("w-1");
    wrapper
        .blocks
        .push(PositionedBlock::new("p-1", "Titulo-1", 30.0, 30.0, PositionedContent::heading()));
    wrapper
        .blocks
        .push(PositionedBlock::new("p-2", "Emoji-1", 70.0, 60.0, PositionedContent::emoji("🎈")));

    Document {
        rows: vec![Row::columns("r-1", vec![left, right]), Row::Wrapper(wrapper)],
    }
}

#[test]
fn test_unsupported_block_renders_placeholder_and_siblings() {
    let mut doc = every_kind_document();
    let hologram: PrimitiveBlock = serde_json::from_value(json!({
        "id": "b-x",
        "type": "quantum-hologram",
        "payload": { "qubits": 7 }
    }))
    .unwrap();
    if let Row::Columns(row) = &mut doc.rows[0] {
        row.columns[0].blocks.insert(1, hologram);
    }

    let tree = render(&doc);

    let placeholder = tree.find_by_key("b-x").expect("placeholder rendered");
    assert!(matches!(placeholder, VNode::Placeholder { kind, .. } if kind == "quantum-hologram"));

    for i in 0..BlockKind::ALL.len() {
        let key = format!("b-{}", i);
        let node = tree.find_by_key(&key).unwrap_or_else(|| panic!("{} missing", key));
        assert!(node.has_class("mc-block"));
    }
    assert_eq!(tree.children().len(), 2);
}

#[test]
fn test_json_round_trip_renders_identically() {
    let doc = every_kind_document();
    let reloaded = Document::from_json(&doc.to_json().unwrap()).unwrap();
    assert_eq!(render(&reloaded), render(&doc));
}

#[test]
fn test_columns_and_wrapper_geometry() {
    let doc = every_kind_document();
    let tree = render(&doc);

    let column = tree.find_by_key("c-2").unwrap();
    assert_eq!(column.tag(), Some("td"));
    assert_eq!(column.style("width"), Some("50%"));

    let frame = tree.find_by_key("w-1:frame").unwrap();
    assert_eq!(frame.style("height"), Some("300px"));
    assert_eq!(frame.style("position"), Some("relative"));

    // later blocks paint on top
    let first = tree.find_by_key("p-1").unwrap();
    let second = tree.find_by_key("p-2").unwrap();
    assert_eq!(first.style("z-index"), Some("1"));
    assert_eq!(second.style("z-index"), Some("2"));
}

#[test]
fn test_no_editor_affordances_in_preview() {
    let tree = render(&every_kind_document());
    assert_eq!(tree.count(|n| n.attr("data-mc-target").is_some()), 0);
}
