use mailcraft_editor::canvas::{ACTION_ATTR, HANDLE_ATTR, TARGET_ATTR};
use mailcraft_editor::{render_canvas, CanvasAction, CanvasEvent, CanvasOptions, EditSession, Handle, HitTarget};
use mailcraft_render::{render, VNode};
use mailcraft_schema::{BlockKind, PositionedContent};
use pretty_assertions::assert_eq;

fn sample_session() -> (EditSession, String, String) {
    let mut session = EditSession::new("canvas");
    let row_id = session.add_columns_row(2).unwrap();
    let column_id = session.document().rows[0].as_columns().unwrap().columns[0].id.clone();
    for kind in [BlockKind::Heading, BlockKind::Image, BlockKind::Button] {
        session.add_block(&row_id, &column_id, kind).unwrap();
    }
    let wrapper_id = session.add_wrapper_row().unwrap();
    session
        .add_positioned(&wrapper_id, 20.0, 40.0, PositionedContent::heading())
        .unwrap();
    session
        .add_positioned(&wrapper_id, 70.0, 60.0, PositionedContent::emoji("🎁"))
        .unwrap();
    (session, row_id, wrapper_id)
}

fn keyed(tree: &VNode) -> Vec<String> {
    let mut keys = Vec::new();
    tree.walk(&mut |n: &VNode| {
        if let Some(key) = n.key() {
            keys.push(key.to_string());
        }
    });
    keys
}

#[test]
fn test_canvas_read_path_matches_preview() {
    let (session, _, _) = sample_session();
    let preview = render(session.document());
    let canvas = render_canvas(&session, &CanvasOptions::default());

    // every node the preview renders appears in the canvas with the same geometry
    for key in keyed(&preview) {
        let expected = preview.find_by_key(&key).unwrap();
        let actual = canvas
            .find_by_key(&key)
            .unwrap_or_else(|| panic!("{} missing from canvas", key));
        if let (VNode::Element { styles: want, .. }, VNode::Element { styles: got, .. }) = (expected, actual) {
            for (property, value) in want {
                assert_eq!(got.get(property), Some(value), "{} on {}", property, key);
            }
        }
    }
}

#[test]
fn test_every_entity_is_a_hit_target() {
    let (session, _, _) = sample_session();
    let canvas = render_canvas(&session, &CanvasOptions::default());

    let mut targets = Vec::new();
    canvas.walk(&mut |n: &VNode| {
        if let Some(target) = n.attr(TARGET_ATTR) {
            targets.push(target.parse::<HitTarget>().expect("parsable target"));
        }
    });

    let count = |pred: fn(&HitTarget) -> bool| targets.iter().filter(|t| pred(t)).count();
    assert_eq!(count(|t| matches!(t, HitTarget::Row { .. })), 2);
    assert_eq!(count(|t| matches!(t, HitTarget::Column { .. })), 2);
    assert_eq!(count(|t| matches!(t, HitTarget::Block { .. })), 3);
    assert_eq!(count(|t| matches!(t, HitTarget::Wrapper { .. })), 1);
    assert_eq!(count(|t| matches!(t, HitTarget::Positioned { .. })), 2);
}

#[test]
fn test_every_action_attribute_decodes() {
    let (mut session, _, wrapper_id) = sample_session();
    session.click_wrapper(&wrapper_id, 50.0, 50.0);
    session.choose_wrapper_edit();
    let canvas = render_canvas(&session, &CanvasOptions::default());

    let mut actions = 0;
    canvas.walk(&mut |n: &VNode| {
        if let Some(encoded) = n.attr(ACTION_ATTR) {
            assert!(CanvasAction::decode(encoded).is_some(), "bad action {}", encoded);
            actions += 1;
        }
        if let Some(handle) = n.attr(HANDLE_ATTR) {
            assert!(handle.parse::<Handle>().is_ok());
        }
    });
    assert!(actions > 0);
}

#[test]
fn test_selection_ring_follows_selection() {
    let (mut session, row_id, _) = sample_session();
    let canvas = render_canvas(&session, &CanvasOptions::default());
    assert_eq!(canvas.count(|n| n.has_class("mc-selected")), 0);

    let column_id = session.document().rows[0].as_columns().unwrap().columns[1].id.clone();
    session
        .dispatch(CanvasEvent::Click {
            target: HitTarget::Column {
                row_id,
                column_id: column_id.clone(),
            },
            pointer: None,
            bounds: None,
        })
        .unwrap();

    let canvas = render_canvas(&session, &CanvasOptions::default());
    let selected = canvas.find(|n| n.has_class("mc-selected")).unwrap();
    assert_eq!(selected.key(), Some(column_id.as_str()));
    assert_eq!(selected.style("outline"), Some("2px solid #2563eb"));
}

#[test]
fn test_layer_panel_only_for_selected_wrapper() {
    let (mut session, _, wrapper_id) = sample_session();
    let layers_key = format!("{}:layers", wrapper_id);
    assert!(render_canvas(&session, &CanvasOptions::default())
        .find_by_key(&layers_key)
        .is_none());

    session.click_wrapper(&wrapper_id, 5.0, 5.0);
    session.choose_wrapper_edit();
    let canvas = render_canvas(&session, &CanvasOptions::default());
    let panel = canvas.find_by_key(&layers_key).unwrap();

    // top-most layer first
    let names: Vec<&str> = panel
        .children()
        .iter()
        .filter_map(|item| item.children().first().and_then(|input| input.attr("value")))
        .collect();
    assert_eq!(names, vec!["Emoji-1", "Titulo-1"]);
}

#[test]
fn test_modal_follows_mode() {
    let (mut session, _, wrapper_id) = sample_session();

    session.dispatch(CanvasEvent::Action(CanvasAction::AddRow)).unwrap();
    let canvas = render_canvas(&session, &CanvasOptions::default());
    let modal = canvas.find_by_key("modal").unwrap();
    assert_eq!(modal.count(|n| n.has_class("mc-choice")), 5);

    session.dispatch(CanvasEvent::Action(CanvasAction::Cancel)).unwrap();
    session.click_wrapper(&wrapper_id, 40.0, 40.0);
    let canvas = render_canvas(&session, &CanvasOptions::default());
    assert!(canvas.text_content().contains("Edit container"));
    let marker = canvas.find(|n| n.has_class("mc-pending-marker")).unwrap();
    assert_eq!(marker.style("left"), Some("40%"));
}

#[test]
fn test_canvas_keeps_unsupported_placeholder_clickable() {
    let (session, row_id, _) = sample_session();
    let mut doc = session.document().clone();
    let hologram: mailcraft_schema::PrimitiveBlock = serde_json::from_value(serde_json::json!({
        "id": "holo-1",
        "type": "quantum-hologram",
        "payload": {}
    }))
    .unwrap();
    if let mailcraft_schema::Row::Columns(row) = &mut doc.rows[0] {
        row.columns[1].blocks.push(hologram);
    }
    let session = EditSession::with_document("canvas-2", doc);

    let canvas = render_canvas(&session, &CanvasOptions::default());
    let hit = canvas.find_by_key("holo-1:hit").unwrap();
    assert!(hit.attr(TARGET_ATTR).unwrap().starts_with(&format!("block:{}/", row_id)));
    assert!(matches!(hit.children()[0], VNode::Placeholder { .. }));
}
