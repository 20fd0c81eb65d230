//! Document editing through intents (drops, gestures, removals)

mod common;

use std::collections::HashSet;

use common::{leaf_cmds, test_model};
use emojiart::commands::Cmd;
use emojiart::messages::{DocumentMsg, DropItem, Msg};
use emojiart::model::{ChangeKind, Offset, Position};
use emojiart::update::update;

// ========================================================================
// Drops
// ========================================================================

#[test]
fn test_drop_url_sets_background() {
    let mut model = test_model();

    update(
        &mut model,
        Msg::from_drop(DropItem::Url("https://example.com/a.jpg".to_string()), 40),
    );

    assert_eq!(model.document().background(), Some("https://example.com/a.jpg"));
    assert!(model.document().is_empty());
}

#[test]
fn test_drop_glyph_places_token() {
    let mut model = test_model();
    let size = model.config.default_token_size;

    update(
        &mut model,
        Msg::from_drop(
            DropItem::Glyph {
                glyph: "🦋".to_string(),
                position: Position::new(-30, 12),
            },
            size,
        ),
    );

    let token = &model.document().tokens()[0];
    assert_eq!(token.glyph, "🦋");
    assert_eq!(token.position, Position::new(-30, 12));
    assert_eq!(token.size, 40);
}

// ========================================================================
// Ids
// ========================================================================

#[test]
fn test_ids_unique_and_below_next_id_across_removals() {
    let mut model = test_model();
    let mut issued = HashSet::new();

    for round in 0..5 {
        update(&mut model, Msg::add_token("🌲", Position::new(round, 0), 40));
        update(&mut model, Msg::add_token("🐝", Position::new(0, round), 40));
        let last = model.document().tokens().last().unwrap().id();
        update(&mut model, Msg::Document(DocumentMsg::RemoveToken(last)));

        for token in model.document().tokens() {
            issued.insert(token.id());
        }
        issued.insert(last);
    }

    let next_id = model.document().next_id();
    assert_eq!(issued.len(), 10);
    assert!(issued.iter().all(|id| *id < next_id));
    assert_eq!(model.document().len(), 5);
}

// ========================================================================
// Gestures
// ========================================================================

#[test]
fn test_drag_converts_input_space_offset() {
    let mut model = test_model();
    update(&mut model, Msg::add_token("🌲", Position::new(100, 100), 40));
    let id = model.document().tokens()[0].id();

    // Drag right and down on screen
    update(
        &mut model,
        Msg::Document(DocumentMsg::MoveTokens {
            ids: vec![id],
            offset: Offset::new(15.9, 20.0),
        }),
    );

    assert_eq!(
        model.document().get_token(id).unwrap().position,
        Position::new(115, 80)
    );
}

#[test]
fn test_pinch_skips_missing_ids() {
    let mut model = test_model();
    update(&mut model, Msg::add_token("🌲", Position::ZERO, 40));
    let id = model.document().tokens()[0].id();

    update(
        &mut model,
        Msg::Document(DocumentMsg::ResizeTokens {
            ids: vec![id, id + 100],
            factor: 0.5,
        }),
    );

    assert_eq!(model.document().get_token(id).unwrap().size, 20);
    assert_eq!(model.document().len(), 1);
}

#[test]
fn test_remove_missing_id_is_harmless() {
    let mut model = test_model();
    update(&mut model, Msg::add_token("🌲", Position::ZERO, 40));
    let tokens = model.document().tokens().to_vec();

    update(&mut model, Msg::Document(DocumentMsg::RemoveToken(999)));

    assert_eq!(model.document().tokens(), &tokens[..]);
}

// ========================================================================
// Notifications and follow-up commands
// ========================================================================

#[test]
fn test_subscriber_sees_each_intent() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut model = test_model();
    let kinds = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&kinds);
    model
        .engine
        .subscribe(move |event| sink.borrow_mut().push(event.kind));

    update(&mut model, Msg::add_token("🌲", Position::ZERO, 40));
    update(&mut model, Msg::set_background("a"));
    update(&mut model, Msg::undo());
    update(&mut model, Msg::redo());

    assert_eq!(
        *kinds.borrow(),
        vec![
            ChangeKind::Tokens,
            ChangeKind::Background,
            ChangeKind::Undo,
            ChangeKind::Redo
        ]
    );
}

#[test]
fn test_edit_requests_redraw_without_autosave_path() {
    let mut model = test_model();

    let cmds = leaf_cmds(update(&mut model, Msg::add_token("🌲", Position::ZERO, 40)));

    assert_eq!(cmds, vec![Cmd::Redraw]);
}

#[test]
fn test_bounding_box_tracks_edits() {
    let mut model = test_model();
    assert!(model.document().bounding_box().is_none());

    update(&mut model, Msg::add_token("🌲", Position::new(-50, 0), 20));
    update(&mut model, Msg::add_token("🐝", Position::new(50, 0), 20));

    let bounds = model.document().bounding_box().unwrap();
    assert_eq!((bounds.x, bounds.width), (-60, 120));
    assert_eq!(bounds.center(), Position::new(0, 0));
}
