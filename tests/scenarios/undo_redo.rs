/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use euclid::default::Point2D;

use crate::harness::EditorHarness;

#[test]
fn test_execute_pushes_and_clears_redo() {
    let mut harness = EditorHarness::new();
    harness.add_node("a");
    assert_eq!(harness.history.undo_stack_len(), 1);
    assert_eq!(harness.history.redo_stack_len(), 0);

    harness.add_node("b");
    assert_eq!(harness.history.undo_stack_len(), 2);
    assert_eq!(harness.history.redo_stack_len(), 0);

    // Undo to create redo stack
    harness.undo();
    assert_eq!(harness.history.undo_stack_len(), 1);
    assert_eq!(harness.history.redo_stack_len(), 1);

    // A new action should clear the redo stack
    harness.add_node("c");
    assert_eq!(harness.history.undo_stack_len(), 2);
    assert_eq!(
        harness.history.redo_stack_len(),
        0,
        "redo stack should be cleared after a new action"
    );
}

#[test]
fn test_undo_stack_trimmed_at_max() {
    let mut harness = EditorHarness::new();
    let limit = harness.history.history_limit().get();

    for i in 0..(limit + 1) {
        harness.add_node(&format!("node {i}"));
    }

    assert!(
        harness.history.undo_stack_len() <= limit,
        "undo stack should be trimmed to max {limit}, got {}",
        harness.history.undo_stack_len()
    );
}

#[test]
fn test_undo_reverts_to_previous_document() {
    let mut harness = EditorHarness::new();
    let root = harness.add_node("# Root");
    harness.move_node(root, Point2D::new(80.0, 20.0));

    harness.undo();
    assert_eq!(harness.position_of(root), Point2D::new(0.0, 0.0));

    harness.undo();
    assert_eq!(harness.doc.node_count(), 0, "undoing the add removes the node");

    harness.redo();
    harness.redo();
    assert_eq!(harness.position_of(root), Point2D::new(80.0, 20.0));
}

#[test]
fn test_undo_on_empty_history_is_a_noop() {
    let mut harness = EditorHarness::new();
    assert!(!harness.undo());
    assert!(!harness.redo());
    assert!(!harness.history.can_undo());
    assert!(!harness.history.can_redo());
}

#[test]
fn test_text_edits_undo_in_reverse_order() {
    let mut harness = EditorHarness::new();
    let node = harness.add_node("v1");
    harness.set_text(node, "v2");
    harness.set_text(node, "v3");

    harness.undo();
    assert_eq!(harness.doc.node_by_id(node).unwrap().text, "v2");
    harness.undo();
    assert_eq!(harness.doc.node_by_id(node).unwrap().text, "v1");
}
