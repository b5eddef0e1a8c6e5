/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use euclid::default::Point2D;

use crate::harness::EditorHarness;
use mindgraph::history::{BatchToken, HistoryError};

#[test]
fn test_drag_gesture_batches_into_one_undo_step() {
    let mut harness = EditorHarness::new();
    let node = harness.add_node("dragged");

    // A drag emits one move per frame; the gesture opens a batch so the
    // whole drag undoes as a unit.
    let token = BatchToken::new();
    harness.history.start_batch(token).unwrap();
    for step in 1..=10 {
        harness.move_node(node, Point2D::new(step as f32 * 10.0, 0.0));
    }
    harness.history.stop_batch(token).unwrap();

    assert_eq!(harness.history.undo_stack_len(), 2, "add + one batched drag");
    assert_eq!(harness.position_of(node), Point2D::new(100.0, 0.0));

    harness.undo();
    assert_eq!(
        harness.position_of(node),
        Point2D::new(0.0, 0.0),
        "one undo rewinds the entire drag"
    );

    harness.redo();
    assert_eq!(harness.position_of(node), Point2D::new(100.0, 0.0));
}

#[test]
fn test_empty_batch_leaves_no_record() {
    let harness = EditorHarness::new();
    let token = BatchToken::new();
    harness.history.start_batch(token).unwrap();
    harness.history.stop_batch(token).unwrap();
    assert_eq!(harness.history.undo_stack_len(), 0);
}

#[test]
fn test_mismatched_stop_batch_is_rejected() {
    let harness = EditorHarness::new();
    let open = BatchToken::new();
    let other = BatchToken::new();
    harness.history.start_batch(open).unwrap();

    let error = harness.history.stop_batch(other).unwrap_err();
    assert!(matches!(error, HistoryError::BatchMismatch { .. }));
    assert_eq!(harness.history.open_batch_tokens(), vec![open]);

    harness.history.stop_batch(open).unwrap();
}

#[test]
fn test_nested_paste_batch_stays_grouped() {
    let mut harness = EditorHarness::new();

    // Pasting a subtree inside a larger "import" gesture: the outer batch
    // owns the inner paste as a single sub-record.
    let import = BatchToken::new();
    let paste = BatchToken::new();
    harness.history.start_batch(import).unwrap();
    let root = harness.add_node("import root");

    harness.history.start_batch(paste).unwrap();
    let child_a = harness.add_node("pasted a");
    let child_b = harness.add_node("pasted b");
    harness.history.stop_batch(paste).unwrap();

    harness.connect(root, child_a, mindgraph::graph::EdgeKind::Tree);
    harness.connect(root, child_b, mindgraph::graph::EdgeKind::Tree);
    harness.history.stop_batch(import).unwrap();

    assert_eq!(harness.history.undo_stack_len(), 1);
    assert_eq!(harness.doc.node_count(), 3);
    assert_eq!(harness.doc.edge_count(), 2);

    harness.undo();
    assert_eq!(harness.doc.node_count(), 0, "one undo rewinds the whole import");
    assert_eq!(harness.doc.edge_count(), 0);

    harness.redo();
    assert_eq!(harness.doc.node_count(), 3);
    assert_eq!(harness.doc.edge_count(), 2);
}

#[test]
fn test_execute_batch_wrapper_closes_scope() {
    let mut harness = EditorHarness::new();
    let node = harness.add_node("n");

    let doc = &mut harness.doc;
    harness
        .history
        .execute_batch(doc, BatchToken::new(), |history, doc| {
            history
                .execute(
                    &mut *doc,
                    mindgraph::graph::commands::CMD_MOVE_NODE,
                    mindgraph::graph::commands::MoveNodeOptions {
                        id: node,
                        position: Point2D::new(5.0, 5.0),
                    },
                )
                .unwrap();
        })
        .unwrap();

    assert!(harness.history.open_batch_tokens().is_empty());
    assert_eq!(harness.history.undo_stack_len(), 2);
}
