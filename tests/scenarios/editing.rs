/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::cell::Cell;
use std::rc::Rc;

use crate::harness::EditorHarness;
use mindgraph::graph::EdgeKind;
use mindgraph::graph::commands::{self, RemoveNodeOptions};
use mindgraph::history::{HistoryEvent, HistoryEventKind};

#[test]
fn test_remove_branch_undo_restores_structure() {
    let mut harness = EditorHarness::new();
    let root = harness.add_node("# Topic");
    let left = harness.add_node("left branch");
    let right = harness.add_node("right branch");
    harness.connect(root, left, EdgeKind::Tree);
    harness.connect(root, right, EdgeKind::Tree);
    harness.connect(left, right, EdgeKind::Link);

    harness
        .history
        .execute(
            &mut harness.doc,
            commands::CMD_REMOVE_NODE,
            RemoveNodeOptions { id: left },
        )
        .unwrap();
    assert_eq!(harness.doc.node_count(), 2);
    assert_eq!(harness.doc.edge_count(), 1, "both edges touching `left` removed");

    harness.undo();
    assert_eq!(harness.doc.node_count(), 3);
    assert_eq!(harness.doc.edge_count(), 3);

    let root_key = harness.doc.key_by_id(root).unwrap();
    let left_key = harness.doc.key_by_id(left).unwrap();
    let right_key = harness.doc.key_by_id(right).unwrap();
    assert!(harness.doc.has_edge_between(root_key, left_key));
    assert!(harness.doc.has_edge_between(left_key, right_key));
    assert!(harness.doc.has_edge_between(root_key, right_key));
}

#[test]
fn test_remove_then_redo_round_trips_twice() {
    let mut harness = EditorHarness::new();
    let node = harness.add_node("volatile");
    harness
        .history
        .execute(
            &mut harness.doc,
            commands::CMD_REMOVE_NODE,
            RemoveNodeOptions { id: node },
        )
        .unwrap();

    for _ in 0..2 {
        harness.undo();
        assert!(harness.doc.key_by_id(node).is_some());
        harness.redo();
        assert!(harness.doc.key_by_id(node).is_none());
    }
}

#[test]
fn test_toolbar_indicator_recomputes_from_events() {
    let mut harness = EditorHarness::new();

    // A "can undo" toolbar indicator: recomputed on every undo-relevant
    // transition, never stored by the engine.
    let dirty = Rc::new(Cell::new(false));
    for kind in [
        HistoryEventKind::Change,
        HistoryEventKind::Undo,
        HistoryEventKind::Redo,
    ] {
        let flag = Rc::clone(&dirty);
        harness.history.on(kind, move |_: &HistoryEvent| {
            flag.set(true);
        });
    }

    harness.add_node("first");
    assert!(dirty.get(), "execute must notify observers");

    dirty.set(false);
    harness.undo();
    assert!(dirty.get(), "undo must notify observers");

    dirty.set(false);
    harness.redo();
    assert!(dirty.get(), "redo must notify observers");
}

#[test]
fn test_unregistered_command_is_tolerated() {
    let mut harness = EditorHarness::new();
    // Default policy warns and ignores; setup races must not poison the
    // document or the history.
    harness
        .history
        .execute(&mut harness.doc, "plugin.not_loaded_yet", 42u32)
        .unwrap();
    assert_eq!(harness.history.undo_stack_len(), 0);
}
