/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use euclid::default::Point2D;
use uuid::Uuid;

use mindgraph::graph::commands::{
    self, AddNodeOptions, EdgeOptions, MoveNodeOptions, SetNodeTextOptions,
};
use mindgraph::graph::{EdgeKind, GraphDocument};
use mindgraph::history::History;

/// One open document plus its history engine, the way the editor shell
/// wires them together.
pub(crate) struct EditorHarness {
    pub(crate) history: History<GraphDocument>,
    pub(crate) doc: GraphDocument,
}

impl EditorHarness {
    pub(crate) fn new() -> Self {
        let history = History::new();
        commands::register_graph_commands(&history).expect("fresh engine accepts the builtins");
        Self {
            history,
            doc: GraphDocument::new(),
        }
    }

    pub(crate) fn add_node(&mut self, text: &str) -> Uuid {
        self.add_node_at(text, Point2D::new(0.0, 0.0))
    }

    pub(crate) fn add_node_at(&mut self, text: &str, position: Point2D<f32>) -> Uuid {
        let id = Uuid::new_v4();
        self.history
            .execute(
                &mut self.doc,
                commands::CMD_ADD_NODE,
                AddNodeOptions {
                    id: Some(id),
                    text: text.to_string(),
                    position,
                },
            )
            .expect("add_node is registered");
        id
    }

    pub(crate) fn connect(&mut self, from: Uuid, to: Uuid, kind: EdgeKind) {
        self.history
            .execute(
                &mut self.doc,
                commands::CMD_ADD_EDGE,
                EdgeOptions {
                    from_id: from,
                    to_id: to,
                    kind,
                },
            )
            .expect("add_edge is registered");
    }

    pub(crate) fn move_node(&mut self, id: Uuid, position: Point2D<f32>) {
        self.history
            .execute(
                &mut self.doc,
                commands::CMD_MOVE_NODE,
                MoveNodeOptions { id, position },
            )
            .expect("move_node is registered");
    }

    pub(crate) fn set_text(&mut self, id: Uuid, text: &str) {
        self.history
            .execute(
                &mut self.doc,
                commands::CMD_SET_NODE_TEXT,
                SetNodeTextOptions {
                    id,
                    text: text.to_string(),
                },
            )
            .expect("set_node_text is registered");
    }

    pub(crate) fn undo(&mut self) -> bool {
        self.history.undo(&mut self.doc)
    }

    pub(crate) fn redo(&mut self) -> bool {
        self.history.redo(&mut self.doc)
    }

    pub(crate) fn position_of(&self, id: Uuid) -> Point2D<f32> {
        self.doc
            .node_by_id(id)
            .map(|node| node.position)
            .expect("node exists")
    }
}
