/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Undoable graph commands.
//!
//! Registered into a `History<GraphDocument>` at editor setup. Every
//! mutation of the document flows through one of these commands so it lands
//! in the undo history; payloads address nodes by stable `Uuid`.
//!
//! Missing targets are tolerated with a warning rather than an error: a
//! stale id can legitimately arrive from queued UI work after the node is
//! already gone.

use euclid::default::{Point2D, Vector2D};
use uuid::Uuid;

use super::{EdgeKind, EdgeSnapshot, GraphDocument, NodeSnapshot};
use crate::history::{History, HistoryError};

pub const CMD_ADD_NODE: &str = "graph.add_node";
pub const CMD_REMOVE_NODE: &str = "graph.remove_node";
pub const CMD_MOVE_NODE: &str = "graph.move_node";
pub const CMD_RESIZE_NODE: &str = "graph.resize_node";
pub const CMD_SET_NODE_TEXT: &str = "graph.set_node_text";
pub const CMD_SET_NODE_LAYER: &str = "graph.set_node_layer";
pub const CMD_SET_NODE_PINNED: &str = "graph.set_node_pinned";
pub const CMD_ADD_EDGE: &str = "graph.add_edge";
pub const CMD_REMOVE_EDGE: &str = "graph.remove_edge";

#[derive(Debug, Clone)]
pub struct AddNodeOptions {
    /// Identity to create under; `None` lets apply mint one. Revert pins
    /// the minted id back into the options so redo recreates the same
    /// logical node.
    pub id: Option<Uuid>,
    pub text: String,
    pub position: Point2D<f32>,
}

#[derive(Debug, Clone)]
pub struct AddNodeRevert {
    pub id: Uuid,
}

#[derive(Debug, Clone)]
pub struct RemoveNodeOptions {
    pub id: Uuid,
}

#[derive(Debug, Clone)]
pub struct RemoveNodeRevert {
    /// `None` when the target was already gone and apply did nothing.
    pub node: Option<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Debug, Clone)]
pub struct MoveNodeOptions {
    pub id: Uuid,
    pub position: Point2D<f32>,
}

#[derive(Debug, Clone)]
pub struct ResizeNodeOptions {
    pub id: Uuid,
    pub size: Vector2D<f32>,
}

#[derive(Debug, Clone)]
pub struct SetNodeTextOptions {
    pub id: Uuid,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct SetNodeLayerOptions {
    pub id: Uuid,
    pub layer: i32,
}

#[derive(Debug, Clone)]
pub struct SetNodePinnedOptions {
    pub id: Uuid,
    pub pinned: bool,
}

#[derive(Debug, Clone)]
pub struct EdgeOptions {
    pub from_id: Uuid,
    pub to_id: Uuid,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone)]
pub struct RemoveEdgeRevert {
    /// The edge actually removed, if any.
    pub edge: Option<EdgeSnapshot>,
}

/// Register the built-in command set against a history engine.
pub fn register_graph_commands(history: &History<GraphDocument>) -> Result<(), HistoryError> {
    history.register_command(CMD_ADD_NODE, apply_add_node, revert_add_node)?;
    history.register_command(CMD_REMOVE_NODE, apply_remove_node, revert_remove_node)?;
    history.register_command(CMD_MOVE_NODE, apply_move_node, revert_move_node)?;
    history.register_command(CMD_RESIZE_NODE, apply_resize_node, revert_resize_node)?;
    history.register_command(CMD_SET_NODE_TEXT, apply_set_node_text, revert_set_node_text)?;
    history.register_command(CMD_SET_NODE_LAYER, apply_set_node_layer, revert_set_node_layer)?;
    history.register_command(
        CMD_SET_NODE_PINNED,
        apply_set_node_pinned,
        revert_set_node_pinned,
    )?;
    history.register_command(CMD_ADD_EDGE, apply_add_edge, revert_add_edge)?;
    history.register_command(CMD_REMOVE_EDGE, apply_remove_edge, revert_remove_edge)?;
    Ok(())
}

fn apply_add_node(doc: &mut GraphDocument, options: &AddNodeOptions) -> AddNodeRevert {
    let id = options.id.unwrap_or_else(Uuid::new_v4);
    doc.add_node_with_id(id, options.text.clone(), options.position);
    AddNodeRevert { id }
}

fn revert_add_node(doc: &mut GraphDocument, revert: &AddNodeRevert) -> Option<AddNodeOptions> {
    let Some((node, _edges)) = doc.remove_node_by_id(revert.id) else {
        log::warn!("add_node revert: node {} already gone", revert.id);
        return None;
    };
    // Pin the minted identity so a redo recreates the same logical node.
    Some(AddNodeOptions {
        id: Some(node.node_id),
        text: node.text,
        position: Point2D::new(node.position_x, node.position_y),
    })
}

fn apply_remove_node(doc: &mut GraphDocument, options: &RemoveNodeOptions) -> RemoveNodeRevert {
    match doc.remove_node_by_id(options.id) {
        Some((node, edges)) => RemoveNodeRevert {
            node: Some(node),
            edges,
        },
        None => {
            log::warn!("remove_node: no node with id {}", options.id);
            RemoveNodeRevert {
                node: None,
                edges: Vec::new(),
            }
        },
    }
}

fn revert_remove_node(
    doc: &mut GraphDocument,
    revert: &RemoveNodeRevert,
) -> Option<RemoveNodeOptions> {
    if let Some(node) = &revert.node {
        doc.restore_node(node);
        for edge in &revert.edges {
            if doc.add_edge_by_ids(edge.from_id, edge.to_id, edge.kind).is_none() {
                log::warn!(
                    "remove_node revert: dropped edge {} -> {} (endpoint missing)",
                    edge.from_id,
                    edge.to_id
                );
            }
        }
    }
    None
}

fn apply_move_node(doc: &mut GraphDocument, options: &MoveNodeOptions) -> MoveNodeOptions {
    match doc.node_by_id_mut(options.id) {
        Some(node) => MoveNodeOptions {
            id: options.id,
            position: std::mem::replace(&mut node.position, options.position),
        },
        None => {
            log::warn!("move_node: no node with id {}", options.id);
            options.clone()
        },
    }
}

fn revert_move_node(doc: &mut GraphDocument, revert: &MoveNodeOptions) -> Option<MoveNodeOptions> {
    if let Some(node) = doc.node_by_id_mut(revert.id) {
        node.position = revert.position;
    }
    None
}

fn apply_resize_node(doc: &mut GraphDocument, options: &ResizeNodeOptions) -> ResizeNodeOptions {
    match doc.node_by_id_mut(options.id) {
        Some(node) => ResizeNodeOptions {
            id: options.id,
            size: std::mem::replace(&mut node.size, options.size),
        },
        None => {
            log::warn!("resize_node: no node with id {}", options.id);
            options.clone()
        },
    }
}

fn revert_resize_node(
    doc: &mut GraphDocument,
    revert: &ResizeNodeOptions,
) -> Option<ResizeNodeOptions> {
    if let Some(node) = doc.node_by_id_mut(revert.id) {
        node.size = revert.size;
    }
    None
}

fn apply_set_node_text(
    doc: &mut GraphDocument,
    options: &SetNodeTextOptions,
) -> SetNodeTextOptions {
    match doc.node_by_id_mut(options.id) {
        Some(node) => SetNodeTextOptions {
            id: options.id,
            text: std::mem::replace(&mut node.text, options.text.clone()),
        },
        None => {
            log::warn!("set_node_text: no node with id {}", options.id);
            options.clone()
        },
    }
}

fn revert_set_node_text(
    doc: &mut GraphDocument,
    revert: &SetNodeTextOptions,
) -> Option<SetNodeTextOptions> {
    if let Some(node) = doc.node_by_id_mut(revert.id) {
        node.text = revert.text.clone();
    }
    None
}

fn apply_set_node_layer(
    doc: &mut GraphDocument,
    options: &SetNodeLayerOptions,
) -> SetNodeLayerOptions {
    match doc.node_by_id_mut(options.id) {
        Some(node) => SetNodeLayerOptions {
            id: options.id,
            layer: std::mem::replace(&mut node.layer, options.layer),
        },
        None => {
            log::warn!("set_node_layer: no node with id {}", options.id);
            options.clone()
        },
    }
}

fn revert_set_node_layer(
    doc: &mut GraphDocument,
    revert: &SetNodeLayerOptions,
) -> Option<SetNodeLayerOptions> {
    if let Some(node) = doc.node_by_id_mut(revert.id) {
        node.layer = revert.layer;
    }
    None
}

fn apply_set_node_pinned(
    doc: &mut GraphDocument,
    options: &SetNodePinnedOptions,
) -> SetNodePinnedOptions {
    match doc.node_by_id_mut(options.id) {
        Some(node) => SetNodePinnedOptions {
            id: options.id,
            pinned: std::mem::replace(&mut node.pinned, options.pinned),
        },
        None => {
            log::warn!("set_node_pinned: no node with id {}", options.id);
            options.clone()
        },
    }
}

fn revert_set_node_pinned(
    doc: &mut GraphDocument,
    revert: &SetNodePinnedOptions,
) -> Option<SetNodePinnedOptions> {
    if let Some(node) = doc.node_by_id_mut(revert.id) {
        node.pinned = revert.pinned;
    }
    None
}

fn apply_add_edge(doc: &mut GraphDocument, options: &EdgeOptions) -> EdgeOptions {
    if doc
        .add_edge_by_ids(options.from_id, options.to_id, options.kind)
        .is_none()
    {
        log::warn!(
            "add_edge: endpoint missing for {} -> {}",
            options.from_id,
            options.to_id
        );
    }
    options.clone()
}

fn revert_add_edge(doc: &mut GraphDocument, revert: &EdgeOptions) -> Option<EdgeOptions> {
    if !doc.remove_edge_by_ids(revert.from_id, revert.to_id, revert.kind) {
        log::warn!(
            "add_edge revert: edge {} -> {} already gone",
            revert.from_id,
            revert.to_id
        );
    }
    None
}

fn apply_remove_edge(doc: &mut GraphDocument, options: &EdgeOptions) -> RemoveEdgeRevert {
    if doc.remove_edge_by_ids(options.from_id, options.to_id, options.kind) {
        RemoveEdgeRevert {
            edge: Some(EdgeSnapshot {
                from_id: options.from_id,
                to_id: options.to_id,
                kind: options.kind,
            }),
        }
    } else {
        log::warn!(
            "remove_edge: no {} -> {} edge to remove",
            options.from_id,
            options.to_id
        );
        RemoveEdgeRevert { edge: None }
    }
}

fn revert_remove_edge(doc: &mut GraphDocument, revert: &RemoveEdgeRevert) -> Option<EdgeOptions> {
    if let Some(edge) = &revert.edge
        && doc.add_edge_by_ids(edge.from_id, edge.to_id, edge.kind).is_none()
    {
        log::warn!(
            "remove_edge revert: endpoint missing for {} -> {}",
            edge.from_id,
            edge.to_id
        );
    }
    None
}
