/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Mind-map document model.
//!
//! Core structures:
//! - `GraphDocument`: container backed by petgraph::StableGraph
//! - `MapNode`: markdown node with position, size, layer, and pin state
//! - `EdgeKind`: connection type between nodes (tree hierarchy, cross link)
//!
//! Commands address nodes by their stable `Uuid`, never by petgraph index:
//! undoing a removal recreates the node under a fresh index while keeping
//! its logical identity.

use std::collections::HashMap;

use euclid::default::{Point2D, Vector2D};
use petgraph::Directed;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod commands;

/// Node handle (petgraph NodeIndex — survives unrelated deletions, but not
/// a remove/recreate cycle; use `Uuid` for durable references).
pub type NodeKey = NodeIndex;

/// Edge handle (petgraph EdgeIndex)
pub type EdgeKey = EdgeIndex;

/// Default size for freshly created nodes, in map units.
pub const DEFAULT_NODE_SIZE: (f32, f32) = (160.0, 48.0);

/// A mind-map node.
#[derive(Debug, Clone, PartialEq)]
pub struct MapNode {
    /// Stable node identity. Survives remove/recreate cycles driven by undo.
    pub id: Uuid,

    /// Markdown body. The first non-empty line doubles as the display title.
    pub text: String,

    /// Position in map space.
    pub position: Point2D<f32>,

    /// Rendered size in map space.
    pub size: Vector2D<f32>,

    /// Z-order layer. Higher layers draw above lower ones.
    pub layer: i32,

    /// Whether the node is pinned (excluded from automatic layout).
    pub pinned: bool,
}

impl MapNode {
    /// Display title: first non-empty line of the markdown body.
    pub fn title(&self) -> &str {
        self.text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }
}

/// Type of edge connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Parent-to-child mind-map hierarchy
    Tree,

    /// Explicit cross-reference between branches
    Link,
}

/// Read-only view of an edge (built from petgraph edge references)
#[derive(Debug, Clone, Copy)]
pub struct EdgeView {
    pub from: NodeKey,
    pub to: NodeKey,
    pub kind: EdgeKind,
}

/// Persistable snapshot of one node. Doubles as the revert payload for node
/// removal and as the surface outer storage layers serialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub node_id: Uuid,
    pub text: String,
    pub position_x: f32,
    pub position_y: f32,
    pub width: f32,
    pub height: f32,
    pub layer: i32,
    pub pinned: bool,
}

impl NodeSnapshot {
    fn from_node(node: &MapNode) -> Self {
        Self {
            node_id: node.id,
            text: node.text.clone(),
            position_x: node.position.x,
            position_y: node.position.y,
            width: node.size.x,
            height: node.size.y,
            layer: node.layer,
            pinned: node.pinned,
        }
    }
}

/// Persistable snapshot of one edge, addressed by stable node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub from_id: Uuid,
    pub to_id: Uuid,
    pub kind: EdgeKind,
}

/// Mind-map document backed by petgraph::StableGraph
#[derive(Clone, Default)]
pub struct GraphDocument {
    /// The underlying petgraph stable graph
    inner: StableGraph<MapNode, EdgeKind, Directed>,

    /// Stable UUID to node mapping.
    id_to_node: HashMap<Uuid, NodeKey>,
}

impl GraphDocument {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new node with a minted identity
    pub fn add_node(&mut self, text: String, position: Point2D<f32>) -> NodeKey {
        self.add_node_with_id(Uuid::new_v4(), text, position)
    }

    /// Add a node under a pre-existing UUID.
    pub fn add_node_with_id(&mut self, id: Uuid, text: String, position: Point2D<f32>) -> NodeKey {
        let key = self.inner.add_node(MapNode {
            id,
            text,
            position,
            size: Vector2D::new(DEFAULT_NODE_SIZE.0, DEFAULT_NODE_SIZE.1),
            layer: 0,
            pinned: false,
        });
        self.id_to_node.insert(id, key);
        key
    }

    /// Recreate a node from a snapshot, restoring every field.
    pub fn restore_node(&mut self, snapshot: &NodeSnapshot) -> NodeKey {
        let key = self.inner.add_node(MapNode {
            id: snapshot.node_id,
            text: snapshot.text.clone(),
            position: Point2D::new(snapshot.position_x, snapshot.position_y),
            size: Vector2D::new(snapshot.width, snapshot.height),
            layer: snapshot.layer,
            pinned: snapshot.pinned,
        });
        self.id_to_node.insert(snapshot.node_id, key);
        key
    }

    /// Remove a node and all its connected edges.
    ///
    /// Returns a snapshot of the node and of every incident edge so the
    /// removal can be reversed.
    pub fn remove_node(&mut self, key: NodeKey) -> Option<(NodeSnapshot, Vec<EdgeSnapshot>)> {
        let edges = self.incident_edge_snapshots(key);
        let node = self.inner.remove_node(key)?;
        self.id_to_node.remove(&node.id);
        Some((NodeSnapshot::from_node(&node), edges))
    }

    /// Remove a node addressed by its stable id.
    pub fn remove_node_by_id(&mut self, id: Uuid) -> Option<(NodeSnapshot, Vec<EdgeSnapshot>)> {
        let key = self.key_by_id(id)?;
        self.remove_node(key)
    }

    /// Node key for a stable id.
    pub fn key_by_id(&self, id: Uuid) -> Option<NodeKey> {
        self.id_to_node.get(&id).copied()
    }

    /// Get a node by key
    pub fn get_node(&self, key: NodeKey) -> Option<&MapNode> {
        self.inner.node_weight(key)
    }

    /// Get a mutable node by key
    pub fn get_node_mut(&mut self, key: NodeKey) -> Option<&mut MapNode> {
        self.inner.node_weight_mut(key)
    }

    /// Get a node by stable id.
    pub fn node_by_id(&self, id: Uuid) -> Option<&MapNode> {
        self.get_node(self.key_by_id(id)?)
    }

    /// Get a mutable node by stable id.
    pub fn node_by_id_mut(&mut self, id: Uuid) -> Option<&mut MapNode> {
        let key = self.key_by_id(id)?;
        self.get_node_mut(key)
    }

    /// Add an edge between two nodes
    pub fn add_edge(&mut self, from: NodeKey, to: NodeKey, kind: EdgeKind) -> Option<EdgeKey> {
        if !self.inner.contains_node(from) || !self.inner.contains_node(to) {
            return None;
        }
        Some(self.inner.add_edge(from, to, kind))
    }

    /// Add an edge addressed by stable node ids.
    pub fn add_edge_by_ids(&mut self, from_id: Uuid, to_id: Uuid, kind: EdgeKind) -> Option<EdgeKey> {
        let from = self.key_by_id(from_id)?;
        let to = self.key_by_id(to_id)?;
        self.add_edge(from, to, kind)
    }

    /// Remove one directed edge matching `(from, to, kind)`, addressed by
    /// stable node ids. Returns whether an edge was removed.
    pub fn remove_edge_by_ids(&mut self, from_id: Uuid, to_id: Uuid, kind: EdgeKind) -> bool {
        let (Some(from), Some(to)) = (self.key_by_id(from_id), self.key_by_id(to_id)) else {
            return false;
        };
        let edge_id = self
            .inner
            .edge_references()
            .find(|edge| {
                edge.source() == from && edge.target() == to && *edge.weight() == kind
            })
            .map(|edge| edge.id());
        match edge_id {
            Some(edge_id) => self.inner.remove_edge(edge_id).is_some(),
            None => false,
        }
    }

    /// Check if a directed edge exists from `from` to `to`
    pub fn has_edge_between(&self, from: NodeKey, to: NodeKey) -> bool {
        self.inner.find_edge(from, to).is_some()
    }

    /// Snapshots of every edge touching `key`, in both directions.
    pub fn incident_edge_snapshots(&self, key: NodeKey) -> Vec<EdgeSnapshot> {
        self.inner
            .edge_references()
            .filter(|edge| edge.source() == key || edge.target() == key)
            .filter_map(|edge| {
                let from = self.inner.node_weight(edge.source())?;
                let to = self.inner.node_weight(edge.target())?;
                Some(EdgeSnapshot {
                    from_id: from.id,
                    to_id: to.id,
                    kind: *edge.weight(),
                })
            })
            .collect()
    }

    /// Iterate over all nodes as (key, node) pairs
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &MapNode)> {
        self.inner
            .node_indices()
            .map(move |idx| (idx, &self.inner[idx]))
    }

    /// Iterate over all edges as EdgeView
    pub fn edges(&self) -> impl Iterator<Item = EdgeView> + '_ {
        self.inner.edge_references().map(|e| EdgeView {
            from: e.source(),
            to: e.target(),
            kind: *e.weight(),
        })
    }

    /// Count of nodes in the document
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Count of edges in the document
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }
}
