//! The mind map snapshot held by a store.

use serde::{Deserialize, Serialize};

use super::graph::Graph;
use super::node::{Node, NodeId};
use crate::layout::ROOT_ORIGIN;

/// Label of the node every new map starts with.
pub const CENTRAL_IDEA_LABEL: &str = "Central Idea";

/// An immutable snapshot of a whole mind map.
///
/// Besides the graph it threads the identifier counter and the anchor,
/// so mutation operations stay pure functions of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMap {
    /// Nodes and edges.
    pub graph: Graph,
    /// The node that can never be deleted.
    pub anchor: NodeId,
    /// Next counter value handed out as a node id.
    pub next_id: u64,
}

impl MindMap {
    /// A map holding only the anchor, `"1"` labeled "Central Idea".
    pub fn new() -> Self {
        let anchor = NodeId::from_counter(1);
        let root = Node::new(anchor.clone(), ROOT_ORIGIN, 0)
            .with_label(CENTRAL_IDEA_LABEL);
        Self {
            graph: Graph::new(vec![root], Vec::new()),
            anchor,
            next_id: 2,
        }
    }

    /// Build a map around a graph that replaces `previous`.
    ///
    /// The anchor carries over when it still exists, otherwise the first node
    /// becomes the anchor. The counter never moves backwards and always
    /// clears every numeric id in the graph. The graph must hold a node.
    pub fn replacing(previous: &MindMap, graph: Graph) -> Option<Self> {
        let anchor = if graph.contains(&previous.anchor) {
            previous.anchor.clone()
        } else {
            graph.nodes.first()?.id.clone()
        };

        let next_id = graph
            .nodes
            .iter()
            .filter_map(|n| n.id.counter_value())
            .filter_map(|v| v.checked_add(1))
            .fold(previous.next_id, u64::max);

        Some(Self { graph, anchor, next_id })
    }

    /// Take the next identifier from the counter.
    ///
    /// Values already taken by imported or hand-built ids are skipped. Once
    /// the counter reaches `u64::MAX` it stops advancing and the lowest free
    /// counter value is handed out instead.
    pub fn allocate_id(&mut self) -> NodeId {
        while let Some(following) = self.next_id.checked_add(1) {
            let id = NodeId::from_counter(self.next_id);
            self.next_id = following;
            if !self.graph.contains(&id) {
                return id;
            }
        }
        self.lowest_free_id()
    }

    // Terminates within `nodes.len() + 1` probes.
    fn lowest_free_id(&self) -> NodeId {
        (1..=u64::MAX)
            .map(NodeId::from_counter)
            .find(|id| !self.graph.contains(id))
            .unwrap_or_else(|| NodeId::from_counter(0))
    }

    /// True if `id` is the anchor.
    pub fn is_anchor(&self, id: &NodeId) -> bool {
        &self.anchor == id
    }
}

impl Default for MindMap {
    fn default() -> Self {
        Self::new()
    }
}
