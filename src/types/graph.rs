//! The node/edge set and its structural rules.
//!
//! A well-formed graph is a forest:
//!
//! - node ids are unique and every position is finite
//! - every edge endpoint resolves to a node
//! - no self-loops and at most one edge per `(source, target)`
//! - edge ids are `e{source}-{target}` and unique
//! - every node has at most one parent
//! - there are no cycles
//!
//! Under these rules `level` is the distance from a node's root, and
//! [`Graph::recompute_levels`] restores it after structural edits.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use serde::{Deserialize, Serialize};

use super::edge::Edge;
use super::node::{Node, NodeId};

/// Structural violation found while validating a graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The graph holds no nodes.
    #[error("Graph has no nodes")]
    Empty,
    /// Two nodes share an id.
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),
    /// A node position is NaN or infinite.
    #[error("Node {0} has a non-finite position")]
    NonFinitePosition(NodeId),
    /// An edge references a node that does not exist.
    #[error("Edge {edge} references missing node {missing}")]
    DanglingEdge {
        /// The offending edge id.
        edge: String,
        /// The id that failed to resolve.
        missing: NodeId,
    },
    /// An edge connects a node to itself.
    #[error("Self-loop on node {0}")]
    SelfLoop(NodeId),
    /// Two edges share `(source, target)`.
    #[error("Duplicate edge {from} -> {to}")]
    DuplicateEdge {
        /// Edge source.
        from: NodeId,
        /// Edge target.
        to: NodeId,
    },
    /// An edge id is not `e{source}-{target}`.
    #[error("Edge id {id} does not match its endpoints, expected {expected}")]
    EdgeIdMismatch {
        /// The id found on the edge.
        id: String,
        /// The id derived from its endpoints.
        expected: String,
    },
    /// Two edges share an id.
    #[error("Duplicate edge id: {0}")]
    DuplicateEdgeId(String),
    /// A node has more than one incoming edge.
    #[error("Node {0} has more than one parent")]
    MultipleParents(NodeId),
    /// The edges form a cycle through this node.
    #[error("Cycle through node {0}")]
    Cycle(NodeId),
}

/// The full set of nodes and edges. Insertion order is preserved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Graph {
    /// Nodes in insertion order.
    pub nodes: Vec<Node>,
    /// Edges in insertion order.
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Create a graph from parts.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Look up a node.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Look up a node mutably.
    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    /// True if a node with this id exists.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// The edge running `source -> target`, if any.
    pub fn edge_between(&self, source: &NodeId, target: &NodeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.connects(source, target))
    }

    /// True if any edge carries this id.
    pub fn has_edge_id(&self, id: &str) -> bool {
        self.edges.iter().any(|e| e.id == id)
    }

    /// The parent of `id` (source of its incoming edge).
    pub fn parent_of(&self, id: &NodeId) -> Option<&NodeId> {
        self.edges.iter().find(|e| &e.target == id).map(|e| &e.source)
    }

    /// Direct children of `id`, in edge order.
    pub fn children_of<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Node> + 'a {
        self.edges
            .iter()
            .filter(move |e| &e.source == id)
            .filter_map(move |e| self.node(&e.target))
    }

    /// Number of edges sourced at `id`.
    pub fn outgoing_count(&self, id: &NodeId) -> usize {
        self.edges.iter().filter(|e| &e.source == id).count()
    }

    /// Number of level-0 nodes.
    pub fn root_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_root()).count()
    }

    /// True if `ancestor` is reachable from `node` by following parents.
    /// A node counts as its own ancestor.
    pub fn is_ancestor(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut seen = BTreeSet::new();
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            if !seen.insert(id) {
                return false;
            }
            current = self.parent_of(id);
        }
        false
    }

    /// Remove a node and every edge touching it.
    ///
    /// Returns the number of edges removed, or `None` if the node was absent.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<usize> {
        let index = self.nodes.iter().position(|n| &n.id == id)?;
        self.nodes.remove(index);
        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(id));
        Some(before - self.edges.len())
    }

    /// Check every structural rule.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.nodes.is_empty() {
            return Err(GraphError::Empty);
        }

        let mut ids: BTreeSet<&NodeId> = BTreeSet::new();
        for node in &self.nodes {
            if !ids.insert(&node.id) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
            if !node.position.is_finite() {
                return Err(GraphError::NonFinitePosition(node.id.clone()));
            }
        }

        let mut edge_ids: BTreeSet<&str> = BTreeSet::new();
        let mut pairs: BTreeSet<(&NodeId, &NodeId)> = BTreeSet::new();
        let mut parents: BTreeMap<&NodeId, &NodeId> = BTreeMap::new();
        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !ids.contains(endpoint) {
                    return Err(GraphError::DanglingEdge {
                        edge: edge.id.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
            if edge.source == edge.target {
                return Err(GraphError::SelfLoop(edge.source.clone()));
            }
            if !pairs.insert((&edge.source, &edge.target)) {
                return Err(GraphError::DuplicateEdge {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                });
            }
            let expected = Edge::derive_id(&edge.source, &edge.target);
            if edge.id != expected {
                return Err(GraphError::EdgeIdMismatch {
                    id: edge.id.clone(),
                    expected,
                });
            }
            // Hyphenated node ids can derive the same id for different pairs
            if !edge_ids.insert(&edge.id) {
                return Err(GraphError::DuplicateEdgeId(edge.id.clone()));
            }
            if parents.insert(&edge.target, &edge.source).is_some() {
                return Err(GraphError::MultipleParents(edge.target.clone()));
            }
        }

        // With single parents, a cycle is a parent chain that never ends.
        for node in &self.nodes {
            let mut seen = BTreeSet::new();
            let mut current = &node.id;
            while let Some(parent) = parents.get(current) {
                if !seen.insert(current) {
                    return Err(GraphError::Cycle(node.id.clone()));
                }
                current = *parent;
            }
        }

        Ok(())
    }

    /// Reset every node's level to its distance from its root.
    ///
    /// Roots are nodes without an incoming edge. Nodes unreachable from
    /// any root (only possible in a cyclic graph) keep their level.
    pub fn recompute_levels(&mut self) {
        let mut children: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
        let mut has_parent: BTreeSet<NodeId> = BTreeSet::new();
        for edge in &self.edges {
            children
                .entry(edge.source.clone())
                .or_default()
                .push(edge.target.clone());
            has_parent.insert(edge.target.clone());
        }

        let mut levels: BTreeMap<NodeId, u32> = BTreeMap::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        for node in &self.nodes {
            if !has_parent.contains(&node.id) {
                levels.insert(node.id.clone(), 0);
                queue.push_back(node.id.clone());
            }
        }

        while let Some(id) = queue.pop_front() {
            let level = levels.get(&id).copied().unwrap_or(0);
            for child in children.get(&id).into_iter().flatten() {
                if !levels.contains_key(child) {
                    levels.insert(child.clone(), level.saturating_add(1));
                    queue.push_back(child.clone());
                }
            }
        }

        for node in &mut self.nodes {
            if let Some(level) = levels.get(&node.id) {
                node.level = *level;
            }
        }
    }
}
