//! Mutation operations.
//!
//! Every operation is a pure function from the current [`MindMap`] snapshot
//! to the next one. Requests that cannot apply return [`Rejected`]; callers
//! treat that as a no-op, so the snapshot they hold stays current.
//!
//! Two color policies live here and are kept apart on purpose:
//!
//! - [`inherit_on_create`]: a new child takes the override, else its
//!   parent's color, else [`DEFAULT_COLOR`](crate::types::DEFAULT_COLOR).
//! - [`backfill_on_connect`]: a connect gesture paints an uncolored target
//!   with the edge stroke. Colored targets keep their color.

use crate::layout;
use crate::types::{Color, Edge, Graph, GraphError, MindMap, Node, NodeId, Position, UNTITLED_LABEL};

/// Reason a mutation did not apply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejected {
    /// The addressed node does not exist.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
    /// The anchor can never be deleted.
    #[error("Anchor node {0} cannot be deleted")]
    AnchorProtected(NodeId),
    /// A node cannot be connected to itself.
    #[error("Cannot connect node {0} to itself")]
    SelfLoop(NodeId),
    /// The `(from, to)` edge already exists.
    #[error("Edge {from} -> {to} already exists")]
    DuplicateEdge {
        /// Requested source.
        from: NodeId,
        /// Requested target.
        to: NodeId,
    },
    /// The target already has a parent.
    #[error("Node {0} already has a parent")]
    AlreadyParented(NodeId),
    /// The target is an ancestor of the source.
    #[error("Edge {from} -> {to} would close a cycle")]
    WouldCycle {
        /// Requested source.
        from: NodeId,
        /// Requested target.
        to: NodeId,
    },
    /// Another edge already carries the id the new edge would derive.
    #[error("Edge id {0} is already taken")]
    EdgeIdTaken(String),
    /// A coordinate is NaN or infinite.
    #[error("Position for node {0} is not finite")]
    NonFinitePosition(NodeId),
}

/// What an applied operation changed, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A root was added and still needs a color.
    RootCreated(NodeId),
    /// A child was added under `parent`.
    ChildCreated {
        /// The parent node.
        parent: NodeId,
        /// The new node.
        child: NodeId,
    },
    /// An edge was added.
    Connected {
        /// The new edge id.
        edge_id: String,
    },
    /// A node's fields changed.
    Updated(NodeId),
    /// A node and its incident edges were removed.
    Deleted {
        /// The removed node.
        node: NodeId,
        /// How many edges went with it.
        edges_removed: usize,
    },
    /// The whole graph was replaced.
    Replaced,
}

/// The snapshot an operation produced, plus what it changed.
#[derive(Debug, Clone)]
pub struct Transition {
    /// The next snapshot.
    pub map: MindMap,
    /// What changed.
    pub effect: Effect,
}

impl Transition {
    fn new(map: MindMap, effect: Effect) -> Self {
        Self { map, effect }
    }
}

/// Color for a child of `parent`.
pub fn inherit_on_create(parent: &Node, color_override: Option<&Color>) -> Color {
    color_override
        .or(parent.color.as_ref())
        .cloned()
        .unwrap_or_else(Color::default_branch)
}

/// Stroke for an edge drawn by a connect gesture from `source`.
pub fn connect_stroke(source: &Node) -> Color {
    source.color.clone().unwrap_or_else(Color::fallback_edge)
}

/// Paint `target` with `stroke` if it has no color yet.
///
/// Returns true when the target changed.
pub fn backfill_on_connect(target: &mut Node, stroke: &Color) -> bool {
    if target.color.is_some() {
        return false;
    }
    target.color = Some(stroke.clone());
    true
}

/// Add an uncolored root, placed right of the existing roots.
pub fn create_root_node(map: &MindMap) -> Transition {
    let mut next = map.clone();
    let id = next.allocate_id();
    let position = layout::root_position(next.graph.root_count());
    next.graph.nodes.push(Node::new(id.clone(), position, 0));
    Transition::new(next, Effect::RootCreated(id))
}

/// Add a child under `parent` together with the `parent -> child` edge.
pub fn create_child_node(
    map: &MindMap,
    parent: &NodeId,
    color_override: Option<&Color>,
) -> Result<Transition, Rejected> {
    let parent_node = map
        .graph
        .node(parent)
        .ok_or_else(|| Rejected::UnknownNode(parent.clone()))?;

    let level = parent_node.level.saturating_add(1);
    let color = inherit_on_create(parent_node, color_override);
    let position = layout::child_position(
        parent_node.position,
        map.graph.outgoing_count(parent),
        level,
    );

    let mut next = map.clone();
    let child = next.allocate_id();
    let edge_id = Edge::derive_id(parent, &child);
    if next.graph.has_edge_id(&edge_id) {
        return Err(Rejected::EdgeIdTaken(edge_id));
    }
    next.graph
        .nodes
        .push(Node::new(child.clone(), position, level).with_color(Some(color.clone())));
    next.graph
        .edges
        .push(Edge::new(parent.clone(), child.clone(), color));

    Ok(Transition::new(
        next,
        Effect::ChildCreated {
            parent: parent.clone(),
            child,
        },
    ))
}

/// Connect `source -> target`.
///
/// Self-loops, duplicate pairs, second parents and cycles are refused so the
/// graph stays a forest. Levels are re-derived afterwards.
pub fn connect(map: &MindMap, source: &NodeId, target: &NodeId) -> Result<Transition, Rejected> {
    let source_node = map
        .graph
        .node(source)
        .ok_or_else(|| Rejected::UnknownNode(source.clone()))?;
    if !map.graph.contains(target) {
        return Err(Rejected::UnknownNode(target.clone()));
    }
    if source == target {
        return Err(Rejected::SelfLoop(source.clone()));
    }
    if map.graph.edge_between(source, target).is_some() {
        return Err(Rejected::DuplicateEdge {
            from: source.clone(),
            to: target.clone(),
        });
    }
    if map.graph.parent_of(target).is_some() {
        return Err(Rejected::AlreadyParented(target.clone()));
    }
    if map.graph.is_ancestor(target, source) {
        return Err(Rejected::WouldCycle {
            from: source.clone(),
            to: target.clone(),
        });
    }

    let edge_id = Edge::derive_id(source, target);
    if map.graph.has_edge_id(&edge_id) {
        return Err(Rejected::EdgeIdTaken(edge_id));
    }

    let stroke = connect_stroke(source_node);
    let edge = Edge::new(source.clone(), target.clone(), stroke.clone());

    let mut next = map.clone();
    next.graph.edges.push(edge);
    if let Some(target_node) = next.graph.node_mut(target) {
        backfill_on_connect(target_node, &stroke);
    }
    next.graph.recompute_levels();

    Ok(Transition::new(next, Effect::Connected { edge_id }))
}

/// Set a node's color. Descendants and existing edge strokes are untouched.
pub fn recolor(map: &MindMap, node: &NodeId, color: Color) -> Result<Transition, Rejected> {
    update_node(map, node, |n| n.color = Some(color))
}

/// Remove a node and every edge where it is source or target.
pub fn delete_node(map: &MindMap, node: &NodeId) -> Result<Transition, Rejected> {
    if map.is_anchor(node) {
        return Err(Rejected::AnchorProtected(node.clone()));
    }

    let mut next = map.clone();
    let edges_removed = next
        .graph
        .remove_node(node)
        .ok_or_else(|| Rejected::UnknownNode(node.clone()))?;
    next.graph.recompute_levels();

    Ok(Transition::new(
        next,
        Effect::Deleted {
            node: node.clone(),
            edges_removed,
        },
    ))
}

/// Save a label. Whitespace is trimmed and an empty label becomes "Untitled".
pub fn rename_label(map: &MindMap, node: &NodeId, text: &str) -> Result<Transition, Rejected> {
    let trimmed = text.trim();
    let label = if trimmed.is_empty() { UNTITLED_LABEL } else { trimmed };
    update_node(map, node, |n| n.label = label.to_string())
}

/// Save a description. Whitespace is trimmed; empty is allowed.
pub fn set_description(map: &MindMap, node: &NodeId, text: &str) -> Result<Transition, Rejected> {
    let description = text.trim().to_string();
    update_node(map, node, |n| n.description = description)
}

/// Store the position a drag ended at.
pub fn move_node(map: &MindMap, node: &NodeId, position: Position) -> Result<Transition, Rejected> {
    if !position.is_finite() {
        return Err(Rejected::NonFinitePosition(node.clone()));
    }
    update_node(map, node, |n| n.position = position)
}

/// The exportable graph of a snapshot.
pub fn export_snapshot(map: &MindMap) -> Graph {
    map.graph.clone()
}

/// Replace the whole graph.
///
/// The incoming graph must pass [`Graph::validate`]; on success its levels
/// are re-derived and the counter moves past every numeric id.
pub fn import_snapshot(map: &MindMap, mut graph: Graph) -> Result<Transition, GraphError> {
    graph.validate()?;
    graph.recompute_levels();
    let next = MindMap::replacing(map, graph).ok_or(GraphError::Empty)?;
    Ok(Transition::new(next, Effect::Replaced))
}

fn update_node<F>(map: &MindMap, node: &NodeId, apply: F) -> Result<Transition, Rejected>
where
    F: FnOnce(&mut Node),
{
    let mut next = map.clone();
    let target = next
        .graph
        .node_mut(node)
        .ok_or_else(|| Rejected::UnknownNode(node.clone()))?;
    apply(target);
    Ok(Transition::new(next, Effect::Updated(node.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_COLOR;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn color(s: &str) -> Color {
        Color::parse(s).unwrap()
    }

    fn child(map: &MindMap, parent: &str) -> (MindMap, NodeId) {
        let t = create_child_node(map, &id(parent), None).unwrap();
        match t.effect {
            Effect::ChildCreated { child, .. } => (t.map, child),
            other => panic!("unexpected effect {:?}", other),
        }
    }

    #[test]
    fn test_create_root_node() {
        let map = MindMap::new();
        let t = create_root_node(&map);

        assert_eq!(t.effect, Effect::RootCreated(id("2")));
        let root = t.map.graph.node(&id("2")).unwrap();
        assert_eq!(root.level, 0);
        assert!(root.color.is_none());
        assert_eq!(root.label, "Node 2");
        assert_eq!(root.position, Position::new(650.0, 200.0));
        assert_eq!(t.map.next_id, 3);
    }

    #[test]
    fn test_create_child_inherits_default_color() {
        let map = MindMap::new();
        let (next, child_id) = child(&map, "1");

        assert_eq!(next.graph.nodes.len(), 2);
        assert_eq!(next.graph.edges.len(), 1);

        let node = next.graph.node(&child_id).unwrap();
        assert_eq!(node.level, 1);
        assert_eq!(node.color.as_ref().unwrap().as_str(), DEFAULT_COLOR);

        let edge = &next.graph.edges[0];
        assert_eq!(edge.source, id("1"));
        assert_eq!(edge.target, child_id);
        assert_eq!(edge.id, "e1-2");
        assert_eq!(edge.style.stroke.as_str(), DEFAULT_COLOR);
        assert!(edge.animated);
    }

    #[test]
    fn test_create_child_color_precedence() {
        let map = recolor(&MindMap::new(), &id("1"), color("#ff0000")).unwrap().map;

        let (inherited, a) = child(&map, "1");
        assert_eq!(inherited.graph.node(&a).unwrap().color, Some(color("#ff0000")));

        let t = create_child_node(&map, &id("1"), Some(&color("#00ff00"))).unwrap();
        let b = t.map.graph.nodes.last().unwrap();
        assert_eq!(b.color, Some(color("#00ff00")));
        assert_eq!(t.map.graph.edges[0].style.stroke, color("#00ff00"));
    }

    #[test]
    fn test_siblings_get_distinct_positions() {
        let (map, a) = child(&MindMap::new(), "1");
        let (map, b) = child(&map, "1");
        let pa = map.graph.node(&a).unwrap().position;
        let pb = map.graph.node(&b).unwrap().position;
        assert_ne!(pa, pb);
    }

    #[test]
    fn test_create_child_unknown_parent() {
        let map = MindMap::new();
        assert_eq!(
            create_child_node(&map, &id("42"), None).unwrap_err(),
            Rejected::UnknownNode(id("42"))
        );
    }

    #[test]
    fn test_connect_backfills_uncolored_target() {
        let map = recolor(&MindMap::new(), &id("1"), color("#123456")).unwrap().map;
        let map = create_root_node(&map).map;

        let t = connect(&map, &id("1"), &id("2")).unwrap();
        assert_eq!(t.effect, Effect::Connected { edge_id: "e1-2".to_string() });

        let target = t.map.graph.node(&id("2")).unwrap();
        assert_eq!(target.color, Some(color("#123456")));
        assert_eq!(target.level, 1);
    }

    #[test]
    fn test_connect_keeps_colored_target() {
        let map = create_root_node(&MindMap::new()).map;
        let map = recolor(&map, &id("2"), color("#abcdef")).unwrap().map;

        let t = connect(&map, &id("1"), &id("2")).unwrap();
        assert_eq!(t.map.graph.node(&id("2")).unwrap().color, Some(color("#abcdef")));
        // Uncolored source draws the fallback stroke
        assert_eq!(t.map.graph.edges[0].style.stroke, Color::fallback_edge());
    }

    #[test]
    fn test_connect_rejections() {
        let (map, a) = child(&MindMap::new(), "1");
        let map = create_root_node(&map).map;
        let loose = id("3");

        assert_eq!(connect(&map, &a, &a).unwrap_err(), Rejected::SelfLoop(a.clone()));
        assert!(matches!(
            connect(&map, &id("1"), &a).unwrap_err(),
            Rejected::DuplicateEdge { .. }
        ));
        assert_eq!(
            connect(&map, &loose, &a).unwrap_err(),
            Rejected::AlreadyParented(a.clone())
        );
        assert!(matches!(
            connect(&map, &a, &id("1")).unwrap_err(),
            Rejected::WouldCycle { .. }
        ));
        assert_eq!(
            connect(&map, &id("9"), &a).unwrap_err(),
            Rejected::UnknownNode(id("9"))
        );
    }

    #[test]
    fn test_imported_edge_ids_stay_unique_after_connect() {
        let graph: Graph = serde_json::from_str(
            r#"{
                "nodes": [
                    {"id": "1", "position": {"x": 0, "y": 0}, "data": {"label": "A"}},
                    {"id": "2", "position": {"x": 0, "y": 0}, "data": {"label": "B"}},
                    {"id": "3", "position": {"x": 0, "y": 0}, "data": {"label": "C"}}
                ],
                "edges": [{"id": "e1-2", "source": "1", "target": "3"}]
            }"#,
        )
        .unwrap();
        let map = import_snapshot(&MindMap::new(), graph).unwrap().map;
        let map = connect(&map, &id("1"), &id("2")).unwrap().map;

        let ids: Vec<&str> = map.graph.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1-3", "e1-2"]);
        assert!(map.graph.validate().is_ok());
    }

    #[test]
    fn test_connect_refuses_colliding_edge_id() {
        let graph = Graph::new(
            vec![
                Node::new(id("1"), Position::default(), 0),
                Node::new(id("2-3"), Position::default(), 0),
                Node::new(id("1-2"), Position::default(), 0),
                Node::new(id("3"), Position::default(), 0),
            ],
            vec![Edge::new(id("1"), id("2-3"), Color::default_branch())],
        );
        let map = import_snapshot(&MindMap::new(), graph).unwrap().map;
        assert_eq!(
            connect(&map, &id("1-2"), &id("3")).unwrap_err(),
            Rejected::EdgeIdTaken("e1-2-3".to_string())
        );
    }

    #[test]
    fn test_counter_at_integer_limit_still_allocates() {
        let graph = Graph::new(
            vec![
                Node::new(id(&u64::MAX.to_string()), Position::default(), 0),
                Node::new(id(&(u64::MAX - 1).to_string()), Position::default(), 0),
            ],
            Vec::new(),
        );
        let map = import_snapshot(&MindMap::new(), graph).unwrap().map;
        assert_eq!(map.next_id, u64::MAX);
        let map = create_root_node(&map).map;
        let t = create_child_node(&map, &map.anchor, None).unwrap();

        assert_eq!(t.map.graph.nodes.len(), 4);
        assert!(t.map.graph.validate().is_ok());
    }

    #[test]
    fn test_recolor_does_not_cascade() {
        let (map, a) = child(&MindMap::new(), "1");
        let map = recolor(&map, &id("1"), color("#000000")).unwrap().map;

        assert_eq!(map.graph.node(&a).unwrap().color.as_ref().unwrap().as_str(), DEFAULT_COLOR);
        assert_eq!(map.graph.edges[0].style.stroke.as_str(), DEFAULT_COLOR);

        // Future children pick up the new color
        let (map, b) = child(&map, "1");
        assert_eq!(map.graph.node(&b).unwrap().color, Some(color("#000000")));
    }

    #[test]
    fn test_delete_anchor_is_refused() {
        let (map, _) = child(&MindMap::new(), "1");
        assert_eq!(
            delete_node(&map, &id("1")).unwrap_err(),
            Rejected::AnchorProtected(id("1"))
        );
    }

    #[test]
    fn test_delete_cascades_edges_and_relevels() {
        let (map, a) = child(&MindMap::new(), "1");
        let (map, b) = child(&map, &a.to_string());
        let t = delete_node(&map, &a).unwrap();

        assert_eq!(
            t.effect,
            Effect::Deleted { node: a.clone(), edges_removed: 2 }
        );
        assert!(t.map.graph.edges.is_empty());
        // The orphaned grandchild becomes a root
        assert_eq!(t.map.graph.node(&b).unwrap().level, 0);
    }

    #[test]
    fn test_rename_label() {
        let map = MindMap::new();
        let t = rename_label(&map, &id("1"), "  Plan  ").unwrap();
        assert_eq!(t.map.graph.node(&id("1")).unwrap().label, "Plan");

        let t = rename_label(&map, &id("1"), "   ").unwrap();
        assert_eq!(t.map.graph.node(&id("1")).unwrap().label, UNTITLED_LABEL);
    }

    #[test]
    fn test_set_description_allows_empty() {
        let map = set_description(&MindMap::new(), &id("1"), " notes ").unwrap().map;
        assert_eq!(map.graph.node(&id("1")).unwrap().description, "notes");

        let map = set_description(&map, &id("1"), "  ").unwrap().map;
        assert_eq!(map.graph.node(&id("1")).unwrap().description, "");
    }

    #[test]
    fn test_move_node() {
        let map = MindMap::new();
        let t = move_node(&map, &id("1"), Position::new(10.0, -5.0)).unwrap();
        assert_eq!(t.map.graph.node(&id("1")).unwrap().position, Position::new(10.0, -5.0));

        assert_eq!(
            move_node(&map, &id("1"), Position::new(f64::INFINITY, 0.0)).unwrap_err(),
            Rejected::NonFinitePosition(id("1"))
        );
    }

    #[test]
    fn test_import_rejects_invalid_graph() {
        let map = MindMap::new();
        let mut graph = export_snapshot(&map);
        graph.edges.push(Edge::new(id("1"), id("77"), Color::default_branch()));
        assert!(import_snapshot(&map, graph).is_err());
    }

    #[test]
    fn test_import_relevels_and_advances_counter() {
        let (source, a) = child(&MindMap::new(), "1");
        let mut graph = export_snapshot(&source);
        graph.nodes[1].level = 3;
        graph.nodes.push(Node::new(id("30"), Position::default(), 5));

        let t = import_snapshot(&MindMap::new(), graph).unwrap();
        assert_eq!(t.effect, Effect::Replaced);
        assert_eq!(t.map.graph.node(&a).unwrap().level, 1);
        assert_eq!(t.map.graph.node(&id("30")).unwrap().level, 0);
        assert_eq!(t.map.next_id, 31);
    }

    #[test]
    fn test_operations_do_not_touch_input() {
        let map = MindMap::new();
        let before = map.clone();
        let _ = create_root_node(&map);
        let _ = create_child_node(&map, &id("1"), None);
        let _ = rename_label(&map, &id("1"), "x");
        assert_eq!(map, before);
    }
}
