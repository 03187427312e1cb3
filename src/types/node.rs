//! Node types for the mind map.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::color::Color;

/// Deepest level a node is styled as. Semantic depth is unbounded.
pub const MAX_DISPLAY_LEVEL: u32 = 3;

/// Label written when a node is saved with an empty label.
pub const UNTITLED_LABEL: &str = "Untitled";

/// Node type tag understood by the diagramming surface.
pub const NODE_TYPE: &str = "customNode";

/// Unique identifier for a node.
///
/// Identifiers are opaque strings. Nodes created by the editor get the
/// decimal rendering of the map's id counter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a NodeId from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a NodeId from a counter value.
    pub fn from_counter(value: u64) -> Self {
        Self(value.to_string())
    }

    /// Get the id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The counter value this id was allocated from, if it is numeric.
    pub fn counter_value(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Canvas coordinates. A layout hint only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Create a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Offset by `radius` along `angle_degrees`, measured clockwise from +x
    /// in screen space (y grows downward).
    pub fn offset_polar(&self, angle_degrees: f64, radius: f64) -> Self {
        let radians = angle_degrees.to_radians();
        Self {
            x: self.x + radians.cos() * radius,
            y: self.y + radians.sin() * radius,
        }
    }
}

/// A vertex in the mind map.
///
/// Serializes in the shape the diagramming surface expects:
/// `{"id", "type", "position", "data": {"label", "level", "description", "color"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NodeRepr", into = "NodeRepr")]
pub struct Node {
    /// Unique node identifier.
    pub id: NodeId,
    /// Canvas position.
    pub position: Position,
    /// Depth from the node's root.
    pub level: u32,
    /// Display label.
    pub label: String,
    /// Free-form notes shown under the label and on slides.
    pub description: String,
    /// Branch color. `None` means uncolored.
    pub color: Option<Color>,
}

impl Node {
    /// Create a node with the default label for its id.
    pub fn new(id: NodeId, position: Position, level: u32) -> Self {
        let label = Self::default_label(&id);
        Self {
            id,
            position,
            level,
            label,
            description: String::new(),
            color: None,
        }
    }

    /// The label a freshly created node carries.
    pub fn default_label(id: &NodeId) -> String {
        format!("Node {}", id)
    }

    /// Set the color.
    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Level used for styling, capped at [`MAX_DISPLAY_LEVEL`].
    pub fn display_level(&self) -> u32 {
        self.level.min(MAX_DISPLAY_LEVEL)
    }

    /// True for level-0 nodes.
    pub fn is_root(&self) -> bool {
        self.level == 0
    }
}

#[derive(Serialize, Deserialize)]
struct NodeRepr {
    id: NodeId,
    #[serde(rename = "type", default = "default_node_type")]
    node_type: String,
    position: Position,
    data: NodeData,
}

#[derive(Serialize, Deserialize)]
struct NodeData {
    label: String,
    #[serde(default)]
    level: u32,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<Color>,
}

fn default_node_type() -> String {
    NODE_TYPE.to_string()
}

impl From<NodeRepr> for Node {
    fn from(repr: NodeRepr) -> Self {
        Self {
            id: repr.id,
            position: repr.position,
            level: repr.data.level,
            label: repr.data.label,
            description: repr.data.description,
            color: repr.data.color,
        }
    }
}

impl From<Node> for NodeRepr {
    fn from(node: Node) -> Self {
        Self {
            id: node.id,
            node_type: NODE_TYPE.to_string(),
            position: node.position,
            data: NodeData {
                label: node.label,
                level: node.level,
                description: node.description,
                color: node.color,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_label() {
        let node = Node::new(NodeId::from_counter(7), Position::default(), 1);
        assert_eq!(node.label, "Node 7");
        assert!(node.description.is_empty());
        assert!(node.color.is_none());
    }

    #[test]
    fn test_display_level_is_capped() {
        let deep = Node::new(NodeId::from("9"), Position::default(), 7);
        assert_eq!(deep.level, 7);
        assert_eq!(deep.display_level(), MAX_DISPLAY_LEVEL);

        let shallow = Node::new(NodeId::from("2"), Position::default(), 1);
        assert_eq!(shallow.display_level(), 1);
    }

    #[test]
    fn test_counter_value() {
        assert_eq!(NodeId::from("42").counter_value(), Some(42));
        assert_eq!(NodeId::from("root").counter_value(), None);
    }

    #[test]
    fn test_polar_offset() {
        let origin = Position::new(100.0, 100.0);
        let east = origin.offset_polar(0.0, 50.0);
        assert!((east.x - 150.0).abs() < 1e-9);
        assert!((east.y - 100.0).abs() < 1e-9);

        let south = origin.offset_polar(90.0, 50.0);
        assert!((south.x - 100.0).abs() < 1e-9);
        assert!((south.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_serializes_in_surface_shape() {
        let node = Node::new(NodeId::from("1"), Position::new(400.0, 200.0), 0)
            .with_label("Central Idea");
        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(value["id"], "1");
        assert_eq!(value["type"], NODE_TYPE);
        assert_eq!(value["position"]["x"], 400.0);
        assert_eq!(value["data"]["label"], "Central Idea");
        assert_eq!(value["data"]["level"], 0);
        assert_eq!(value["data"]["description"], "");
        assert!(value["data"].get("color").is_none());
    }

    #[test]
    fn test_ignores_transient_flags_on_read() {
        let json = r##"{
            "id": "3",
            "type": "customNode",
            "position": {"x": 1.5, "y": -2},
            "data": {"label": "Draft", "level": 2, "color": "#ff0000", "isEditing": true}
        }"##;
        let node: Node = serde_json::from_str(json).unwrap();

        assert_eq!(node.id.as_str(), "3");
        assert_eq!(node.level, 2);
        assert_eq!(node.description, "");
        assert_eq!(node.color.as_ref().unwrap().as_str(), "#ff0000");

        let out = serde_json::to_string(&node).unwrap();
        assert!(!out.contains("isEditing"));
    }
}
