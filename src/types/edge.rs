//! Edge types for the mind map.

use serde::{Deserialize, Serialize};
use super::color::Color;
use super::node::NodeId;

/// Stroke width of every edge the editor creates.
pub const DEFAULT_STROKE_WIDTH: u32 = 2;

/// Path shape used by the diagramming surface to draw an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Orthogonal path with rounded corners.
    Smoothstep,
    /// Bezier curve.
    Default,
    /// Straight line.
    Straight,
    /// Orthogonal path with sharp corners.
    Step,
    /// Simplified bezier curve.
    Simplebezier,
}

impl Default for EdgeKind {
    fn default() -> Self {
        Self::Smoothstep
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Smoothstep => write!(f, "smoothstep"),
            Self::Default => write!(f, "default"),
            Self::Straight => write!(f, "straight"),
            Self::Step => write!(f, "step"),
            Self::Simplebezier => write!(f, "simplebezier"),
        }
    }
}

/// Visual style of an edge. The stroke is a snapshot taken at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width in pixels.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,
}

impl EdgeStyle {
    /// A default-width stroke of the given color.
    pub fn stroke(color: Color) -> Self {
        Self {
            stroke: color,
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self::stroke(Color::fallback_edge())
    }
}

fn default_stroke_width() -> u32 {
    DEFAULT_STROKE_WIDTH
}

/// Edge in the mind map.
///
/// Represents a directed connection from a parent (source) to a child (target).
/// The id is always derived from the endpoints; an `id` present in a
/// document is re-derived on read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "EdgeRepr")]
pub struct Edge {
    /// Edge identifier, `e{source}-{target}`.
    pub id: String,
    /// Parent node.
    pub source: NodeId,
    /// Child node.
    pub target: NodeId,
    /// Path shape.
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    /// Whether the surface animates the stroke.
    pub animated: bool,
    /// Stroke style.
    pub style: EdgeStyle,
}

impl Edge {
    /// Create an animated smoothstep edge with the given stroke.
    pub fn new(source: NodeId, target: NodeId, stroke: Color) -> Self {
        Self {
            id: Self::derive_id(&source, &target),
            source,
            target,
            kind: EdgeKind::Smoothstep,
            animated: true,
            style: EdgeStyle::stroke(stroke),
        }
    }

    /// The identifier an edge between `source` and `target` carries.
    pub fn derive_id(source: &NodeId, target: &NodeId) -> String {
        format!("e{}-{}", source, target)
    }

    /// True if this edge touches `id` at either end.
    pub fn touches(&self, id: &NodeId) -> bool {
        &self.source == id || &self.target == id
    }

    /// True if this edge runs `source -> target`.
    pub fn connects(&self, source: &NodeId, target: &NodeId) -> bool {
        &self.source == source && &self.target == target
    }
}

// Documents written by older builds omit `id`, `type`, `animated` or `style`.
#[derive(Deserialize)]
struct EdgeRepr {
    source: NodeId,
    target: NodeId,
    #[serde(rename = "type", default)]
    kind: EdgeKind,
    #[serde(default)]
    animated: bool,
    #[serde(default)]
    style: EdgeStyle,
}

impl From<EdgeRepr> for Edge {
    fn from(repr: EdgeRepr) -> Self {
        Self {
            id: Edge::derive_id(&repr.source, &repr.target),
            source: repr.source,
            target: repr.target,
            kind: repr.kind,
            animated: repr.animated,
            style: repr.style,
        }
    }
}
