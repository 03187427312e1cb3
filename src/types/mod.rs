//! Core types for the mind map.

pub mod color;
pub mod node;
pub mod edge;
pub mod graph;
pub mod map;
pub mod slide;

pub use color::{Color, InvalidColor, DEFAULT_COLOR, FALLBACK_EDGE_COLOR};
pub use node::{Node, NodeId, Position, MAX_DISPLAY_LEVEL, UNTITLED_LABEL};
pub use edge::{Edge, EdgeKind, EdgeStyle};
pub use graph::{Graph, GraphError};
pub use map::MindMap;
pub use slide::{Slide, SlideKind};
