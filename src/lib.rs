//! # mindmap-kernel
//!
//! Graph model for a mind-mapping canvas, and the slides derived from it.
//!
//! The kernel answers two questions:
//!
//! > Given the current map and a user gesture, what is the next map?
//!
//! > Given a map, what does its presentation look like?
//!
//! ## Core Contract
//!
//! 1. Every gesture is a pure operation from one immutable [`MindMap`]
//!    snapshot to the next; requests that cannot apply are no-ops
//! 2. The map stays a forest: one parent per node, no cycles, no self-loops
//! 3. Slides are a pure function of the graph: a title slide for the first
//!    root, one topic slide per level-1 node
//!
//! ## Architecture
//!
//! ```text
//! Gesture → Editor → ops (pure) → Transition → GraphStore (Arc snapshot)
//!              ↓                                      ↓
//!           UiState                         slides / export / fingerprint
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Node and edge order is insertion order and survives export/import
//! - Same graph → same slides, same export bytes, same fingerprint
//! - Ids come from a counter carried in the snapshot

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod layout;
pub mod ops;
pub mod store;
pub mod editor;
pub mod slides;
pub mod canonical;
pub mod export;
pub mod import;
pub mod remote;

#[cfg(feature = "service")]
pub mod service;

// Re-exports
pub use types::{
    Color, InvalidColor, Node, NodeId, Position, Edge, EdgeKind, EdgeStyle,
    Graph, GraphError, MindMap, Slide, SlideKind,
    DEFAULT_COLOR, FALLBACK_EDGE_COLOR, MAX_DISPLAY_LEVEL, UNTITLED_LABEL,
};
pub use ops::{Effect, Rejected, Transition, inherit_on_create, connect_stroke, backfill_on_connect};
pub use store::{GraphStore, SnapshotObserver, InMemoryGraphStore};
pub use editor::{Editor, UiState, EditFlags, PendingColor, ColorPurpose, ChildRequest, ColorOutcome};
pub use slides::{derive_slides, SlideDeck};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex, GraphFingerprint};
pub use export::{ExportError, ExportFormat, ExportedFile};
pub use import::{ImportError, parse_graph, accepts_file_name};
pub use remote::{GraphSource, extract_share_token, download_url, fetch_graph};

// Service re-exports (when service feature is enabled)
#[cfg(feature = "service")]
pub use service::{create_router, ServiceConfig, ServiceState};

/// Schema version of the exported document shape.
/// Increment on breaking changes to node, edge or slide serialization.
pub const MINDMAP_SCHEMA_VERSION: &str = "1.0.0";
