//! Editor facade.
//!
//! [`Editor`] is what a canvas shell talks to. It drives the pure operations
//! in [`ops`](crate::ops), commits each resulting snapshot to its
//! [`GraphStore`], and keeps presentation state (selection, edit flags and a
//! pending color request) in a [`UiState`] beside the graph. None of that
//! state is ever part of a node or of an export.
//!
//! Mutations are total: a request that cannot apply is logged at `debug` and
//! leaves both the store and the UI state unchanged. Imports and exports are
//! the only user-facing failures and return `Result`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::canonical::GraphFingerprint;
use crate::export::{self, ExportError, ExportFormat, ExportedFile};
use crate::import::{self, ImportError};
use crate::ops::{self, Effect, Rejected, Transition};
use crate::remote::{self, GraphSource};
use crate::slides::{derive_slides, SlideDeck};
use crate::store::GraphStore;
use crate::types::{Color, Graph, MindMap, NodeId, Position, Slide};

/// Which inline editors are open on a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EditFlags {
    /// Label editor open.
    pub label: bool,
    /// Description editor open.
    pub description: bool,
}

impl EditFlags {
    fn is_idle(&self) -> bool {
        !self.label && !self.description
    }
}

/// Why a color picker is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorPurpose {
    /// A freshly created root wants its first color.
    Root,
    /// An uncolored parent must be colored before a child is added.
    ChildOf,
}

/// An open color picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingColor {
    /// Node the picker colors.
    pub node: NodeId,
    /// What confirming leads to.
    pub purpose: ColorPurpose,
}

/// Presentation state kept beside the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UiState {
    /// Selected node, if any.
    pub selected: Option<NodeId>,
    /// Open inline editors, by node. Idle entries are dropped.
    pub editing: BTreeMap<NodeId, EditFlags>,
    /// Open color picker, if any.
    pub pending_color: Option<PendingColor>,
}

impl UiState {
    /// Edit flags for `node`; all false when none are open.
    pub fn flags(&self, node: &NodeId) -> EditFlags {
        self.editing.get(node).copied().unwrap_or_default()
    }

    /// True if the label editor is open on `node`.
    pub fn is_editing_label(&self, node: &NodeId) -> bool {
        self.flags(node).label
    }

    /// True if the description editor is open on `node`.
    pub fn is_editing_description(&self, node: &NodeId) -> bool {
        self.flags(node).description
    }

    fn update_flags(&mut self, node: &NodeId, apply: impl FnOnce(&mut EditFlags)) {
        let mut flags = self.flags(node);
        apply(&mut flags);
        if flags.is_idle() {
            self.editing.remove(node);
        } else {
            self.editing.insert(node.clone(), flags);
        }
    }

    /// Drop everything that refers to `node`.
    fn forget(&mut self, node: &NodeId) {
        if self.selected.as_ref() == Some(node) {
            self.selected = None;
        }
        self.editing.remove(node);
        if self.pending_color.as_ref().is_some_and(|p| &p.node == node) {
            self.pending_color = None;
        }
    }
}

/// Result of asking for a child through the color prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildRequest {
    /// The parent was colored and the child exists.
    Created(NodeId),
    /// A color picker is open on the parent.
    AwaitingColor,
}

/// What confirming a color did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorOutcome {
    /// A root got its color.
    Recolored(NodeId),
    /// The parent got its color and a child was created under it.
    ChildCreated {
        /// The recolored parent.
        parent: NodeId,
        /// The new child.
        child: NodeId,
    },
}

/// Mind map editor over a snapshot store.
pub struct Editor<S: GraphStore> {
    store: Arc<S>,
    ui: UiState,
}

impl<S: GraphStore> Editor<S> {
    /// Create an editor over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            ui: UiState::default(),
        }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<MindMap> {
        self.store.get()
    }

    /// Presentation state.
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    fn commit(&mut self, action: &'static str, result: Result<Transition, Rejected>) -> Option<Effect> {
        match result {
            Ok(transition) => {
                self.store.replace(transition.map);
                Some(transition.effect)
            }
            Err(reason) => {
                debug!(action, reason = %reason, "Ignored request");
                None
            }
        }
    }

    // ─── Structure ───

    /// Add a root and open a color picker for it.
    pub fn create_root_node(&mut self) -> Option<NodeId> {
        let transition = ops::create_root_node(&self.snapshot());
        match self.commit("create_root_node", Ok(transition))? {
            Effect::RootCreated(id) => {
                self.ui.pending_color = Some(PendingColor {
                    node: id.clone(),
                    purpose: ColorPurpose::Root,
                });
                Some(id)
            }
            _ => None,
        }
    }

    /// Add a child under `parent`, select it and open its label editor.
    pub fn create_child_node(&mut self, parent: &NodeId, color: Option<&Color>) -> Option<NodeId> {
        let result = ops::create_child_node(&self.snapshot(), parent, color);
        match self.commit("create_child_node", result)? {
            Effect::ChildCreated { child, .. } => {
                self.ui.update_flags(&child, |f| f.label = true);
                self.ui.selected = Some(child.clone());
                Some(child)
            }
            _ => None,
        }
    }

    /// Add a child, asking for the parent's color first if it has none.
    ///
    /// Returns `None` when the parent does not exist.
    pub fn request_child_with_color_prompt(&mut self, parent: &NodeId) -> Option<ChildRequest> {
        let colored = self.snapshot().graph.node(parent)?.color.is_some();
        if colored {
            return self.create_child_node(parent, None).map(ChildRequest::Created);
        }
        self.ui.pending_color = Some(PendingColor {
            node: parent.clone(),
            purpose: ColorPurpose::ChildOf,
        });
        Some(ChildRequest::AwaitingColor)
    }

    /// Apply `color` to the open picker's node and finish its request.
    pub fn confirm_color(&mut self, color: Color) -> Option<ColorOutcome> {
        let pending = self.ui.pending_color.take()?;
        let result = ops::recolor(&self.snapshot(), &pending.node, color);
        self.commit("confirm_color", result)?;

        match pending.purpose {
            ColorPurpose::Root => Some(ColorOutcome::Recolored(pending.node)),
            ColorPurpose::ChildOf => {
                let child = self.create_child_node(&pending.node, None)?;
                Some(ColorOutcome::ChildCreated {
                    parent: pending.node,
                    child,
                })
            }
        }
    }

    /// Close the open picker without changing anything.
    pub fn cancel_color(&mut self) -> bool {
        self.ui.pending_color.take().is_some()
    }

    /// Connect `source -> target`.
    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> bool {
        let result = ops::connect(&self.snapshot(), source, target);
        self.commit("connect", result).is_some()
    }

    /// Remove a node and its edges. The anchor is never removed.
    pub fn delete_node(&mut self, node: &NodeId) -> bool {
        let result = ops::delete_node(&self.snapshot(), node);
        match self.commit("delete_node", result) {
            Some(Effect::Deleted { node, edges_removed }) => {
                info!(node = %node, edges_removed, "Deleted node");
                self.ui.forget(&node);
                true
            }
            _ => false,
        }
    }

    // ─── Node fields ───

    /// Set a node's color.
    pub fn recolor(&mut self, node: &NodeId, color: Color) -> bool {
        let result = ops::recolor(&self.snapshot(), node, color);
        self.commit("recolor", result).is_some()
    }

    /// Save a label and close the label editor.
    pub fn rename_label(&mut self, node: &NodeId, text: &str) -> bool {
        let result = ops::rename_label(&self.snapshot(), node, text);
        let applied = self.commit("rename_label", result).is_some();
        if applied {
            self.ui.update_flags(node, |f| f.label = false);
        }
        applied
    }

    /// Save a description and close the description editor.
    pub fn set_description(&mut self, node: &NodeId, text: &str) -> bool {
        let result = ops::set_description(&self.snapshot(), node, text);
        let applied = self.commit("set_description", result).is_some();
        if applied {
            self.ui.update_flags(node, |f| f.description = false);
        }
        applied
    }

    /// Store where a drag ended.
    pub fn move_node(&mut self, node: &NodeId, position: Position) -> bool {
        let result = ops::move_node(&self.snapshot(), node, position);
        self.commit("move_node", result).is_some()
    }

    // ─── Selection and inline editors ───

    /// Select a node.
    pub fn select(&mut self, node: &NodeId) -> bool {
        if !self.snapshot().graph.contains(node) {
            return false;
        }
        self.ui.selected = Some(node.clone());
        true
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.ui.selected = None;
    }

    /// Open the label editor on a node.
    pub fn begin_edit_label(&mut self, node: &NodeId) -> bool {
        if !self.snapshot().graph.contains(node) {
            return false;
        }
        self.ui.update_flags(node, |f| f.label = true);
        true
    }

    /// Open the description editor on a node.
    pub fn begin_edit_description(&mut self, node: &NodeId) -> bool {
        if !self.snapshot().graph.contains(node) {
            return false;
        }
        self.ui.update_flags(node, |f| f.description = true);
        true
    }

    /// Close every inline editor on a node without saving.
    pub fn cancel_edit(&mut self, node: &NodeId) {
        self.ui.editing.remove(node);
    }

    // ─── Import / export ───

    /// The exportable graph.
    pub fn export_snapshot(&self) -> Graph {
        ops::export_snapshot(&self.snapshot())
    }

    /// Render the graph in `format`.
    pub fn export(&self, format: ExportFormat) -> Result<ExportedFile, ExportError> {
        let file = export::render(&self.snapshot().graph, format)?;
        info!(format = %format, bytes = file.bytes.len(), "Exported mindmap");
        Ok(file)
    }

    /// Replace the graph. On failure nothing changes.
    pub fn import_snapshot(&mut self, graph: Graph) -> Result<(), ImportError> {
        let transition = ops::import_snapshot(&self.snapshot(), graph)?;
        let nodes = transition.map.graph.nodes.len();
        let edges = transition.map.graph.edges.len();
        self.store.replace(transition.map);
        self.ui = UiState::default();
        info!(nodes, edges, "Imported mindmap");
        Ok(())
    }

    /// Parse and import a JSON document.
    pub fn import_json(&mut self, json: &str) -> Result<(), ImportError> {
        let graph = import::parse_graph(json)?;
        self.import_snapshot(graph)
    }

    /// Import a picked file; only `.json` names are accepted.
    pub fn import_file(&mut self, name: &str, contents: &str) -> Result<(), ImportError> {
        let graph = import::parse_file(name, contents)?;
        self.import_snapshot(graph)
    }

    /// Fetch and import the graph behind a share link.
    pub async fn import_remote<G>(&mut self, source: &G, link: &str) -> Result<(), ImportError>
    where
        G: GraphSource + ?Sized,
    {
        let graph = remote::fetch_graph(source, link).await?;
        self.import_snapshot(graph)
    }

    // ─── Presentation ───

    /// Slides for the current graph.
    pub fn slides(&self) -> Vec<Slide> {
        derive_slides(&self.snapshot().graph)
    }

    /// Start a presentation at the first slide.
    pub fn present(&self) -> SlideDeck {
        SlideDeck::from_graph(&self.snapshot().graph)
    }

    /// Content fingerprint of the current graph.
    pub fn fingerprint(&self) -> Result<GraphFingerprint, serde_json::Error> {
        GraphFingerprint::of(&self.snapshot().graph)
    }
}

impl<S: GraphStore> std::fmt::Debug for Editor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("revision", &self.store.revision())
            .field("ui", &self.ui)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryGraphStore;
    use crate::types::DEFAULT_COLOR;

    fn editor() -> Editor<InMemoryGraphStore> {
        Editor::new(Arc::new(InMemoryGraphStore::new()))
    }

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn color(s: &str) -> Color {
        Color::parse(s).unwrap()
    }

    #[test]
    fn test_create_root_opens_color_picker() {
        let mut ed = editor();
        let root = ed.create_root_node().unwrap();

        assert_eq!(root, id("2"));
        assert_eq!(
            ed.ui().pending_color,
            Some(PendingColor { node: root.clone(), purpose: ColorPurpose::Root })
        );

        assert_eq!(ed.confirm_color(color("#ff8800")), Some(ColorOutcome::Recolored(root.clone())));
        assert_eq!(ed.snapshot().graph.node(&root).unwrap().color, Some(color("#ff8800")));
        assert!(ed.ui().pending_color.is_none());
    }

    #[test]
    fn test_cancelled_root_stays_uncolored() {
        let mut ed = editor();
        let root = ed.create_root_node().unwrap();
        assert!(ed.cancel_color());
        assert!(!ed.cancel_color());
        assert!(ed.snapshot().graph.node(&root).unwrap().color.is_none());
    }

    #[test]
    fn test_create_child_selects_and_edits() {
        let mut ed = editor();
        let child = ed.create_child_node(&id("1"), None).unwrap();

        assert_eq!(ed.ui().selected, Some(child.clone()));
        assert!(ed.ui().is_editing_label(&child));
        assert!(!ed.ui().is_editing_description(&child));
        assert_eq!(ed.store().revision(), 1);
    }

    #[test]
    fn test_rejected_request_is_a_no_op() {
        let mut ed = editor();
        let before = ed.snapshot();

        assert!(ed.create_child_node(&id("9"), None).is_none());
        assert!(!ed.delete_node(&id("1")));
        assert!(!ed.connect(&id("1"), &id("1")));
        assert!(!ed.rename_label(&id("9"), "x"));

        assert_eq!(*ed.snapshot(), *before);
        assert_eq!(ed.store().revision(), 0);
        assert_eq!(*ed.ui(), UiState::default());
    }

    #[test]
    fn test_child_prompt_waits_for_uncolored_parent() {
        let mut ed = editor();
        assert_eq!(ed.request_child_with_color_prompt(&id("1")), Some(ChildRequest::AwaitingColor));
        assert_eq!(ed.snapshot().graph.nodes.len(), 1);

        let outcome = ed.confirm_color(color("#112233")).unwrap();
        let graph = ed.snapshot().graph.clone();
        match outcome {
            ColorOutcome::ChildCreated { parent, child } => {
                assert_eq!(parent, id("1"));
                assert_eq!(graph.node(&parent).unwrap().color, Some(color("#112233")));
                assert_eq!(graph.node(&child).unwrap().color, Some(color("#112233")));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_child_prompt_skips_colored_parent() {
        let mut ed = editor();
        ed.recolor(&id("1"), color("#000000"));
        let request = ed.request_child_with_color_prompt(&id("1")).unwrap();
        assert!(matches!(request, ChildRequest::Created(_)));
        assert!(ed.ui().pending_color.is_none());

        assert_eq!(ed.request_child_with_color_prompt(&id("404")), None);
    }

    #[test]
    fn test_cancelled_child_prompt_changes_nothing() {
        let mut ed = editor();
        ed.request_child_with_color_prompt(&id("1"));
        assert!(ed.cancel_color());
        assert_eq!(*ed.snapshot(), MindMap::new());
    }

    #[test]
    fn test_delete_clears_ui_state() {
        let mut ed = editor();
        let child = ed.create_child_node(&id("1"), None).unwrap();
        ed.request_child_with_color_prompt(&child);
        // Child inherited a color, so the prompt created a grandchild instead
        assert!(ed.ui().pending_color.is_none());

        let uncolored = ed.create_root_node().unwrap();
        ed.cancel_color();
        ed.request_child_with_color_prompt(&uncolored);
        ed.select(&uncolored);
        ed.begin_edit_description(&uncolored);

        assert!(ed.delete_node(&uncolored));
        assert!(ed.ui().selected.is_none());
        assert!(ed.ui().pending_color.is_none());
        assert!(!ed.ui().editing.contains_key(&uncolored));
    }

    #[test]
    fn test_edit_flags_close_on_save() {
        let mut ed = editor();
        let anchor = id("1");
        assert!(ed.begin_edit_label(&anchor));
        assert!(ed.begin_edit_description(&anchor));

        assert!(ed.rename_label(&anchor, "Plan"));
        assert!(!ed.ui().is_editing_label(&anchor));
        assert!(ed.ui().is_editing_description(&anchor));

        assert!(ed.set_description(&anchor, "notes"));
        assert!(ed.ui().editing.is_empty());

        assert!(!ed.begin_edit_label(&id("77")));
    }

    #[test]
    fn test_cancel_edit_keeps_text() {
        let mut ed = editor();
        let anchor = id("1");
        ed.begin_edit_label(&anchor);
        ed.cancel_edit(&anchor);
        assert!(ed.ui().editing.is_empty());
        assert_eq!(ed.snapshot().graph.node(&anchor).unwrap().label, "Central Idea");
    }

    #[test]
    fn test_export_never_carries_ui_flags() {
        let mut ed = editor();
        let child = ed.create_child_node(&id("1"), None).unwrap();
        assert!(ed.ui().is_editing_label(&child));

        let file = ed.export(ExportFormat::Json).unwrap();
        let text = String::from_utf8(file.bytes).unwrap();
        assert!(!text.contains("isEditing"));
        assert!(text.contains(DEFAULT_COLOR));
    }

    #[test]
    fn test_import_resets_ui_and_keeps_store_on_failure() {
        let mut ed = editor();
        ed.create_child_node(&id("1"), None);
        let before = ed.snapshot();
        let revision = ed.store().revision();

        assert!(ed.import_json("{\"nodes\": []}").is_err());
        assert!(ed.import_file("map.txt", "{}").is_err());
        assert_eq!(*ed.snapshot(), *before);
        assert_eq!(ed.store().revision(), revision);

        let json = export::to_pretty_json(&before.graph).unwrap();
        ed.import_json(&json).unwrap();
        assert_eq!(ed.snapshot().graph, before.graph);
        assert_eq!(*ed.ui(), UiState::default());
    }

    #[test]
    fn test_move_node() {
        let mut ed = editor();
        assert!(ed.move_node(&id("1"), Position::new(5.0, 6.0)));
        assert!(!ed.move_node(&id("1"), Position::new(f64::NAN, 6.0)));
        assert_eq!(ed.snapshot().graph.nodes[0].position, Position::new(5.0, 6.0));
    }

    #[test]
    fn test_present() {
        let mut ed = editor();
        ed.rename_label(&id("1"), "Idea");
        let plan = ed.create_child_node(&id("1"), None).unwrap();
        ed.rename_label(&plan, "Plan");

        let deck = ed.present();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.current().unwrap().title, "Idea");
        assert_eq!(ed.slides()[1].title, "Plan");
    }

    #[test]
    fn test_fingerprint_follows_store() {
        let mut ed = editor();
        let before = ed.fingerprint().unwrap();
        ed.rename_label(&id("1"), "Changed");
        assert_ne!(before, ed.fingerprint().unwrap());
    }
}
