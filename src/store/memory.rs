//! In-memory snapshot store.

use std::sync::Arc;
use parking_lot::RwLock;

use crate::types::MindMap;
use super::{GraphStore, SnapshotObserver};

/// In-memory snapshot store.
///
/// Readers get a cheap `Arc` clone of the current snapshot; a replace swaps
/// the pointer under a short write lock and then notifies observers outside
/// of it.
#[derive(Default)]
pub struct InMemoryGraphStore {
    /// Current snapshot and its revision.
    current: RwLock<(Arc<MindMap>, u64)>,
    /// Registered observers.
    observers: RwLock<Vec<Arc<dyn SnapshotObserver>>>,
}

impl InMemoryGraphStore {
    /// Create a store holding the default map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `map`.
    pub fn with_map(map: MindMap) -> Self {
        Self {
            current: RwLock::new((Arc::new(map), 0)),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Register an observer for future replacements.
    pub fn subscribe(&self, observer: Arc<dyn SnapshotObserver>) {
        self.observers.write().push(observer);
    }

    /// Number of registered observers.
    pub fn num_observers(&self) -> usize {
        self.observers.read().len()
    }
}

impl std::fmt::Debug for InMemoryGraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let current = self.current.read();
        f.debug_struct("InMemoryGraphStore")
            .field("nodes", &current.0.graph.nodes.len())
            .field("edges", &current.0.graph.edges.len())
            .field("revision", &current.1)
            .field("observers", &self.num_observers())
            .finish()
    }
}

impl GraphStore for InMemoryGraphStore {
    fn get(&self) -> Arc<MindMap> {
        Arc::clone(&self.current.read().0)
    }

    fn replace(&self, next: MindMap) {
        let snapshot = Arc::new(next);
        let revision = {
            let mut current = self.current.write();
            current.1 = current.1.saturating_add(1);
            current.0 = Arc::clone(&snapshot);
            current.1
        };

        let observers: Vec<_> = self.observers.read().iter().cloned().collect();
        for observer in observers {
            observer.snapshot_replaced(&snapshot, revision);
        }
    }

    fn revision(&self) -> u64 {
        self.current.read().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use crate::types::{Node, NodeId, Position};

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(usize, u64)>>,
    }

    impl SnapshotObserver for Recorder {
        fn snapshot_replaced(&self, snapshot: &Arc<MindMap>, revision: u64) {
            self.seen.lock().push((snapshot.graph.nodes.len(), revision));
        }
    }

    #[test]
    fn test_starts_with_default_map() {
        let store = InMemoryGraphStore::new();
        assert_eq!(*store.get(), MindMap::new());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_replace_swaps_whole_snapshot() {
        let store = InMemoryGraphStore::new();
        let before = store.get();

        let mut next = MindMap::new();
        next.graph.nodes.push(Node::new(NodeId::from("2"), Position::default(), 0));
        store.replace(next.clone());

        assert_eq!(*store.get(), next);
        assert_eq!(store.revision(), 1);
        // Earlier readers keep their snapshot
        assert_eq!(before.graph.nodes.len(), 1);
    }

    #[test]
    fn test_observers_are_notified() {
        let store = InMemoryGraphStore::new();
        let recorder = Arc::new(Recorder::default());
        store.subscribe(recorder.clone());
        assert_eq!(store.num_observers(), 1);

        store.replace(MindMap::new());
        let mut next = MindMap::new();
        next.graph.nodes.push(Node::new(NodeId::from("5"), Position::default(), 0));
        store.replace(next);

        assert_eq!(*recorder.seen.lock(), vec![(1, 1), (2, 2)]);
    }
}
