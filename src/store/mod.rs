//! Snapshot storage.

pub mod memory;

use std::sync::Arc;
use crate::types::MindMap;

/// Holder of the authoritative mind map snapshot.
///
/// Snapshots are immutable; a store only ever swaps one whole snapshot for
/// another. Stores perform no validation, that belongs to the operations
/// producing the snapshot.
pub trait GraphStore: Send + Sync {
    /// The current snapshot.
    fn get(&self) -> Arc<MindMap>;

    /// Swap in the next snapshot and notify observers.
    fn replace(&self, next: MindMap);

    /// Number of snapshots committed since the store was created.
    fn revision(&self) -> u64;
}

/// Callback invoked after every committed snapshot.
pub trait SnapshotObserver: Send + Sync {
    /// Called with the snapshot that was just committed.
    fn snapshot_replaced(&self, snapshot: &Arc<MindMap>, revision: u64);
}

impl<S: GraphStore + ?Sized> GraphStore for Arc<S> {
    fn get(&self) -> Arc<MindMap> {
        (**self).get()
    }

    fn replace(&self, next: MindMap) {
        (**self).replace(next)
    }

    fn revision(&self) -> u64 {
        (**self).revision()
    }
}

pub use memory::InMemoryGraphStore;
