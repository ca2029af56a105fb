//! Memoized snapshot loading.

use std::sync::Arc;

use tracing::{debug, info};

use super::{SnapshotStore, StorageError};
use crate::models::Snapshot;

/// Reuses parsed snapshots while the store's file signature is unchanged.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    signature: Option<String>,
    snapshots: Arc<Vec<Snapshot>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots for `store`, reloading when any file changed since the
    /// last call or after [`invalidate`](Self::invalidate).
    pub fn load(&mut self, store: &SnapshotStore) -> Result<Arc<Vec<Snapshot>>, StorageError> {
        let signature = store.signature()?;
        if let Some(snapshots) = self.lookup(&signature) {
            return Ok(snapshots);
        }
        Ok(self.insert(signature, store.list_snapshots()?))
    }

    /// Cached snapshots when they were loaded under `signature`.
    pub fn lookup(&self, signature: &str) -> Option<Arc<Vec<Snapshot>>> {
        if self.signature.as_deref() != Some(signature) {
            return None;
        }
        debug!("Snapshot cache hit ({})", short(signature));
        Some(Arc::clone(&self.snapshots))
    }

    /// Replace the cached set with `snapshots` loaded under `signature`.
    pub fn insert(&mut self, signature: String, snapshots: Vec<Snapshot>) -> Arc<Vec<Snapshot>> {
        let snapshots = Arc::new(snapshots);
        info!(
            "Snapshot cache refreshed: {} snapshots ({})",
            snapshots.len(),
            short(&signature)
        );
        self.signature = Some(signature);
        self.snapshots = Arc::clone(&snapshots);
        snapshots
    }

    pub fn invalidate(&mut self) {
        self.signature = None;
        self.snapshots = Arc::new(Vec::new());
    }

    pub fn is_warm(&self) -> bool {
        self.signature.is_some()
    }
}

fn short(signature: &str) -> &str {
    signature.get(..12).unwrap_or(signature)
}
