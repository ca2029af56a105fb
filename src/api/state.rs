use std::sync::Arc;

use crate::pipeline::PipelineContext;
use crate::storage::{SnapshotCache, SnapshotStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub context: Arc<PipelineContext>,
    pub cache: Arc<tokio::sync::RwLock<SnapshotCache>>,
}

impl AppState {
    pub fn new(store: SnapshotStore, context: PipelineContext) -> Self {
        Self {
            store: Arc::new(store),
            context: Arc::new(context),
            cache: Arc::new(tokio::sync::RwLock::new(SnapshotCache::new())),
        }
    }
}
