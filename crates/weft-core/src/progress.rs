//! Mutex-guarded per-node result map shared by the scheduler and readers.

use crate::result::NodeResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Workflow progress: a mapping from node id to its latest [`NodeResult`]
/// (§3 "Workflow progress"). Updated atomically per node under a mutex;
/// readers take a snapshot rather than holding the lock.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    inner: Arc<Mutex<HashMap<String, NodeResult>>>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, node_id: impl Into<String>, result: NodeResult) {
        self.inner.lock().insert(node_id.into(), result);
    }

    pub fn get(&self, node_id: &str) -> Option<NodeResult> {
        self.inner.lock().get(node_id).cloned()
    }

    /// A read-only snapshot of the whole map at this instant.
    pub fn snapshot(&self) -> HashMap<String, NodeResult> {
        self.inner.lock().clone()
    }

    pub fn all_succeeded(&self, node_ids: &[String]) -> bool {
        let guard = self.inner.lock();
        node_ids
            .iter()
            .all(|id| guard.get(id).map(|r| r.success).unwrap_or(false))
    }
}
