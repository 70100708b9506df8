use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::OperationEntry;

/// Number of entries kept before the oldest are dropped
pub const DEFAULT_CAPACITY: usize = 100;

/// In-memory log of recent downtime operations, newest first.
///
/// Purely diagnostic: nothing is persisted and a restart empties it.
#[derive(Clone)]
pub struct OperationLog {
    entries: Arc<RwLock<VecDeque<OperationEntry>>>,
    capacity: usize,
}

impl Default for OperationLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl OperationLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub async fn record(&self, entry: OperationEntry) {
        let mut entries = self.entries.write().await;
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    pub async fn list(&self) -> Vec<OperationEntry> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
