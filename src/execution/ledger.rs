//! Bounded, newest-first execution history shared by both controllers.

use super::ExecutionRecord;
use std::collections::VecDeque;
use tokio::sync::RwLock;

/// Number of records kept before the oldest is evicted.
pub const LEDGER_CAPACITY: usize = 10;

pub struct Ledger {
    records: RwLock<VecDeque<ExecutionRecord>>,
    capacity: usize,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::with_capacity(LEDGER_CAPACITY)
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::with_capacity(capacity + 1)),
            capacity,
        }
    }

    /// Insert at the head, evicting the oldest entry past capacity.
    pub async fn append(&self, record: ExecutionRecord) {
        let mut records = self.records.write().await;
        records.push_front(record);
        records.truncate(self.capacity);
    }

    /// All retained records, newest first.
    pub async fn all(&self) -> Vec<ExecutionRecord> {
        self.records.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
