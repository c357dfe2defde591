//! In-memory record store
//!
//! Append-only ordered sequence of enriched records guarded by a
//! `tokio::sync::RwLock`, so concurrent submissions never interleave.

use super::types::StoredRecord;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-lifetime store of enriched records
#[derive(Clone)]
pub struct RecordStore {
    records: Arc<RwLock<Vec<StoredRecord>>>,
}

impl RecordStore {
    /// Create a new empty record store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append a record, returning the new record count
    pub async fn append(&self, record: StoredRecord) -> usize {
        let mut records = self.records.write().await;
        records.push(record);
        records.len()
    }

    /// Snapshot of all records in insertion order
    pub async fn list(&self) -> Vec<StoredRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
