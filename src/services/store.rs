use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use crate::models::PoolRecord;

#[derive(Default)]
struct Snapshot {
    generation: u64,
    fetched_at: Option<DateTime<Utc>>,
    pools: Vec<Arc<PoolRecord>>,
}

/// Latest accepted snapshot of the upstream listing. Replaced wholesale,
/// never merged; readers get Arc clones.
pub struct PoolStore {
    inner: RwLock<Snapshot>,
}

impl PoolStore {
    pub fn new() -> Self {
        Self { inner: RwLock::new(Snapshot::default()) }
    }

    /// Zero-copy retrieval - returns Arc clones (pointer only)
    pub fn get_all(&self) -> Vec<Arc<PoolRecord>> {
        self.inner.read().pools.clone()
    }

    pub fn get(&self, id: &str) -> Option<Arc<PoolRecord>> {
        self.inner.read().pools.iter().find(|p| p.id == id).cloned()
    }

    /// Offer a snapshot. Each fetch carries a monotonically increasing
    /// generation; anything not strictly newer than the current snapshot
    /// is dropped, so a slow response can never overwrite fresher state.
    pub fn apply(&self, generation: u64, pools: Vec<PoolRecord>) -> bool {
        let mut inner = self.inner.write();
        if generation <= inner.generation {
            return false;
        }
        inner.generation = generation;
        inner.fetched_at = Some(Utc::now());
        inner.pools = pools.into_iter().map(Arc::new).collect();
        true
    }

    pub fn len(&self) -> usize {
        self.inner.read().pools.len()
    }

    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().fetched_at
    }
}

impl Default for PoolStore {
    fn default() -> Self {
        Self::new()
    }
}
