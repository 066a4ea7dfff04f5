/**
 * Job Result Store
 *
 * A keyed cache for terminal job results. Callers hold an
 * `Arc<dyn ResultStore>`, so the in-memory store can be swapped for a
 * shared backend (see `backend::cache::RedisResultStore`) without touching
 * call sites.
 */

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::shared::{JobId, JobResults};

/// Result store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend failed
    #[error("result store backend error: {0}")]
    Backend(String),

    /// A stored entry could not be encoded or decoded
    #[error("result store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Keyed cache of job results
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn get(&self, job_id: &JobId) -> Result<Option<JobResults>, StoreError>;

    async fn set(&self, job_id: &JobId, results: &JobResults) -> Result<(), StoreError>;

    async fn remove(&self, job_id: &JobId) -> Result<(), StoreError>;

    /// Drop every stored entry
    async fn clear(&self) -> Result<(), StoreError>;
}

/// Process-local result store
///
/// With a TTL, entries expire like the Redis store's; expired entries are
/// dropped on the next write.
#[derive(Debug, Default)]
pub struct MemoryResultStore {
    entries: RwLock<HashMap<JobId, Entry>>,
    ttl: Option<Duration>,
}

#[derive(Debug)]
struct Entry {
    results: JobResults,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose entries expire `ttl` after they are written
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::default(),
            ttl: Some(ttl),
        }
    }

    /// Number of unexpired entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn get(&self, job_id: &JobId) -> Result<Option<JobResults>, StoreError> {
        let now = Instant::now();
        Ok(self
            .entries
            .read()
            .await
            .get(job_id)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.results.clone()))
    }

    async fn set(&self, job_id: &JobId, results: &JobResults) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(
            job_id.clone(),
            Entry {
                results: results.clone(),
                expires_at: self.ttl.and_then(|ttl| now.checked_add(ttl)),
            },
        );
        Ok(())
    }

    async fn remove(&self, job_id: &JobId) -> Result<(), StoreError> {
        self.entries.write().await.remove(job_id);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.entries.write().await.clear();
        Ok(())
    }
}
