/**
 * Job Ownership
 *
 * Records which user submitted each job. Status and results are only
 * served to that user (and to administrators); everyone else gets 404.
 */

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use crate::jobs::StoreError;
use crate::shared::JobId;

/// How long ownership is remembered after submission
pub const DEFAULT_OWNER_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Who submitted which job
#[async_trait]
pub trait JobOwnerStore: Send + Sync {
    async fn record(&self, job_id: &JobId, user_id: Uuid) -> Result<(), StoreError>;

    async fn owner(&self, job_id: &JobId) -> Result<Option<Uuid>, StoreError>;
}

/// Process-local ownership records
#[derive(Debug)]
pub struct MemoryJobOwners {
    owners: RwLock<HashMap<JobId, (Uuid, Instant)>>,
    retention: Duration,
}

impl MemoryJobOwners {
    pub fn new(retention: Duration) -> Self {
        Self {
            owners: RwLock::default(),
            retention,
        }
    }

    fn is_live(&self, recorded_at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(recorded_at) < self.retention
    }
}

impl Default for MemoryJobOwners {
    fn default() -> Self {
        Self::new(DEFAULT_OWNER_RETENTION)
    }
}

#[async_trait]
impl JobOwnerStore for MemoryJobOwners {
    async fn record(&self, job_id: &JobId, user_id: Uuid) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut owners = self.owners.write().await;
        owners.retain(|_, (_, recorded_at)| self.is_live(*recorded_at, now));
        owners.insert(job_id.clone(), (user_id, now));
        Ok(())
    }

    async fn owner(&self, job_id: &JobId) -> Result<Option<Uuid>, StoreError> {
        let now = Instant::now();
        Ok(self
            .owners
            .read()
            .await
            .get(job_id)
            .filter(|(_, recorded_at)| self.is_live(*recorded_at, now))
            .map(|(user_id, _)| *user_id))
    }
}
