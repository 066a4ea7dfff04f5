//! Result Cache Module
//!
//! Redis-backed storage shared by every gateway instance:
//!
//! - terminal job results, JSON under `tsuite:results:<kind>:<id>`, expiring
//!   after the configured TTL
//! - job ownership, the submitter's id under `tsuite:owners:<kind>:<id>`
//!
//! When `REDIS_URL` is unset the gateway keeps both in memory. A configured
//! but unreachable cache fails startup.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, RedisError};
use uuid::Uuid;

use crate::backend::jobs::JobOwnerStore;
use crate::jobs::{ResultStore, StoreError};
use crate::shared::{JobId, JobResults};

/// Key prefix for cached results
pub const KEY_PREFIX: &str = "tsuite:results:";

/// Key prefix for job ownership
pub const OWNER_KEY_PREFIX: &str = "tsuite:owners:";

/// Connect to Redis and check the connection
///
/// # Returns
///
/// - `Ok(None)` if no URL is configured
/// - `Ok(Some(ConnectionManager))` if the server answered PING
///
/// # Errors
///
/// A configured URL that is invalid or does not answer is an error; the
/// gateway does not start without the cache it was pointed at.
pub async fn load_cache(redis_url: Option<&str>) -> Result<Option<ConnectionManager>, RedisError> {
    let Some(redis_url) = redis_url else {
        tracing::warn!("REDIS_URL not set. Job results will be cached in memory.");
        return Ok(None);
    };

    tracing::info!("Connecting to cache...");

    let client = Client::open(redis_url).map_err(|e| {
        tracing::error!("Invalid REDIS_URL: {}", e);
        e
    })?;
    let mut manager = ConnectionManager::new(client).await.map_err(|e| {
        tracing::error!("Failed to connect to cache: {}", e);
        e
    })?;
    redis::cmd("PING")
        .query_async::<String>(&mut manager)
        .await
        .map_err(|e| {
            tracing::error!("Cache did not answer PING: {}", e);
            e
        })?;

    tracing::info!("Cache connection established");
    Ok(Some(manager))
}

/// Whether the cache answers PING
pub async fn ping(manager: &ConnectionManager) -> bool {
    let mut conn = manager.clone();
    match redis::cmd("PING").query_async::<String>(&mut conn).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Cache PING failed: {}", e);
            false
        }
    }
}

/// Result store on Redis
#[derive(Clone)]
pub struct RedisResultStore {
    manager: ConnectionManager,
    ttl: Duration,
}

impl RedisResultStore {
    pub fn new(manager: ConnectionManager, ttl: Duration) -> Self {
        Self { manager, ttl }
    }
}

/// Cache key for a job's results
pub fn result_key(job_id: &JobId) -> String {
    format!("{}{}:{}", KEY_PREFIX, job_id.kind.id_prefix(), job_id.id)
}

/// Cache key for a job's owner
pub fn owner_key(job_id: &JobId) -> String {
    format!("{}{}:{}", OWNER_KEY_PREFIX, job_id.kind.id_prefix(), job_id.id)
}

fn backend_error(op: &str, e: RedisError) -> StoreError {
    tracing::error!("Cache {} failed: {}", op, e);
    StoreError::Backend(format!("redis {}: {}", op, e))
}

#[async_trait]
impl ResultStore for RedisResultStore {
    async fn get(&self, job_id: &JobId) -> Result<Option<JobResults>, StoreError> {
        let mut conn = self.manager.clone();
        let value = redis::cmd("GET")
            .arg(result_key(job_id))
            .query_async::<Option<String>>(&mut conn)
            .await
            .map_err(|e| backend_error("GET", e))?;

        match value {
            Some(json) => {
                tracing::debug!(job_id = %job_id, "Cache hit");
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, job_id: &JobId, results: &JobResults) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let json = serde_json::to_string(results)?;
        // SET EX rejects zero
        let ttl_seconds = self.ttl.as_secs().max(1);

        redis::cmd("SET")
            .arg(result_key(job_id))
            .arg(json)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| backend_error("SET", e))?;

        tracing::debug!(job_id = %job_id, ttl_seconds, "Cached job results");
        Ok(())
    }

    async fn remove(&self, job_id: &JobId) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        redis::cmd("DEL")
            .arg(result_key(job_id))
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| backend_error("DEL", e))?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let keys = redis::cmd("KEYS")
            .arg(format!("{}*", KEY_PREFIX))
            .query_async::<Vec<String>>(&mut conn)
            .await
            .map_err(|e| backend_error("KEYS", e))?;

        if keys.is_empty() {
            return Ok(());
        }

        let removed = redis::cmd("DEL")
            .arg(&keys)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| backend_error("DEL", e))?;
        tracing::info!(removed, "Cleared cached job results");
        Ok(())
    }
}

/// Job ownership on Redis
#[derive(Clone)]
pub struct RedisJobOwners {
    manager: ConnectionManager,
    retention: Duration,
}

impl RedisJobOwners {
    pub fn new(manager: ConnectionManager, retention: Duration) -> Self {
        Self { manager, retention }
    }
}

#[async_trait]
impl JobOwnerStore for RedisJobOwners {
    async fn record(&self, job_id: &JobId, user_id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        redis::cmd("SET")
            .arg(owner_key(job_id))
            .arg(user_id.to_string())
            .arg("EX")
            .arg(self.retention.as_secs().max(1))
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| backend_error("SET", e))
    }

    async fn owner(&self, job_id: &JobId) -> Result<Option<Uuid>, StoreError> {
        let mut conn = self.manager.clone();
        let value = redis::cmd("GET")
            .arg(owner_key(job_id))
            .query_async::<Option<String>>(&mut conn)
            .await
            .map_err(|e| backend_error("GET", e))?;

        value
            .map(|raw| {
                raw.parse::<Uuid>()
                    .map_err(|e| StoreError::Backend(format!("invalid owner for {}: {}", job_id, e)))
            })
            .transpose()
    }
}
