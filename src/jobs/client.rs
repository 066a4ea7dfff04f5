/**
 * Job Submission Client
 *
 * Submits test runs and security scans to an `Executor`, queries their
 * status, and fetches their results. Terminal results are kept in a
 * `ResultStore` so repeated fetches return the same payload without another
 * executor round trip.
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::jobs::error::{JobError, SUBMISSION_FAILED};
use crate::jobs::executor::{Executor, HttpExecutor};
use crate::jobs::store::{MemoryResultStore, ResultStore};
use crate::jobs::watch::JobWatch;
use crate::shared::{ClientConfig, JobId, JobKind, JobResults, JobSpec, StatusReport};

/// Time-based job id source
///
/// Ids are `<prefix>-<unix millis>`. Within one process the numeric part is
/// strictly increasing, so two submissions in the same millisecond get
/// distinct ids.
#[derive(Debug, Default)]
pub struct JobIdGenerator {
    last: AtomicU64,
}

impl JobIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, kind: JobKind) -> JobId {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        let stamp = now.max(previous + 1);
        JobId::new(kind, format!("{}-{}", kind.id_prefix(), stamp))
    }
}

/// Client for the job submission and polling protocol
#[derive(Clone)]
pub struct JobClient {
    executor: Arc<dyn Executor>,
    store: Arc<dyn ResultStore>,
    project_id: String,
    ids: Arc<JobIdGenerator>,
}

impl JobClient {
    pub fn new(
        executor: Arc<dyn Executor>,
        store: Arc<dyn ResultStore>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            store,
            project_id: project_id.into(),
            ids: Arc::new(JobIdGenerator::new()),
        }
    }

    /// HTTP executor and in-memory result store, as described by `config`
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            Arc::new(HttpExecutor::new(config.executor_url.clone())),
            Arc::new(MemoryResultStore::new()),
            config.project_id.clone(),
        )
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Submit a job and return its id once the executor has queued it
    ///
    /// # Errors
    ///
    /// * `Invalid` - the parameters failed validation; nothing was sent
    /// * `Rejected` - the executor did not queue the job
    pub async fn submit(&self, spec: JobSpec) -> Result<JobId, JobError> {
        spec.validate()?;

        let job_id = self.ids.next(spec.kind());
        let request = spec.into_request(&job_id, &self.project_id);
        tracing::info!(job_id = %job_id, kind = %job_id.kind, "Submitting job");

        let reply = self.executor.submit(&request).await?;
        if !reply.is_accepted() {
            let message = reply.error_message().unwrap_or(SUBMISSION_FAILED).to_string();
            tracing::warn!(job_id = %job_id, reason = %message, "Executor rejected job");
            return Err(JobError::Rejected(message));
        }

        Ok(job_id)
    }

    /// One status query
    pub async fn poll_status(&self, job_id: &JobId) -> Result<StatusReport, JobError> {
        let report = self.executor.status(job_id).await?;
        tracing::debug!(job_id = %job_id, status = %report.status, progress = ?report.progress, "Job status");
        Ok(report)
    }

    /// Results of a finished job
    ///
    /// A stored copy is returned when present. Otherwise results come from the
    /// executor and, once terminal, are stored. Store failures are logged and
    /// do not fail the call.
    pub async fn fetch_results(&self, job_id: &JobId) -> Result<JobResults, JobError> {
        match self.store.get(job_id).await {
            Ok(Some(results)) => return Ok(results),
            Ok(None) => {}
            Err(e) => tracing::warn!(job_id = %job_id, error = %e, "Result store read failed"),
        }

        let results = self.executor.results(job_id).await?;
        if !results.status.is_terminal() {
            return Err(JobError::NotReady {
                id: job_id.id.clone(),
                status: results.status,
            });
        }

        if let Err(e) = self.store.set(job_id, &results).await {
            tracing::warn!(job_id = %job_id, error = %e, "Result store write failed");
        }

        Ok(results)
    }

    /// Poll `job_id` every `interval` until it finishes
    ///
    /// The returned handle owns the polling task; dropping it stops polling.
    pub fn watch(&self, job_id: JobId, interval: Duration) -> JobWatch {
        JobWatch::spawn(self.clone(), job_id, interval)
    }
}
