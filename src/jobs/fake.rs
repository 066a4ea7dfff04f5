/**
 * Fake Executor
 *
 * An in-process `Executor` that advances each job one scripted step per
 * status query and hands back canned results once the job is terminal.
 * Demo and test flows use this instead of special-casing URLs in the real
 * submission path.
 */

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::json;

use crate::jobs::error::JobError;
use crate::jobs::executor::Executor;
use crate::shared::{JobId, JobKind, JobRequest, JobResults, JobStatus, StatusReport, SubmitResponse};

struct FakeJob {
    kind: JobKind,
    step: usize,
}

/// Scripted executor test double
pub struct FakeExecutor {
    script: Vec<JobStatus>,
    rejection: Option<String>,
    jobs: Mutex<HashMap<String, FakeJob>>,
    submitted: Mutex<Vec<JobRequest>>,
    history: Mutex<Vec<JobStatus>>,
    failing_polls: AtomicU32,
    status_calls: AtomicUsize,
    results_calls: AtomicUsize,
}

impl Default for FakeExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeExecutor {
    /// Jobs go `queued -> running -> completed`
    pub fn new() -> Self {
        Self::with_script(vec![JobStatus::Queued, JobStatus::Running, JobStatus::Completed])
    }

    /// Jobs go `queued -> running -> failed`
    pub fn failing() -> Self {
        Self::with_script(vec![JobStatus::Queued, JobStatus::Running, JobStatus::Failed])
    }

    /// Jobs walk through `script`, one step per status query, then stay on the last step
    pub fn with_script(script: Vec<JobStatus>) -> Self {
        let script = if script.is_empty() {
            vec![JobStatus::Completed]
        } else {
            script
        };
        Self {
            script,
            rejection: None,
            jobs: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            history: Mutex::new(Vec::new()),
            failing_polls: AtomicU32::new(0),
            status_calls: AtomicUsize::new(0),
            results_calls: AtomicUsize::new(0),
        }
    }

    /// Refuse every submission with `message`
    pub fn rejecting(mut self, message: impl Into<String>) -> Self {
        self.rejection = Some(message.into());
        self
    }

    /// Make the next `count` status queries fail as if the executor were down
    pub fn fail_next_polls(&self, count: u32) {
        self.failing_polls.store(count, Ordering::SeqCst);
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn results_calls(&self) -> usize {
        self.results_calls.load(Ordering::SeqCst)
    }

    /// Statuses handed out by successful status queries, in order
    pub fn status_history(&self) -> Vec<JobStatus> {
        lock(&self.history).clone()
    }

    /// Every submission received, accepted or not
    pub fn submitted(&self) -> Vec<JobRequest> {
        lock(&self.submitted).clone()
    }

    fn canned_results(&self, kind: JobKind, status: JobStatus) -> JobResults {
        let failed = status == JobStatus::Failed;
        let results = match kind {
            JobKind::Test if failed => json!({
                "total_tests": 12, "passed": 7, "failed": 4, "skipped": 1, "duration": 8.5
            }),
            JobKind::Test => json!({
                "total_tests": 100, "passed": 95, "failed": 3, "skipped": 2, "duration": 45.2
            }),
            JobKind::SecurityScan => json!({
                "scanner": "dependency",
                "total_vulnerabilities": 3,
                "critical": 0,
                "high": 1,
                "medium": 1,
                "low": 1
            }),
        };
        JobResults {
            status,
            results,
            error: failed.then(|| format!("{} job failed", kind)),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl Executor for FakeExecutor {
    async fn submit(&self, request: &JobRequest) -> Result<SubmitResponse, JobError> {
        lock(&self.submitted).push(request.clone());

        if let Some(message) = &self.rejection {
            return Ok(SubmitResponse {
                status: Some("rejected".to_string()),
                message: None,
                detail: Some(message.clone()),
            });
        }

        let job_id = request.job_id();
        lock(&self.jobs).insert(
            job_id.id.clone(),
            FakeJob {
                kind: job_id.kind,
                step: 0,
            },
        );

        Ok(SubmitResponse {
            status: Some(JobStatus::Queued.as_str().to_string()),
            message: Some(format!("{} job queued successfully", job_id.kind)),
            detail: None,
        })
    }

    async fn status(&self, job_id: &JobId) -> Result<StatusReport, JobError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);

        let outage = self
            .failing_polls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if outage {
            return Err(JobError::Unavailable("simulated outage".to_string()));
        }

        let mut jobs = lock(&self.jobs);
        let job = jobs
            .get_mut(&job_id.id)
            .ok_or_else(|| JobError::NotFound(job_id.id.clone()))?;

        let index = job.step.min(self.script.len() - 1);
        let status = self.script[index];
        job.step += 1;

        let progress = ((index + 1) * 100 / self.script.len()) as u8;
        lock(&self.history).push(status);

        Ok(StatusReport {
            status,
            progress: Some(progress),
        })
    }

    async fn results(&self, job_id: &JobId) -> Result<JobResults, JobError> {
        self.results_calls.fetch_add(1, Ordering::SeqCst);

        let jobs = lock(&self.jobs);
        let job = jobs
            .get(&job_id.id)
            .ok_or_else(|| JobError::NotFound(job_id.id.clone()))?;

        // `step` counts status queries; the job is at the last step it reported
        let status = if job.step == 0 {
            self.script[0]
        } else {
            self.script[(job.step - 1).min(self.script.len() - 1)]
        };
        if !status.is_terminal() {
            return Err(JobError::NotReady {
                id: job_id.id.clone(),
                status,
            });
        }

        Ok(self.canned_results(job.kind, status))
    }
}
