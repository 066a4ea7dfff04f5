/**
 * Executor Client
 *
 * The `Executor` trait is the seam between the job client and whatever runs
 * jobs. `HttpExecutor` speaks the executor's HTTP API:
 *
 * - `POST {base}/api/v1/tests/execute`
 * - `POST {base}/api/v1/security/scan`
 * - `GET  {base}/api/v1/{tests|security}/{id}/status`
 * - `GET  {base}/api/v1/{tests|security}/{id}/results`
 */

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::jobs::error::JobError;
use crate::shared::{JobId, JobKind, JobRequest, JobResults, JobStatus, StatusReport, SubmitResponse};

/// Something that accepts jobs and reports on them
#[async_trait]
pub trait Executor: Send + Sync {
    /// Submit a job; the reply says whether it was queued
    async fn submit(&self, request: &JobRequest) -> Result<SubmitResponse, JobError>;

    /// Current status of a job
    async fn status(&self, job_id: &JobId) -> Result<StatusReport, JobError>;

    /// Final results of a job
    async fn results(&self, job_id: &JobId) -> Result<JobResults, JobError>;
}

/// HTTP client for the external executor service
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
    base_url: String,
}

impl HttpExecutor {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection(kind: JobKind) -> &'static str {
        match kind {
            JobKind::Test => "tests",
            JobKind::SecurityScan => "security",
        }
    }

    /// `{base}/api/v1/{collection}/{id}/{leaf}`, with the id pushed as a single
    /// encoded path segment
    fn job_url(&self, job_id: &JobId, leaf: &str) -> Result<Url, JobError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| JobError::Decode(format!("invalid executor URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| JobError::Decode(format!("executor URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "v1", Self::collection(job_id.kind), job_id.id.as_str(), leaf]);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, job_id: &JobId, leaf: &str) -> Result<T, JobError> {
        let url = self.job_url(job_id, leaf)?;
        tracing::debug!(job_id = %job_id, url = %url, "Querying executor");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(JobError::NotFound(job_id.id.clone()));
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(JobError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| JobError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Executor for HttpExecutor {
    async fn submit(&self, request: &JobRequest) -> Result<SubmitResponse, JobError> {
        let builder = match request {
            JobRequest::Test(body) => self
                .client
                .post(format!("{}/api/v1/tests/execute", self.base_url))
                .json(body),
            JobRequest::SecurityScan(body) => self
                .client
                .post(format!("{}/api/v1/security/scan", self.base_url))
                .json(body),
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Rejections still carry a JSON body with `detail` or `message`
        match serde_json::from_str::<SubmitResponse>(&body) {
            Ok(reply) => Ok(reply),
            Err(_) if !status.is_success() => Err(JobError::Status {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(JobError::Decode(e.to_string())),
        }
    }

    async fn status(&self, job_id: &JobId) -> Result<StatusReport, JobError> {
        self.get_json(job_id, "status").await
    }

    async fn results(&self, job_id: &JobId) -> Result<JobResults, JobError> {
        match self.get_json(job_id, "results").await {
            // Results asked for too early come back as 400/409 with a `detail`
            Err(JobError::Status { status: 400 | 409, body }) => {
                tracing::debug!(job_id = %job_id, body = %body, "Executor has no results yet");
                let status = self
                    .status(job_id)
                    .await
                    .map(|report| report.status)
                    .unwrap_or(JobStatus::Running);
                Err(JobError::NotReady {
                    id: job_id.id.clone(),
                    status,
                })
            }
            other => other,
        }
    }
}
