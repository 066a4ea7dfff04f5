/**
 * Job Client Errors
 *
 * Errors raised while talking to the executor or while waiting on a job.
 */

use thiserror::Error;

use crate::shared::{JobStatus, SharedError};

/// Errors produced by executor clients, the job client, and job watches
#[derive(Debug, Error)]
pub enum JobError {
    /// The HTTP request could not be completed
    #[error("executor request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The executor is not reachable (used by in-process executors)
    #[error("executor unavailable: {0}")]
    Unavailable(String),

    /// The executor did not queue the submission
    #[error("{0}")]
    Rejected(String),

    /// The executor does not know the job id
    #[error("job not found: {0}")]
    NotFound(String),

    /// Results were requested before the job reached a terminal state
    #[error("job {id} is not finished (status: {status})")]
    NotReady { id: String, status: JobStatus },

    /// The executor answered with an unexpected HTTP status
    #[error("unexpected executor response ({status}): {body}")]
    Status { status: u16, body: String },

    /// The executor's body could not be decoded
    #[error("invalid executor response: {0}")]
    Decode(String),

    /// The job parameters failed validation
    #[error(transparent)]
    Invalid(#[from] SharedError),

    /// The watch was cancelled before the job finished
    #[error("job watch cancelled")]
    Cancelled,
}

/// Generic message used when the executor rejects a job without saying why
pub const SUBMISSION_FAILED: &str = "job submission failed";
