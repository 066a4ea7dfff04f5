/**
 * Backend Error Types
 *
 * This module defines the error taxonomy of the gateway. Every handler and
 * middleware returns `BackendError`, which carries its own HTTP status.
 *
 * # Error Categories
 *
 * - `ValidationError` - malformed or invalid request body (400)
 * - `ConflictError` - duplicate registration (400)
 * - `AuthenticationError` - missing/invalid/expired token, bad credentials (401)
 * - `AuthorizationError` - role not allowed, deactivated account at login (403)
 * - `NotFoundError` - resource absent (404)
 * - `JobNotReady` - results requested before a job finished (409)
 * - `UpstreamError` - the executor failed or is unreachable (502)
 * - `InternalError` - anything unexpected (500, generic message)
 */

use thiserror::Error;
use axum::http::StatusCode;

use crate::backend::auth::users::UserStoreError;
use crate::jobs::JobError;
use crate::shared::SharedError;

/// Message returned to clients for every internal error
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use tsuite::backend::error::BackendError;
///
/// let err = BackendError::unauthenticated("No token provided");
/// assert_eq!(err.status_code().as_u16(), 401);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request body failed to parse or validate
    #[error("Validation error: {message}")]
    ValidationError {
        /// Human-readable error message
        message: String,
    },

    /// Resource already exists
    #[error("Conflict: {message}")]
    ConflictError {
        /// Human-readable error message
        message: String,
    },

    /// Caller could not be authenticated
    #[error("Authentication error: {message}")]
    AuthenticationError {
        /// Human-readable error message
        message: String,
    },

    /// Caller is authenticated but not allowed
    #[error("Authorization error: {message}")]
    AuthorizationError {
        /// Human-readable error message
        message: String,
    },

    /// Resource does not exist
    #[error("Not found: {message}")]
    NotFoundError {
        /// Human-readable error message
        message: String,
    },

    /// Job results requested before the job finished
    #[error("Job not ready: {message}")]
    JobNotReady {
        /// Human-readable error message
        message: String,
    },

    /// The executor failed
    #[error("Upstream error: {message}")]
    UpstreamError {
        /// Human-readable error message
        message: String,
    },

    /// Unexpected failure; the message is logged, never returned
    #[error("Internal error: {message}")]
    InternalError {
        /// Internal description, for logs only
        message: String,
    },

    /// Shared error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError { message: message.into() }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::ConflictError { message: message.into() }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::AuthenticationError { message: message.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::AuthorizationError { message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFoundError { message: message.into() }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamError { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError { message: message.into() }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError { .. } => StatusCode::BAD_REQUEST,
            Self::ConflictError { .. } => StatusCode::BAD_REQUEST,
            Self::AuthenticationError { .. } => StatusCode::UNAUTHORIZED,
            Self::AuthorizationError { .. } => StatusCode::FORBIDDEN,
            Self::NotFoundError { .. } => StatusCode::NOT_FOUND,
            Self::JobNotReady { .. } => StatusCode::CONFLICT,
            Self::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
            Self::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            },
        }
    }

    /// Get the client-facing error message
    ///
    /// Internal errors always yield the generic message.
    pub fn message(&self) -> String {
        match self {
            Self::ValidationError { message }
            | Self::ConflictError { message }
            | Self::AuthenticationError { message }
            | Self::AuthorizationError { message }
            | Self::NotFoundError { message }
            | Self::JobNotReady { message }
            | Self::UpstreamError { message } => message.clone(),
            Self::InternalError { .. } => INTERNAL_ERROR_MESSAGE.to_string(),
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
            Self::SharedError(err) => err.to_string(),
        }
    }
}

impl From<UserStoreError> for BackendError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::Duplicate(email) => {
                tracing::warn!(email = %email, "User already exists");
                Self::conflict("User already exists")
            }
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<JobError> for BackendError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::Rejected(message) => Self::validation(message),
            JobError::Invalid(shared) => Self::SharedError(shared),
            JobError::NotFound(_) => Self::not_found("Job not found"),
            JobError::NotReady { id, status } => Self::JobNotReady {
                message: format!("Job {} is not completed yet. Current status: {}", id, status),
            },
            JobError::Cancelled => Self::internal("job watch cancelled"),
            transport => {
                tracing::error!(error = %transport, "Executor request failed");
                Self::upstream("Executor unavailable")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::JobStatus;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(BackendError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(BackendError::conflict("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(BackendError::unauthenticated("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(BackendError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(BackendError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(BackendError::upstream("x").status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(BackendError::internal("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_message_is_sanitized() {
        let error = BackendError::internal("connection to 10.0.0.3:5432 refused");
        assert_eq!(error.message(), INTERNAL_ERROR_MESSAGE);
        assert!(error.to_string().contains("10.0.0.3"));
    }

    #[test]
    fn test_from_shared_validation_error() {
        let error: BackendError = SharedError::validation("email", "Invalid email format").into();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), "Invalid email format");
    }

    #[test]
    fn test_from_duplicate_user() {
        let error: BackendError = UserStoreError::Duplicate("a@b.com".to_string()).into();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), "User already exists");
    }

    #[test]
    fn test_from_job_errors() {
        let not_ready: BackendError = JobError::NotReady {
            id: "test-1".to_string(),
            status: JobStatus::Running,
        }
        .into();
        assert_eq!(not_ready.status_code(), StatusCode::CONFLICT);
        assert!(not_ready.message().contains("running"));

        let down: BackendError = JobError::Unavailable("connection refused".to_string()).into();
        assert_eq!(down.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(down.message(), "Executor unavailable");
    }
}
