/**
 * Error Conversion
 *
 * Conversions between `BackendError` and axum: rendering errors as HTTP
 * responses, turning JSON body rejections into validation errors, and
 * sanitizing panics and unmatched routes.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 400
 * }
 * ```
 */

use std::any::Any;

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        }

        let body = serde_json::json!({
            "error": self.message(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(reason = %rejection.body_text(), "Rejected request body");
        Self::validation(rejection.body_text())
    }
}

/// JSON body extractor whose rejections are `BackendError`s
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(BackendError))]
pub struct AppJson<T>(pub T);

/// Response for routes that match nothing
pub async fn not_found() -> BackendError {
    BackendError::not_found("Route not found")
}

/// Response for handlers that panicked
pub fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Request handler panicked");
    BackendError::internal("handler panicked").into_response()
}
