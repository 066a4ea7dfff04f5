/**
 * Refresh Handler
 *
 * POST /api/auth/refresh exchanges a refresh token for a new token pair.
 * The user is re-read so the new tokens carry the current role, and
 * deactivated or deleted accounts cannot extend their session.
 */

use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{RefreshRequest, TokenPairResponse};
use crate::backend::auth::sessions::{TokenKind, TokenPayload, TokenService};
use crate::backend::auth::users::UserStore;
use crate::backend::error::{AppJson, BackendError};

/// Refresh handler
///
/// # Errors
///
/// * `400 Bad Request` - If the body is malformed
/// * `401 Unauthorized` - If the token is invalid, expired, an access token,
///   or belongs to a missing or deactivated user
///
/// # Example Request
///
/// ```http
/// POST /api/auth/refresh HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "refreshToken": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
/// }
/// ```
pub async fn refresh(
    State(users): State<Arc<dyn UserStore>>,
    State(tokens): State<Arc<TokenService>>,
    AppJson(request): AppJson<RefreshRequest>,
) -> Result<Json<TokenPairResponse>, BackendError> {
    let claims = tokens
        .verify_kind(&request.refresh_token, TokenKind::Refresh)
        .map_err(|e| {
            tracing::warn!("Invalid refresh token: {}", e);
            BackendError::unauthenticated("Invalid or expired token")
        })?;

    let user_id = claims
        .user_id()
        .map_err(|_| BackendError::unauthenticated("Invalid or expired token"))?;

    let user = users
        .find_by_id(user_id)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| {
            tracing::warn!("Refresh for missing or inactive user: {}", user_id);
            BackendError::unauthenticated("User not found or inactive")
        })?;

    let pair = tokens.issue_pair(&TokenPayload::from(&user)).map_err(|e| {
        tracing::error!("Failed to create tokens: {:?}", e);
        BackendError::internal(format!("token issuance failed: {}", e))
    })?;

    Ok(Json(pair.into()))
}
