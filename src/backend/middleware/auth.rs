/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It extracts and verifies the access token from the
 * Authorization header, then re-reads the user so that deactivation and
 * role changes apply to tokens that are still unexpired.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::TokenKind;
use crate::backend::auth::users::Role;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

const INVALID_TOKEN: &str = "Invalid or expired token";

/// Authenticated user data, taken from the live user record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the bearer token from the Authorization header
/// 2. Verifies signature, expiry, and that it is an access token
/// 3. Looks the user up by the token's subject
/// 4. Attaches the current identity to request extensions for use in handlers
///
/// Returns 401 Unauthorized if the token is missing or invalid, or the user
/// is missing or inactive.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let user = authenticate(&app_state, request.headers()).await?;

    tracing::debug!(user_id = %user.user_id, role = %user.role, "Request authenticated");
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Resolve the identity behind a request's bearer token
pub async fn authenticate(app_state: &AppState, headers: &HeaderMap) -> Result<AuthenticatedUser, BackendError> {
    let token = bearer_token(headers)?;

    let claims = app_state
        .tokens
        .verify_kind(token, TokenKind::Access)
        .map_err(|e| {
            tracing::warn!("Invalid token: {}", e);
            BackendError::unauthenticated(INVALID_TOKEN)
        })?;

    let user_id = claims.user_id().map_err(|e| {
        tracing::warn!("Invalid user ID in token: {}", e);
        BackendError::unauthenticated(INVALID_TOKEN)
    })?;

    let user = app_state
        .users
        .find_by_id(user_id)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| {
            tracing::warn!("User not found or inactive: {}", user_id);
            BackendError::unauthenticated("User not found or inactive")
        })?;

    Ok(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
        role: user.role,
    })
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, BackendError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            BackendError::unauthenticated("No token provided")
        })?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            tracing::warn!("Invalid Authorization header format");
            BackendError::unauthenticated("No token provided")
        })
}

/// Axum extractor for authenticated user
///
/// Reads the identity the auth middleware attached; rejects with 401 when
/// the handler is reached without it.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthenticated("Authentication required")
            })?;

        Ok(AuthUser(user))
    }
}
