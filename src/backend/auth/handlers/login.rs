/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Validate the email and look up the user
 * 2. Verify password using bcrypt (unknown users cost the same work)
 * 3. Refuse deactivated accounts
 * 4. Issue an access/refresh token pair
 *
 * # Security
 *
 * - Unknown email and wrong password return the same 401
 * - User passwords are never logged or returned in responses
 */

use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::normalize_email;
use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::password::PasswordHasher;
use crate::backend::auth::sessions::{TokenPayload, TokenService};
use crate::backend::auth::users::UserStore;
use crate::backend::error::{AppJson, BackendError};
use crate::shared::validation::validate_email;

/// Message for both unknown users and wrong passwords
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Login handler
///
/// This handler processes user authentication requests. It verifies the
/// email and password, and returns a token pair if authentication succeeds.
///
/// # Arguments
///
/// * `State(users)` - User store
/// * `State(tokens)` - Token service
/// * `State(hasher)` - Password hasher
/// * `AppJson(request)` - Login request containing email and password
///
/// # Returns
///
/// `200 OK` with the user and a token pair
///
/// # Errors
///
/// * `400 Bad Request` - If the body is malformed or the email is invalid
/// * `401 Unauthorized` - If user is not found or password is incorrect
/// * `403 Forbidden` - If the account is deactivated
/// * `500 Internal Server Error` - If storage or token issuance fails
///
/// # Example Request
///
/// ```http
/// POST /api/auth/login HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "securepassword123"
/// }
/// ```
pub async fn login(
    State(users): State<Arc<dyn UserStore>>,
    State(tokens): State<Arc<TokenService>>,
    State(hasher): State<PasswordHasher>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let email = normalize_email(&request.email);
    tracing::info!("Login request for: {}", email);

    validate_email(&email)?;

    let Some(user) = users.find_by_email(&email).await? else {
        hasher.verify_missing(&request.password).await;
        tracing::warn!("User not found: {}", email);
        return Err(BackendError::unauthenticated(INVALID_CREDENTIALS));
    };

    if !hasher.verify(&request.password, &user.password_hash).await {
        tracing::warn!("Invalid password for user: {}", email);
        return Err(BackendError::unauthenticated(INVALID_CREDENTIALS));
    }

    if !user.is_active {
        tracing::warn!("Login attempt for deactivated user: {}", email);
        return Err(BackendError::forbidden("Account is deactivated"));
    }

    let pair = tokens.issue_pair(&TokenPayload::from(&user)).map_err(|e| {
        tracing::error!("Failed to create tokens: {:?}", e);
        BackendError::internal(format!("token issuance failed: {}", e))
    })?;

    tracing::info!("User logged in successfully: {} ({})", user.email, user.id);

    Ok(Json(AuthResponse::new(user, pair)))
}
