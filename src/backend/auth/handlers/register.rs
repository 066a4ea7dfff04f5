/**
 * Register Handler
 *
 * This module implements the user registration handler for POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Normalize the email and validate it and the password
 * 2. Check if user already exists
 * 3. Hash password using bcrypt
 * 4. Create user (role `user`, active, unverified); the bootstrap
 *    administrator email gets role `admin`
 * 5. Issue an access/refresh token pair
 * 6. Return tokens and user info
 *
 * # Validation
 *
 * - Email must be structurally valid
 * - Password must be at least 8 characters long
 * - Email must be unique (no existing user with same email)
 */

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::admin::BootstrapAdmin;
use crate::backend::auth::handlers::normalize_email;
use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest};
use crate::backend::auth::password::PasswordHasher;
use crate::backend::auth::sessions::{TokenPayload, TokenService};
use crate::backend::auth::users::{NewUser, UserStore};
use crate::backend::error::{AppJson, BackendError};
use crate::shared::validation::{validate_email, validate_password};

/// Register handler
///
/// This handler processes user registration requests. It validates the input,
/// checks for existing users, hashes the password, creates the user, and
/// returns a token pair.
///
/// # Arguments
///
/// * `State(users)` - User store
/// * `State(tokens)` - Token service
/// * `State(hasher)` - Password hasher
/// * `State(bootstrap)` - Account that registers as administrator
/// * `AppJson(request)` - Registration request
///
/// # Returns
///
/// `201 Created` with the user and a token pair
///
/// # Errors
///
/// * `400 Bad Request` - If the body is malformed, the email is invalid,
///   the password is too short, or the user already exists
/// * `500 Internal Server Error` - If hashing, storage, or token issuance fails
///
/// # Example Request
///
/// ```http
/// POST /api/auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "securepassword123",
///   "firstName": "Ada"
/// }
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "user": {
///     "id": "123e4567-e89b-12d3-a456-426614174000",
///     "email": "user@example.com",
///     "firstName": "Ada",
///     "lastName": null,
///     "role": "user",
///     "isActive": true,
///     "emailVerified": false,
///     "createdAt": "2024-01-01T00:00:00Z"
///   },
///   "accessToken": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "refreshToken": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
/// }
/// ```
pub async fn register(
    State(users): State<Arc<dyn UserStore>>,
    State(tokens): State<Arc<TokenService>>,
    State(hasher): State<PasswordHasher>,
    State(bootstrap): State<BootstrapAdmin>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    let email = normalize_email(&request.email);
    tracing::info!("Registration request for: {}", email);

    validate_email(&email)?;
    validate_password(&request.password)?;

    // Check if user already exists
    if users.find_by_email(&email).await?.is_some() {
        tracing::warn!("User already exists: {}", email);
        return Err(BackendError::conflict("User already exists"));
    }

    let password_hash = hasher.hash(&request.password).await.map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        BackendError::internal(format!("password hashing failed: {}", e))
    })?;

    // A concurrent registration can still win here; the store reports it as a duplicate
    let user = users
        .create(NewUser {
            email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
        })
        .await?;
    let user = bootstrap.promote_if_matching(users.as_ref(), user).await?;

    let pair = tokens.issue_pair(&TokenPayload::from(&user)).map_err(|e| {
        tracing::error!("Failed to create tokens: {:?}", e);
        BackendError::internal(format!("token issuance failed: {}", e))
    })?;

    tracing::info!("User registered successfully: {} ({})", user.email, user.id);

    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, pair))))
}
