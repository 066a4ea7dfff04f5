//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for authentication endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Request and response types
//! ├── register.rs  - User registration handler
//! ├── login.rs     - User authentication handler
//! ├── refresh.rs   - Token refresh handler
//! └── me.rs        - Get current user handler
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register - User registration
//! - **`login`** - POST /api/auth/login - User authentication
//! - **`refresh`** - POST /api/auth/refresh - Exchange a refresh token
//! - **`get_me`** - GET /api/auth/me - Get current user info
//!
//! # Example
//!
//! ```rust,no_run
//! use tsuite::backend::auth::handlers::{register, login, refresh};
//! use tsuite::backend::server::AppState;
//! use axum::{routing::post, Router};
//!
//! # fn example() {
//! let router: Router<AppState> = Router::new()
//!     .route("/api/auth/register", post(register))
//!     .route("/api/auth/login", post(login))
//!     .route("/api/auth/refresh", post(refresh));
//! # }
//! ```

/// Request and response types
pub mod types;

/// Register handler
pub mod register;

/// Login handler
pub mod login;

/// Refresh handler
pub mod refresh;

/// Get current user handler
pub mod me;

// Re-export commonly used types
pub use types::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, UserEnvelope, UserResponse};

// Re-export handlers
pub use register::register;
pub use login::login;
pub use refresh::refresh;
pub use me::get_me;

/// Canonical form of an email used for storage and lookup
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }
}
