//! Middleware Module
//!
//! This module contains all HTTP middleware for the gateway.
//!
//! # Architecture
//!
//! - **`auth`** - Bearer token verification with a live user lookup
//! - **`roles`** - Role gate, layered inside `auth`
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware::from_fn_with_state, routing::get, Router};
//! use tsuite::backend::middleware::{auth_middleware, require_role, AllowedRoles};
//! use tsuite::backend::server::AppState;
//!
//! # async fn handler() {}
//! # fn example(state: AppState) -> Router<AppState> {
//! // Layers added later run first, so auth_middleware runs before require_role
//! Router::new()
//!     .route("/api/admin/ping", get(handler))
//!     .route_layer(from_fn_with_state(AllowedRoles::admin_only(), require_role))
//!     .route_layer(from_fn_with_state(state, auth_middleware))
//! # }
//! ```

pub mod auth;
pub mod roles;

pub use auth::{auth_middleware, authenticate, bearer_token, AuthUser, AuthenticatedUser};
pub use roles::{require_role, AllowedRoles};
