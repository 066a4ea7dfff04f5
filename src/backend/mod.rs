//! Backend Module
//!
//! This module contains all server-side code for the tsuite gateway.
//! It is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Router assembly, health check, global middleware
//! - **`auth`** - Users, password hashing, JWT sessions, auth handlers
//! - **`middleware`** - Bearer authentication and role gate
//! - **`admin`** - Administrator user management
//! - **`jobs`** - Test run and security scan proxy handlers
//! - **`cache`** - Redis result store
//! - **`error`** - Backend error types and HTTP conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - tsuite-gateway entry point
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── admin/          - Admin endpoints
//! ├── jobs/           - Job proxy endpoints
//! ├── cache/          - Redis result store
//! └── error/          - Error types
//! ```
//!
//! # Request Pipeline
//!
//! 1. CORS, tracing, and panic catching wrap every request
//! 2. Protected routes run `auth_middleware`, which verifies the access
//!    token and re-reads the user
//! 3. Admin routes additionally run `require_role`
//! 4. Handlers return `Result<_, BackendError>`; errors render as
//!    `{"error", "status"}` JSON
//!
//! # Storage
//!
//! Users live in PostgreSQL when `DATABASE_URL` is set, otherwise in memory.
//! Terminal job results live in Redis when `REDIS_URL` is set, otherwise in
//! memory.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Administrator endpoints
pub mod admin;

/// Job proxy endpoints
pub mod jobs;

/// Redis result cache
pub mod cache;

/// Re-export commonly used types
pub use server::{create_app, AppState, GatewayConfig};
pub use error::BackendError;
