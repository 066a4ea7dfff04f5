//! Route Configuration Module
//!
//! This module configures all HTTP routes for the gateway.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation and global middleware
//! ├── api_routes.rs   - API endpoints and their auth layers
//! └── health.rs       - Health check
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use tsuite::backend::routes::create_router;
//! use tsuite::backend::server::{build_state, GatewayConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = build_state(&GatewayConfig::from_env()?).await?;
//! let router = create_router(state);
//! # Ok(())
//! # }
//! ```

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

/// Health check
pub mod health;

// Re-export commonly used functions
pub use router::create_router;
