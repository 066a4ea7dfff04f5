//! Server Module
//!
//! This module contains the server-side code for initializing and
//! configuring the Axum HTTP gateway.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Environment configuration and database loading
//! └── init.rs         - State construction, app creation, shutdown signal
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `GatewayConfig::from_env`
//! 2. **Service Loading**: database and cache, each optional
//! 3. **State Creation**: stores, token service, job client
//! 4. **Router Creation**: routes and middleware
//!
//! # Example
//!
//! ```rust,no_run
//! use tsuite::backend::server::{create_app, GatewayConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::from_env()?;
//! let (app, _state) = create_app(&config).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use state::AppState;
pub use config::GatewayConfig;
pub use init::{build_state, create_app, shutdown_signal, InitError};
