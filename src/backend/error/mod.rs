//! Backend Error Module
//!
//! This module defines error types specific to the gateway.
//! These errors are used in HTTP handlers and middleware and convert
//! directly into HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse, JSON rejections, 404 and panic responses
//! ```
//!
//! # HTTP Response Conversion
//!
//! `BackendError` implements `IntoResponse`, so handlers return it directly.
//! Server errors are logged with their cause and answered with a generic
//! message; nothing internal reaches the client.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
pub use conversion::{not_found, panic_response, AppJson};
