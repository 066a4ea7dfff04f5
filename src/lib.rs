//! tsuite - Main Library
//!
//! tsuite is a small DevSecOps platform: an API gateway that authenticates
//! users and forwards test runs and security scans to an external executor,
//! plus a client that submits jobs and follows them to completion.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between the gateway and its clients
//!   - Job requests, statuses, and result payloads
//!   - Field validation and client configuration
//!   - Error types
//!
//! - **`jobs`** - Client side of the executor protocol
//!   - `Executor` trait with HTTP and scripted implementations
//!   - `JobClient` for submit, poll, and fetch with result caching
//!   - `JobWatch`, a cancellable polling task
//!
//! - **`backend`** - Gateway server (only compiled with `ssr` feature)
//!   - Registration, login, refresh, and JWT bearer authentication
//!   - Role-gated admin endpoints
//!   - Job proxy routes, health check, PostgreSQL and Redis storage
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the `backend` module and the
//!   `tsuite-gateway` binary
//!
//! # Usage
//!
//! ## Server-Side
//!
//! ```rust,no_run
//! use tsuite::backend::server::{create_app, GatewayConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::from_env()?;
//! let (app, _state) = create_app(&config).await?;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Client-Side
//!
//! ```rust,no_run
//! use tsuite::jobs::JobClient;
//! use tsuite::shared::{ClientConfig, JobSpec, ScanParams, ScannerType};
//!
//! # async fn example() -> Result<(), tsuite::jobs::JobError> {
//! let config = ClientConfig::default();
//! let client = JobClient::from_config(&config);
//! let spec = JobSpec::SecurityScan(ScanParams::new(
//!     "https://github.com/user/repo.git",
//!     ScannerType::Dependency,
//! ));
//! let job_id = client.submit(spec).await?;
//! let results = client.watch(job_id, config.poll_interval).results().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::SharedError` for validation and serialization
//! - `jobs::JobError` for executor communication
//! - `backend::error::BackendError` for HTTP responses

/// Shared types and data structures
pub mod shared;

/// Job submission and polling client
pub mod jobs;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
