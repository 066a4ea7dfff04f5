//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the gateway and its clients. They describe what travels over HTTP: job
//! requests and payloads, validation rules, and client configuration.
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used
//! in both server and client code. It has no dependency on the server stack
//! and is always compiled.

/// Shared error types
pub mod error;

/// Request field validation
pub mod validation;

/// Job wire types
pub mod jobs;

/// Client configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use jobs::{
    JobAccepted, JobId, JobKind, JobRequest, JobResults, JobSpec, JobStatus, ScanParams,
    ScanSummary, ScannerType, StatusReport, SubmitResponse, TestRunParams, TestSummary,
};
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError};
