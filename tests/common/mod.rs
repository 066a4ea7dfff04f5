//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - An in-process gateway with in-memory stores and a scripted executor
//! - Authentication test helpers
//! - Custom assertion macros

#![allow(dead_code)]

pub mod assertions;
#[cfg(feature = "ssr")]
pub mod app;
#[cfg(feature = "ssr")]
pub mod auth_helpers;

// Re-export commonly used utilities
#[cfg(feature = "ssr")]
pub use app::*;
#[cfg(feature = "ssr")]
pub use auth_helpers::*;
