//! Job Proxy Module
//!
//! HTTP surface for submitting and following executor jobs. All routes sit
//! behind the auth middleware; the handlers delegate to `jobs::JobClient`
//! and only show a job to the user who submitted it.

pub mod handlers;
pub mod owners;

pub use handlers::{
    security_scan_results, security_scan_status, submit_security_scan, submit_test_run,
    test_run_results, test_run_status,
};
pub use owners::{JobOwnerStore, MemoryJobOwners, DEFAULT_OWNER_RETENTION};
