//! Jobs Module
//!
//! Client side of the job protocol: submit a test run or security scan to
//! an executor, poll its status, and fetch its results.
//!
//! # Module Structure
//!
//! ```text
//! jobs/
//! ├── mod.rs       - Module exports and documentation
//! ├── error.rs     - JobError
//! ├── executor.rs  - Executor trait and HTTP implementation
//! ├── fake.rs      - Scripted in-process executor
//! ├── store.rs     - ResultStore trait and in-memory store
//! ├── client.rs    - JobClient (submit / poll_status / fetch_results)
//! └── watch.rs     - Cancellable polling task
//! ```
//!
//! # Flow
//!
//! 1. **Submit**: `JobClient::submit` generates a time-based id and sends the
//!    request; anything other than `queued` is an error
//! 2. **Poll**: `JobClient::watch` polls on a fixed interval (2s by default)
//! 3. **Fetch**: on the first terminal status the results are fetched once
//!    and the poller exits
//!
//! # Example
//!
//! ```rust,no_run
//! use tsuite::jobs::JobClient;
//! use tsuite::shared::{ClientConfig, JobSpec, TestRunParams};
//!
//! # async fn example() -> Result<(), tsuite::jobs::JobError> {
//! let config = ClientConfig::default();
//! let client = JobClient::from_config(&config);
//! let job_id = client
//!     .submit(JobSpec::Test(TestRunParams::new("https://github.com/user/repo.git", "jest")))
//!     .await?;
//! let results = client.watch(job_id, config.poll_interval).results().await?;
//! println!("{:?}", results.test_summary());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod executor;
pub mod fake;
pub mod store;
pub mod client;
pub mod watch;

pub use client::{JobClient, JobIdGenerator};
pub use error::JobError;
pub use executor::{Executor, HttpExecutor};
pub use fake::FakeExecutor;
pub use store::{MemoryResultStore, ResultStore, StoreError};
pub use watch::JobWatch;
