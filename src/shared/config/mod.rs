//! Client configuration module
//!
//! Provides configuration for consumers of the executor job API: where the
//! executor lives, which project jobs are filed under, and how often a
//! watched job is polled.

use std::time::Duration;
use thiserror::Error;

/// Default executor base URL for local development
pub const DEFAULT_EXECUTOR_URL: &str = "http://localhost:8000";

/// Default status poll interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default project id attached to submitted jobs
pub const DEFAULT_PROJECT_ID: &str = "default";

/// Job client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Executor base URL, without trailing slash
    pub executor_url: String,
    /// Project id attached to every submitted job
    pub project_id: String,
    /// Interval between status polls of a watched job
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            executor_url: DEFAULT_EXECUTOR_URL.to_string(),
            project_id: DEFAULT_PROJECT_ID.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfigBuilder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.executor_url.starts_with("http://") || self.executor_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.executor_url.clone()));
        }
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::MissingValue("project_id"));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "poll_interval",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    executor_url: Option<String>,
    project_id: Option<String>,
    poll_interval: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Set the executor base URL
    pub fn executor_url(mut self, url: impl Into<String>) -> Self {
        self.executor_url = Some(url.into());
        self
    }

    /// Set the project id
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let defaults = ClientConfig::default();
        let config = ClientConfig {
            executor_url: self
                .executor_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.executor_url),
            project_id: self.project_id.unwrap_or(defaults.project_id),
            poll_interval: self.poll_interval.unwrap_or(defaults.poll_interval),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}
