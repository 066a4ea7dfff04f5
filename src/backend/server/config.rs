/**
 * Server Configuration
 *
 * This module loads the gateway configuration from environment variables
 * and connects the optional PostgreSQL database.
 *
 * # Configuration Sources
 *
 * Every setting comes from the environment (after `dotenv`), with defaults
 * for local development. Only `JWT_SECRET` is required.
 *
 * # Error Handling
 *
 * Invalid values fail startup with a `ConfigError`. Without `DATABASE_URL`
 * the gateway keeps users in memory; a configured database that cannot be
 * reached or migrated fails startup.
 */

use std::time::Duration;

use sqlx::PgPool;

use crate::backend::auth::password::{DEFAULT_COST, MAX_COST, MIN_COST};
use crate::backend::auth::sessions::{DEFAULT_ACCESS_TTL, DEFAULT_REFRESH_TTL};
use crate::shared::config::{ConfigError, DEFAULT_EXECUTOR_URL, DEFAULT_PROJECT_ID};
use crate::shared::validation::validate_email;

/// Default lifetime of cached job results (1 hour)
pub const DEFAULT_RESULT_TTL: Duration = Duration::from_secs(60 * 60);
/// Default listen port
pub const DEFAULT_PORT: u16 = 3001;

/// Gateway configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// `DATABASE_URL`; `None` selects the in-memory user store
    pub database_url: Option<String>,
    /// `REDIS_URL`; `None` selects the in-memory result store
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub bcrypt_cost: u32,
    pub executor_url: String,
    pub project_id: String,
    pub result_ttl: Duration,
    pub port: u16,
    /// `BOOTSTRAP_ADMIN_EMAIL`, lowercased; this account is given the admin role
    pub bootstrap_admin_email: Option<String>,
}

impl GatewayConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::MissingValue("JWT_SECRET"))?;

        let access_ttl = Duration::from_secs(parse_or(&var, "JWT_ACCESS_TTL_SECS", DEFAULT_ACCESS_TTL.as_secs())?);
        let refresh_ttl = Duration::from_secs(parse_or(&var, "JWT_REFRESH_TTL_SECS", DEFAULT_REFRESH_TTL.as_secs())?);
        if access_ttl.is_zero() || access_ttl >= refresh_ttl {
            return Err(ConfigError::InvalidValue {
                name: "JWT_ACCESS_TTL_SECS",
                reason: "must be positive and shorter than JWT_REFRESH_TTL_SECS".to_string(),
            });
        }

        let bcrypt_cost = parse_or(&var, "BCRYPT_COST", DEFAULT_COST)?;
        if !(MIN_COST..=MAX_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                name: "BCRYPT_COST",
                reason: format!("must be between {} and {}", MIN_COST, MAX_COST),
            });
        }

        let executor_url = var("EXECUTOR_URL")
            .unwrap_or_else(|| DEFAULT_EXECUTOR_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !(executor_url.starts_with("http://") || executor_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(executor_url));
        }

        let bootstrap_admin_email = var("BOOTSTRAP_ADMIN_EMAIL").map(|email| email.to_lowercase());
        if let Some(email) = &bootstrap_admin_email {
            validate_email(email).map_err(|_| ConfigError::InvalidValue {
                name: "BOOTSTRAP_ADMIN_EMAIL",
                reason: format!("'{}' is not an email address", email),
            })?;
        }

        Ok(Self {
            database_url: var("DATABASE_URL"),
            redis_url: var("REDIS_URL"),
            jwt_secret,
            access_ttl,
            refresh_ttl,
            bcrypt_cost,
            executor_url,
            project_id: var("EXECUTOR_PROJECT_ID").unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string()),
            result_ttl: Duration::from_secs(parse_or(&var, "RESULT_TTL_SECS", DEFAULT_RESULT_TTL.as_secs())?),
            port: parse_or(&var, "SERVER_PORT", DEFAULT_PORT)?,
            bootstrap_admin_email,
        })
    }
}

fn parse_or<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            reason: format!("'{}': {}", raw, e),
        }),
        None => Ok(default),
    }
}

/// Load and initialize database connection pool
///
/// This function:
/// 1. Creates a PostgreSQL connection pool for `database_url`
/// 2. Runs database migrations
///
/// # Returns
///
/// - `Ok(None)` if no URL is configured
/// - `Ok(Some(PgPool))` if the database is connected and migrated
///
/// # Errors
///
/// Connection and migration failures are returned; the gateway must not
/// silently swap a configured database for memory.
pub async fn load_database(database_url: Option<&str>) -> Result<Option<PgPool>, sqlx::Error> {
    let Some(database_url) = database_url else {
        tracing::warn!("DATABASE_URL not set. Users will be kept in memory.");
        return Ok(None);
    };

    tracing::info!("Connecting to database...");

    let pool = PgPool::connect(database_url).await.map_err(|e| {
        tracing::error!("Failed to create database connection pool: {:?}", e);
        e
    })?;

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {}", e);
        sqlx::Error::from(e)
    })?;
    tracing::info!("Database migrations completed successfully");

    Ok(Some(pool))
}
