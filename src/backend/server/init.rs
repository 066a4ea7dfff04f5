/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the gateway: state
 * creation, storage loading, route configuration, and shutdown signals.
 *
 * # Initialization Process
 *
 * 1. Build the token service and password hasher from configuration
 * 2. Connect the configured services (database, cache)
 * 3. Pick user, result, and ownership stores; memory when unconfigured
 * 4. Promote the bootstrap administrator
 * 5. Create the job client for the configured executor
 * 6. Create and configure the router
 */

use std::sync::Arc;

use axum::Router;
use thiserror::Error;

use crate::backend::admin::BootstrapAdmin;
use crate::backend::auth::password::PasswordHasher;
use crate::backend::auth::sessions::{TokenError, TokenService};
use crate::backend::auth::users::{MemoryUserStore, PgUserStore, UserStore, UserStoreError};
use crate::backend::cache::{load_cache, RedisJobOwners, RedisResultStore};
use crate::backend::jobs::{JobOwnerStore, MemoryJobOwners, DEFAULT_OWNER_RETENTION};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, GatewayConfig};
use crate::backend::server::state::AppState;
use crate::jobs::{HttpExecutor, JobClient, MemoryResultStore, ResultStore};

/// Gateway startup errors
#[derive(Debug, Error)]
pub enum InitError {
    #[error("invalid token configuration: {0}")]
    Token(#[from] TokenError),

    #[error("database unavailable: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cache unavailable: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("bootstrap administrator could not be promoted: {0}")]
    Bootstrap(#[from] UserStoreError),
}

/// Build the application state
///
/// # Errors
///
/// Fails if the token configuration is invalid, or if a configured database
/// or cache cannot be reached. Only unconfigured services fall back to
/// in-memory stores.
pub async fn build_state(config: &GatewayConfig) -> Result<AppState, InitError> {
    // Step 1: Credentials
    let tokens = Arc::new(TokenService::new(
        &config.jwt_secret,
        config.access_ttl,
        config.refresh_ttl,
    )?);
    let hasher = PasswordHasher::new(config.bcrypt_cost);

    // Step 2: Connect configured services
    let db_pool = load_database(config.database_url.as_deref()).await?;
    let cache = load_cache(config.redis_url.as_deref()).await?;

    // Step 3: Stores
    let users: Arc<dyn UserStore> = match &db_pool {
        Some(pool) => Arc::new(PgUserStore::new(pool.clone())),
        None => Arc::new(MemoryUserStore::new()),
    };
    let results: Arc<dyn ResultStore> = match &cache {
        Some(manager) => Arc::new(RedisResultStore::new(manager.clone(), config.result_ttl)),
        None => Arc::new(MemoryResultStore::with_ttl(config.result_ttl)),
    };
    let owners: Arc<dyn JobOwnerStore> = match &cache {
        Some(manager) => Arc::new(RedisJobOwners::new(manager.clone(), DEFAULT_OWNER_RETENTION)),
        None => Arc::new(MemoryJobOwners::default()),
    };

    // Step 4: First administrator
    let bootstrap_admin = BootstrapAdmin::new(config.bootstrap_admin_email.as_deref());
    bootstrap_admin.apply(users.as_ref()).await?;

    // Step 5: Executor client
    let executor = Arc::new(HttpExecutor::new(config.executor_url.clone()));
    let jobs = JobClient::new(executor, results, config.project_id.clone());
    tracing::info!(executor_url = %config.executor_url, "Job client configured");

    Ok(AppState {
        owners,
        bootstrap_admin,
        db_pool,
        cache,
        ..AppState::new(users, tokens, hasher, jobs)
    })
}

/// Create and configure the Axum application
///
/// # Returns
///
/// The router together with the state it serves, so the caller can close
/// connections after shutdown
pub async fn create_app(config: &GatewayConfig) -> Result<(Router<()>, AppState), InitError> {
    tracing::info!("Initializing tsuite gateway");

    let app_state = build_state(config).await?;
    let app = create_router(app_state.clone());

    tracing::info!("Router configured");
    Ok((app, app_state))
}

/// Resolve when the process receives Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
