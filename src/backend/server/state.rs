/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container, holding:
 * - The user store (Postgres or in-memory)
 * - The token service and password hasher
 * - The job client, with its executor and result store
 * - Job ownership records and the bootstrap administrator
 * - Optional raw connections (database, cache) for health checks
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow handlers to extract only the parts
 * they need, e.g. `State(users): State<Arc<dyn UserStore>>`.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use redis::aio::ConnectionManager;
use sqlx::PgPool;

use crate::backend::admin::BootstrapAdmin;
use crate::backend::auth::password::PasswordHasher;
use crate::backend::auth::sessions::TokenService;
use crate::backend::auth::users::UserStore;
use crate::backend::jobs::{JobOwnerStore, MemoryJobOwners};
use crate::jobs::JobClient;

/// Application state shared by every handler
///
/// # Usage
///
/// ```rust,no_run
/// use tsuite::backend::server::state::AppState;
/// use axum::extract::State;
///
/// async fn handler(State(app_state): State<AppState>) {
///     let project = app_state.jobs.project_id();
///     // ...
/// }
/// ```
#[derive(Clone)]
pub struct AppState {
    /// User accounts
    pub users: Arc<dyn UserStore>,

    /// Session token issuance and verification
    pub tokens: Arc<TokenService>,

    pub hasher: PasswordHasher,

    /// Job submission, polling, and cached results
    pub jobs: JobClient,

    /// Who submitted each job
    pub owners: Arc<dyn JobOwnerStore>,

    pub bootstrap_admin: BootstrapAdmin,

    /// Database connection pool
    ///
    /// `None` when `DATABASE_URL` is unset; users are then kept in memory.
    pub db_pool: Option<PgPool>,

    /// Cache connection, `None` when results are cached in memory
    pub cache: Option<ConnectionManager>,
}

impl AppState {
    /// State without database or cache connections, with ownership kept in
    /// memory and no bootstrap administrator
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        jobs: JobClient,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
            jobs,
            owners: Arc::new(MemoryJobOwners::default()),
            bootstrap_admin: BootstrapAdmin::default(),
            db_pool: None,
            cache: None,
        }
    }
}

impl FromRef<AppState> for Arc<dyn UserStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.users.clone()
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for PasswordHasher {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hasher
    }
}

impl FromRef<AppState> for JobClient {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.jobs.clone()
    }
}

impl FromRef<AppState> for Arc<dyn JobOwnerStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.owners.clone()
    }
}

impl FromRef<AppState> for BootstrapAdmin {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.bootstrap_admin.clone()
    }
}

/// Implement FromRef for Option<PgPool>
///
/// Used by the health check to ping the database.
impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for Option<ConnectionManager> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.cache.clone()
    }
}
