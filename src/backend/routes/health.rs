/**
 * Health Check
 *
 * GET /health reports liveness and the state of each backing service.
 * It always answers 200; a failing dependency shows up as `"down"` and
 * an overall status of `"degraded"`.
 */

use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::cache;
use crate::backend::server::state::AppState;

/// Name reported in health responses
pub const SERVICE_NAME: &str = "tsuite-gateway";

/// State of a backing service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Up,
    Down,
    /// Not configured; an in-memory store is used instead
    Memory,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
    pub database: ServiceState,
    pub cache: ServiceState,
}

pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let database = match &app_state.db_pool {
        Some(pool) => match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => ServiceState::Up,
            Err(e) => {
                tracing::warn!("Database health check failed: {}", e);
                ServiceState::Down
            }
        },
        None => ServiceState::Memory,
    };

    let cache = match &app_state.cache {
        Some(manager) if cache::ping(manager).await => ServiceState::Up,
        Some(_) => ServiceState::Down,
        None => ServiceState::Memory,
    };

    let status = if database == ServiceState::Down || cache == ServiceState::Down {
        "degraded"
    } else {
        "ok"
    };

    Json(HealthResponse {
        status: status.to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: Utc::now(),
        database,
        cache,
    })
}
