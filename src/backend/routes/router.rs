/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Health check
 * 2. API routes (auth, jobs, admin)
 * 3. Fallback handler (404 JSON)
 *
 * # Middleware
 *
 * Applied to every request, innermost first:
 * - `CatchPanicLayer` turns handler panics into a sanitized 500
 * - `TraceLayer` logs each request and response
 * - `CorsLayer` allows browser clients from any origin
 */

use axum::{routing::get, Router};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::backend::error::{not_found, panic_response};
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::health::health;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state containing stores and services
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
///
/// ## Fallback
///
/// Unknown routes get `404 {"error": "Route not found", "status": 404}`.
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", get(health));

    // Add API routes
    let router = configure_api_routes(router, &app_state);

    // Fallback handler for 404
    let router = router.fallback(not_found);

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
