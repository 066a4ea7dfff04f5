/**
 * API Route Handlers
 *
 * This module wires the API endpoints to their handlers and middleware.
 *
 * # Routes
 *
 * ## Authentication (public)
 * - `POST /api/auth/register` - User registration
 * - `POST /api/auth/login` - User login
 * - `POST /api/auth/refresh` - Exchange a refresh token
 *
 * ## Authenticated
 * - `GET /api/auth/me` - Get current user info
 * - `POST /api/tests/execute`, `GET /api/tests/{id}/status|results`
 * - `POST /api/security/scan`, `GET /api/security/{id}/status|results`
 *
 * ## Admin
 * - `PATCH /api/admin/users/{id}/active`
 * - `PATCH /api/admin/users/{id}/role`
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};

use crate::backend::admin::{set_user_active, set_user_role};
use crate::backend::auth::{get_me, login, refresh, register};
use crate::backend::jobs::{
    security_scan_results, security_scan_status, submit_security_scan, submit_test_run,
    test_run_results, test_run_status,
};
use crate::backend::middleware::{auth_middleware, require_role, AllowedRoles};
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
/// * `app_state` - State handed to the auth middleware
///
/// # Returns
///
/// Router with API routes configured
///
/// # Authentication
///
/// Middleware is attached with `route_layer`, so it only runs for matched
/// routes and unknown paths still reach the 404 fallback.
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh));

    let authenticated = Router::new()
        .route("/api/auth/me", get(get_me))
        .route("/api/tests/execute", post(submit_test_run))
        .route("/api/tests/{id}/status", get(test_run_status))
        .route("/api/tests/{id}/results", get(test_run_results))
        .route("/api/security/scan", post(submit_security_scan))
        .route("/api/security/{id}/status", get(security_scan_status))
        .route("/api/security/{id}/results", get(security_scan_results))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    // Layers run outermost-last-added: auth first, then the role gate
    let admin = Router::new()
        .route("/api/admin/users/{id}/active", patch(set_user_active))
        .route("/api/admin/users/{id}/role", patch(set_user_role))
        .route_layer(from_fn_with_state(AllowedRoles::admin_only(), require_role))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    router.merge(public).merge(authenticated).merge(admin)
}
