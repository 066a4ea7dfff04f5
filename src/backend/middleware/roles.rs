/**
 * Role Gate Middleware
 *
 * Restricts a route to a set of roles. It must run after the auth
 * middleware: a request with no attached identity is rejected with 401,
 * an identity whose role is not allowed with 403.
 */

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::backend::auth::users::Role;
use crate::backend::error::BackendError;
use crate::backend::middleware::auth::AuthenticatedUser;

/// Roles permitted through a `require_role` layer
#[derive(Clone, Debug)]
pub struct AllowedRoles(Arc<[Role]>);

impl AllowedRoles {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self(roles.into_iter().collect())
    }

    pub fn admin_only() -> Self {
        Self::new([Role::Admin])
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }
}

/// Role gate middleware
///
/// # Example
///
/// ```rust,no_run
/// use axum::{middleware::from_fn_with_state, routing::get, Router};
/// use tsuite::backend::middleware::{require_role, AllowedRoles};
///
/// # async fn handler() {}
/// let admin: Router = Router::new()
///     .route("/admin", get(handler))
///     .route_layer(from_fn_with_state(AllowedRoles::admin_only(), require_role));
/// ```
pub async fn require_role(
    State(allowed): State<AllowedRoles>,
    request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| BackendError::unauthenticated("Authentication required"))?;

    if !allowed.contains(user.role) {
        tracing::warn!(user_id = %user.user_id, role = %user.role, "Role not permitted");
        return Err(BackendError::forbidden("Forbidden"));
    }

    Ok(next.run(request).await)
}
