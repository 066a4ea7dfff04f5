//! Admin Module
//!
//! Administrator-only user management:
//!
//! - **`set_user_active`** - PATCH /api/admin/users/{id}/active
//! - **`set_user_role`** - PATCH /api/admin/users/{id}/role
//!
//! The first administrator comes from `BOOTSTRAP_ADMIN_EMAIL`.

pub mod bootstrap;
pub mod handlers;

pub use bootstrap::BootstrapAdmin;
pub use handlers::{set_user_active, set_user_role, SetActiveRequest, SetRoleRequest};
