/**
 * Bootstrap Administrator
 *
 * `BOOTSTRAP_ADMIN_EMAIL` names the account that is always an
 * administrator: it is promoted at startup if it already exists, and gets
 * the admin role when it registers.
 */

use std::sync::Arc;

use crate::backend::auth::users::{Role, User, UserStore, UserStoreError};

/// The configured bootstrap administrator email, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapAdmin(Option<Arc<str>>);

impl BootstrapAdmin {
    pub fn new(email: Option<&str>) -> Self {
        Self(email.map(|email| Arc::from(email.trim().to_lowercase())))
    }

    pub fn email(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Whether `email` (already normalized) is the bootstrap account
    pub fn matches(&self, email: &str) -> bool {
        self.email() == Some(email)
    }

    /// Give `user` the admin role if it is the bootstrap account
    pub async fn promote_if_matching(
        &self,
        users: &dyn UserStore,
        user: User,
    ) -> Result<User, UserStoreError> {
        if !self.matches(&user.email) || user.role == Role::Admin {
            return Ok(user);
        }

        tracing::info!(user_id = %user.id, "Promoting bootstrap administrator");
        let promoted = users.set_role(user.id, Role::Admin).await?;
        Ok(promoted.unwrap_or(user))
    }

    /// Promote the bootstrap account if it already exists
    pub async fn apply(&self, users: &dyn UserStore) -> Result<(), UserStoreError> {
        let Some(email) = self.email() else {
            return Ok(());
        };

        match users.find_by_email(email).await? {
            Some(user) => {
                self.promote_if_matching(users, user).await?;
            }
            None => tracing::info!("Bootstrap administrator will be promoted on registration"),
        }
        Ok(())
    }
}
