/**
 * User Model and Storage
 *
 * This module defines the user record, its role, and the `UserStore` seam
 * the handlers and middleware talk to. `PgUserStore` persists users in
 * PostgreSQL; `MemoryUserStore` keeps them in process for local runs and
 * tests.
 *
 * Emails are unique. Both stores enforce it at creation time, so two racing
 * registrations for one address yield one user and one `Duplicate` error.
 */

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Access level of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(UserStoreError::InvalidRecord(format!("unknown role '{}'", other))),
        }
    }
}

/// User record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// User email address (unique, lowercase)
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    /// Inactive users cannot log in and their tokens stop working
    pub is_active: bool,
    pub email_verified: bool,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    fn from_new(new_user: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            role: Role::User,
            is_active: true,
            email_verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Data needed to create a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum UserStoreError {
    /// A user with this email already exists
    #[error("user with email '{0}' already exists")]
    Duplicate(String),

    /// A stored row could not be turned into a `User`
    #[error("invalid user record: {0}")]
    InvalidRecord(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user with role `user`, active and unverified
    ///
    /// # Errors
    ///
    /// * `Duplicate` - the email is already registered
    async fn create(&self, new_user: NewUser) -> Result<User, UserStoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserStoreError>;

    /// Activate or deactivate a user, returning the updated record
    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Option<User>, UserStoreError>;

    /// Change a user's role, returning the updated record
    async fn set_role(&self, id: Uuid, role: Role) -> Result<Option<User>, UserStoreError>;
}

/// Row shape of the `users` table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    role: String,
    is_active: bool,
    email_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            role: row.role.parse()?,
            is_active: row.is_active,
            email_verified: row.email_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, role, is_active, email_verified, created_at, updated_at";

/// PostgreSQL-backed user store
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn into_user(row: Option<UserRow>) -> Result<Option<User>, UserStoreError> {
    row.map(User::try_from).transpose()
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, UserStoreError> {
        let user = User::from_new(new_user);

        let query = format!(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name, role, is_active, email_verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.role.as_str())
            .bind(user.is_active)
            .bind(user.email_verified)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return UserStoreError::Duplicate(user.email.clone());
                    }
                }
                UserStoreError::Database(e)
            })?;

        User::try_from(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        into_user(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserStoreError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        into_user(row)
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Option<User>, UserStoreError> {
        let query = format!(
            "UPDATE users SET is_active = $1, updated_at = $2 WHERE id = $3 RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(is_active)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        into_user(row)
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<Option<User>, UserStoreError> {
        let query = format!(
            "UPDATE users SET role = $1, updated_at = $2 WHERE id = $3 RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(role.as_str())
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        into_user(row)
    }
}

/// In-process user store
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> Option<User>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id)?;
        apply(user);
        user.updated_at = Utc::now();
        Some(user.clone())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, UserStoreError> {
        // Check and insert under one write lock
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new_user.email) {
            return Err(UserStoreError::Duplicate(new_user.email));
        }

        let user = User::from_new(new_user);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserStoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Option<User>, UserStoreError> {
        Ok(self.update(id, |user| user.is_active = is_active).await)
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<Option<User>, UserStoreError> {
        Ok(self.update(id, |user| user.role = role).await)
    }
}
