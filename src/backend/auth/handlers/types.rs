/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by authentication
 * and admin handlers. All bodies use camelCase field names.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::auth::sessions::TokenPair;
use crate::backend::auth::users::{Role, User};

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// User's email address
    pub email: String,
    /// User's password (will be hashed before storage)
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    /// User's password (will be verified against stored hash)
    pub password: String,
}

/// Refresh request
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Auth response
///
/// Returned by register and login. Contains both session tokens and the
/// user's public profile.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthResponse {
    pub fn new(user: User, tokens: TokenPair) -> Self {
        Self {
            user: user.into(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

/// Token pair response returned by refresh
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(tokens: TokenPair) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

/// User response (without sensitive data)
///
/// Never includes the password hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            is_active: user.is_active,
            email_verified: user.email_verified,
            created_at: user.created_at,
        }
    }
}

/// `{"user": ...}` wrapper used by /me and the admin endpoints
#[derive(Serialize, Deserialize, Debug)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

impl From<User> for UserEnvelope {
    fn from(user: User) -> Self {
        Self { user: user.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_omits_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
            role: Role::User,
            is_active: true,
            email_verified: false,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserEnvelope::from(user)).unwrap();
        let fields = json["user"].as_object().unwrap();
        assert!(fields.contains_key("firstName"));
        assert!(fields.contains_key("isActive"));
        assert!(fields.contains_key("emailVerified"));
        assert!(!json.to_string().contains("secret"));
        assert_eq!(json["user"]["role"], "user");
    }

    #[test]
    fn test_register_request_names_are_optional() {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@example.com","password":"password123"}"#).unwrap();
        assert!(request.first_name.is_none());

        let request: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@example.com","password":"password123","firstName":"Ada"}"#,
        )
        .unwrap();
        assert_eq!(request.first_name.as_deref(), Some("Ada"));
    }
}
