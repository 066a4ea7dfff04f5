//! Authentication test helpers
//!
//! Provides utilities for registering test users through the HTTP surface
//! and promoting them to administrators.

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use tsuite::backend::auth::{Role, UserStore};

use super::app::TestApp;

pub const TEST_PASSWORD: &str = "test_password_123";

/// Test user credentials
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub access_token: String,
    pub refresh_token: String,
}

pub fn unique_email() -> String {
    format!("test_{}@example.com", Uuid::new_v4().simple())
}

/// Register a user through `POST /api/auth/register`
pub async fn register_user(app: &TestApp, email: &str, password: &str) -> TestUser {
    let response = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": email, "password": password }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "registration failed: {}", response.body);

    TestUser {
        id: response.body["user"]["id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("user id in response"),
        email: email.to_string(),
        password: password.to_string(),
        access_token: response.body["accessToken"].as_str().expect("access token").to_string(),
        refresh_token: response.body["refreshToken"].as_str().expect("refresh token").to_string(),
    }
}

/// Register a user with a unique email
pub async fn create_unique_test_user(app: &TestApp) -> TestUser {
    register_user(app, &unique_email(), TEST_PASSWORD).await
}

/// Register a user and give them the admin role
pub async fn create_admin(app: &TestApp) -> TestUser {
    let admin = create_unique_test_user(app).await;
    app.users
        .set_role(admin.id, Role::Admin)
        .await
        .expect("store available")
        .expect("user exists");
    admin
}
