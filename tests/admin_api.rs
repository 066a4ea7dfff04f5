//! Admin API tests
//!
//! Role gate ordering and the user management endpoints.

#![cfg(feature = "ssr")]

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use tsuite::backend::auth::{Role, UserStore};
use common::*;

fn active_uri(id: Uuid) -> String {
    format!("/api/admin/users/{}/active", id)
}

fn role_uri(id: Uuid) -> String {
    format!("/api/admin/users/{}/role", id)
}

#[tokio::test]
async fn test_admin_routes_require_authentication() {
    let app = TestApp::new();
    let target = create_unique_test_user(&app).await;

    let response = app
        .patch(&active_uri(target.id), None, json!({ "isActive": false }))
        .await;

    assert_error_response!(response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_forbid_regular_users() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app).await;
    let target = create_unique_test_user(&app).await;

    let response = app
        .patch(
            &active_uri(target.id),
            Some(&user.access_token),
            json!({ "isActive": false }),
        )
        .await;

    assert_error_response!(response, StatusCode::FORBIDDEN);
    let stored = app.users.find_by_id(target.id).await.expect("store available");
    assert_eq!(stored.map(|u| u.is_active), Some(true));
}

#[tokio::test]
async fn test_admin_deactivates_user() {
    let app = TestApp::new();
    let admin = create_admin(&app).await;
    let target = create_unique_test_user(&app).await;

    let response = app
        .patch(
            &active_uri(target.id),
            Some(&admin.access_token),
            json!({ "isActive": false }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["user"]["isActive"], false);

    let me = app.get("/api/auth/me", Some(&target.access_token)).await;
    assert_error_response!(me, StatusCode::UNAUTHORIZED);

    let reactivated = app
        .patch(
            &active_uri(target.id),
            Some(&admin.access_token),
            json!({ "isActive": true }),
        )
        .await;
    assert_status!(reactivated, StatusCode::OK);
    assert_status!(app.get("/api/auth/me", Some(&target.access_token)).await, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_cannot_deactivate_self() {
    let app = TestApp::new();
    let admin = create_admin(&app).await;

    let response = app
        .patch(
            &active_uri(admin.id),
            Some(&admin.access_token),
            json!({ "isActive": false }),
        )
        .await;

    assert_error_response!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_cannot_demote_self() {
    let app = TestApp::new();
    let admin = create_admin(&app).await;

    let response = app
        .patch(
            &role_uri(admin.id),
            Some(&admin.access_token),
            json!({ "role": "user" }),
        )
        .await;
    assert_error_response!(response, StatusCode::BAD_REQUEST);

    let stored = app.users.find_by_id(admin.id).await.expect("store").expect("admin");
    assert_eq!(stored.role, Role::Admin);

    // Reasserting the admin role on oneself is harmless
    let unchanged = app
        .patch(
            &role_uri(admin.id),
            Some(&admin.access_token),
            json!({ "role": "admin" }),
        )
        .await;
    assert_status!(unchanged, StatusCode::OK);
}

#[tokio::test]
async fn test_role_change_applies_to_existing_tokens() {
    let app = TestApp::new();
    let admin = create_admin(&app).await;
    let target = create_unique_test_user(&app).await;
    let other = create_unique_test_user(&app).await;

    // Token was issued while the target was a regular user
    let before = app
        .patch(
            &active_uri(other.id),
            Some(&target.access_token),
            json!({ "isActive": false }),
        )
        .await;
    assert_error_response!(before, StatusCode::FORBIDDEN);

    let promoted = app
        .patch(
            &role_uri(target.id),
            Some(&admin.access_token),
            json!({ "role": "admin" }),
        )
        .await;
    assert_status!(promoted, StatusCode::OK);
    assert_eq!(promoted.body["user"]["role"], "admin");

    let after = app
        .patch(
            &active_uri(other.id),
            Some(&target.access_token),
            json!({ "isActive": false }),
        )
        .await;
    assert_status!(after, StatusCode::OK);
}

#[tokio::test]
async fn test_demoted_admin_loses_access() {
    let app = TestApp::new();
    let admin = create_admin(&app).await;
    let target = create_unique_test_user(&app).await;

    app.users
        .set_role(admin.id, Role::User)
        .await
        .expect("store available")
        .expect("user exists");

    let response = app
        .patch(
            &role_uri(target.id),
            Some(&admin.access_token),
            json!({ "role": "admin" }),
        )
        .await;
    assert_error_response!(response, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_unknown_user() {
    let app = TestApp::new();
    let admin = create_admin(&app).await;

    let response = app
        .patch(
            &role_uri(Uuid::new_v4()),
            Some(&admin.access_token),
            json!({ "role": "admin" }),
        )
        .await;

    assert_error_response!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_rejects_unknown_role() {
    let app = TestApp::new();
    let admin = create_admin(&app).await;
    let target = create_unique_test_user(&app).await;

    let response = app
        .patch(
            &role_uri(target.id),
            Some(&admin.access_token),
            json!({ "role": "superuser" }),
        )
        .await;

    assert_error_response!(response, StatusCode::BAD_REQUEST);
}
