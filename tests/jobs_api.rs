//! Job proxy API tests
//!
//! Test runs and security scans go through the gateway to a scripted
//! executor that advances one step per status query.

#![cfg(feature = "ssr")]

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tsuite::jobs::FakeExecutor;
use tsuite::shared::JobRequest;
use common::*;

fn test_run_body() -> serde_json::Value {
    json!({
        "repository_url": "https://github.com/user/repo.git",
        "framework": "jest",
        "environment_vars": { "CI": "true" }
    })
}

#[tokio::test]
async fn test_submit_test_run_is_accepted() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app).await;

    let response = app
        .post("/api/tests/execute", Some(&user.access_token), test_run_body())
        .await;

    assert_status!(response, StatusCode::ACCEPTED);
    assert_eq!(response.body["kind"], "test");
    assert_eq!(response.body["status"], "queued");
    let job_id = response.body["jobId"].as_str().expect("job id");

    let submitted = app.executor.submitted();
    assert_eq!(submitted.len(), 1);
    match &submitted[0] {
        JobRequest::Test(request) => {
            assert_eq!(request.test_run_id, job_id);
            assert_eq!(request.project_id, "default");
            assert_eq!(request.branch, "main");
            assert_eq!(request.environment_vars.get("CI").map(String::as_str), Some("true"));
        }
        other => panic!("unexpected request: {:?}", other),
    }
}

#[tokio::test]
async fn test_jobs_require_authentication() {
    let app = TestApp::new();

    let submit = app.post("/api/tests/execute", None, test_run_body()).await;
    assert_error_response!(submit, StatusCode::UNAUTHORIZED);

    let status = app.get("/api/tests/anything/status", None).await;
    assert_error_response!(status, StatusCode::UNAUTHORIZED);

    assert!(app.executor.submitted().is_empty());
}

#[tokio::test]
async fn test_test_run_lifecycle() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app).await;
    let token = Some(user.access_token.as_str());

    let accepted = app.post("/api/tests/execute", token, test_run_body()).await;
    let job_id = accepted.body["jobId"].as_str().expect("job id").to_string();
    let status_uri = format!("/api/tests/{}/status", job_id);
    let results_uri = format!("/api/tests/{}/results", job_id);

    let early = app.get(&results_uri, token).await;
    assert_error_response!(early, StatusCode::CONFLICT);
    assert_contains!(early.body["error"].as_str().unwrap_or_default(), "not completed");

    let mut seen = Vec::new();
    for _ in 0..3 {
        let response = app.get(&status_uri, token).await;
        assert_status!(response, StatusCode::OK);
        seen.push(response.body["status"].as_str().unwrap_or_default().to_string());
    }
    assert_eq!(seen, vec!["queued", "running", "completed"]);

    let results = app.get(&results_uri, token).await;
    assert_status!(results, StatusCode::OK);
    assert_eq!(results.body["status"], "completed");
    assert_eq!(results.body["results"]["total_tests"], 100);
    assert_eq!(results.body["results"]["passed"], 95);
    let duration = results.body["results"]["duration"].as_f64().unwrap_or_default();
    assert_approx_eq!(duration, 45.2, 1e-9);

    // Terminal results are served from the result store
    let calls = app.executor.results_calls();
    let again = app.get(&results_uri, token).await;
    assert_eq!(again.body, results.body);
    assert_eq!(app.executor.results_calls(), calls);
}

#[tokio::test]
async fn test_failed_test_run_reports_error() {
    let app = TestApp::with_executor(FakeExecutor::failing());
    let user = create_unique_test_user(&app).await;
    let token = Some(user.access_token.as_str());

    let accepted = app.post("/api/tests/execute", token, test_run_body()).await;
    let job_id = accepted.body["jobId"].as_str().expect("job id").to_string();
    for _ in 0..3 {
        app.get(&format!("/api/tests/{}/status", job_id), token).await;
    }

    let results = app.get(&format!("/api/tests/{}/results", job_id), token).await;

    assert_status!(results, StatusCode::OK);
    assert_eq!(results.body["status"], "failed");
    assert!(results.body["error"].is_string());
}

#[tokio::test]
async fn test_security_scan_lifecycle() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app).await;
    let token = Some(user.access_token.as_str());

    let accepted = app
        .post(
            "/api/security/scan",
            token,
            json!({
                "repository_url": "https://github.com/user/repo.git",
                "scanner_type": "secrets",
                "branch": "develop"
            }),
        )
        .await;
    assert_status!(accepted, StatusCode::ACCEPTED);
    assert_eq!(accepted.body["kind"], "security_scan");
    let job_id = accepted.body["jobId"].as_str().expect("job id").to_string();

    match &app.executor.submitted()[0] {
        JobRequest::SecurityScan(request) => {
            assert_eq!(request.scan_id, job_id);
            assert_eq!(request.branch, "develop");
        }
        other => panic!("unexpected request: {:?}", other),
    }

    for _ in 0..3 {
        app.get(&format!("/api/security/{}/status", job_id), token).await;
    }
    let results = app
        .get(&format!("/api/security/{}/results", job_id), token)
        .await;

    assert_status!(results, StatusCode::OK);
    assert_eq!(results.body["results"]["total_vulnerabilities"], 3);
}

#[tokio::test]
async fn test_invalid_job_parameters() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app).await;

    let empty_url = app
        .post(
            "/api/tests/execute",
            Some(&user.access_token),
            json!({ "repository_url": "", "framework": "jest" }),
        )
        .await;
    assert_error_response!(empty_url, StatusCode::BAD_REQUEST);

    let unknown_scanner = app
        .post(
            "/api/security/scan",
            Some(&user.access_token),
            json!({ "repository_url": "https://github.com/user/repo.git", "scanner_type": "fuzz" }),
        )
        .await;
    assert_error_response!(unknown_scanner, StatusCode::BAD_REQUEST);

    assert!(app.executor.submitted().is_empty());
}

#[tokio::test]
async fn test_executor_rejection_is_surfaced() {
    let app = TestApp::with_executor(FakeExecutor::new().rejecting("Repository not reachable"));
    let user = create_unique_test_user(&app).await;

    let response = app
        .post("/api/tests/execute", Some(&user.access_token), test_run_body())
        .await;

    assert_error_response!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Repository not reachable");
}

#[tokio::test]
async fn test_unknown_job_and_executor_outage() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app).await;
    let token = Some(user.access_token.as_str());

    let unknown = app.get("/api/tests/no-such-job/status", token).await;
    assert_error_response!(unknown, StatusCode::NOT_FOUND);

    let accepted = app.post("/api/tests/execute", token, test_run_body()).await;
    let job_id = accepted.body["jobId"].as_str().expect("job id").to_string();
    app.executor.fail_next_polls(1);

    let outage = app.get(&format!("/api/tests/{}/status", job_id), token).await;
    assert_error_response!(outage, StatusCode::BAD_GATEWAY);

    let recovered = app.get(&format!("/api/tests/{}/status", job_id), token).await;
    assert_status!(recovered, StatusCode::OK);
    assert_eq!(recovered.body["status"], "queued");
}

#[tokio::test]
async fn test_jobs_are_private_to_their_submitter() {
    let app = TestApp::new();
    let alice = create_unique_test_user(&app).await;
    let bob = create_unique_test_user(&app).await;

    let accepted = app
        .post("/api/tests/execute", Some(&alice.access_token), test_run_body())
        .await;
    let job_id = accepted.body["jobId"].as_str().expect("job id").to_string();
    let status_uri = format!("/api/tests/{}/status", job_id);
    let results_uri = format!("/api/tests/{}/results", job_id);

    let foreign_status = app.get(&status_uri, Some(&bob.access_token)).await;
    assert_error_response!(foreign_status, StatusCode::NOT_FOUND);
    assert_eq!(foreign_status.body["error"], "Job not found");

    let foreign_results = app.get(&results_uri, Some(&bob.access_token)).await;
    assert_error_response!(foreign_results, StatusCode::NOT_FOUND);

    let own_status = app.get(&status_uri, Some(&alice.access_token)).await;
    assert_status!(own_status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_can_read_any_job() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app).await;
    let admin = create_admin(&app).await;

    let accepted = app
        .post("/api/tests/execute", Some(&user.access_token), test_run_body())
        .await;
    let job_id = accepted.body["jobId"].as_str().expect("job id").to_string();

    let status = app
        .get(&format!("/api/tests/{}/status", job_id), Some(&admin.access_token))
        .await;
    assert_status!(status, StatusCode::OK);
    assert_eq!(status.body["jobId"], job_id.as_str());
}

#[tokio::test]
async fn test_malformed_job_ids_are_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "running" })))
        .expect(0)
        .mount(&server)
        .await;

    let app = TestApp::over_http(&server.uri());
    let admin = create_admin(&app).await;
    let token = Some(admin.access_token.as_str());

    for uri in [
        "/api/tests/..%2F..%2Finternal%2Fsecret/status",
        "/api/tests/..%2Fadmin%3Fx=1/results",
        "/api/security/scan%2F..%2F..%2Fmetrics/status",
        "/api/security/has%20space/results",
    ] {
        let response = app.get(uri, token).await;
        assert_error_response!(response, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_executor_not_ready_results_map_to_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tests/execute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "queued" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v1/tests/test-[^/]+/results$"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Test run is not completed yet" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v1/tests/test-[^/]+/status$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "running" })))
        .mount(&server)
        .await;

    let app = TestApp::over_http(&server.uri());
    let user = create_unique_test_user(&app).await;
    let token = Some(user.access_token.as_str());

    let accepted = app.post("/api/tests/execute", token, test_run_body()).await;
    assert_status!(accepted, StatusCode::ACCEPTED);
    let job_id = accepted.body["jobId"].as_str().expect("job id").to_string();

    let results = app.get(&format!("/api/tests/{}/results", job_id), token).await;
    assert_error_response!(results, StatusCode::CONFLICT);
    assert_contains!(results.body["error"].as_str().unwrap_or_default(), "not completed");
}
