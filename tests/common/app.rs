//! In-process gateway for tests
//!
//! Builds the real router over in-memory stores, a cost-4 password hasher,
//! and a scripted executor, and drives it with `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use tsuite::backend::admin::BootstrapAdmin;
use tsuite::backend::auth::{MemoryUserStore, PasswordHasher, TokenService};
use tsuite::backend::routes::create_router;
use tsuite::backend::server::AppState;
use tsuite::jobs::{Executor, FakeExecutor, HttpExecutor, JobClient, MemoryResultStore};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Status and JSON body of a gateway response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryUserStore>,
    /// Scripted executor; idle when the app talks to an HTTP executor
    pub executor: Arc<FakeExecutor>,
    pub results: Arc<MemoryResultStore>,
    pub tokens: Arc<TokenService>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_executor(FakeExecutor::new())
    }

    pub fn with_executor(executor: FakeExecutor) -> Self {
        let executor = Arc::new(executor);
        Self::build(executor.clone(), executor, Duration::from_secs(900), BootstrapAdmin::default())
    }

    /// App whose access tokens live `access_ttl`
    pub fn with_access_ttl(access_ttl: Duration) -> Self {
        let executor = Arc::new(FakeExecutor::new());
        Self::build(executor.clone(), executor, access_ttl, BootstrapAdmin::default())
    }

    /// App forwarding jobs to the executor at `base_url`
    pub fn over_http(base_url: &str) -> Self {
        Self::build(
            Arc::new(HttpExecutor::new(base_url)),
            Arc::new(FakeExecutor::new()),
            Duration::from_secs(900),
            BootstrapAdmin::default(),
        )
    }

    /// App where `email` registers as an administrator
    pub fn with_bootstrap_admin(email: &str) -> Self {
        let executor = Arc::new(FakeExecutor::new());
        Self::build(
            executor.clone(),
            executor,
            Duration::from_secs(900),
            BootstrapAdmin::new(Some(email)),
        )
    }

    fn build(
        executor: Arc<dyn Executor>,
        fake: Arc<FakeExecutor>,
        access_ttl: Duration,
        bootstrap_admin: BootstrapAdmin,
    ) -> Self {
        let users = Arc::new(MemoryUserStore::new());
        let results = Arc::new(MemoryResultStore::new());
        let tokens = Arc::new(
            TokenService::new(TEST_SECRET, access_ttl, Duration::from_secs(7 * 24 * 60 * 60))
                .expect("valid token configuration"),
        );
        let jobs = JobClient::new(executor, results.clone(), "default");

        let state = AppState {
            bootstrap_admin,
            ..AppState::new(users.clone(), tokens.clone(), PasswordHasher::new(4), jobs)
        };

        Self {
            router: create_router(state),
            users,
            executor: fake,
            results,
            tokens,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).expect("valid request")).await
    }

    /// Send a pre-built request
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }
}
