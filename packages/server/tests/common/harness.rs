//! Test harness that drives the router with mocked dependencies.
//!
//! No network is involved: every external service is a recording mock from
//! `server_core::kernel::test_dependencies`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use server_core::kernel::TestDependencies;
use server_core::server::{build_app, AppState};
use tower::ServiceExt;

use super::{APP_CONFIG, VERIFICATION_TOKEN};

pub struct TestHarness {
    /// Mocks behind the router, for arranging failures and asserting calls
    pub deps: TestDependencies,
    app: Router,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_deps(
            TestDependencies::new()
                .with_dev_email("dev@danxi.test")
                .with_config_file(APP_CONFIG),
        )
    }

    pub fn with_deps(deps: TestDependencies) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let app = build_app(AppState::new(deps.server_deps(), VERIFICATION_TOKEN));
        Self { deps, app }
    }

    /// POST a JSON body and return the status with the parsed response.
    pub async fn post_json(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        self.post_raw(path, serde_json::to_vec(body).expect("serialize body"))
            .await
    }

    pub async fn post_raw(&self, path: &str, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(body.into())
            .expect("build request");
        self.send(request).await
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response is JSON")
        };
        (status, json)
    }
}
