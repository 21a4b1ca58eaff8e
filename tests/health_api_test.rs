//! Smoke tests for the operational endpoints.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};

#[tokio::test]
async fn liveness_and_readiness_report_up() {
    let app = TestApp::new().await;

    let live = app.request(Method::GET, "/health/live", None, None).await;
    assert_eq!(live.status(), 200);
    assert_eq!(response_json(live).await["alive"], true);

    let ready = app.request(Method::GET, "/health/ready", None, None).await;
    assert_eq!(ready.status(), 200);
    assert_eq!(response_json(ready).await["ready"], true);
}

#[tokio::test]
async fn version_endpoint_names_the_build() {
    let app = TestApp::new().await;

    let version = app.request(Method::GET, "/health/version", None, None).await;
    assert_eq!(version.status(), 200);
    let body = response_json(version).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn api_status_is_public() {
    let app = TestApp::new().await;

    let status = app.request(Method::GET, "/api/v1/status", None, None).await;
    assert_eq!(status.status(), 200);
    let body = response_json(status).await;
    assert_eq!(body["data"]["service"], "procura-api");
    assert!(body["data"]["version"].as_str().is_some());
}
