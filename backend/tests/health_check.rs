//! Integration tests for the health and status endpoints

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use citycompass_backend::test_helpers;
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn get_json(
    router: axum::Router,
    uri: &str,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request");

    let response = router.oneshot(request).await.expect("Failed to execute request");
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body_bytes).expect("Failed to parse JSON");
    (status, json)
}

#[tokio::test]
async fn health_check_works() {
    let app = test_helpers::spawn_app(false);
    let (status, json) = get_json(app.router, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
    assert_eq!(json["features"]["ollama"], true);
    assert_eq!(json["features"]["locationAware"], true);
    // No maps key configured in tests.
    assert_eq!(json["features"]["googleMaps"], false);
}

#[tokio::test]
async fn status_reports_runtime_information() {
    let app = test_helpers::spawn_app(false);
    let (status, json) = get_json(app.router, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "running");
    assert!(json["uptime"].is_u64());
    assert!(json["memory"]["residentBytes"].is_u64());
    assert_eq!(json["endpoints"]["health"], "/api/health");
    assert_eq!(json["endpoints"]["chat"], "/api/chat");
    assert_eq!(json["endpoints"]["journey"], "/api/journey");
    assert_eq!(json["endpoints"]["status"], "/api/status");
    assert_eq!(json["features"]["webSocketSupport"], true);
}
