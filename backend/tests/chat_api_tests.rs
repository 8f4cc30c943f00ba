//! Integration tests for the REST chat endpoint

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use citycompass_backend::services::conversation_store::ConversationRepository;
use citycompass_backend::test_helpers;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

async fn post_json(
    router: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request");

    let response = router.oneshot(request).await.expect("Failed to execute request");
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body_bytes).expect("Failed to parse JSON");
    (status, json)
}

#[tokio::test]
async fn greeting_returns_text_envelope() {
    let app = test_helpers::spawn_app(false);
    let (status, body) = post_json(
        app.router,
        "/api/chat",
        json!({"message": "hello", "userId": "user-1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "text");
    assert_eq!(body["message"], "Mock AI response");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn greeting_degrades_when_llm_is_down() {
    let app = test_helpers::spawn_app(true);
    let (status, body) = post_json(
        app.router,
        "/api/chat",
        json!({"message": "hello", "userId": "user-1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "text");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("urban mobility assistant"));
}

#[tokio::test]
async fn journey_message_produces_plan_and_context() {
    let app = test_helpers::spawn_app(false);
    let (status, body) = post_json(
        app.router,
        "/api/chat",
        json!({"message": "Plan a journey from Dighi to Airport", "userId": "user-1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "journey_plan");
    assert_eq!(
        body["locationContext"]["extractedLocations"]["origin"],
        "Dighi"
    );
    assert_eq!(
        body["locationContext"]["extractedLocations"]["destination"],
        "Airport"
    );

    let options = body["data"]["allOptions"].as_array().unwrap();
    assert!(!options.is_empty());
    assert!(options.len() <= 5);
}

#[tokio::test]
async fn status_check_degrades_with_structured_data() {
    let app = test_helpers::spawn_app(true);
    let (status, body) = post_json(
        app.router,
        "/api/chat",
        json!({"message": "any delays or disruptions?", "userId": "user-1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "transport_status");
    assert!(!body["message"].as_str().unwrap().is_empty());
    assert!(body["data"]["buses"].is_array());
    assert!(body["data"]["metros"].is_array());
}

#[tokio::test]
async fn chat_appends_to_canonical_conversation() {
    let app = test_helpers::spawn_app(false);
    let (status, _) = post_json(
        app.router.clone(),
        "/api/chat",
        json!({"message": "hello", "userId": "user-7"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let conversation = app.conversations.get("user-7").await.unwrap();
    // welcome + user message + AI reply
    assert_eq!(conversation.messages.len(), 3);
    assert!(conversation.title_generated);
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let app = test_helpers::spawn_app(false);
    let (status, body) = post_json(
        app.router,
        "/api/chat",
        json!({"message": "   ", "userId": "user-1"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
}
