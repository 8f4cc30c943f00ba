//! Tests for the WebSocket gateway event contract.
//!
//! The per-frame dispatch is exercised directly; the socket loop itself only
//! moves bytes.

use citycompass_backend::routes::socket::dispatch_frame;
use citycompass_backend::services::conversation_store::ConversationRepository;
use citycompass_backend::test_helpers;
use serde_json::json;

async fn dispatch(
    app: &test_helpers::TestApp,
    frame: serde_json::Value,
) -> serde_json::Value {
    let reply = dispatch_frame(&app.state, "chat_test", &frame.to_string()).await;
    serde_json::to_value(&reply).expect("reply serializes")
}

#[tokio::test]
async fn location_update_is_acknowledged() {
    let app = test_helpers::spawn_app(false);
    let reply = dispatch(
        &app,
        json!({
            "event": "location_update",
            "data": {"userLocation": {"lat": 18.52, "lng": 73.85}, "accuracy": 12.5}
        }),
    )
    .await;

    assert_eq!(reply["event"], "location_acknowledged");
    assert_eq!(reply["data"]["received"], true);
    assert!(reply["data"]["timestamp"].is_string());
}

#[tokio::test]
async fn send_message_echoes_request_id() {
    let app = test_helpers::spawn_app(false);
    let reply = dispatch(
        &app,
        json!({
            "event": "send_message",
            "data": {
                "message": "hello",
                "userId": "user-1",
                "conversationHistory": [],
                "requestId": "req-42"
            }
        }),
    )
    .await;

    assert_eq!(reply["event"], "receive_message");
    assert_eq!(reply["data"]["type"], "text");
    assert_eq!(reply["data"]["message"], "Mock AI response");
    assert_eq!(reply["data"]["requestId"], "req-42");
    assert!(reply["data"]["id"].is_i64());
    assert!(reply["data"]["timestamp"].is_string());
}

#[tokio::test]
async fn send_message_syncs_client_history() {
    let app = test_helpers::spawn_app(false);
    dispatch(
        &app,
        json!({
            "event": "send_message",
            "data": {
                "message": "Plan a journey from Dighi to Airport",
                "userId": "user-9",
                "conversationHistory": [
                    {"role": "user", "content": "earlier question"}
                ]
            }
        }),
    )
    .await;

    let conversation = app.conversations.get("user-9").await.unwrap();
    // welcome + synced turn + current user message + AI reply
    assert_eq!(conversation.messages.len(), 4);
    assert!(conversation
        .messages
        .iter()
        .any(|m| m.content == "earlier question"));
}

#[tokio::test]
async fn plan_journey_returns_planned_frame() {
    let app = test_helpers::spawn_app(false);
    let reply = dispatch(
        &app,
        json!({
            "event": "plan_journey",
            "data": {"origin": "Dighi", "destination": "Airport"}
        }),
    )
    .await;

    assert_eq!(reply["event"], "journey_planned");
    assert_eq!(reply["data"]["type"], "journey_plan");
    assert!(reply["data"]["data"]["allOptions"].is_array());
}

#[tokio::test]
async fn plan_journey_with_blank_origin_errors() {
    let app = test_helpers::spawn_app(false);
    let reply = dispatch(
        &app,
        json!({
            "event": "plan_journey",
            "data": {"origin": " ", "destination": "Airport"}
        }),
    )
    .await;

    assert_eq!(reply["event"], "journey_error");
    assert_eq!(reply["data"]["error"], "Failed to plan journey");
}

#[tokio::test]
async fn check_status_degrades_to_fallback_with_data() {
    let app = test_helpers::spawn_app(true);
    let reply = dispatch(&app, json!({"event": "check_status", "data": {}})).await;

    assert_eq!(reply["event"], "status_update");
    assert_eq!(reply["data"]["type"], "transport_status");
    assert!(!reply["data"]["message"].as_str().unwrap().is_empty());
    assert!(reply["data"]["data"]["buses"].is_array());
}

#[tokio::test]
async fn malformed_frames_produce_error_replies() {
    let app = test_helpers::spawn_app(false);

    let reply = dispatch_frame(&app.state, "chat_test", "not json at all").await;
    let reply = serde_json::to_value(&reply).unwrap();
    assert_eq!(reply["event"], "error");

    let reply = dispatch(&app, json!({"event": "mystery", "data": {}})).await;
    assert_eq!(reply["event"], "error");
}

#[tokio::test]
async fn malformed_send_message_yields_error_message_frame() {
    let app = test_helpers::spawn_app(false);
    // "message" field missing entirely.
    let reply = dispatch(
        &app,
        json!({"event": "send_message", "data": {"userId": 7}}),
    )
    .await;

    assert_eq!(reply["event"], "receive_message");
    assert_eq!(reply["data"]["error"], true);
    assert!(reply["data"]["message"]
        .as_str()
        .unwrap()
        .contains("Sorry"));
}
