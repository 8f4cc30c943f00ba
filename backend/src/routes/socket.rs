//! The bidirectional message channel.
//!
//! Frames are JSON envelopes `{event, data}` mirroring the REST contract.
//! Each incoming frame is processed to completion before the next one is
//! read, so replies within one connection keep submission order. The
//! optional `requestId` on `send_message` is echoed back verbatim so clients
//! can discard replies that arrive after the conversation has moved on.

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::llm::PromptMessage;
use crate::models::chats::{HistoryTurn, Message};
use crate::models::envelope::ResponseEnvelope;
use crate::models::location::{GeoPoint, LocationContext};
use crate::services::conversation_store::new_conversation_id;
use crate::services::journey_planner::JourneyPreferences;
use crate::state::AppState;

const SEND_MESSAGE_ERROR: &str = "Sorry, I encountered an error processing your \
location-aware request. Please try again.";

pub async fn ws_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    // Conversation used when the client never supplies a user id.
    let fallback_conversation_id = new_conversation_id();
    info!(conversation_id = %fallback_conversation_id, "socket connected");

    while let Some(frame) = socket.recv().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(err) => {
                // Dropped connections are routine; the client reconnects.
                debug!(error = %err, "socket receive error, closing");
                break;
            }
        };

        match frame {
            WsMessage::Text(text) => {
                let reply = dispatch_frame(&state, &fallback_conversation_id, text.as_str()).await;
                let serialized = match serde_json::to_string(&reply) {
                    Ok(serialized) => serialized,
                    Err(err) => {
                        warn!(error = %err, "failed to serialize socket reply");
                        continue;
                    }
                };
                if socket.send(WsMessage::Text(serialized.into())).await.is_err() {
                    break;
                }
            }
            WsMessage::Ping(payload) => {
                if socket.send(WsMessage::Pong(payload)).await.is_err() {
                    break;
                }
            }
            WsMessage::Close(_) => break,
            _ => {}
        }
    }

    info!(conversation_id = %fallback_conversation_id, "socket disconnected");
}

// --- Client -> server payloads ---

#[derive(Debug, Deserialize)]
struct RawFrame {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub location_context: Option<LocationContext>,
    #[serde(default)]
    pub user_location: Option<GeoPoint>,
    #[serde(default)]
    pub has_location_data: bool,
    #[serde(default)]
    pub conversation_history: Vec<HistoryTurn>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdatePayload {
    #[serde(default)]
    pub user_location: Option<GeoPoint>,
    #[serde(default)]
    pub accuracy: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanJourneyPayload {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub preferences: Option<JourneyPreferences>,
    #[serde(default)]
    pub user_location: Option<GeoPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatusPayload {
    #[serde(default)]
    pub user_location: Option<GeoPoint>,
}

// --- Server -> client frames ---

#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerFrame {
    ReceiveMessage(OutboundMessage),
    LocationAcknowledged(LocationAck),
    JourneyPlanned(OutboundMessage),
    JourneyError(ErrorPayload),
    StatusUpdate(OutboundMessage),
    StatusError(ErrorPayload),
    Error(ErrorPayload),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    pub id: i64,
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl OutboundMessage {
    fn new(envelope: ResponseEnvelope) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis(),
            envelope,
            timestamp: now,
            request_id: None,
            error: false,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAck {
    pub received: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorPayload {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
            timestamp: Utc::now(),
        }
    }
}

/// Handles one inbound frame and produces the reply frame. Kept separate
/// from the socket loop so the event contract is testable without a live
/// connection.
pub async fn dispatch_frame(
    state: &AppState,
    fallback_conversation_id: &str,
    text: &str,
) -> ServerFrame {
    let raw: RawFrame = match serde_json::from_str(text) {
        Ok(raw) => raw,
        Err(err) => {
            return ServerFrame::Error(ErrorPayload::new("unrecognized frame", err.to_string()));
        }
    };

    match raw.event.as_str() {
        "send_message" => match serde_json::from_value::<SendMessagePayload>(raw.data) {
            Ok(payload) => handle_send_message(state, fallback_conversation_id, payload).await,
            Err(err) => {
                warn!(error = %err, "malformed send_message payload");
                let mut outbound =
                    OutboundMessage::new(ResponseEnvelope::text(SEND_MESSAGE_ERROR));
                outbound.error = true;
                ServerFrame::ReceiveMessage(outbound)
            }
        },
        "location_update" => match serde_json::from_value::<LocationUpdatePayload>(raw.data) {
            Ok(payload) => {
                debug!(
                    lat = ?payload.user_location.map(|l| l.lat),
                    lng = ?payload.user_location.map(|l| l.lng),
                    accuracy = ?payload.accuracy,
                    "received location update"
                );
                ServerFrame::LocationAcknowledged(LocationAck {
                    received: true,
                    timestamp: Utc::now(),
                })
            }
            Err(err) => ServerFrame::Error(ErrorPayload::new(
                "malformed location_update payload",
                err.to_string(),
            )),
        },
        "plan_journey" => match serde_json::from_value::<PlanJourneyPayload>(raw.data) {
            Ok(payload) => handle_plan_journey(state, payload).await,
            Err(err) => ServerFrame::JourneyError(ErrorPayload::new(
                "Failed to plan journey",
                err.to_string(),
            )),
        },
        "check_status" => match serde_json::from_value::<CheckStatusPayload>(raw.data) {
            Ok(payload) => {
                let envelope = state
                    .dialog_router
                    .handle("Check current transport status", &[], payload.user_location)
                    .await;
                ServerFrame::StatusUpdate(OutboundMessage::new(envelope))
            }
            Err(err) => ServerFrame::StatusError(ErrorPayload::new(
                "Failed to check transport status",
                err.to_string(),
            )),
        },
        other => ServerFrame::Error(ErrorPayload::new(
            "unrecognized event",
            format!("unknown event '{other}'"),
        )),
    }
}

async fn handle_send_message(
    state: &AppState,
    fallback_conversation_id: &str,
    payload: SendMessagePayload,
) -> ServerFrame {
    info!(
        user_id = ?payload.user_id,
        history_len = payload.conversation_history.len(),
        has_location_context = payload.location_context.is_some(),
        location_enabled = payload.has_location_data,
        "processing socket message"
    );

    let conversation_id = payload
        .user_id
        .clone()
        .unwrap_or_else(|| fallback_conversation_id.to_string());

    state.conversations.ensure(&conversation_id).await;
    state
        .conversations
        .sync_history(&conversation_id, &payload.conversation_history)
        .await;

    // The prompt history is the client's copy, in the order it sent it.
    let history: Vec<PromptMessage> = payload
        .conversation_history
        .iter()
        .map(PromptMessage::from_history_turn)
        .collect();

    state
        .conversations
        .append(&conversation_id, Message::user(payload.message.clone()))
        .await;

    let envelope = state
        .dialog_router
        .handle(&payload.message, &history, payload.user_location)
        .await;

    state
        .conversations
        .record_ai_reply(&conversation_id, &envelope)
        .await;

    let mut outbound = OutboundMessage::new(envelope);
    outbound.request_id = payload.request_id;
    ServerFrame::ReceiveMessage(outbound)
}

async fn handle_plan_journey(state: &AppState, payload: PlanJourneyPayload) -> ServerFrame {
    if payload.origin.trim().is_empty() || payload.destination.trim().is_empty() {
        return ServerFrame::JourneyError(ErrorPayload::new(
            "Failed to plan journey",
            "origin and destination must not be empty",
        ));
    }

    let preferences = payload.preferences.unwrap_or_default();
    let envelope = state
        .dialog_router
        .handle_journey_request(
            &payload.origin,
            &payload.destination,
            &preferences,
            payload.user_location,
        )
        .await;

    ServerFrame::JourneyPlanned(OutboundMessage::new(envelope))
}
