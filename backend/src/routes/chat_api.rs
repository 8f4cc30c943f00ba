use axum::debug_handler;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::chats::Message;
use crate::models::location::{GeoPoint, LocationContext};
use crate::services::journey_planner::JourneyPreferences;
use crate::state::AppState;

const REST_CONVERSATION_ID: &str = "api-user";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub location_context: Option<LocationContext>,
    #[serde(default)]
    pub user_location: Option<GeoPoint>,
}

/// Processes one chat message over REST. The conversation is keyed by the
/// caller-supplied user id, falling back to a shared API conversation.
#[debug_handler]
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.message.trim().is_empty() {
        return Err(AppError::BadRequest("message must not be empty".to_string()));
    }

    tracing::info!(
        user_id = ?payload.user_id,
        has_location_context = payload.location_context.is_some(),
        "REST chat request"
    );

    let conversation_id = payload
        .user_id
        .clone()
        .unwrap_or_else(|| REST_CONVERSATION_ID.to_string());

    state.conversations.ensure(&conversation_id).await;
    let history = state.conversations.history(&conversation_id).await;
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

    Ok(Json(envelope))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyRequest {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub preferences: Option<JourneyPreferences>,
    #[serde(default)]
    pub user_location: Option<GeoPoint>,
}

/// Journey planning with structured origin/destination instead of free text.
#[debug_handler]
pub async fn journey_handler(
    State(state): State<AppState>,
    Json(payload): Json<JourneyRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.origin.trim().is_empty() || payload.destination.trim().is_empty() {
        return Err(AppError::BadRequest(
            "origin and destination must not be empty".to_string(),
        ));
    }

    tracing::info!(
        origin = %payload.origin,
        destination = %payload.destination,
        "journey planning request"
    );

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

    Ok(Json(envelope))
}
