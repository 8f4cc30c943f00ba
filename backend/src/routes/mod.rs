use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub mod chat_api;
pub mod health;
pub mod socket;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/status", get(health::server_status))
        .route("/api/chat", post(chat_api::chat_handler))
        .route("/api/journey", post(chat_api::journey_handler))
        .route("/ws", get(socket::ws_handler))
}
