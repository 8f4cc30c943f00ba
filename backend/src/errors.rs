// backend/src/errors.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    // --- Request/Input Errors ---
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    // --- External Service Errors ---
    #[error("LLM Client Error: {0}")]
    LlmClientError(String),

    #[error("Maps Client Error: {0}")]
    MapsClientError(String),

    // --- General/Internal Errors ---
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Serialization Error: {0}")]
    SerializationError(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let details = self.to_string();
        let (status, error_message) = match self {
            // 4xx Client Errors
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),

            // 5xx Server Errors - collaborator failures are normally swallowed
            // by the dialog router; reaching here means a handler-level bug.
            AppError::LlmClientError(e) => {
                error!("LLM client error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process message".to_string(),
                )
            }
            AppError::MapsClientError(e) => {
                error!("Maps client error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process message".to_string(),
                )
            }
            AppError::ConfigError(e) => {
                error!("Configuration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error".to_string(),
                )
            }
            AppError::SerializationError(e) => {
                error!("Serialization error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process message".to_string(),
                )
            }
            AppError::InternalServerError(e) => {
                error!("Internal server error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong processing your request".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "details": details,
        }));

        (status, body).into_response()
    }
}
