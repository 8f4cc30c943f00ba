use serde::{Deserialize, Serialize};

use crate::models::chats::MessageKind;
use crate::models::location::LocationContext;

/// The uniform response object returned for every handled message,
/// regardless of intent. Every dialog-router code path terminates in one of
/// these; no error ever propagates past it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_context: Option<LocationContext>,
}

impl ResponseEnvelope {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Text,
            message: message.into(),
            data: None,
            location_context: None,
        }
    }
}
