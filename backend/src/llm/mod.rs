use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::chats::{HistoryTurn, Sender};

pub mod ollama;

pub use ollama::OllamaClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

/// One entry of the structured prompt sent to the language model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
        }
    }

    /// Maps a client-supplied `{role, content}` turn; unknown roles are
    /// treated as user turns rather than rejected.
    pub fn from_history_turn(turn: &HistoryTurn) -> Self {
        match turn.role.as_str() {
            "assistant" | "ai" => Self::assistant(turn.content.clone()),
            "system" => Self::system(turn.content.clone()),
            _ => Self::user(turn.content.clone()),
        }
    }
}

impl From<Sender> for PromptRole {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => PromptRole::User,
            Sender::Ai => PromptRole::Assistant,
        }
    }
}

/// Trait defining the interface to the language-model collaborator.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Executes a chat request. A single attempt: any transport error or
    /// non-2xx response is the failure signal for the whole turn.
    async fn exec_chat(
        &self,
        model: &str,
        messages: &[PromptMessage],
    ) -> Result<String, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PromptRole::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(serde_json::to_string(&PromptRole::System).unwrap(), "\"system\"");
    }

    #[test]
    fn history_turns_map_to_roles() {
        let assistant = HistoryTurn {
            role: "assistant".to_string(),
            content: "hi".to_string(),
        };
        assert_eq!(
            PromptMessage::from_history_turn(&assistant).role,
            PromptRole::Assistant
        );

        let unknown = HistoryTurn {
            role: "bot".to_string(),
            content: "hi".to_string(),
        };
        assert_eq!(
            PromptMessage::from_history_turn(&unknown).role,
            PromptRole::User
        );
    }
}
