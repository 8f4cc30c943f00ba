use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload category of a chat message. Doubles as the envelope type on the
/// wire, so the serialized names are part of the client contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Text,
    JourneyPlan,
    TransportStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Ai => write!(f, "ai"),
        }
    }
}

/// One chat message. Immutable once appended to a conversation; `id` is a
/// millisecond timestamp, unique enough for UI keys but not guaranteed so.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageKind::Text, content, Sender::User)
    }

    pub fn ai(kind: MessageKind, content: impl Into<String>) -> Self {
        Self::new(kind, content, Sender::Ai)
    }

    fn new(kind: MessageKind, content: impl Into<String>, sender: Sender) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis(),
            kind,
            content: content.into(),
            sender,
            timestamp: now,
            error: false,
        }
    }
}

/// A `{role, content}` pair as exchanged with clients and the language model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: String,
    pub content: String,
}

/// A chat session. Lives only for the process lifetime; clients persist their
/// own copies in local storage.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub messages: Vec<Message>,
    pub title: String,
    pub title_generated: bool,
    pub created_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            messages: Vec::new(),
            title: "New Chat".to_string(),
            title_generated: false,
            created_at: now,
            last_message_at: now,
        }
    }

    pub fn user_message_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.sender == Sender::User)
            .count()
    }

    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.sender == Sender::User)
    }
}
