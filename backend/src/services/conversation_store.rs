//! Canonical per-session conversation state.
//!
//! Conversations live in memory for the process lifetime; clients keep their
//! own copies in local storage and replay them over the socket. The store is
//! the single owner of the message lists: histories are append-only, and the
//! title is rewritten at most once, after the first AI reply.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::llm::PromptMessage;
use crate::models::chats::{Conversation, HistoryTurn, Message, MessageKind, Sender};
use crate::models::envelope::ResponseEnvelope;
use crate::services::title_generator;

pub const WELCOME_MESSAGE: &str = "Hello! I'm your urban mobility assistant for Pune. \
I can help you plan journeys using buses, metros, ride-sharing, and bike-sharing services. \
Where would you like to go?";

pub fn new_conversation_id() -> String {
    format!("chat_{}", Uuid::new_v4())
}

/// Conversation repository. The backing store is pluggable; only the
/// in-memory implementation exists, since server-side persistence is out of
/// scope.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Returns the conversation with this id, creating it (with the welcome
    /// message seeded) when it does not exist yet.
    async fn ensure(&self, id: &str) -> Conversation;

    async fn get(&self, id: &str) -> Option<Conversation>;

    /// Appends one message. Existing entries are never touched.
    async fn append(&self, id: &str, message: Message);

    /// Reconciles a client-side history copy with the canonical store.
    /// Canonical messages are never removed or reordered; turns the store
    /// has not seen are appended. Returns the number of appended entries.
    async fn sync_history(&self, id: &str, turns: &[HistoryTurn]) -> usize;

    /// The conversation history mapped to prompt roles, in insertion order.
    async fn history(&self, id: &str) -> Vec<PromptMessage>;

    /// Appends the AI reply and, exactly once per conversation (after the
    /// first AI response following a single user message), rewrites the
    /// title. Returns the new title when it was rewritten.
    async fn record_ai_reply(&self, id: &str, envelope: &ResponseEnvelope) -> Option<String>;
}

#[derive(Default)]
pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<String, Conversation>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationStore {
    async fn ensure(&self, id: &str) -> Conversation {
        let mut conversations = self.conversations.write().await;
        conversations
            .entry(id.to_string())
            .or_insert_with(|| {
                debug!(conversation_id = id, "creating conversation");
                let mut conversation = Conversation::new(id);
                conversation
                    .messages
                    .push(Message::ai(MessageKind::Text, WELCOME_MESSAGE));
                conversation
            })
            .clone()
    }

    async fn get(&self, id: &str) -> Option<Conversation> {
        self.conversations.read().await.get(id).cloned()
    }

    async fn append(&self, id: &str, message: Message) {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .entry(id.to_string())
            .or_insert_with(|| Conversation::new(id));
        conversation.last_message_at = message.timestamp;
        conversation.messages.push(message);
    }

    async fn sync_history(&self, id: &str, turns: &[HistoryTurn]) -> usize {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .entry(id.to_string())
            .or_insert_with(|| Conversation::new(id));

        let mut appended = 0;
        for turn in turns {
            let sender = match turn.role.as_str() {
                "assistant" | "ai" => Sender::Ai,
                _ => Sender::User,
            };
            let already_known = conversation
                .messages
                .iter()
                .any(|m| m.sender == sender && m.content == turn.content);
            if !already_known {
                let mut message = match sender {
                    Sender::User => Message::user(turn.content.clone()),
                    Sender::Ai => Message::ai(MessageKind::Text, turn.content.clone()),
                };
                // Millisecond ids collide within one sync batch; spread them.
                message.id += appended as i64;
                conversation.messages.push(message);
                appended += 1;
            }
        }

        if appended > 0 {
            debug!(
                conversation_id = id,
                appended, "synced client history into canonical store"
            );
            conversation.last_message_at = Utc::now();
        }
        appended
    }

    async fn history(&self, id: &str) -> Vec<PromptMessage> {
        self.conversations
            .read()
            .await
            .get(id)
            .map(|conversation| {
                conversation
                    .messages
                    .iter()
                    .map(|message| PromptMessage {
                        role: message.sender.into(),
                        content: message.content.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn record_ai_reply(&self, id: &str, envelope: &ResponseEnvelope) -> Option<String> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .entry(id.to_string())
            .or_insert_with(|| Conversation::new(id));

        let reply = Message::ai(envelope.kind, envelope.message.clone());
        conversation.last_message_at = reply.timestamp;
        conversation.messages.push(reply);

        if conversation.title_generated || conversation.user_message_count() != 1 {
            return None;
        }

        let user_content = conversation
            .last_user_message()
            .map(|m| m.content.clone())?;
        let title = title_generator::generate_title(&user_content, &envelope.message);
        conversation.title = title.clone();
        conversation.title_generated = true;
        debug!(conversation_id = id, title = %title, "conversation titled");
        Some(title)
    }
}
