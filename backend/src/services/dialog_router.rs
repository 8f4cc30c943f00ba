//! Intent classification and per-intent dispatch.
//!
//! Every code path terminates in a valid [`ResponseEnvelope`]; collaborator
//! failures degrade to canned text (and, for journey/status turns, the mock
//! structured data still goes out). A single language-model failure fails
//! the turn immediately: there is no retry.

use std::sync::Arc;

use tracing::{instrument, warn};

use crate::llm::{AiClient, PromptMessage};
use crate::location::LocationContextBuilder;
use crate::models::chats::MessageKind;
use crate::models::envelope::ResponseEnvelope;
use crate::models::location::{GeoPoint, CURRENT_LOCATION};
use crate::prompt_builder;
use crate::services::journey_planner::{JourneyPlanner, JourneyPreferences};

const GREETING_PROMPT: &str = "Greet the user as an urban mobility assistant for Pune. \
Be friendly and explain how you can help with transportation planning, status checks, \
and journey coordination.";

const HELP_PROMPT: &str = "Explain your capabilities as an urban mobility assistant for Pune. \
List the specific ways you can help users with transportation including journey planning, \
status checks, multi-modal options, etc.";

const STATUS_QUERY: &str = "Check current transport status";

const GREETING_FALLBACK: &str = "Hello! I'm your urban mobility assistant for Pune. \
I can help you plan journeys using buses, metros, ride-sharing, and bike-sharing services. \
Where would you like to go?";

const HELP_FALLBACK: &str = "I can help you with:\n\
• Journey planning across multiple transport modes\n\
• Real-time transport status and delays\n\
• Route recommendations for buses, metros, ride-sharing, and bike-sharing\n\
• Multi-modal travel coordination\n\n\
Just tell me where you want to go!";

const JOURNEY_FALLBACK: &str = "I've found several journey options for you:";

const STATUS_FALLBACK: &str = "Here's the current transport service status:";

const GENERAL_FALLBACK: &str = "Sorry, I encountered an error. Please try again, \
or ask me about specific transportation routes or service status.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Help,
    Status,
    Journey,
    General,
}

/// First matching rule wins; the order is part of the contract.
/// Greeting keywords match whole words only ("dighi" must not read as "hi");
/// the remaining categories use plain substring tests.
pub fn classify_intent(message: &str) -> Intent {
    let lower = message.to_lowercase();

    let greeting = lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| matches!(word, "hello" | "hi" | "hey"));
    if greeting {
        return Intent::Greeting;
    }
    if lower.contains("help") || lower.contains("what can you do") {
        return Intent::Help;
    }
    if ["status", "delay", "disruption"]
        .iter()
        .any(|k| lower.contains(k))
    {
        return Intent::Status;
    }
    if ["from", "to", "go to", "travel", "journey", "route"]
        .iter()
        .any(|k| lower.contains(k))
    {
        return Intent::Journey;
    }
    Intent::General
}

pub struct DialogRouter {
    ai: Arc<dyn AiClient>,
    model: String,
    context_builder: LocationContextBuilder,
    planner: JourneyPlanner,
}

impl DialogRouter {
    pub fn new(
        ai: Arc<dyn AiClient>,
        model: impl Into<String>,
        context_builder: LocationContextBuilder,
    ) -> Self {
        Self {
            ai,
            model: model.into(),
            context_builder,
            planner: JourneyPlanner::new(),
        }
    }

    /// Handles one user turn. Never fails: the worst case is a canned
    /// fallback envelope.
    #[instrument(skip(self, history), fields(history_len = history.len()))]
    pub async fn handle(
        &self,
        message: &str,
        history: &[PromptMessage],
        user_location: Option<GeoPoint>,
    ) -> ResponseEnvelope {
        match classify_intent(message) {
            Intent::Greeting => self.canned_persona_reply(GREETING_PROMPT, GREETING_FALLBACK).await,
            Intent::Help => self.canned_persona_reply(HELP_PROMPT, HELP_FALLBACK).await,
            Intent::Status => self.handle_status(message, user_location).await,
            Intent::Journey => self.handle_journey(message, history, user_location).await,
            Intent::General => self.handle_general(message, history, user_location).await,
        }
    }

    /// Dedicated path for the explicit journey endpoints (`/api/journey`,
    /// `plan_journey` socket event), which carry structured origin,
    /// destination and preferences instead of free text.
    pub async fn handle_journey_request(
        &self,
        origin: &str,
        destination: &str,
        preferences: &JourneyPreferences,
        user_location: Option<GeoPoint>,
    ) -> ResponseEnvelope {
        let message = format!("Plan a journey from {origin} to {destination}");
        let context = self.context_builder.build(&message, user_location).await;
        let messages = prompt_builder::build_messages(&message, &[], Some(&context));

        let plan = self.planner.plan_journey(origin, destination, preferences);
        let data = serde_json::to_value(&plan).ok();

        match self.ai.exec_chat(&self.model, &messages).await {
            Ok(reply) => ResponseEnvelope {
                kind: MessageKind::JourneyPlan,
                message: reply,
                data,
                location_context: Some(context),
            },
            Err(err) => {
                warn!(error = %err, "language model unavailable for journey request");
                ResponseEnvelope {
                    kind: MessageKind::JourneyPlan,
                    message: JOURNEY_FALLBACK.to_string(),
                    data,
                    location_context: None,
                }
            }
        }
    }

    async fn canned_persona_reply(&self, prompt: &str, fallback: &str) -> ResponseEnvelope {
        let messages = prompt_builder::build_messages(prompt, &[], None);
        match self.ai.exec_chat(&self.model, &messages).await {
            Ok(reply) => ResponseEnvelope::text(reply),
            Err(err) => {
                warn!(error = %err, "language model unavailable, using canned reply");
                ResponseEnvelope::text(fallback)
            }
        }
    }

    async fn handle_journey(
        &self,
        message: &str,
        history: &[PromptMessage],
        user_location: Option<GeoPoint>,
    ) -> ResponseEnvelope {
        let context = self.context_builder.build(message, user_location).await;
        let messages = prompt_builder::build_messages(message, history, Some(&context));

        let origin = context
            .extracted_locations
            .origin
            .clone()
            .unwrap_or_else(|| CURRENT_LOCATION.to_string());
        let destination = context
            .extracted_locations
            .destination
            .clone()
            .unwrap_or_else(|| "Destination".to_string());
        let plan =
            self.planner
                .plan_journey(&origin, &destination, &JourneyPreferences::default());
        let data = serde_json::to_value(&plan).ok();

        match self.ai.exec_chat(&self.model, &messages).await {
            Ok(reply) => ResponseEnvelope {
                kind: MessageKind::JourneyPlan,
                message: reply,
                data,
                location_context: Some(context),
            },
            Err(err) => {
                warn!(error = %err, "language model unavailable for journey planning");
                ResponseEnvelope {
                    kind: MessageKind::JourneyPlan,
                    message: JOURNEY_FALLBACK.to_string(),
                    data,
                    location_context: None,
                }
            }
        }
    }

    async fn handle_status(
        &self,
        message: &str,
        user_location: Option<GeoPoint>,
    ) -> ResponseEnvelope {
        let context = self.context_builder.build(message, user_location).await;
        let messages = prompt_builder::build_messages(STATUS_QUERY, &[], Some(&context));

        let status = self.planner.transport_status();
        let data = serde_json::to_value(&status).ok();

        match self.ai.exec_chat(&self.model, &messages).await {
            Ok(reply) => ResponseEnvelope {
                kind: MessageKind::TransportStatus,
                message: reply,
                data,
                location_context: None,
            },
            Err(err) => {
                warn!(error = %err, "language model unavailable for status check");
                ResponseEnvelope {
                    kind: MessageKind::TransportStatus,
                    message: STATUS_FALLBACK.to_string(),
                    data,
                    location_context: None,
                }
            }
        }
    }

    async fn handle_general(
        &self,
        message: &str,
        history: &[PromptMessage],
        user_location: Option<GeoPoint>,
    ) -> ResponseEnvelope {
        let context = self.context_builder.build(message, user_location).await;
        let messages = prompt_builder::build_messages(message, history, Some(&context));

        match self.ai.exec_chat(&self.model, &messages).await {
            Ok(reply) => ResponseEnvelope {
                kind: MessageKind::Text,
                message: reply,
                data: None,
                location_context: Some(context),
            },
            Err(err) => {
                warn!(error = %err, "language model unavailable for general query");
                ResponseEnvelope::text(GENERAL_FALLBACK)
            }
        }
    }
}
