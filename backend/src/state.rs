use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::errors::AppError;
use crate::llm::{AiClient, OllamaClient};
use crate::location::LocationContextBuilder;
use crate::maps::{GoogleMapsClient, MapsClient};
use crate::services::conversation_store::{ConversationRepository, InMemoryConversationStore};
use crate::services::dialog_router::DialogRouter;

// --- Shared application state ---
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub conversations: Arc<dyn ConversationRepository>,
    pub dialog_router: Arc<DialogRouter>,
    pub started_at: Instant,
}

impl AppState {
    /// Wires the production collaborators from configuration.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let config = Arc::new(config);

        let ai: Arc<dyn AiClient> = Arc::new(OllamaClient::new(
            config.ollama_base_url.clone(),
            Duration::from_secs(config.llm_timeout_seconds),
        )?);

        let maps: Option<Arc<dyn MapsClient>> = config
            .google_maps_api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .map(|key| {
                Arc::new(GoogleMapsClient::new(
                    config.google_maps_base_url.clone(),
                    key.clone(),
                )) as Arc<dyn MapsClient>
            });

        Ok(Self::with_clients(
            config,
            ai,
            maps,
            Arc::new(InMemoryConversationStore::new()),
        ))
    }

    /// Assembles state from explicit collaborators; tests inject mocks here.
    pub fn with_clients(
        config: Arc<Config>,
        ai: Arc<dyn AiClient>,
        maps: Option<Arc<dyn MapsClient>>,
        conversations: Arc<dyn ConversationRepository>,
    ) -> Self {
        let context_builder = LocationContextBuilder::new(maps);
        let dialog_router = Arc::new(DialogRouter::new(
            ai,
            config.ollama_model.clone(),
            context_builder,
        ));

        Self {
            config,
            conversations,
            dialog_router,
            started_at: Instant::now(),
        }
    }
}
