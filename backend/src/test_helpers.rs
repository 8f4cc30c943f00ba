// backend/src/test_helpers.rs
// Mock collaborators and app assembly shared by unit and integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm::{AiClient, PromptMessage};
use crate::maps::{MapsClient, RouteEndpoint};
use crate::models::location::{GeoPoint, NamedLocation, NearbyPlace, RouteInfo, TransitLeg};
use crate::routes;
use crate::services::conversation_store::InMemoryConversationStore;
use crate::state::AppState;

#[derive(Clone)]
pub struct MockAiClient {
    response: Arc<Mutex<Result<String, AppError>>>,
    last_messages: Arc<Mutex<Option<Vec<PromptMessage>>>>,
}

impl MockAiClient {
    pub fn replying(reply: &str) -> Self {
        Self {
            response: Arc::new(Mutex::new(Ok(reply.to_string()))),
            last_messages: Arc::new(Mutex::new(None)),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: Arc::new(Mutex::new(Err(AppError::LlmClientError(
                "mock: connection refused".to_string(),
            )))),
            last_messages: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_response(&self, response: Result<String, AppError>) {
        *self.response.lock().expect("mock mutex poisoned") = response;
    }

    pub fn last_messages(&self) -> Option<Vec<PromptMessage>> {
        self.last_messages.lock().expect("mock mutex poisoned").clone()
    }
}

#[async_trait]
impl AiClient for MockAiClient {
    async fn exec_chat(
        &self,
        _model: &str,
        messages: &[PromptMessage],
    ) -> Result<String, AppError> {
        *self.last_messages.lock().expect("mock mutex poisoned") = Some(messages.to_vec());
        self.response.lock().expect("mock mutex poisoned").clone()
    }
}

pub struct MockMapsClient {
    route: Option<RouteInfo>,
    places: Option<Vec<NearbyPlace>>,
    fail: bool,
    last_directions: Mutex<Option<(RouteEndpoint, String)>>,
    last_geocode: Mutex<Option<String>>,
}

impl MockMapsClient {
    pub fn with_canned_data() -> Self {
        Self {
            route: Some(sample_route()),
            places: Some(vec![sample_place("Shivajinagar Bus Stand")]),
            fail: false,
            last_directions: Mutex::new(None),
            last_geocode: Mutex::new(None),
        }
    }

    pub fn with_many_places(count: usize) -> Self {
        let places = (0..count)
            .map(|index| sample_place(&format!("Stop {index}")))
            .collect();
        Self {
            route: Some(sample_route()),
            places: Some(places),
            fail: false,
            last_directions: Mutex::new(None),
            last_geocode: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            route: None,
            places: None,
            fail: true,
            last_directions: Mutex::new(None),
            last_geocode: Mutex::new(None),
        }
    }

    pub fn last_directions_query(&self) -> Option<(RouteEndpoint, String)> {
        self.last_directions
            .lock()
            .expect("mock mutex poisoned")
            .clone()
    }

    pub fn last_geocode_query(&self) -> Option<String> {
        self.last_geocode.lock().expect("mock mutex poisoned").clone()
    }
}

#[async_trait]
impl MapsClient for MockMapsClient {
    async fn transit_directions(
        &self,
        origin: &RouteEndpoint,
        destination: &str,
    ) -> Result<Option<RouteInfo>, AppError> {
        *self.last_directions.lock().expect("mock mutex poisoned") =
            Some((origin.clone(), destination.to_string()));
        if self.fail {
            return Err(AppError::MapsClientError("mock: quota exceeded".to_string()));
        }
        Ok(self.route.clone())
    }

    async fn nearby_transit(
        &self,
        _location: GeoPoint,
    ) -> Result<Option<Vec<NearbyPlace>>, AppError> {
        if self.fail {
            return Err(AppError::MapsClientError("mock: quota exceeded".to_string()));
        }
        Ok(self.places.clone())
    }

    async fn geocode(&self, address: &str) -> Result<Option<NamedLocation>, AppError> {
        *self.last_geocode.lock().expect("mock mutex poisoned") = Some(address.to_string());
        if self.fail {
            return Err(AppError::MapsClientError("mock: quota exceeded".to_string()));
        }
        Ok(Some(NamedLocation {
            point: GeoPoint {
                lat: 18.52,
                lng: 73.85,
            },
            address: address.to_string(),
        }))
    }
}

fn sample_route() -> RouteInfo {
    RouteInfo {
        distance: "12.4 km".to_string(),
        duration: "48 mins".to_string(),
        start_address: "Dighi, Pune".to_string(),
        end_address: "Pune Airport".to_string(),
        transit_details: vec![TransitLeg {
            mode: "BUS".to_string(),
            line_name: "42A".to_string(),
            departure: "Dighi Stop".to_string(),
            arrival: "Airport Stop".to_string(),
            duration: "35 mins".to_string(),
        }],
        alternatives: 2,
    }
}

fn sample_place(name: &str) -> NearbyPlace {
    NearbyPlace {
        name: name.to_string(),
        kind: "bus_station".to_string(),
        rating: Some(4.1),
        vicinity: Some("Shivajinagar".to_string()),
        location: GeoPoint {
            lat: 18.53,
            lng: 73.85,
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub ai: MockAiClient,
    pub conversations: Arc<InMemoryConversationStore>,
}

/// Builds an app wired to mocks. Pass `fail_ai = true` to simulate an
/// unreachable language model.
pub fn spawn_app(fail_ai: bool) -> TestApp {
    let ai = if fail_ai {
        MockAiClient::failing()
    } else {
        MockAiClient::replying("Mock AI response")
    };
    build_app(ai, None)
}

pub fn build_app(ai: MockAiClient, maps: Option<Arc<dyn MapsClient>>) -> TestApp {
    let config = Arc::new(Config::default());
    let conversations = Arc::new(InMemoryConversationStore::new());
    let state = AppState::with_clients(
        config,
        Arc::new(ai.clone()),
        maps,
        conversations.clone(),
    );
    let router = routes::api_router().with_state(state.clone());

    TestApp {
        router,
        state,
        ai,
        conversations,
    }
}
