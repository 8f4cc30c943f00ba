use axum::extract::State;
use axum::Json;
use serde::Serialize;
use sysinfo::System;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub features: HealthFeatures,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthFeatures {
    pub ollama: bool,
    pub location_aware: bool,
    pub google_maps: bool,
}

/// Simple health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    tracing::debug!("Health check endpoint called");
    Json(HealthStatus {
        status: "OK".to_string(),
        message: "Urban Mobility API with Ollama and Location Services is running".to_string(),
        features: HealthFeatures {
            ollama: true,
            location_aware: true,
            google_maps: state.config.maps_enabled(),
        },
    })
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub uptime: u64,
    pub memory: MemoryUsage,
    pub features: StatusFeatures,
    pub endpoints: StatusEndpoints,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub resident_bytes: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusFeatures {
    pub ollama: bool,
    pub location_services: bool,
    pub google_maps_integration: bool,
    pub web_socket_support: bool,
    pub conversation_history: bool,
}

#[derive(Serialize)]
pub struct StatusEndpoints {
    pub health: String,
    pub chat: String,
    pub journey: String,
    pub status: String,
}

/// Runtime monitoring endpoint: uptime, process memory, feature flags.
pub async fn server_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running".to_string(),
        uptime: state.started_at.elapsed().as_secs(),
        memory: MemoryUsage {
            resident_bytes: current_memory_bytes(),
        },
        features: StatusFeatures {
            ollama: true,
            location_services: true,
            google_maps_integration: state.config.maps_enabled(),
            web_socket_support: true,
            conversation_history: true,
        },
        endpoints: StatusEndpoints {
            health: "/api/health".to_string(),
            chat: "/api/chat".to_string(),
            journey: "/api/journey".to_string(),
            status: "/api/status".to_string(),
        },
    })
}

fn current_memory_bytes() -> u64 {
    let mut system = System::new();
    sysinfo::get_current_pid()
        .ok()
        .and_then(|pid| {
            system.refresh_process(pid);
            system.process(pid).map(|process| process.memory())
        })
        .unwrap_or(0)
}
