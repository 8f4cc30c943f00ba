use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

use citycompass_backend::config::Config;
use citycompass_backend::logging::init_subscriber;
use citycompass_backend::routes;
use citycompass_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_subscriber();

    tracing::info!("Starting CityCompass backend server...");

    let config = Config::load().context("failed to load configuration")?;
    tracing::debug!(?config, "configuration loaded");

    let cors_origin: HeaderValue = config
        .cors_allowed_origin
        .parse()
        .context("invalid CORS_ALLOWED_ORIGIN")?;
    let port = config.port;

    let state = AppState::new(config)?;

    let app = routes::api_router()
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(cors_origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);
    tracing::info!("Health check: http://localhost:{}/api/health", port);
    tracing::info!("Status dashboard: http://localhost:{}/api/status", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
