//! neurax-signaling server entry point.
//!
//! Starts the Axum HTTP server with the health endpoint and the
//! WebSocket signaling endpoint.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use neurax_signaling::api;
use neurax_signaling::app_state::AppState;
use neurax_signaling::config::SignalingConfig;
use neurax_signaling::domain::{EventBus, SessionRegistry};
use neurax_signaling::service::SignalingService;
use neurax_signaling::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = SignalingConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting neurax-signaling");

    // Build domain layer
    let registry = Arc::new(SessionRegistry::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build application state
    let app_state = AppState {
        signaling: SignalingService::new(registry, event_bus),
    };

    // Build router. CORS stays permissive: peers connect from arbitrary
    // origins in prototype deployments.
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
