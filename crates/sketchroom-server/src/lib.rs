//! SketchRoom WebSocket relay server.
//!
//! Clients join named rooms over `/ws`. Each room holds the authoritative
//! shape list and relays shape edits to every other member. See
//! [`sketchroom_core::protocol`] for the wire format.

pub mod config;
pub mod error;
pub mod rooms;
pub mod router;
pub mod ws;

pub use config::{ServerArgs, ServerConfig};
pub use error::ServerError;
pub use rooms::RoomRegistry;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: RoomRegistry,
}

/// Build the HTTP router around a registry.
pub fn app(registry: RoomRegistry) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ws", get(ws::ws_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { registry })
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!("SketchRoom relay server listening on {addr}");
    info!("WebSocket endpoint: ws://{addr}/ws");

    axum::serve(listener, app(RoomRegistry::new()))
        .await
        .map_err(ServerError::Serve)
}

/// Index page
async fn index() -> &'static str {
    "SketchRoom Relay Server - Connect via WebSocket at /ws"
}

/// Health check
async fn health() -> &'static str {
    "ok"
}
