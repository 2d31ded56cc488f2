//! HTTP surface: the WebSocket endpoint and a health check.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::relay::ChatRelay;
use crate::session::ws_handler;

/// Health check payload.
#[derive(Serialize)]
pub struct Health {
    pub status: String,
    pub active_sessions: usize,
}

/// Build the router with all routes.
pub fn router() -> Router<Arc<ChatRelay>> {
    Router::new()
        // Clients connect straight to the root path.
        .route("/", get(ws_handler))
        .route("/health", get(health))
}

/// Health check endpoint.
async fn health(State(relay): State<Arc<ChatRelay>>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        active_sessions: relay.session_count().await,
    })
}
