//! REST API for the player service
//!
//! Exposes playback control (routed through the player engine) and playlist
//! CRUD (passed straight to the playlist collaborator).

pub mod handlers;

use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;

use crate::player::Player;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Player engine
    pub player: Arc<Player>,
    /// Server port
    pub port: u16,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check (no prefix for health endpoint)
        .route("/health", get(health_check))
        // API v1 routes
        .nest(
            "/api/v1",
            Router::new()
                // Playback control endpoints
                .route("/playback/play", post(handlers::play))
                .route("/playback/pause", post(handlers::pause))
                .route("/playback/next", post(handlers::next))
                .route("/playback/previous", post(handlers::previous))
                .route("/playback/state", get(handlers::get_state))
                // Track catalog endpoints
                .route(
                    "/tracks",
                    get(handlers::list_tracks).post(handlers::create_track),
                )
                .route(
                    "/tracks/:id",
                    get(handlers::get_track)
                        .put(handlers::update_track)
                        .delete(handlers::delete_track),
                ),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "module": "phono",
        "version": env!("CARGO_PKG_VERSION"),
        "port": state.port,
    }))
}
