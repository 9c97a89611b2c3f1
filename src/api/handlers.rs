//! HTTP request handlers
//!
//! Implements the playback control and track catalog endpoints. Engine and
//! playlist errors come back verbatim from the core and are mapped to
//! status codes here, at the transport boundary.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::api::AppState;
use crate::error::Error;
use crate::player::PlayerState;
use crate::playlist::Track;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: String,
}

#[derive(Debug, Serialize)]
pub struct PlaybackResponse {
    state: PlayerState,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    state: PlayerState,
    current_track: Option<Track>,
}

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    name: String,
    duration_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct TrackListResponse {
    tracks: Vec<Track>,
}

type ErrorResponse = (StatusCode, Json<StatusResponse>);

/// Map a core error to its transport status code
fn error_status(e: &Error) -> StatusCode {
    match e {
        Error::NoTrack | Error::TrackNotFound(_) => StatusCode::NOT_FOUND,
        Error::CurrentTrack(_) | Error::PlayerClosed => StatusCode::CONFLICT,
        Error::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(e: Error) -> ErrorResponse {
    error!("Request failed: {}", e);
    (
        error_status(&e),
        Json(StatusResponse {
            status: format!("error: {}", e),
        }),
    )
}

// ============================================================================
// Playback Control Endpoints
// ============================================================================

/// POST /playback/play - Start or resume playback
pub async fn play(State(state): State<AppState>) -> Result<Json<PlaybackResponse>, ErrorResponse> {
    state.player.play().await.map_err(error_response)?;
    Ok(Json(PlaybackResponse {
        state: state.player.state(),
    }))
}

/// POST /playback/pause - Pause playback
pub async fn pause(State(state): State<AppState>) -> Result<Json<PlaybackResponse>, ErrorResponse> {
    state.player.pause().await.map_err(error_response)?;
    Ok(Json(PlaybackResponse {
        state: state.player.state(),
    }))
}

/// POST /playback/next - Skip to the next track
pub async fn next(State(state): State<AppState>) -> Result<Json<PlaybackResponse>, ErrorResponse> {
    state.player.next().await.map_err(error_response)?;
    Ok(Json(PlaybackResponse {
        state: state.player.state(),
    }))
}

/// POST /playback/previous - Skip to the previous track
pub async fn previous(
    State(state): State<AppState>,
) -> Result<Json<PlaybackResponse>, ErrorResponse> {
    state.player.prev().await.map_err(error_response)?;
    Ok(Json(PlaybackResponse {
        state: state.player.state(),
    }))
}

/// GET /playback/state - Current player state and track
pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    Json(StateResponse {
        state: state.player.state(),
        current_track: state.player.playlist().current(),
    })
}

// ============================================================================
// Track Catalog Endpoints
// ============================================================================

/// POST /tracks - Add a track to the playlist
pub async fn create_track(
    State(state): State<AppState>,
    Json(req): Json<TrackRequest>,
) -> (StatusCode, Json<Track>) {
    let track = state.player.playlist().add(req.name, req.duration_ms);
    (StatusCode::CREATED, Json(track))
}

/// GET /tracks - List all tracks in playlist order
pub async fn list_tracks(State(state): State<AppState>) -> Json<TrackListResponse> {
    Json(TrackListResponse {
        tracks: state.player.playlist().list(),
    })
}

/// GET /tracks/{id} - Fetch one track
pub async fn get_track(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Track>, ErrorResponse> {
    let track = state.player.playlist().get(id).map_err(error_response)?;
    Ok(Json(track))
}

/// PUT /tracks/{id} - Replace a track's fields
pub async fn update_track(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TrackRequest>,
) -> Result<Json<Track>, ErrorResponse> {
    let track = Track {
        id,
        name: req.name,
        duration_ms: req.duration_ms,
    };
    let updated = state
        .player
        .playlist()
        .update(track)
        .map_err(error_response)?;
    Ok(Json(updated))
}

/// DELETE /tracks/{id} - Remove a track
pub async fn delete_track(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ErrorResponse> {
    state.player.playlist().delete(id).map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
