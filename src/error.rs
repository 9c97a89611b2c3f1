//! Error types for phono
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for the phono service
#[derive(Error, Debug)]
pub enum Error {
    /// No track available at the cursor when playback was requested
    #[error("no track to play")]
    NoTrack,

    /// Command issued after the player was shut down
    #[error("player closed")]
    PlayerClosed,

    /// Requested track does not exist in the playlist
    #[error("track not found: {0}")]
    TrackNotFound(Uuid),

    /// Mutation rejected because the track is the cursor's current track
    #[error("track {0} is the current track")]
    CurrentTrack(Uuid),

    /// Caller's wait on a command reply expired
    #[error("command deadline exceeded")]
    DeadlineExceeded,

    /// Configuration file loading or validation errors
    #[error("configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Playlist snapshot encode/decode errors
    #[error("playlist store error: {0}")]
    Persist(#[from] serde_json::Error),
}

/// Convenience Result type using phono Error
pub type Result<T> = std::result::Result<T, Error>;
