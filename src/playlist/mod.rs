//! Playlist collaborator
//!
//! Owns the ordered track collection and the cursor denoting the currently
//! selected track. The player engine holds a shared handle and drives the
//! cursor; HTTP CRUD handlers reach the same collection directly. All
//! synchronization lives inside the implementations, not in the callers.
//!
//! Two backends:
//! - [`memory::MemoryPlaylist`]: in-memory only, state is lost on shutdown
//! - [`file::FilePlaylist`]: wraps the memory backend, restores a JSON
//!   snapshot at startup and writes one back on close

pub mod file;
pub mod memory;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// A single playlist entry
///
/// Immutable once stored except through [`Playlist::update`]. `duration_ms`
/// is the full simulated length of the track in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Track UUID, assigned by the playlist on add
    pub id: Uuid,

    /// Display name; duplicates are allowed
    pub name: String,

    /// Track length in milliseconds
    pub duration_ms: u64,
}

/// Ordered track collection with a movable cursor
///
/// CRUD operations never move the cursor; cursor navigation never modifies
/// the collection. Moving past either end leaves the cursor detached (no
/// wraparound). Implementations must reject `update`/`delete` of the track
/// the cursor points at, so a selected track is never mutated under the
/// engine.
pub trait Playlist: Send + Sync {
    /// Append a new track, assigning it a fresh id
    fn add(&self, name: String, duration_ms: u64) -> Track;

    /// Look up a track by id
    fn get(&self, id: Uuid) -> Result<Track>;

    /// Replace the stored track with the same id
    fn update(&self, track: Track) -> Result<Track>;

    /// Remove a track by id; removing an absent id is not an error
    fn delete(&self, id: Uuid) -> Result<()>;

    /// All tracks in collection order
    fn list(&self) -> Vec<Track>;

    /// Track at the cursor, if any
    fn current(&self) -> Option<Track>;

    /// First track in the collection, if any
    fn front(&self) -> Option<Track>;

    /// Last track in the collection, if any
    fn back(&self) -> Option<Track>;

    /// Move the cursor to the front; returns the new current track
    fn cursor_to_front(&self) -> Option<Track>;

    /// Move the cursor one step forward; detaches past the last track
    fn cursor_to_next(&self) -> Option<Track>;

    /// Move the cursor one step backward; detaches before the first track
    fn cursor_to_prev(&self) -> Option<Track>;

    /// Flush and finalize the backend; called once by the engine's close
    fn close(&self) -> Result<()>;
}
