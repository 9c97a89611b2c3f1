//! In-memory playlist backend
//!
//! Vec-backed ordered collection with an index cursor, guarded by a
//! `std::sync::RwLock`: many concurrent readers for list/get, exclusive
//! access for mutations and cursor moves. Critical sections are short and
//! never await, so the sync lock is safe to use from async callers.

use std::sync::RwLock;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::playlist::{Playlist, Track};

#[derive(Debug, Default)]
struct Inner {
    tracks: Vec<Track>,
    /// Index of the current track; `None` means the cursor is detached
    cursor: Option<usize>,
}

impl Inner {
    fn current_id(&self) -> Option<Uuid> {
        self.cursor.map(|i| self.tracks[i].id)
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }
}

/// Playlist backend holding all state in memory
#[derive(Debug, Default)]
pub struct MemoryPlaylist {
    inner: RwLock<Inner>,
}

impl MemoryPlaylist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection, detaching the cursor
    ///
    /// Used by the file backend to replay a restored snapshot.
    pub fn set_all(&self, tracks: Vec<Track>) {
        let mut inner = self.inner.write().unwrap();
        inner.tracks = tracks;
        inner.cursor = None;
    }
}

impl Playlist for MemoryPlaylist {
    fn add(&self, name: String, duration_ms: u64) -> Track {
        info!("Add track: {}", name);

        let track = Track {
            id: Uuid::new_v4(),
            name,
            duration_ms,
        };
        self.inner.write().unwrap().tracks.push(track.clone());
        track
    }

    fn get(&self, id: Uuid) -> Result<Track> {
        debug!("Get track: {}", id);

        let inner = self.inner.read().unwrap();
        inner
            .position(id)
            .map(|i| inner.tracks[i].clone())
            .ok_or(Error::TrackNotFound(id))
    }

    fn update(&self, track: Track) -> Result<Track> {
        info!("Update track: {}", track.id);

        let mut inner = self.inner.write().unwrap();
        if inner.current_id() == Some(track.id) {
            return Err(Error::CurrentTrack(track.id));
        }
        match inner.position(track.id) {
            Some(i) => {
                inner.tracks[i] = track.clone();
                Ok(track)
            }
            None => Err(Error::TrackNotFound(track.id)),
        }
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        info!("Delete track: {}", id);

        let mut inner = self.inner.write().unwrap();
        if inner.current_id() == Some(id) {
            return Err(Error::CurrentTrack(id));
        }
        if let Some(i) = inner.position(id) {
            inner.tracks.remove(i);
            // Removing an entry before the cursor shifts the current track
            // down by one; the cursor follows it.
            if let Some(c) = inner.cursor {
                if i < c {
                    inner.cursor = Some(c - 1);
                }
            }
        }
        Ok(())
    }

    fn list(&self) -> Vec<Track> {
        debug!("List tracks");
        self.inner.read().unwrap().tracks.clone()
    }

    fn current(&self) -> Option<Track> {
        let inner = self.inner.read().unwrap();
        inner.cursor.map(|i| inner.tracks[i].clone())
    }

    fn front(&self) -> Option<Track> {
        self.inner.read().unwrap().tracks.first().cloned()
    }

    fn back(&self) -> Option<Track> {
        self.inner.read().unwrap().tracks.last().cloned()
    }

    fn cursor_to_front(&self) -> Option<Track> {
        let mut inner = self.inner.write().unwrap();
        inner.cursor = if inner.tracks.is_empty() {
            None
        } else {
            Some(0)
        };
        inner.cursor.map(|i| inner.tracks[i].clone())
    }

    fn cursor_to_next(&self) -> Option<Track> {
        let mut inner = self.inner.write().unwrap();
        inner.cursor = match inner.cursor {
            Some(i) if i + 1 < inner.tracks.len() => Some(i + 1),
            // Detached cursors stay detached; past the end detaches
            _ => None,
        };
        inner.cursor.map(|i| inner.tracks[i].clone())
    }

    fn cursor_to_prev(&self) -> Option<Track> {
        let mut inner = self.inner.write().unwrap();
        inner.cursor = match inner.cursor {
            Some(i) if i > 0 => Some(i - 1),
            _ => None,
        };
        inner.cursor.map(|i| inner.tracks[i].clone())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist_with(names: &[&str]) -> MemoryPlaylist {
        let pl = MemoryPlaylist::new();
        for name in names {
            pl.add(name.to_string(), 1000);
        }
        pl
    }

    #[test]
    fn add_assigns_unique_ids_and_preserves_order() {
        let pl = playlist_with(&["a", "b", "a"]);

        let tracks = pl.list();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].name, "a");
        assert_eq!(tracks[1].name, "b");
        assert_eq!(tracks[2].name, "a");
        assert_ne!(tracks[0].id, tracks[2].id);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let pl = playlist_with(&["a"]);
        let missing = Uuid::new_v4();

        assert!(matches!(pl.get(missing), Err(Error::TrackNotFound(id)) if id == missing));
    }

    #[test]
    fn cursor_starts_detached_and_walks_without_wrapping() {
        let pl = playlist_with(&["a", "b"]);

        assert!(pl.current().is_none());
        // A detached cursor does not attach on next/prev
        assert!(pl.cursor_to_next().is_none());
        assert!(pl.cursor_to_prev().is_none());

        assert_eq!(pl.cursor_to_front().unwrap().name, "a");
        assert_eq!(pl.cursor_to_next().unwrap().name, "b");
        // Walking past the back detaches instead of wrapping
        assert!(pl.cursor_to_next().is_none());

        assert_eq!(pl.cursor_to_front().unwrap().name, "a");
        assert!(pl.cursor_to_prev().is_none());
    }

    #[test]
    fn cursor_to_front_on_empty_collection_stays_detached() {
        let pl = MemoryPlaylist::new();
        assert!(pl.cursor_to_front().is_none());
        assert!(pl.current().is_none());
    }

    #[test]
    fn update_replaces_fields_in_place() {
        let pl = playlist_with(&["a", "b"]);
        let mut track = pl.list()[0].clone();
        track.name = "a2".to_string();
        track.duration_ms = 42;

        let updated = pl.update(track.clone()).unwrap();
        assert_eq!(updated, track);
        assert_eq!(pl.list()[0], track);
        assert_eq!(pl.list()[1].name, "b");
    }

    #[test]
    fn update_and_delete_of_current_track_are_rejected() {
        let pl = playlist_with(&["a", "b"]);
        let current = pl.cursor_to_front().unwrap();

        let res = pl.update(current.clone());
        assert!(matches!(res, Err(Error::CurrentTrack(id)) if id == current.id));

        let res = pl.delete(current.id);
        assert!(matches!(res, Err(Error::CurrentTrack(id)) if id == current.id));

        // Collection untouched either way
        assert_eq!(pl.list().len(), 2);
        assert_eq!(pl.current().unwrap(), current);
    }

    #[test]
    fn delete_is_idempotent_for_unknown_ids() {
        let pl = playlist_with(&["a"]);
        assert!(pl.delete(Uuid::new_v4()).is_ok());
        assert_eq!(pl.list().len(), 1);
    }

    #[test]
    fn delete_before_cursor_keeps_current_track() {
        let pl = playlist_with(&["a", "b", "c"]);
        pl.cursor_to_front();
        pl.cursor_to_next();
        let current = pl.current().unwrap();
        assert_eq!(current.name, "b");

        let front = pl.front().unwrap();
        pl.delete(front.id).unwrap();

        assert_eq!(pl.current().unwrap(), current);
        assert_eq!(pl.cursor_to_next().unwrap().name, "c");
    }

    #[test]
    fn set_all_replaces_contents_and_detaches_cursor() {
        let pl = playlist_with(&["a"]);
        pl.cursor_to_front();

        let replacement = vec![Track {
            id: Uuid::new_v4(),
            name: "z".to_string(),
            duration_ms: 7,
        }];
        pl.set_all(replacement.clone());

        assert_eq!(pl.list(), replacement);
        assert!(pl.current().is_none());
    }
}
