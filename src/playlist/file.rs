//! File-backed playlist backend
//!
//! Wraps [`MemoryPlaylist`] with a JSON snapshot on disk: the snapshot is an
//! ordered array of track records, replayed into the collection at startup
//! and written back on close. The write goes to a sibling temp file followed
//! by a rename, so a crash mid-write leaves the previous snapshot intact.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::playlist::memory::MemoryPlaylist;
use crate::playlist::{Playlist, Track};

/// Playlist backend persisting to a JSON snapshot file
pub struct FilePlaylist {
    memory: MemoryPlaylist,
    path: PathBuf,
}

impl FilePlaylist {
    /// Open a file-backed playlist
    ///
    /// With `restore` set, replays the snapshot at `path` into the
    /// collection. A missing or empty file restores as an empty collection;
    /// malformed content is a hard error so a corrupt store is never
    /// silently dropped.
    pub fn open(path: impl Into<PathBuf>, restore: bool) -> Result<Self> {
        let playlist = Self {
            memory: MemoryPlaylist::new(),
            path: path.into(),
        };
        if restore {
            playlist.restore()?;
        }
        Ok(playlist)
    }

    fn restore(&self) -> Result<()> {
        info!("Restore playlist from {}", self.path.display());

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "Playlist store {} does not exist, starting empty",
                    self.path.display()
                );
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }

        let tracks: Vec<Track> = serde_json::from_slice(&bytes)?;
        info!("Restored {} tracks", tracks.len());
        self.memory.set_all(tracks);
        Ok(())
    }

    fn save(&self) -> Result<()> {
        info!("Save playlist to {}", self.path.display());

        let tracks = self.memory.list();
        let bytes = serde_json::to_vec_pretty(&tracks)?;

        // Write-then-rename keeps the prior snapshot valid if we crash
        // mid-write.
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Playlist for FilePlaylist {
    fn add(&self, name: String, duration_ms: u64) -> Track {
        self.memory.add(name, duration_ms)
    }

    fn get(&self, id: Uuid) -> Result<Track> {
        self.memory.get(id)
    }

    fn update(&self, track: Track) -> Result<Track> {
        self.memory.update(track)
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        self.memory.delete(id)
    }

    fn list(&self) -> Vec<Track> {
        self.memory.list()
    }

    fn current(&self) -> Option<Track> {
        self.memory.current()
    }

    fn front(&self) -> Option<Track> {
        self.memory.front()
    }

    fn back(&self) -> Option<Track> {
        self.memory.back()
    }

    fn cursor_to_front(&self) -> Option<Track> {
        self.memory.cursor_to_front()
    }

    fn cursor_to_next(&self) -> Option<Track> {
        self.memory.cursor_to_next()
    }

    fn cursor_to_prev(&self) -> Option<Track> {
        self.memory.cursor_to_prev()
    }

    fn close(&self) -> Result<()> {
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_store_restores_empty() {
        let dir = TempDir::new().unwrap();
        let pl = FilePlaylist::open(dir.path().join("playlist.json"), true).unwrap();
        assert!(pl.list().is_empty());
    }

    #[test]
    fn empty_store_restores_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("playlist.json");
        fs::write(&path, "  \n").unwrap();

        let pl = FilePlaylist::open(&path, true).unwrap();
        assert!(pl.list().is_empty());
    }

    #[test]
    fn malformed_store_fails_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("playlist.json");
        fs::write(&path, "{not json").unwrap();

        assert!(FilePlaylist::open(&path, true).is_err());
    }

    #[test]
    fn restore_disabled_ignores_existing_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("playlist.json");
        fs::write(&path, "{not json").unwrap();

        let pl = FilePlaylist::open(&path, false).unwrap();
        assert!(pl.list().is_empty());
    }

    #[test]
    fn close_then_open_round_trips_the_collection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("playlist.json");

        let pl = FilePlaylist::open(&path, true).unwrap();
        pl.add("first".to_string(), 10_000);
        pl.add("second".to_string(), 5_000);
        pl.add("first".to_string(), 7_500);
        let before = pl.list();
        pl.close().unwrap();

        let restored = FilePlaylist::open(&path, true).unwrap();
        assert_eq!(restored.list(), before);
        // The cursor is not part of the snapshot
        assert!(restored.current().is_none());
    }

    #[test]
    fn save_replaces_prior_snapshot_atomically() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("playlist.json");

        let pl = FilePlaylist::open(&path, true).unwrap();
        pl.add("a".to_string(), 1000);
        pl.close().unwrap();

        let pl = FilePlaylist::open(&path, true).unwrap();
        pl.add("b".to_string(), 2000);
        pl.close().unwrap();

        let restored = FilePlaylist::open(&path, true).unwrap();
        let names: Vec<_> = restored.list().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a", "b"]);
        // No stray temp file left behind
        assert!(!dir.path().join("playlist.json.tmp").exists());
    }
}
