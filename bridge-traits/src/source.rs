//! Source library abstraction
//!
//! The read side of a migration: the user's exported library, already
//! parsed by the host into track values. Backup formats and parsing
//! live outside the engine; tests use in-memory implementations.

use async_trait::async_trait;
use core_model::{SourcePlaylist, Track};

use crate::error::Result;

/// Provider of source-library track sequences
///
/// Collections are finite and restartable: calling the same accessor
/// again yields the same tracks in the same order (the export is a
/// snapshot, not a live feed).
#[async_trait]
pub trait SourceLibrary: Send + Sync {
    /// Enumerate the playlists in the export
    async fn playlists(&self) -> Result<Vec<SourcePlaylist>>;

    /// All tracks of one playlist, in playlist order
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>>;

    /// The liked-songs collection, in export order
    async fn liked_tracks(&self) -> Result<Vec<Track>>;
}
