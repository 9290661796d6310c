//! Destination catalog abstraction
//!
//! The write side of a migration: searching the destination service
//! and mutating its playlists. Implementations translate these calls
//! into service API requests and classify raw results into
//! [`Candidate`] values; no matching logic lives behind this trait.

use async_trait::async_trait;
use core_model::{Candidate, DestTrackId, PlaylistHandle, PlaylistId, RemotePlaylist};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::Result;

/// Which result classes a search should return
///
/// The stricter match tiers only consider album tracks; the loosest
/// tier deliberately widens the net to official videos and user
/// uploads to cover catalog gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    /// Album tracks only
    Songs,
    /// Album tracks plus videos and user uploads
    SongsAndVideos,
}

/// Authentication state of the catalog session
///
/// Session acquisition is the host's problem; the engine only needs to
/// know whether calls will be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    Authenticated,
    Expired,
    Missing,
}

impl AuthState {
    pub fn is_usable(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }
}

/// Client for the destination streaming catalog
///
/// Search results come back in the service's own relevance order; that
/// ranking is treated as an external heuristic and is never re-derived
/// on this side.
#[async_trait]
pub trait DestinationCatalog: Send + Sync {
    /// Search the catalog for candidates matching a free-text query
    ///
    /// Returns at most `limit` results, in the service's ranking order.
    ///
    /// # Errors
    ///
    /// `Transient` for network/throttling/5xx failures (retryable),
    /// `Permanent` for malformed queries, `Auth` when the session is
    /// rejected.
    async fn search(
        &self,
        query: &str,
        scope: SearchScope,
        limit: u32,
    ) -> Result<Vec<Candidate>>;

    /// Fetch the full membership of a playlist as a set of handles
    ///
    /// Called once per sync run to seed dedup/resume; implementations
    /// should page through the playlist however the service requires.
    async fn playlist_members(&self, playlist: &PlaylistHandle) -> Result<HashSet<DestTrackId>>;

    /// Add a single track to a playlist
    ///
    /// # Errors
    ///
    /// `Duplicate` when the service refuses because the track is
    /// already present (callers treat this as success).
    async fn add_track(&self, playlist: &PlaylistHandle, track: &DestTrackId) -> Result<()>;

    /// List the user's playlists on the destination service
    async fn list_playlists(&self) -> Result<Vec<RemotePlaylist>>;

    /// Create a playlist and return its handle
    async fn create_playlist(&self, name: &str, description: &str) -> Result<PlaylistId>;

    /// Current session state, checked before a job starts
    async fn auth_state(&self) -> AuthState;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_state_usability() {
        assert!(AuthState::Authenticated.is_usable());
        assert!(!AuthState::Expired.is_usable());
        assert!(!AuthState::Missing.is_usable());
    }
}
