//! Remote handle types
//!
//! The destination service owns its identifier namespace, so handles
//! are opaque string newtypes rather than UUIDs. A handle is only ever
//! obtained from the service itself (search results, playlist
//! listings) and passed back unmodified.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle for a track on the destination service
///
/// Usable for playlist mutation; carries no metadata of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestTrackId(String);

impl DestTrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DestTrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DestTrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque handle for a named playlist on the destination service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PlaylistId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Target collection for additions on the destination service
///
/// The liked-songs collection has no playlist id of its own; modeling
/// it as a handle variant lets membership fetches and additions flow
/// through the same code path as named playlists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaylistHandle {
    /// The user's liked-songs collection
    Liked,
    /// A named playlist
    Playlist(PlaylistId),
}

impl PlaylistHandle {
    pub fn is_liked(&self) -> bool {
        matches!(self, PlaylistHandle::Liked)
    }

    /// Stable key for per-destination bookkeeping (job guards, logs)
    pub fn key(&self) -> String {
        match self {
            PlaylistHandle::Liked => "liked".to_string(),
            PlaylistHandle::Playlist(id) => id.as_str().to_string(),
        }
    }
}

impl fmt::Display for PlaylistHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaylistHandle::Liked => write!(f, "liked songs"),
            PlaylistHandle::Playlist(id) => write!(f, "playlist {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dest_track_id_roundtrip() {
        let id = DestTrackId::new("dQw4w9WgXcQ");
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
        assert_eq!(id.to_string(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_handle_keys_are_distinct() {
        let liked = PlaylistHandle::Liked;
        let named = PlaylistHandle::Playlist(PlaylistId::new("PL123"));
        assert_ne!(liked.key(), named.key());
        assert!(liked.is_liked());
        assert!(!named.is_liked());
    }

    #[test]
    fn test_serde_transparent() {
        let id = DestTrackId::new("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
    }
}
