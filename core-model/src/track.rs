//! Track and candidate values

use crate::ids::{DestTrackId, PlaylistId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A track from the source library
///
/// Immutable once constructed. The engine derives normalized
/// comparison data from these fields on demand and never writes
/// anything back onto the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Track title as exported by the source service
    pub title: String,
    /// First-credited artist
    pub primary_artist: String,
    /// Remaining credited artists, in source order
    #[serde(default)]
    pub additional_artists: Vec<String>,
    /// Album title, when the export carries one
    pub album: Option<String>,
    /// Track length, when the export carries one
    pub duration: Option<Duration>,
    /// The source service's identifier, kept for report correlation
    pub source_id: Option<String>,
}

impl Track {
    pub fn new(title: impl Into<String>, primary_artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            primary_artist: primary_artist.into(),
            additional_artists: Vec::new(),
            album: None,
            duration: None,
            source_id: None,
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_additional_artists(mut self, artists: Vec<String>) -> Self {
        self.additional_artists = artists;
        self
    }

    pub fn with_source_id(mut self, id: impl Into<String>) -> Self {
        self.source_id = Some(id.into());
        self
    }

    /// Human-readable "Artist - Title" label for logs and reports
    pub fn label(&self) -> String {
        format!("{} - {}", self.primary_artist, self.title)
    }
}

/// Classification of a destination search result
///
/// The destination catalog mixes album tracks with official videos and
/// user uploads; the stricter match tiers only accept album tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// Studio/album recording
    Song,
    /// Official video or live performance
    Video,
    /// User-uploaded content
    UserUpload,
}

impl ResultKind {
    /// Whether this is an official studio recording
    pub fn is_official_recording(&self) -> bool {
        matches!(self, ResultKind::Song)
    }
}

/// A destination search result: a track plus the handle to add it with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub track: Track,
    /// Handle usable for playlist mutation on the destination
    pub destination_id: DestTrackId,
    pub result_kind: ResultKind,
}

impl Candidate {
    pub fn new(track: Track, destination_id: DestTrackId, result_kind: ResultKind) -> Self {
        Self {
            track,
            destination_id,
            result_kind,
        }
    }
}

/// A playlist on the destination service, as returned by listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePlaylist {
    pub id: PlaylistId,
    pub name: String,
    pub track_count: Option<u32>,
}

/// A playlist in the source library, as enumerated by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePlaylist {
    pub id: String,
    pub name: String,
    pub track_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_builder() {
        let track = Track::new("Karma Police", "Radiohead")
            .with_album("OK Computer")
            .with_duration(Duration::from_secs(261))
            .with_source_id("spotify:track:63OQupATfueTdZMWTxW03A");

        assert_eq!(track.title, "Karma Police");
        assert_eq!(track.primary_artist, "Radiohead");
        assert_eq!(track.album.as_deref(), Some("OK Computer"));
        assert_eq!(track.duration, Some(Duration::from_secs(261)));
        assert_eq!(track.label(), "Radiohead - Karma Police");
    }

    #[test]
    fn test_result_kind_official() {
        assert!(ResultKind::Song.is_official_recording());
        assert!(!ResultKind::Video.is_official_recording());
        assert!(!ResultKind::UserUpload.is_official_recording());
    }
}
