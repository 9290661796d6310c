//! YouTube Music API response types
//!
//! Data structures for deserializing YouTube Music web API responses.
//! The service tags each search result with a video type; those tags
//! drive the engine's result-kind classification.

use serde::{Deserialize, Serialize};

/// Album-track results ("songs" in the service's own vocabulary)
pub const VIDEO_TYPE_TRACK: &str = "MUSIC_VIDEO_TYPE_ATV";

/// Official music videos
pub const VIDEO_TYPE_OFFICIAL_VIDEO: &str = "MUSIC_VIDEO_TYPE_OMV";

/// User-uploaded content
pub const VIDEO_TYPE_USER_UPLOAD: &str = "MUSIC_VIDEO_TYPE_UGC";

/// Artist reference on a search result or playlist item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Album reference on a search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// One search result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    /// Handle usable for playlist mutation
    pub video_id: String,

    pub title: String,

    #[serde(default)]
    pub artists: Vec<ArtistRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<AlbumRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,

    /// Result category as reported by search ("song", "video")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<String>,

    /// Fine-grained video type tag (see the `VIDEO_TYPE_*` constants)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_type: Option<String>,
}

/// Search response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchItem>,
}

/// One member of a playlist page
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub video_id: String,
}

/// One page of playlist members
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemsResponse {
    #[serde(default)]
    pub tracks: Vec<PlaylistItem>,

    /// Opaque token for the next page, absent on the last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation: Option<String>,
}

/// One of the user's playlists
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEntry {
    pub playlist_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// Playlist listing response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistsResponse {
    #[serde(default)]
    pub playlists: Vec<PlaylistEntry>,
}

/// Playlist creation response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistResponse {
    pub playlist_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_search_item() {
        let json = r#"{
            "videoId": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "artists": [{"name": "Rick Astley", "id": "UC123"}],
            "album": {"name": "Whenever You Need Somebody"},
            "durationSeconds": 213,
            "resultType": "song",
            "videoType": "MUSIC_VIDEO_TYPE_ATV"
        }"#;

        let item: SearchItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.video_id, "dQw4w9WgXcQ");
        assert_eq!(item.artists[0].name, "Rick Astley");
        assert_eq!(item.duration_seconds, Some(213));
        assert_eq!(item.video_type.as_deref(), Some(VIDEO_TYPE_TRACK));
    }

    #[test]
    fn test_deserialize_playlist_items_page() {
        let json = r#"{
            "tracks": [{"videoId": "abc"}, {"videoId": "def"}],
            "continuation": "token-2"
        }"#;

        let page: PlaylistItemsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.tracks.len(), 2);
        assert_eq!(page.continuation.as_deref(), Some("token-2"));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"videoId": "abc", "title": "Untitled"}"#;
        let item: SearchItem = serde_json::from_str(json).unwrap();
        assert!(item.artists.is_empty());
        assert!(item.album.is_none());
        assert!(item.video_type.is_none());
    }
}
