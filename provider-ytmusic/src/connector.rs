//! YouTube Music API connector
//!
//! Implements the `DestinationCatalog` trait over the `HttpClient`
//! bridge. Status codes are classified into the bridge error taxonomy
//! here; retry policy lives in the engine's writer, never in this
//! layer.

use async_trait::async_trait;
use bridge_traits::catalog::{AuthState, DestinationCatalog, SearchScope};
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_model::{
    Candidate, DestTrackId, PlaylistHandle, PlaylistId, RemotePlaylist, ResultKind, Track,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, YtMusicError};
use crate::types::{
    CreatePlaylistResponse, PlaylistItemsResponse, PlaylistsResponse, SearchItem, SearchResponse,
    VIDEO_TYPE_OFFICIAL_VIDEO, VIDEO_TYPE_TRACK, VIDEO_TYPE_USER_UPLOAD,
};

/// YouTube Music web API base URL
const YTMUSIC_API_BASE: &str = "https://music.youtube.com/api/v1";

/// Page size for membership listings
const PAGE_SIZE: u32 = 200;

/// Timeout for API requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// YouTube Music API connector
///
/// Carries the session material captured by the host's login flow: the
/// browser cookie and the authorization header derived from it.
pub struct YtMusicConnector {
    http_client: Arc<dyn HttpClient>,
    cookie: String,
    authorization: String,
    base_url: String,
}

impl YtMusicConnector {
    /// Create a new connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP transport implementation
    /// * `cookie` - Authenticated browser session cookie
    /// * `authorization` - Authorization header value derived from the
    ///   session cookie
    pub fn new(http_client: Arc<dyn HttpClient>, cookie: String, authorization: String) -> Self {
        Self {
            http_client,
            cookie,
            authorization,
            base_url: YTMUSIC_API_BASE.to_string(),
        }
    }

    /// Override the API base URL (self-hosted proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}/{}", self.base_url, path))
            .header("Cookie", &self.cookie)
            .header("Authorization", &self.authorization)
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT)
    }

    async fn execute(&self, request: HttpRequest, context: &str) -> Result<HttpResponse> {
        let response = self.http_client.execute(request).await?;
        Self::classify(response, context)
    }

    /// Fold a response's status code into the provider error taxonomy
    fn classify(response: HttpResponse, context: &str) -> Result<HttpResponse> {
        match response.status {
            status if (200..300).contains(&status) => Ok(response),
            401 | 403 => Err(YtMusicError::AuthenticationFailed(format!(
                "{} rejected with status {}",
                context, response.status
            ))),
            409 => Err(YtMusicError::DuplicateEntry),
            429 => Err(YtMusicError::RateLimited {
                retry_after_seconds: response.retry_after_secs(),
            }),
            status if status >= 500 => Err(YtMusicError::ServiceUnavailable {
                status_code: status,
                message: response.text(),
            }),
            status => Err(YtMusicError::ApiError {
                status_code: status,
                message: response.text(),
            }),
        }
    }

    fn parse<T: DeserializeOwned>(response: &HttpResponse, context: &str) -> Result<T> {
        response
            .json()
            .map_err(|e| YtMusicError::ParseError(format!("{}: {}", context, e)))
    }

    /// Classify a search result into the engine's result kinds.
    ///
    /// The fine-grained video-type tag wins when present; otherwise
    /// the coarse result category decides.
    fn classify_result_kind(item: &SearchItem) -> ResultKind {
        match item.video_type.as_deref() {
            Some(VIDEO_TYPE_TRACK) => ResultKind::Song,
            Some(VIDEO_TYPE_OFFICIAL_VIDEO) => ResultKind::Video,
            Some(VIDEO_TYPE_USER_UPLOAD) => ResultKind::UserUpload,
            Some(_) => ResultKind::Video,
            None => {
                if item.result_type.as_deref() == Some("song") {
                    ResultKind::Song
                } else {
                    ResultKind::Video
                }
            }
        }
    }

    /// Convert a search item into a candidate.
    ///
    /// Results without any artist credit can't be matched and are
    /// dropped here.
    fn convert_item(item: SearchItem) -> Option<Candidate> {
        let primary_artist = item.artists.first()?.name.clone();
        let kind = Self::classify_result_kind(&item);

        let mut track = Track::new(item.title, primary_artist);
        track.additional_artists = item
            .artists
            .iter()
            .skip(1)
            .map(|a| a.name.clone())
            .collect();
        if let Some(album) = item.album {
            track = track.with_album(album.name);
        }
        if let Some(secs) = item.duration_seconds {
            track = track.with_duration(Duration::from_secs(secs));
        }

        Some(Candidate::new(track, DestTrackId::new(item.video_id), kind))
    }

    fn members_path(playlist: &PlaylistHandle, continuation: Option<&str>) -> String {
        let base = match playlist {
            PlaylistHandle::Liked => format!("me/likes?limit={}", PAGE_SIZE),
            PlaylistHandle::Playlist(id) => {
                format!("playlists/{}/items?limit={}", id, PAGE_SIZE)
            }
        };
        match continuation {
            Some(token) => format!("{}&continuation={}", base, urlencoding::encode(token)),
            None => base,
        }
    }

    fn additions_path(playlist: &PlaylistHandle) -> String {
        match playlist {
            PlaylistHandle::Liked => "me/likes".to_string(),
            PlaylistHandle::Playlist(id) => format!("playlists/{}/items", id),
        }
    }
}

#[async_trait]
impl DestinationCatalog for YtMusicConnector {
    #[instrument(skip(self), fields(query = %query))]
    async fn search(
        &self,
        query: &str,
        scope: SearchScope,
        limit: u32,
    ) -> BridgeResult<Vec<Candidate>> {
        let filter = match scope {
            SearchScope::Songs => "songs",
            SearchScope::SongsAndVideos => "songs,videos",
        };
        let path = format!(
            "search?q={}&filter={}&limit={}",
            urlencoding::encode(query),
            filter,
            limit
        );

        let response = self
            .execute(self.request(HttpMethod::Get, &path), "search")
            .await
            .map_err(BridgeError::from)?;
        let parsed: SearchResponse =
            Self::parse(&response, "search").map_err(BridgeError::from)?;

        let candidates: Vec<Candidate> = parsed
            .results
            .into_iter()
            .filter_map(Self::convert_item)
            .collect();

        debug!(results = candidates.len(), filter, "search complete");
        Ok(candidates)
    }

    #[instrument(skip(self), fields(playlist = %playlist))]
    async fn playlist_members(
        &self,
        playlist: &PlaylistHandle,
    ) -> BridgeResult<HashSet<DestTrackId>> {
        let mut members = HashSet::new();
        let mut continuation: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let path = Self::members_path(playlist, continuation.as_deref());
            let response = self
                .execute(self.request(HttpMethod::Get, &path), "playlist_members")
                .await
                .map_err(BridgeError::from)?;
            let page: PlaylistItemsResponse = Self::parse(&response, "playlist_members")
                .map_err(BridgeError::from)?;

            pages += 1;
            for item in page.tracks {
                members.insert(DestTrackId::new(item.video_id));
            }

            match page.continuation {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        info!(members = members.len(), pages, "fetched playlist membership");
        Ok(members)
    }

    #[instrument(skip(self), fields(playlist = %playlist, track = %track))]
    async fn add_track(&self, playlist: &PlaylistHandle, track: &DestTrackId) -> BridgeResult<()> {
        let path = Self::additions_path(playlist);
        let request = self
            .request(HttpMethod::Post, &path)
            .json(&json!({ "videoId": track.as_str() }))?;

        self.execute(request, "add_track")
            .await
            .map_err(BridgeError::from)?;

        debug!("track added");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_playlists(&self) -> BridgeResult<Vec<RemotePlaylist>> {
        let response = self
            .execute(
                self.request(HttpMethod::Get, &format!("me/playlists?limit={}", PAGE_SIZE)),
                "list_playlists",
            )
            .await
            .map_err(BridgeError::from)?;
        let parsed: PlaylistsResponse = Self::parse(&response, "list_playlists")
            .map_err(BridgeError::from)?;

        Ok(parsed
            .playlists
            .into_iter()
            .map(|p| RemotePlaylist {
                id: PlaylistId::new(p.playlist_id),
                name: p.title,
                track_count: p.count,
            })
            .collect())
    }

    #[instrument(skip(self, description))]
    async fn create_playlist(&self, name: &str, description: &str) -> BridgeResult<PlaylistId> {
        let request = self.request(HttpMethod::Post, "me/playlists").json(&json!({
            "title": name,
            "description": description,
            "privacyStatus": "PRIVATE",
        }))?;

        let response = self
            .execute(request, "create_playlist")
            .await
            .map_err(BridgeError::from)?;
        let created: CreatePlaylistResponse = Self::parse(&response, "create_playlist")
            .map_err(BridgeError::from)?;

        info!(name, playlist_id = %created.playlist_id, "created playlist");
        Ok(PlaylistId::new(created.playlist_id))
    }

    async fn auth_state(&self) -> AuthState {
        let request = self.request(HttpMethod::Get, "me/account");
        match self.http_client.execute(request).await {
            Ok(response) if response.is_success() => AuthState::Authenticated,
            Ok(response) if matches!(response.status, 401 | 403) => AuthState::Expired,
            Ok(response) => {
                warn!(status = response.status, "unexpected account probe status");
                AuthState::Missing
            }
            Err(err) => {
                warn!(error = %err, "account probe failed");
                AuthState::Missing
            }
        }
    }
}
