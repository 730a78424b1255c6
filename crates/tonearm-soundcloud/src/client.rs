// SPDX-License-Identifier: GPL-3.0-or-later

use crate::client_id::ClientIdSource;
use crate::error::{Result, SoundCloudError};
use crate::models::{Playlist, Resource, SearchCollection, StreamLocation, Track, Transcoding};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

const SOUNDCLOUD_API_BASE: &str = "https://api-v2.soundcloud.com";
const SOUNDCLOUD_WEB_BASE: &str = "https://soundcloud.com";
const USER_AGENT: &str = concat!("tonearm/", env!("CARGO_PKG_VERSION"));

/// Largest id list the `/tracks` endpoint accepts in one call.
const TRACK_BATCH_SIZE: usize = 50;

/// SoundCloud API v2 client.
#[derive(Debug, Clone)]
pub struct SoundCloudClient {
    client: Client,
    base_url: String,
    oauth_token: Option<String>,
    client_id: ClientIdSource,
}

impl SoundCloudClient {
    /// Create a new client with default settings (client id discovered on first use).
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a client builder for custom configuration.
    pub fn builder() -> SoundCloudClientBuilder {
        SoundCloudClientBuilder::default()
    }

    /// Search public tracks.
    ///
    /// # Example
    /// ```no_run
    /// # use tonearm_soundcloud::SoundCloudClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = SoundCloudClient::builder().client_id("my-client-id").build()?;
    /// let page = client.search_tracks("lofi", 10).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search_tracks(&self, query: &str, limit: u32) -> Result<SearchCollection<Track>> {
        let mut url = self.endpoint("/search/tracks")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &limit.to_string());
        self.get(url).await
    }

    /// Search public playlists. Tracks inside each hit are mostly stubs.
    pub async fn search_playlists(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<SearchCollection<Playlist>> {
        let mut url = self.endpoint("/search/playlists")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &limit.to_string());
        self.get(url).await
    }

    /// Fetch full track objects by id. Unknown ids are silently absent from the result.
    pub async fn fetch_tracks(&self, ids: &[u64]) -> Result<Vec<Track>> {
        let mut tracks = Vec::with_capacity(ids.len());
        for batch in ids.chunks(TRACK_BATCH_SIZE) {
            let joined = batch
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            let mut url = self.endpoint("/tracks")?;
            url.query_pairs_mut().append_pair("ids", &joined);
            let mut page: Vec<Track> = self.get(url).await?;
            tracks.append(&mut page);
        }
        Ok(tracks)
    }

    /// Replace every stub track of `playlist` with its full object, keeping playlist order.
    pub async fn fetch_playlist(&self, mut playlist: Playlist) -> Result<Playlist> {
        let stub_ids: Vec<u64> = playlist
            .tracks
            .iter()
            .filter(|track| track.is_stub())
            .map(|track| track.id)
            .collect();

        if stub_ids.is_empty() {
            return Ok(playlist);
        }

        debug!(
            target: "soundcloud",
            "playlist {} has {} stub tracks",
            playlist.id,
            stub_ids.len()
        );

        let fetched: HashMap<u64, Track> = self
            .fetch_tracks(&stub_ids)
            .await?
            .into_iter()
            .map(|track| (track.id, track))
            .collect();

        playlist.tracks = playlist
            .tracks
            .into_iter()
            .filter_map(|track| {
                if track.is_stub() {
                    fetched.get(&track.id).cloned()
                } else {
                    Some(track)
                }
            })
            .collect();

        Ok(playlist)
    }

    /// Resolve a public soundcloud.com URL to the resource behind it.
    pub async fn resolve(&self, target: &str) -> Result<Resource> {
        let mut url = self.endpoint("/resolve")?;
        url.query_pairs_mut().append_pair("url", target);
        self.get(url).await
    }

    /// Tracks SoundCloud recommends after the track at `target`.
    pub async fn related_tracks(&self, target: &str, limit: u32) -> Result<Vec<Track>> {
        let track = self.resolve_track(target).await?;
        let mut url = self.endpoint(&format!("/tracks/{}/related", track.id))?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        let page: SearchCollection<Track> = self.get(url).await?;
        Ok(page.collection)
    }

    /// Short-lived playable URL for the track at `target`.
    ///
    /// Resolving `target` propagates its errors. After that, a track without a
    /// usable transcoding or any failed transcoding lookup yields `Ok(None)`:
    /// play-request rate limiting surfaces as a refused or failing lookup.
    pub async fn stream_link(&self, target: &str) -> Result<Option<String>> {
        let track = self.resolve_track(target).await?;

        let Some(transcoding) = pick_transcoding(&track) else {
            debug!(target: "soundcloud", "track {} has no transcodings", track.id);
            return Ok(None);
        };

        match self
            .stream_location(transcoding, track.track_authorization.as_deref())
            .await
        {
            Ok(location) => Ok(Some(location.url)),
            Err(e) => {
                debug!(target: "soundcloud", track_id = track.id, error = %e, "no stream link");
                Ok(None)
            }
        }
    }

    async fn stream_location(
        &self,
        transcoding: &Transcoding,
        track_authorization: Option<&str>,
    ) -> Result<StreamLocation> {
        let mut url = Url::parse(&transcoding.url)?;
        if let Some(auth) = track_authorization {
            url.query_pairs_mut()
                .append_pair("track_authorization", auth);
        }

        let response = self.send(url).await?;
        Self::parse(response).await
    }

    async fn resolve_track(&self, target: &str) -> Result<Track> {
        match self.resolve(target).await? {
            Resource::Track(track) => Ok(track),
            other => Err(SoundCloudError::InvalidResponse(format!(
                "expected a track at {}, got {}",
                target,
                other.kind()
            ))),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    /// Attach credentials and send a GET request.
    async fn send(&self, mut url: Url) -> Result<Response> {
        let client_id = self.client_id.get(&self.client).await?;
        url.query_pairs_mut().append_pair("client_id", &client_id);

        trace!(target: "soundcloud", "GET {}", url);

        let mut request = self.client.get(url);
        if let Some(token) = &self.oauth_token {
            request = request.header("Authorization", format!("OAuth {}", token));
        }

        let response = request.send().await?;
        debug!(target: "soundcloud", "response status: {}", response.status());
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let display = url.path().to_string();
        let response = self.send(url).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(SoundCloudError::NotFound(display));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SoundCloudError::RateLimitExceeded);
        }

        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SoundCloudError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        trace!(target: "soundcloud", "response body: {}", body);
        serde_json::from_str(&body).map_err(|e| SoundCloudError::InvalidResponse(e.to_string()))
    }
}

/// Prefer a full progressive rendition, then HLS; previews (snipped) come last.
fn pick_transcoding(track: &Track) -> Option<&Transcoding> {
    let transcodings = &track.media.as_ref()?.transcodings;
    transcodings
        .iter()
        .filter(|t| !t.snipped)
        .find(|t| t.is_progressive())
        .or_else(|| transcodings.iter().filter(|t| !t.snipped).find(|t| t.is_hls()))
        .or_else(|| transcodings.first())
}

/// Builder for configuring a SoundCloud client.
#[derive(Debug)]
pub struct SoundCloudClientBuilder {
    base_url: String,
    web_url: String,
    client_id: Option<String>,
    oauth_token: Option<String>,
    timeout: Duration,
}

impl Default for SoundCloudClientBuilder {
    fn default() -> Self {
        Self {
            base_url: SOUNDCLOUD_API_BASE.to_string(),
            web_url: SOUNDCLOUD_WEB_BASE.to_string(),
            client_id: None,
            oauth_token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl SoundCloudClientBuilder {
    /// Set a custom API base URL (useful for testing with mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the web player URL scraped for a client id.
    pub fn web_url(mut self, url: impl Into<String>) -> Self {
        self.web_url = url.into();
        self
    }

    /// Use a fixed client id instead of discovering one. Empty values are ignored.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        let client_id: String = client_id.into();
        self.client_id = Some(client_id).filter(|id| !id.is_empty());
        self
    }

    /// Authenticate requests with a user OAuth token. Empty values are ignored.
    pub fn oauth_token(mut self, token: impl Into<String>) -> Self {
        let token: String = token.into();
        self.oauth_token = Some(token).filter(|t| !t.is_empty());
        self
    }

    /// Set request timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the SoundCloud client.
    pub fn build(self) -> Result<SoundCloudClient> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(SoundCloudClient {
            client,
            base_url: self.base_url,
            oauth_token: self.oauth_token,
            client_id: ClientIdSource::new(self.client_id, self.web_url),
        })
    }
}
