// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{ErrorCode, NOT_SUPPORTED_MESSAGE, RATE_LIMITED_MESSAGE};
use crate::mapping::{playlist_from, song_from_track};
use crate::options::SoundCloudPluginOptions;
use crate::SOURCE;
use async_trait::async_trait;
use futures::future;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tonearm_domain::{
    is_url, ExtractorPlugin, MediaItem, PluginError, ResolveOptions, Result, SearchType, Song,
};
use tonearm_soundcloud::{
    Playlist as ApiPlaylist, Resource, SoundCloudApi, SoundCloudClient, Track,
};
use tracing::{debug, warn};

/// Number of related tracks requested for a song.
const RELATED_LIMIT: u32 = 10;

lazy_static! {
    static ref SOUNDCLOUD_URL_REGEX: Regex =
        Regex::new(r"^https?://(?:(?:www|m)\.)?soundcloud\.com/(.*)$")
            .expect("valid soundcloud url regex");
    static ref SUBDOMAIN_REGEX: Regex =
        Regex::new(r"://(?:m|www)\.").expect("valid subdomain regex");
}

/// Resolver and search adapter between the host and the SoundCloud API.
///
/// Holds nothing but the API client; every call is an independent
/// request, validate and map sequence.
#[derive(Debug, Clone)]
pub struct SoundCloudPlugin<A = SoundCloudClient> {
    api: A,
}

impl SoundCloudPlugin<SoundCloudClient> {
    /// Build the plugin with its own API client.
    pub fn new(options: SoundCloudPluginOptions) -> Result<Self> {
        let mut builder = SoundCloudClient::builder();
        if let Some(client_id) = options.client_id {
            builder = builder.client_id(client_id);
        }
        if let Some(token) = options.oauth_token {
            builder = builder.oauth_token(token);
        }
        let api = builder.build().map_err(PluginError::upstream)?;
        Ok(Self::with_api(api))
    }

    /// Validate a loosely typed option object, then build the plugin.
    pub fn from_value(options: &Value) -> Result<Self> {
        Self::new(SoundCloudPluginOptions::from_value(options)?)
    }
}

impl<A: SoundCloudApi> SoundCloudPlugin<A> {
    pub fn with_api(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Search SoundCloud, or resolve `query` directly when it is a URL.
    ///
    /// # Errors
    /// - `INVALID_TYPE` if `limit` is zero.
    /// - `SOUNDCLOUD_PLUGIN_NOT_SUPPORTED` if `query` is a URL that does not
    ///   resolve to a public track or playlist.
    /// - `SOUNDCLOUD_PLUGIN_NO_RESULT` if nothing matches.
    pub async fn search(
        &self,
        query: &str,
        search_type: SearchType,
        limit: u32,
        options: &ResolveOptions,
    ) -> Result<Vec<MediaItem>> {
        if limit == 0 {
            return Err(PluginError::invalid_type(
                "natural number",
                limit.to_string(),
                "limit",
            ));
        }

        if is_url(query) {
            return match self.resolve(query, options).await {
                Ok(item) => Ok(vec![item]),
                Err(err) if !err.is_upstream() => {
                    debug!(target: "extractor", "url query rejected: {}", err);
                    Err(ErrorCode::NotSupported.error(NOT_SUPPORTED_MESSAGE))
                }
                Err(err) => Err(err),
            };
        }

        let items = match search_type {
            SearchType::Track => self
                .search_tracks(query, limit)
                .await?
                .into_iter()
                .map(|track| MediaItem::Song(song_from_track(track, options)))
                .collect(),
            SearchType::Playlist => self
                .search_playlists(query, limit)
                .await?
                .into_iter()
                .map(|playlist| MediaItem::Playlist(playlist_from(playlist, options)))
                .collect(),
        };

        Ok(items)
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>> {
        let page = self
            .api
            .search_tracks(query, limit)
            .await
            .map_err(PluginError::upstream)?;

        if page.is_empty() {
            return Err(no_result(query, SearchType::Track));
        }

        Ok(page.collection)
    }

    /// Search playlists and fetch each hit in full, concurrently.
    /// Hits whose fetch fails are dropped.
    async fn search_playlists(&self, query: &str, limit: u32) -> Result<Vec<ApiPlaylist>> {
        let page = self
            .api
            .search_playlists(query, limit)
            .await
            .map_err(PluginError::upstream)?;

        if page.is_empty() {
            return Err(no_result(query, SearchType::Playlist));
        }

        let fetches = page.collection.into_iter().map(|playlist| async move {
            let id = playlist.id;
            match self.api.fetch_playlist(playlist).await {
                Ok(full) => Some(full),
                Err(e) => {
                    warn!(target: "extractor", playlist_id = id, error = %e, "dropping playlist");
                    None
                }
            }
        });

        let playlists: Vec<ApiPlaylist> = future::join_all(fetches)
            .await
            .into_iter()
            .flatten()
            .collect();

        if playlists.is_empty() {
            return Err(no_result(query, SearchType::Playlist));
        }

        Ok(playlists)
    }

    /// Whether `url` is a soundcloud.com link.
    pub fn validate(&self, url: &str) -> bool {
        SOUNDCLOUD_URL_REGEX.is_match(url)
    }

    /// Resolve a track or playlist URL.
    ///
    /// `www.` and `m.` hosts are folded onto the bare domain before the lookup.
    pub async fn resolve(&self, url: &str, options: &ResolveOptions) -> Result<MediaItem> {
        let normalized = normalize_url(url);

        let resource = self
            .api
            .resolve(&normalized)
            .await
            .map_err(|e| ErrorCode::ResolveError.error(e.to_string()))?;

        match resource {
            Resource::Track(track) => Ok(MediaItem::Song(song_from_track(track, options))),
            Resource::Playlist(playlist) => {
                let full = self
                    .api
                    .fetch_playlist(playlist)
                    .await
                    .map_err(PluginError::upstream)?;
                Ok(MediaItem::Playlist(playlist_from(full, options)))
            }
            other => {
                debug!(target: "extractor", "unsupported resource kind: {}", other.kind());
                Err(ErrorCode::NotSupported.error(NOT_SUPPORTED_MESSAGE))
            }
        }
    }

    /// Songs related to `song`; upstream entries without a title are skipped.
    pub async fn get_related_songs(&self, song: &Song) -> Result<Vec<Song>> {
        let url = song_url(song).ok_or_else(|| {
            ErrorCode::InvalidSong.error("Cannot get related songs from invalid song.")
        })?;

        let related = self
            .api
            .related_tracks(url, RELATED_LIMIT)
            .await
            .map_err(PluginError::upstream)?;

        let defaults = ResolveOptions::default();
        Ok(related
            .into_iter()
            .filter(|track| track.title.as_deref().is_some_and(|t| !t.is_empty()))
            .map(|track| song_from_track(track, &defaults))
            .collect())
    }

    /// Playable stream URL for `song`.
    pub async fn get_stream_url(&self, song: &Song) -> Result<String> {
        let url = song_url(song).ok_or_else(|| {
            ErrorCode::InvalidSong.error("Cannot get stream url from invalid song.")
        })?;

        self.api
            .stream_link(url)
            .await
            .map_err(PluginError::upstream)?
            .ok_or_else(|| ErrorCode::RateLimited.error(RATE_LIMITED_MESSAGE))
    }

    /// First track matching `query`.
    pub async fn search_song(&self, query: &str, options: &ResolveOptions) -> Result<Option<Song>> {
        let items = self.search(query, SearchType::Track, 1, options).await?;
        Ok(items.into_iter().next().and_then(MediaItem::into_song))
    }
}

#[async_trait]
impl<A: SoundCloudApi> ExtractorPlugin for SoundCloudPlugin<A> {
    fn name(&self) -> &'static str {
        SOURCE
    }

    fn validate(&self, url: &str) -> bool {
        Self::validate(self, url)
    }

    async fn search(
        &self,
        query: &str,
        search_type: SearchType,
        limit: u32,
        options: &ResolveOptions,
    ) -> Result<Vec<MediaItem>> {
        Self::search(self, query, search_type, limit, options).await
    }

    async fn resolve(&self, url: &str, options: &ResolveOptions) -> Result<MediaItem> {
        Self::resolve(self, url, options).await
    }

    async fn search_song(&self, query: &str, options: &ResolveOptions) -> Result<Option<Song>> {
        Self::search_song(self, query, options).await
    }

    async fn get_related_songs(&self, song: &Song) -> Result<Vec<Song>> {
        Self::get_related_songs(self, song).await
    }

    async fn get_stream_url(&self, song: &Song) -> Result<String> {
        Self::get_stream_url(self, song).await
    }
}

fn normalize_url(url: &str) -> String {
    SUBDOMAIN_REGEX.replace_all(url, "://").into_owned()
}

fn song_url(song: &Song) -> Option<&str> {
    song.url().filter(|url| !url.is_empty())
}

fn no_result(query: &str, search_type: SearchType) -> PluginError {
    ErrorCode::NoResult.error(format!(
        "Cannot find any \"{}\" {} on SoundCloud!",
        query, search_type
    ))
}
