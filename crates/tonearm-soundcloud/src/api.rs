// SPDX-License-Identifier: GPL-3.0-or-later

use crate::client::SoundCloudClient;
use crate::error::Result;
use crate::models::{Playlist, Resource, SearchCollection, Track};
use async_trait::async_trait;

/// The SoundCloud operations an extractor relies on.
///
/// [`SoundCloudClient`] is the production implementation; tests substitute an
/// in-memory one.
#[async_trait]
pub trait SoundCloudApi: Send + Sync {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<SearchCollection<Track>>;

    async fn search_playlists(&self, query: &str, limit: u32)
        -> Result<SearchCollection<Playlist>>;

    async fn fetch_playlist(&self, playlist: Playlist) -> Result<Playlist>;

    async fn resolve(&self, url: &str) -> Result<Resource>;

    async fn related_tracks(&self, url: &str, limit: u32) -> Result<Vec<Track>>;

    async fn stream_link(&self, url: &str) -> Result<Option<String>>;
}

#[async_trait]
impl SoundCloudApi for SoundCloudClient {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<SearchCollection<Track>> {
        SoundCloudClient::search_tracks(self, query, limit).await
    }

    async fn search_playlists(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<SearchCollection<Playlist>> {
        SoundCloudClient::search_playlists(self, query, limit).await
    }

    async fn fetch_playlist(&self, playlist: Playlist) -> Result<Playlist> {
        SoundCloudClient::fetch_playlist(self, playlist).await
    }

    async fn resolve(&self, url: &str) -> Result<Resource> {
        SoundCloudClient::resolve(self, url).await
    }

    async fn related_tracks(&self, url: &str, limit: u32) -> Result<Vec<Track>> {
        SoundCloudClient::related_tracks(self, url, limit).await
    }

    async fn stream_link(&self, url: &str) -> Result<Option<String>> {
        SoundCloudClient::stream_link(self, url).await
    }
}
