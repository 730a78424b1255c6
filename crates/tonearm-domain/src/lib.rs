// SPDX-License-Identifier: GPL-3.0-or-later

//! Host-side playback model shared by extractor plugins.
//!
//! Plugins build [`Song`] and [`Playlist`] values through their constructors,
//! report failures as [`PluginError`], and expose their capabilities through the
//! [`ExtractorPlugin`] trait. The host dispatches follow-up calls (stream URL,
//! related songs) back to a plugin using the `source` tag carried by every entity.

pub mod error;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;
use url::Url;

pub use error::{describe_value, PluginError, Result};

// ============================================================================
// Options
// ============================================================================

/// Caller-supplied context attached to every entity a plugin produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResolveOptions {
    /// Identifier of whoever requested the media.
    #[serde(default)]
    pub member: Option<String>,
    /// Arbitrary host data carried through untouched.
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl ResolveOptions {
    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

// ============================================================================
// Entities
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uploader {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Constructor arguments for [`Song`].
#[derive(Debug, Clone, Default)]
pub struct SongInfo {
    pub source: String,
    pub play_from_source: bool,
    pub id: String,
    pub name: Option<String>,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    /// Length in seconds.
    pub duration: f64,
    pub views: u64,
    pub uploader: Uploader,
    pub likes: u64,
    pub reposts: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    source: String,
    play_from_source: bool,
    id: String,
    name: Option<String>,
    url: Option<String>,
    thumbnail: Option<String>,
    duration: f64,
    views: u64,
    uploader: Uploader,
    likes: u64,
    reposts: u64,
    member: Option<String>,
    metadata: Option<Value>,
}

impl Song {
    pub fn new(info: SongInfo, options: &ResolveOptions) -> Self {
        Self {
            source: info.source.to_lowercase(),
            play_from_source: info.play_from_source,
            id: info.id,
            name: info.name,
            url: info.url,
            thumbnail: info.thumbnail,
            duration: info.duration.max(0.0),
            views: info.views,
            uploader: info.uploader,
            likes: info.likes,
            reposts: info.reposts,
            member: options.member.clone(),
            metadata: options.metadata.clone(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether playback must be re-resolved through the plugin instead of a cached stream URL.
    pub fn play_from_source(&self) -> bool {
        self.play_from_source
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail.as_deref()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration)
    }

    pub fn views(&self) -> u64 {
        self.views
    }

    pub fn uploader(&self) -> &Uploader {
        &self.uploader
    }

    pub fn likes(&self) -> u64 {
        self.likes
    }

    pub fn reposts(&self) -> u64 {
        self.reposts
    }

    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }
}

/// Constructor arguments for [`Playlist`].
#[derive(Debug, Clone, Default)]
pub struct PlaylistInfo {
    pub source: String,
    pub id: String,
    pub name: Option<String>,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    source: String,
    id: String,
    name: Option<String>,
    url: Option<String>,
    thumbnail: Option<String>,
    songs: Vec<Song>,
    member: Option<String>,
    metadata: Option<Value>,
}

impl Playlist {
    pub fn new(info: PlaylistInfo, options: &ResolveOptions) -> Self {
        Self {
            source: info.source.to_lowercase(),
            id: info.id,
            name: info.name,
            url: info.url,
            thumbnail: info.thumbnail,
            songs: info.songs,
            member: options.member.clone(),
            metadata: options.metadata.clone(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail.as_deref()
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Total length of all songs in seconds.
    pub fn duration(&self) -> f64 {
        self.songs.iter().map(Song::duration).sum()
    }

    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration())
    }

    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }
}

/// Either kind of entity a plugin can hand back from search or resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaItem {
    Song(Song),
    Playlist(Playlist),
}

impl MediaItem {
    pub fn source(&self) -> &str {
        match self {
            Self::Song(song) => song.source(),
            Self::Playlist(playlist) => playlist.source(),
        }
    }

    pub fn as_song(&self) -> Option<&Song> {
        match self {
            Self::Song(song) => Some(song),
            Self::Playlist(_) => None,
        }
    }

    pub fn as_playlist(&self) -> Option<&Playlist> {
        match self {
            Self::Playlist(playlist) => Some(playlist),
            Self::Song(_) => None,
        }
    }

    pub fn into_song(self) -> Option<Song> {
        match self {
            Self::Song(song) => Some(song),
            Self::Playlist(_) => None,
        }
    }
}

// ============================================================================
// Search type
// ============================================================================

/// What a text search looks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchType {
    #[default]
    Track,
    Playlist,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Playlist => "playlist",
        }
    }
}

impl std::fmt::Display for SearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "track" => Ok(Self::Track),
            "playlist" => Ok(Self::Playlist),
            other => Err(PluginError::invalid_type(
                "one of: track, playlist",
                format!("\"{}\"", other),
                "type",
            )),
        }
    }
}

// ============================================================================
// Plugin capability
// ============================================================================

/// Capabilities a host expects from a plugin that turns URLs and queries into media.
#[async_trait]
pub trait ExtractorPlugin: Send + Sync {
    /// Source tag stamped on every entity this plugin builds.
    fn name(&self) -> &'static str;

    /// Whether `url` belongs to this plugin.
    fn validate(&self, url: &str) -> bool;

    /// Search by text, or resolve `query` directly when it is a URL.
    async fn search(
        &self,
        query: &str,
        search_type: SearchType,
        limit: u32,
        options: &ResolveOptions,
    ) -> Result<Vec<MediaItem>>;

    async fn resolve(&self, url: &str, options: &ResolveOptions) -> Result<MediaItem>;

    /// First song matching `query`, if any.
    async fn search_song(&self, query: &str, options: &ResolveOptions) -> Result<Option<Song>>;

    async fn get_related_songs(&self, song: &Song) -> Result<Vec<Song>>;

    async fn get_stream_url(&self, song: &Song) -> Result<String>;
}

/// Find the plugin that claims `url`.
pub fn plugin_for_url<'a>(
    plugins: &'a [Arc<dyn ExtractorPlugin>],
    url: &str,
) -> Option<&'a Arc<dyn ExtractorPlugin>> {
    plugins.iter().find(|plugin| plugin.validate(url))
}

/// Find the plugin that produced `song`, by its source tag.
pub fn plugin_for_song<'a>(
    plugins: &'a [Arc<dyn ExtractorPlugin>],
    song: &Song,
) -> Option<&'a Arc<dyn ExtractorPlugin>> {
    plugins.iter().find(|plugin| plugin.name() == song.source())
}

// ============================================================================
// Helpers
// ============================================================================

/// True for absolute `http`/`https` URLs. Input containing whitespace is free text.
pub fn is_url(input: &str) -> bool {
    if input.chars().any(char::is_whitespace) {
        return false;
    }
    match Url::parse(input) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

/// Reject any key of `object` not listed in `allowed`.
pub fn check_invalid_key(
    object: &Map<String, Value>,
    allowed: &[&str],
    target: &str,
) -> Result<()> {
    match object.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(PluginError::InvalidKey {
            key: key.clone(),
            target: target.to_string(),
        }),
        None => Ok(()),
    }
}

/// Format seconds as `mm:ss`, or `hh:mm:ss` once an hour is reached.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 1.0 {
        return "00:00".to_string();
    }
    let total = seconds as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
