// SPDX-License-Identifier: GPL-3.0-or-later

use serde::{Deserialize, Serialize};

/// Track owner as embedded in track and playlist payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub permalink_url: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Track information from the SoundCloud v2 API.
///
/// Playlist payloads only fully populate their first few tracks; the rest are
/// stubs that carry nothing but `id`, so every other field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub permalink_url: Option<String>,
    #[serde(default)]
    pub artwork_url: Option<String>,
    /// Length in milliseconds.
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub playback_count: Option<u64>,
    #[serde(default)]
    pub likes_count: Option<u64>,
    #[serde(default)]
    pub reposts_count: Option<u64>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub media: Option<Media>,
    #[serde(default)]
    pub track_authorization: Option<String>,
}

impl Track {
    /// True when the payload is an id-only placeholder.
    pub fn is_stub(&self) -> bool {
        self.title.is_none() && self.permalink_url.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Media {
    #[serde(default)]
    pub transcodings: Vec<Transcoding>,
}

/// One encoded rendition of a track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transcoding {
    /// Lookup URL that yields the actual stream location.
    pub url: String,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub snipped: bool,
    pub format: TranscodingFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscodingFormat {
    /// "progressive" or "hls".
    pub protocol: String,
    pub mime_type: String,
}

impl Transcoding {
    pub fn is_progressive(&self) -> bool {
        self.format.protocol == "progressive"
    }

    pub fn is_hls(&self) -> bool {
        self.format.protocol == "hls"
    }
}

/// Playlist (set or album) information from the SoundCloud v2 API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Playlist {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub permalink_url: Option<String>,
    #[serde(default)]
    pub artwork_url: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Generic v2 search response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCollection<T> {
    #[serde(default = "Vec::new")]
    pub collection: Vec<T>,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub next_href: Option<String>,
}

impl<T> SearchCollection<T> {
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }
}

/// Result of resolving a public soundcloud.com URL, discriminated by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Resource {
    Track(Track),
    Playlist(Playlist),
    User(User),
    #[serde(other)]
    Other,
}

impl Resource {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Track(_) => "track",
            Self::Playlist(_) => "playlist",
            Self::User(_) => "user",
            Self::Other => "other",
        }
    }
}

/// Body returned by a transcoding lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamLocation {
    pub url: String,
}
