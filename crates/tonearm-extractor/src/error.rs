// SPDX-License-Identifier: GPL-3.0-or-later

use tonearm_domain::PluginError;

pub(crate) const NOT_SUPPORTED_MESSAGE: &str = "Only public tracks and playlists are supported.";
pub(crate) const RATE_LIMITED_MESSAGE: &str = "Reached SoundCloud rate limits\nSee more: https://developers.soundcloud.com/docs/api/rate-limits#play-requests";

/// Failure codes raised by the SoundCloud extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The URL points at something other than a public track or playlist.
    NotSupported,
    /// A search came back empty.
    NoResult,
    /// The API could not resolve the URL.
    ResolveError,
    /// The song has no URL to act on.
    InvalidSong,
    /// No stream link was handed out.
    RateLimited,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotSupported => "SOUNDCLOUD_PLUGIN_NOT_SUPPORTED",
            Self::NoResult => "SOUNDCLOUD_PLUGIN_NO_RESULT",
            Self::ResolveError => "SOUNDCLOUD_PLUGIN_RESOLVE_ERROR",
            Self::InvalidSong => "SOUNDCLOUD_PLUGIN_INVALID_SONG",
            Self::RateLimited => "SOUNDCLOUD_PLUGIN_RATE_LIMITED",
        }
    }

    pub fn error(self, message: impl Into<String>) -> PluginError {
        PluginError::extractor(self.as_str(), message)
    }

    /// True when `err` carries this code.
    pub fn matches(self, err: &PluginError) -> bool {
        err.code() == self.as_str()
    }
}

