// SPDX-License-Identifier: GPL-3.0-or-later

//! SoundCloud extractor plugin.
//!
//! Turns search queries and soundcloud.com URLs into host [`Song`] and
//! [`Playlist`] values, and hands out related songs and stream URLs for songs
//! it produced. All network work is delegated to `tonearm-soundcloud`.
//!
//! [`Song`]: tonearm_domain::Song
//! [`Playlist`]: tonearm_domain::Playlist

pub mod error;
pub mod mapping;
pub mod options;
pub mod plugin;
#[cfg(test)]
mod plugin_tests;

pub use error::ErrorCode;
pub use options::SoundCloudPluginOptions;
pub use plugin::SoundCloudPlugin;
pub use tonearm_domain::SearchType;

/// Source tag carried by every entity this plugin builds.
pub const SOURCE: &str = "soundcloud";

/// Result count used when the caller does not pick one.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
