// SPDX-License-Identifier: GPL-3.0-or-later

//! SoundCloud API v2 client.
//!
//! Covers track and playlist search, URL resolution, related tracks and
//! stream link lookup. Requests are authenticated with a client id (configured
//! or discovered from the public web player) and optionally a user OAuth token.

pub mod api;
pub mod client;
mod client_id;
pub mod error;
pub mod models;

pub use api::SoundCloudApi;
pub use client::{SoundCloudClient, SoundCloudClientBuilder};
pub use error::{Result, SoundCloudError};
pub use models::{
    Media, Playlist, Resource, SearchCollection, StreamLocation, Track, Transcoding,
    TranscodingFormat, User,
};
