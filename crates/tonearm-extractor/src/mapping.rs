// SPDX-License-Identifier: GPL-3.0-or-later

use crate::SOURCE;
use tonearm_domain::{Playlist, PlaylistInfo, ResolveOptions, Song, SongInfo, Uploader};
use tonearm_soundcloud::{Playlist as ApiPlaylist, Track};

/// Build a host song from an API track.
pub fn song_from_track(track: Track, options: &ResolveOptions) -> Song {
    let uploader = track
        .user
        .map(|user| Uploader {
            name: user.username,
            url: user.permalink_url,
        })
        .unwrap_or_default();

    Song::new(
        SongInfo {
            source: SOURCE.to_string(),
            play_from_source: true,
            id: track.id.to_string(),
            name: track.title,
            url: track.permalink_url,
            thumbnail: track.artwork_url,
            duration: track.duration.unwrap_or(0) as f64 / 1000.0,
            views: track.playback_count.unwrap_or(0),
            uploader,
            likes: track.likes_count.unwrap_or(0),
            reposts: track.reposts_count.unwrap_or(0),
        },
        options,
    )
}

/// Build a host playlist; every track goes through [`song_from_track`] with the same options.
pub fn playlist_from(playlist: ApiPlaylist, options: &ResolveOptions) -> Playlist {
    let songs = playlist
        .tracks
        .into_iter()
        .map(|track| song_from_track(track, options))
        .collect();

    Playlist::new(
        PlaylistInfo {
            source: SOURCE.to_string(),
            id: playlist.id.to_string(),
            name: playlist.title,
            url: playlist.permalink_url,
            thumbnail: playlist.artwork_url,
            songs,
        },
        options,
    )
}
