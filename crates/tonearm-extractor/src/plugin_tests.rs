// SPDX-License-Identifier: GPL-3.0-or-later

#[cfg(test)]
mod tests {
    use crate::{ErrorCode, SearchType, SoundCloudPlugin};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};
    use tonearm_domain::{
        plugin_for_song, ExtractorPlugin, MediaItem, ResolveOptions, Song, SongInfo,
    };
    use tonearm_soundcloud::{
        Playlist, Resource, SearchCollection, SoundCloudApi, SoundCloudError, Track, User,
    };

    const TRACK_URL: &str = "https://soundcloud.com/forss/flickermood";
    const SET_URL: &str = "https://soundcloud.com/forss/sets/picks";

    /// In-memory stand-in for the SoundCloud API that records every call.
    #[derive(Default)]
    struct FakeApi {
        tracks: Vec<Track>,
        playlists: Vec<Playlist>,
        failing_playlists: HashSet<u64>,
        resources: HashMap<String, Resource>,
        related: Vec<Track>,
        stream: Option<String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SoundCloudApi for FakeApi {
        async fn search_tracks(
            &self,
            query: &str,
            limit: u32,
        ) -> tonearm_soundcloud::Result<SearchCollection<Track>> {
            self.record(format!("search_tracks:{}:{}", query, limit));
            Ok(SearchCollection {
                collection: self.tracks.iter().take(limit as usize).cloned().collect(),
                total_results: Some(self.tracks.len() as u64),
                next_href: None,
            })
        }

        async fn search_playlists(
            &self,
            query: &str,
            limit: u32,
        ) -> tonearm_soundcloud::Result<SearchCollection<Playlist>> {
            self.record(format!("search_playlists:{}:{}", query, limit));
            Ok(SearchCollection {
                collection: self.playlists.iter().take(limit as usize).cloned().collect(),
                total_results: Some(self.playlists.len() as u64),
                next_href: None,
            })
        }

        async fn fetch_playlist(&self, mut playlist: Playlist) -> tonearm_soundcloud::Result<Playlist> {
            self.record(format!("fetch_playlist:{}", playlist.id));
            if self.failing_playlists.contains(&playlist.id) {
                return Err(SoundCloudError::ApiError {
                    status: 500,
                    message: "playlist unavailable".to_string(),
                });
            }
            for track in playlist.tracks.iter_mut().filter(|t| t.is_stub()) {
                *track = track_fixture(track.id, &format!("Filled {}", track.id));
            }
            Ok(playlist)
        }

        async fn resolve(&self, url: &str) -> tonearm_soundcloud::Result<Resource> {
            self.record(format!("resolve:{}", url));
            self.resources
                .get(url)
                .cloned()
                .ok_or_else(|| SoundCloudError::NotFound(url.to_string()))
        }

        async fn related_tracks(&self, url: &str, limit: u32) -> tonearm_soundcloud::Result<Vec<Track>> {
            self.record(format!("related_tracks:{}:{}", url, limit));
            Ok(self.related.clone())
        }

        async fn stream_link(&self, url: &str) -> tonearm_soundcloud::Result<Option<String>> {
            self.record(format!("stream_link:{}", url));
            Ok(self.stream.clone())
        }
    }

    fn track_fixture(id: u64, title: &str) -> Track {
        Track {
            id,
            title: Some(title.to_string()),
            permalink_url: Some(format!("https://soundcloud.com/forss/track-{}", id)),
            artwork_url: Some(format!("https://i1.sndcdn.com/artworks-{}-large.jpg", id)),
            duration: Some(180_000),
            playback_count: Some(10),
            likes_count: Some(2),
            reposts_count: Some(1),
            user: Some(User {
                id: Some(183),
                username: Some("Forss".to_string()),
                permalink_url: Some("https://soundcloud.com/forss".to_string()),
                avatar_url: None,
            }),
            ..Default::default()
        }
    }

    fn playlist_fixture(id: u64) -> Playlist {
        Playlist {
            id,
            title: Some(format!("Set {}", id)),
            permalink_url: Some(format!("https://soundcloud.com/forss/sets/set-{}", id)),
            artwork_url: None,
            tracks: vec![
                track_fixture(id * 10, "Opening"),
                Track {
                    id: id * 10 + 1,
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    fn song_with_url(url: Option<&str>) -> Song {
        Song::new(
            SongInfo {
                source: "soundcloud".to_string(),
                play_from_source: true,
                id: "293".to_string(),
                url: url.map(str::to_string),
                ..Default::default()
            },
            &ResolveOptions::default(),
        )
    }

    fn plugin(api: FakeApi) -> SoundCloudPlugin<FakeApi> {
        SoundCloudPlugin::with_api(api)
    }

    // ------------------------------------------------------------------
    // search
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_search_tracks_returns_soundcloud_songs() {
        let plugin = plugin(FakeApi {
            tracks: vec![track_fixture(1, "One"), track_fixture(2, "Two")],
            ..Default::default()
        });
        let options = ResolveOptions::default().with_member("listener");

        let items = plugin
            .search("forss", SearchType::Track, 10, &options)
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        for item in &items {
            let song = item.as_song().expect("track search yields songs");
            assert!(!song.id().is_empty());
            assert_eq!(song.source(), "soundcloud");
            assert_eq!(song.member(), Some("listener"));
        }
        assert_eq!(plugin.api().calls(), vec!["search_tracks:forss:10"]);
    }

    #[tokio::test]
    async fn test_search_tracks_without_hits_is_no_result() {
        let plugin = plugin(FakeApi::default());

        let err = plugin
            .search("nothing", SearchType::Track, 10, &ResolveOptions::default())
            .await
            .unwrap_err();

        assert!(ErrorCode::NoResult.matches(&err));
        assert_eq!(
            err.to_string(),
            "Cannot find any \"nothing\" track on SoundCloud!"
        );
    }

    #[tokio::test]
    async fn test_search_rejects_zero_limit_before_calling_api() {
        let plugin = plugin(FakeApi::default());

        let err = plugin
            .search("forss", SearchType::Track, 0, &ResolveOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "INVALID_TYPE");
        assert!(plugin.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_url_with_trailing_words_is_text() {
        let plugin = plugin(FakeApi {
            tracks: vec![track_fixture(1, "One")],
            ..Default::default()
        });
        let query = "https://soundcloud.com/forss lofi mix";

        let items = plugin
            .search(query, SearchType::Track, 5, &ResolveOptions::default())
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(
            plugin.api().calls(),
            vec![format!("search_tracks:{}:5", query)]
        );
    }

    #[tokio::test]
    async fn test_search_url_is_resolve_in_a_vec() {
        let mut resources = HashMap::new();
        resources.insert(
            TRACK_URL.to_string(),
            Resource::Track(track_fixture(293, "Flickermood")),
        );
        let plugin = plugin(FakeApi {
            resources,
            ..Default::default()
        });
        let options = ResolveOptions::default();

        let searched = plugin
            .search(TRACK_URL, SearchType::Playlist, 3, &options)
            .await
            .unwrap();
        let resolved = plugin.resolve(TRACK_URL, &options).await.unwrap();

        assert_eq!(searched, vec![resolved]);
    }

    #[tokio::test]
    async fn test_search_url_domain_failure_becomes_not_supported() {
        let mut resources = HashMap::new();
        resources.insert(
            TRACK_URL.to_string(),
            Resource::User(User {
                id: Some(183),
                username: Some("Forss".to_string()),
                ..Default::default()
            }),
        );
        let plugin = plugin(FakeApi {
            resources,
            ..Default::default()
        });

        // unknown URL: resolve error
        let err = plugin
            .search(SET_URL, SearchType::Track, 10, &ResolveOptions::default())
            .await
            .unwrap_err();
        assert!(ErrorCode::NotSupported.matches(&err));
        assert_eq!(err.to_string(), "Only public tracks and playlists are supported.");

        // user URL: unsupported kind
        let err = plugin
            .search(TRACK_URL, SearchType::Track, 10, &ResolveOptions::default())
            .await
            .unwrap_err();
        assert!(ErrorCode::NotSupported.matches(&err));
    }

    #[tokio::test]
    async fn test_search_url_upstream_failure_propagates() {
        let mut resources = HashMap::new();
        resources.insert(SET_URL.to_string(), Resource::Playlist(playlist_fixture(4)));
        let plugin = plugin(FakeApi {
            resources,
            failing_playlists: HashSet::from([4]),
            ..Default::default()
        });

        let err = plugin
            .search(SET_URL, SearchType::Track, 10, &ResolveOptions::default())
            .await
            .unwrap_err();

        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_search_playlists_drops_failed_fetches() {
        let plugin = plugin(FakeApi {
            playlists: vec![playlist_fixture(1), playlist_fixture(2), playlist_fixture(3)],
            failing_playlists: HashSet::from([2]),
            ..Default::default()
        });

        let items = plugin
            .search("sets", SearchType::Playlist, 10, &ResolveOptions::default())
            .await
            .unwrap();

        let ids: Vec<&str> = items
            .iter()
            .filter_map(MediaItem::as_playlist)
            .map(|p| p.id())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);

        let first = items[0].as_playlist().unwrap();
        assert_eq!(first.songs().len(), 2);
        assert_eq!(first.songs()[1].name(), Some("Filled 11"));
        assert!(first.songs().iter().all(|s| s.source() == "soundcloud"));
    }

    #[tokio::test]
    async fn test_search_playlists_all_failed_is_no_result() {
        let plugin = plugin(FakeApi {
            playlists: vec![playlist_fixture(1)],
            failing_playlists: HashSet::from([1]),
            ..Default::default()
        });

        let err = plugin
            .search("sets", SearchType::Playlist, 10, &ResolveOptions::default())
            .await
            .unwrap_err();

        assert!(ErrorCode::NoResult.matches(&err));
        assert_eq!(err.to_string(), "Cannot find any \"sets\" playlist on SoundCloud!");
    }

    #[tokio::test]
    async fn test_search_song_returns_first_track() {
        let plugin = plugin(FakeApi {
            tracks: vec![track_fixture(1, "One"), track_fixture(2, "Two")],
            ..Default::default()
        });

        let song = plugin
            .search_song("forss", &ResolveOptions::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(song.id(), "1");
        assert_eq!(plugin.api().calls(), vec!["search_tracks:forss:1"]);
    }

    // ------------------------------------------------------------------
    // resolve
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_resolve_folds_www_and_mobile_hosts() {
        let mut resources = HashMap::new();
        resources.insert(
            TRACK_URL.to_string(),
            Resource::Track(track_fixture(293, "Flickermood")),
        );
        let plugin = plugin(FakeApi {
            resources,
            ..Default::default()
        });
        let options = ResolveOptions::default();

        let bare = plugin.resolve(TRACK_URL, &options).await.unwrap();
        let www = plugin
            .resolve("https://www.soundcloud.com/forss/flickermood", &options)
            .await
            .unwrap();
        let mobile = plugin
            .resolve("https://m.soundcloud.com/forss/flickermood", &options)
            .await
            .unwrap();

        assert_eq!(bare, www);
        assert_eq!(bare, mobile);
        let expected = format!("resolve:{}", TRACK_URL);
        assert_eq!(plugin.api().calls(), vec![expected.clone(), expected.clone(), expected]);
    }

    #[tokio::test]
    async fn test_resolve_error_carries_upstream_message() {
        let plugin = plugin(FakeApi::default());

        let err = plugin
            .resolve(TRACK_URL, &ResolveOptions::default())
            .await
            .unwrap_err();

        assert!(ErrorCode::ResolveError.matches(&err));
        assert!(!err.is_upstream());
        assert!(err.to_string().contains(TRACK_URL));
    }

    #[tokio::test]
    async fn test_resolve_playlist_fetches_full_detail() {
        let mut resources = HashMap::new();
        resources.insert(SET_URL.to_string(), Resource::Playlist(playlist_fixture(7)));
        let plugin = plugin(FakeApi {
            resources,
            ..Default::default()
        });
        let options = ResolveOptions::default().with_metadata(json!({"queue": "main"}));

        let item = plugin.resolve(SET_URL, &options).await.unwrap();

        let playlist = item.as_playlist().expect("set resolves to a playlist");
        assert_eq!(playlist.source(), "soundcloud");
        assert_eq!(playlist.name(), Some("Set 7"));
        assert_eq!(playlist.songs()[1].name(), Some("Filled 71"));
        assert_eq!(playlist.metadata(), Some(&json!({"queue": "main"})));
        assert_eq!(
            plugin.api().calls(),
            vec![format!("resolve:{}", SET_URL), "fetch_playlist:7".to_string()]
        );
    }

    #[tokio::test]
    async fn test_resolve_other_kinds_not_supported() {
        let mut resources = HashMap::new();
        resources.insert(TRACK_URL.to_string(), Resource::Other);
        let plugin = plugin(FakeApi {
            resources,
            ..Default::default()
        });

        let err = plugin
            .resolve(TRACK_URL, &ResolveOptions::default())
            .await
            .unwrap_err();

        assert!(ErrorCode::NotSupported.matches(&err));
    }

    // ------------------------------------------------------------------
    // related songs / stream url
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_related_songs_require_url() {
        let plugin = plugin(FakeApi::default());

        for song in [song_with_url(None), song_with_url(Some(""))] {
            let err = plugin.get_related_songs(&song).await.unwrap_err();
            assert!(ErrorCode::InvalidSong.matches(&err));
            assert_eq!(err.to_string(), "Cannot get related songs from invalid song.");
        }
        assert!(plugin.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_related_songs_skip_untitled_entries() {
        let mut untitled = track_fixture(3, "");
        untitled.title = None;
        let plugin = plugin(FakeApi {
            related: vec![track_fixture(1, "Kept"), track_fixture(2, ""), untitled],
            ..Default::default()
        });

        let songs = plugin
            .get_related_songs(&song_with_url(Some(TRACK_URL)))
            .await
            .unwrap();

        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].name(), Some("Kept"));
        assert_eq!(
            plugin.api().calls(),
            vec![format!("related_tracks:{}:10", TRACK_URL)]
        );
    }

    #[tokio::test]
    async fn test_stream_url_requires_url() {
        let plugin = plugin(FakeApi::default());

        let err = plugin
            .get_stream_url(&song_with_url(None))
            .await
            .unwrap_err();

        assert!(ErrorCode::InvalidSong.matches(&err));
        assert_eq!(err.to_string(), "Cannot get stream url from invalid song.");
    }

    #[tokio::test]
    async fn test_stream_url_missing_link_is_rate_limited() {
        let plugin = plugin(FakeApi::default());

        let err = plugin
            .get_stream_url(&song_with_url(Some(TRACK_URL)))
            .await
            .unwrap_err();

        assert!(ErrorCode::RateLimited.matches(&err));
        assert!(err.to_string().starts_with("Reached SoundCloud rate limits"));
    }

    #[tokio::test]
    async fn test_stream_url_returns_link() {
        let plugin = plugin(FakeApi {
            stream: Some("https://cf-media.sndcdn.com/a.mp3".to_string()),
            ..Default::default()
        });

        let link = plugin
            .get_stream_url(&song_with_url(Some(TRACK_URL)))
            .await
            .unwrap();

        assert_eq!(link, "https://cf-media.sndcdn.com/a.mp3");
    }

    // ------------------------------------------------------------------
    // host dispatch
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_host_dispatches_back_by_source_tag() {
        let mut resources = HashMap::new();
        resources.insert(
            TRACK_URL.to_string(),
            Resource::Track(track_fixture(293, "Flickermood")),
        );
        let plugins: Vec<Arc<dyn ExtractorPlugin>> = vec![Arc::new(plugin(FakeApi {
            tracks: vec![track_fixture(1, "One"), track_fixture(2, "Two")],
            resources,
            stream: Some("https://cf-media.sndcdn.com/b.mp3".to_string()),
            ..Default::default()
        }))];

        let found = plugins[0]
            .search("forss", SearchType::Track, 1, &ResolveOptions::default())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source(), "soundcloud");

        let err = plugins[0]
            .search("forss", SearchType::Track, 0, &ResolveOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_TYPE");

        let by_url = plugins[0]
            .search(TRACK_URL, SearchType::Playlist, 5, &ResolveOptions::default())
            .await
            .unwrap();
        assert!(by_url[0].as_song().is_some());

        let song = plugins[0]
            .resolve(TRACK_URL, &ResolveOptions::default())
            .await
            .unwrap()
            .into_song()
            .unwrap();

        let owner = plugin_for_song(&plugins, &song).expect("song source maps to a plugin");
        assert_eq!(owner.name(), "soundcloud");
        assert!(owner.validate(TRACK_URL));
        assert_eq!(
            owner.get_stream_url(&song).await.unwrap(),
            "https://cf-media.sndcdn.com/b.mp3"
        );
    }
}
