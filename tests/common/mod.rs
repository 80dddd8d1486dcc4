#![allow(dead_code)]

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use serde_json::json;
use spotcli::{
    Error, Res, config,
    notify::Notifier,
    spotify::{PlayRequest, SpotifyApi},
    types::{
        Album, Artist, Authentication, Context, ContextObject, Device, Episode, Image,
        PlayableItem, Playback, Playlist, Show, Token, Track,
    },
    uri::Uri,
};

/// A call made against the mock client.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Authenticate,
    CurrentPlayback,
    Play(PlayRequest),
    Pause(Option<String>),
    Next(Option<String>),
    Previous(Option<String>),
    Shuffle(bool, Option<String>),
    Devices,
    Transfer(String),
    Playlists,
    Item(String),
    Context(String),
    FetchImage(String),
}

/// Records every call and answers from canned data.
#[derive(Default)]
pub struct MockApi {
    pub calls: Mutex<Vec<Call>>,
    pub playback: Option<Playback>,
    pub devices: Vec<Device>,
    pub playlists: Vec<Playlist>,
    pub items: Vec<PlayableItem>,
    pub contexts: Vec<ContextObject>,
    /// Results of successive `play` calls; `Ok(())` once exhausted.
    pub play_results: Mutex<VecDeque<Res<()>>>,
}

impl MockApi {
    pub fn playing(playback: Playback) -> Self {
        Self {
            playback: Some(playback),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SpotifyApi for MockApi {
    async fn authenticate(&self) -> Res<()> {
        self.record(Call::Authenticate);
        Ok(())
    }

    async fn current_playback(&self) -> Res<Option<Playback>> {
        self.record(Call::CurrentPlayback);
        Ok(self.playback.clone())
    }

    async fn play(&self, request: &PlayRequest) -> Res<()> {
        self.record(Call::Play(request.clone()));
        self.play_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn pause(&self, device_id: Option<&str>) -> Res<()> {
        self.record(Call::Pause(device_id.map(str::to_string)));
        Ok(())
    }

    async fn next(&self, device_id: Option<&str>) -> Res<()> {
        self.record(Call::Next(device_id.map(str::to_string)));
        Ok(())
    }

    async fn previous(&self, device_id: Option<&str>) -> Res<()> {
        self.record(Call::Previous(device_id.map(str::to_string)));
        Ok(())
    }

    async fn set_shuffle(&self, state: bool, device_id: Option<&str>) -> Res<()> {
        self.record(Call::Shuffle(state, device_id.map(str::to_string)));
        Ok(())
    }

    async fn devices(&self) -> Res<Vec<Device>> {
        self.record(Call::Devices);
        Ok(self.devices.clone())
    }

    async fn transfer_playback(&self, device_id: &str) -> Res<()> {
        self.record(Call::Transfer(device_id.to_string()));
        Ok(())
    }

    async fn playlists(&self) -> Res<Vec<Playlist>> {
        self.record(Call::Playlists);
        Ok(self.playlists.clone())
    }

    async fn item(&self, uri: &Uri) -> Res<PlayableItem> {
        self.record(Call::Item(uri.to_string()));
        self.items
            .iter()
            .find(|item| item.uri() == uri.to_string())
            .cloned()
            .ok_or_else(|| Error::NotFound(uri.to_string()))
    }

    async fn context(&self, uri: &Uri) -> Res<ContextObject> {
        self.record(Call::Context(uri.to_string()));
        self.contexts
            .iter()
            .find(|c| c.uri == uri.to_string())
            .cloned()
            .ok_or_else(|| Error::NotFound(uri.to_string()))
    }

    async fn fetch_image(&self, url: &str) -> Res<Vec<u8>> {
        self.record(Call::FetchImage(url.to_string()));
        Ok(b"image".to_vec())
    }

    async fn authentication(&self) -> Authentication {
        authentication()
    }
}

/// Records notifications instead of showing them.
#[derive(Default)]
pub struct MockNotifier {
    pub sent: Mutex<Vec<(String, String, Option<PathBuf>)>>,
}

impl MockNotifier {
    pub fn sent(&self) -> Vec<(String, String, Option<PathBuf>)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, title: &str, description: &str, icon: Option<&Path>) -> Res<()> {
        self.sent.lock().unwrap().push((
            title.to_string(),
            description.to_string(),
            icon.map(Path::to_path_buf),
        ));
        Ok(())
    }
}

// Helper function to create a test device
pub fn device(id: &str, name: &str) -> Device {
    Device {
        id: Some(id.to_string()),
        name: name.to_string(),
        kind: "Computer".to_string(),
        is_active: true,
        is_restricted: false,
        volume_percent: Some(80),
    }
}

// Helper function to create a test track
pub fn track(id: &str, name: &str) -> PlayableItem {
    PlayableItem::Track(Track {
        id: Some(id.to_string()),
        name: name.to_string(),
        uri: format!("spotify:track:{id}"),
        duration_ms: 200_000,
        artists: vec![
            Artist {
                id: Some("artist1".to_string()),
                name: "First Artist".to_string(),
                uri: "spotify:artist:artist1".to_string(),
            },
            Artist {
                id: Some("artist2".to_string()),
                name: "Second Artist".to_string(),
                uri: "spotify:artist:artist2".to_string(),
            },
        ],
        album: Album {
            id: Some("album1".to_string()),
            name: "Test Album".to_string(),
            uri: "spotify:album:album1".to_string(),
            images: vec![
                Image {
                    url: "https://i.scdn.co/image/large".to_string(),
                    height: Some(640),
                    width: Some(640),
                },
                Image {
                    url: "https://i.scdn.co/image/small".to_string(),
                    height: Some(64),
                    width: Some(64),
                },
            ],
        },
    })
}

// Helper function to create a test episode
pub fn episode(id: &str, name: &str) -> PlayableItem {
    PlayableItem::Episode(Episode {
        id: Some(id.to_string()),
        name: name.to_string(),
        uri: format!("spotify:episode:{id}"),
        duration_ms: 1_800_000,
        images: vec![],
        show: Show {
            id: Some("show1".to_string()),
            name: "Test Show".to_string(),
            uri: "spotify:show:show1".to_string(),
            publisher: "Test Publisher".to_string(),
            images: vec![],
        },
    })
}

// Helper function to create a playback state playing `item` from a playlist
pub fn playback(item: PlayableItem) -> Playback {
    Playback {
        device: device("abc123", "Desk"),
        shuffle_state: false,
        repeat_state: "off".to_string(),
        timestamp: 1_700_000_000_000,
        context: Some(Context {
            uri: "spotify:playlist:pl1".to_string(),
            kind: "playlist".to_string(),
            href: None,
        }),
        progress_ms: Some(42_000),
        item: Some(item),
        currently_playing_type: "track".to_string(),
        actions: json!({"disallows": {"resuming": true}}),
        is_playing: true,
    }
}

pub fn playlist_context() -> ContextObject {
    ContextObject {
        uri: "spotify:playlist:pl1".to_string(),
        name: Some("Morning Mix".to_string()),
    }
}

// Helper function to create an authentication context holding a token
pub fn authentication() -> Authentication {
    Authentication {
        client_id: "config_id".to_string(),
        client_secret: "config_secret".to_string(),
        scope: config::SCOPE.to_string(),
        redirect_uri: config::default_redirect_uri(),
        token: Some(Token {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            scope: config::SCOPE.to_string(),
            expires_in: 3600,
            obtained_at: 1_700_000_000,
        }),
    }
}
