//! # Spotify Integration Module
//!
//! This module is the boundary between the command handlers and Spotify's
//! Web API. The handlers only ever see the [`SpotifyApi`] trait; [`WebApi`] is
//! the HTTP implementation used by the binary, the tests use a recording mock.
//!
//! ## Architecture
//!
//! ```text
//! Command Handlers (cli)
//!          ↓
//! SpotifyApi trait
//!          ↓
//! WebApi
//!     ├── Authentication (authorization code flow, token refresh)
//!     ├── Player (playback state, play/pause/skip, shuffle, devices)
//!     └── Library (object lookups, playlists)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Authentication Strategy
//!
//! `WebApi` owns the [`Authentication`] context for the lifetime of the
//! process. Before every request the token is checked:
//!
//! 1. **No token yet**: the authorization code flow is run. A local callback
//!    server is bound to the redirect uri, the authorization page is opened in
//!    the browser and the returned code is exchanged for a token using the
//!    client secret.
//! 2. **Expired token** (with a four minute margin): the refresh token is
//!    exchanged for a new access token, in place.
//! 3. **Valid token**: used as is.
//!
//! The caller persists the (possibly refreshed) context when the command has
//! finished, see [`SpotifyApi::authentication`].
//!
//! ## Error Handling
//!
//! - `404 Not Found` becomes [`Error::NotFound`]. The player endpoints answer
//!   404 when no device is active, which the `play` command recovers from.
//! - `429 Too Many Requests` is retried after the delay named by the
//!   `Retry-After` header, as long as that delay is at most two minutes.
//! - Every other non-success status becomes [`Error::Api`] carrying the
//!   message of Spotify's error body.
//!
//! ## API Coverage
//!
//! - `GET /me/player` - Current playback state
//! - `PUT /me/player` - Transfer playback
//! - `GET /me/player/devices` - Available devices
//! - `PUT /me/player/play`, `PUT /me/player/pause` - Start/resume and pause
//! - `POST /me/player/next`, `POST /me/player/previous` - Skip
//! - `PUT /me/player/shuffle` - Shuffle state
//! - `GET /me/playlists` - Playlists of the user
//! - `GET /tracks/{id}`, `/episodes/{id}`, `/albums/{id}`, `/artists/{id}`,
//!   `/playlists/{id}`, `/shows/{id}` - Object lookups

pub mod auth;
mod library;
mod player;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, Response, StatusCode, header::CONTENT_LENGTH};
use serde_json::Value;
use tokio::{sync::Mutex, time::sleep};

use crate::{
    Error, Res,
    types::{ApiErrorResponse, Authentication, ContextObject, Device, PlayableItem, Playback, Playlist},
    uri::Uri,
};

pub const API_URL: &str = "https://api.spotify.com/v1";
pub const AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Longest `Retry-After` delay that is waited out instead of failing.
const MAX_RETRY_AFTER: u64 = 120;

/// What to start playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayRequest {
    /// Play a playlist, album, artist or show.
    Context(Uri),
    /// Play the given tracks and episodes in order.
    Items(Vec<Uri>),
    /// Resume whatever was playing.
    Resume,
}

/// Operations the command handlers need from the Web API.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// Runs the authorization flow, replacing any existing token.
    async fn authenticate(&self) -> Res<()>;

    /// Current playback state, `None` when nothing is playing anywhere.
    async fn current_playback(&self) -> Res<Option<Playback>>;

    async fn play(&self, request: &PlayRequest) -> Res<()>;

    async fn pause(&self, device_id: Option<&str>) -> Res<()>;

    async fn next(&self, device_id: Option<&str>) -> Res<()>;

    async fn previous(&self, device_id: Option<&str>) -> Res<()>;

    async fn set_shuffle(&self, state: bool, device_id: Option<&str>) -> Res<()>;

    async fn devices(&self) -> Res<Vec<Device>>;

    async fn transfer_playback(&self, device_id: &str) -> Res<()>;

    async fn playlists(&self) -> Res<Vec<Playlist>>;

    /// Looks up a track or episode.
    async fn item(&self, uri: &Uri) -> Res<PlayableItem>;

    /// Looks up a playlist, album, artist or show.
    async fn context(&self, uri: &Uri) -> Res<ContextObject>;

    /// Downloads an image, e.g. cover art.
    async fn fetch_image(&self, url: &str) -> Res<Vec<u8>>;

    /// The authentication context including any token obtained or
    /// refreshed during this process.
    async fn authentication(&self) -> Authentication;
}

/// HTTP implementation of [`SpotifyApi`].
pub struct WebApi {
    http: Client,
    auth: Mutex<Authentication>,
}

impl WebApi {
    pub fn new(authentication: Authentication) -> Self {
        Self {
            http: Client::new(),
            auth: Mutex::new(authentication),
        }
    }

    async fn access_token(&self) -> Res<String> {
        let mut current = self.auth.lock().await;
        let now = Utc::now().timestamp() as u64;

        match current.token.as_ref().map(|t| t.is_expired(now)) {
            None => {
                let token = auth::authorize(&self.http, &current).await?;
                current.token = Some(token);
            }
            Some(true) => {
                tracing::debug!("access token expired, refreshing");
                let token = auth::refresh_token(&self.http, &current).await?;
                current.token = Some(token);
            }
            Some(false) => {}
        }

        current.token
            .as_ref()
            .map(|t| t.access_token.clone())
            .ok_or_else(|| Error::Auth("no access token".to_string()))
    }

    /// Sends an authorized request. `path` is either relative to [`API_URL`]
    /// or an absolute url such as a paging `next` link.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Res<Response> {
        let url = if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{API_URL}{path}")
        };

        loop {
            let token = self.access_token().await?;
            tracing::debug!("{} {}", method, url);

            let mut request = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(&token)
                .query(query);
            request = match body {
                Some(body) => request.json(body),
                None if method != Method::GET => request.header(CONTENT_LENGTH, 0),
                None => request,
            };

            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                if retry_after <= MAX_RETRY_AFTER {
                    tracing::info!("rate limited, retrying in {} seconds", retry_after);
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
            }

            if status.is_success() {
                return Ok(response);
            }

            let message = error_message(response).await;
            return Err(match status {
                StatusCode::NOT_FOUND => Error::NotFound(message),
                status => Error::Api { status, message },
            });
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Res<T> {
        let response = self.send(Method::GET, path, query, None).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Extracts the message of a Web API error body, falling back to the status.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<ApiErrorResponse>(&text)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            if text.is_empty() {
                status.to_string()
            } else {
                text
            }
        })
}

#[async_trait]
impl SpotifyApi for WebApi {
    async fn authenticate(&self) -> Res<()> {
        let mut current = self.auth.lock().await;
        let token = auth::authorize(&self.http, &current).await?;
        current.token = Some(token);
        Ok(())
    }

    async fn current_playback(&self) -> Res<Option<Playback>> {
        self.get_playback().await
    }

    async fn play(&self, request: &PlayRequest) -> Res<()> {
        self.start_playback(request).await
    }

    async fn pause(&self, device_id: Option<&str>) -> Res<()> {
        self.player_command(Method::PUT, "/me/player/pause", device_id)
            .await
    }

    async fn next(&self, device_id: Option<&str>) -> Res<()> {
        self.player_command(Method::POST, "/me/player/next", device_id)
            .await
    }

    async fn previous(&self, device_id: Option<&str>) -> Res<()> {
        self.player_command(Method::POST, "/me/player/previous", device_id)
            .await
    }

    async fn set_shuffle(&self, state: bool, device_id: Option<&str>) -> Res<()> {
        self.shuffle(state, device_id).await
    }

    async fn devices(&self) -> Res<Vec<Device>> {
        self.get_devices().await
    }

    async fn transfer_playback(&self, device_id: &str) -> Res<()> {
        self.transfer(device_id).await
    }

    async fn playlists(&self) -> Res<Vec<Playlist>> {
        self.get_playlists().await
    }

    async fn item(&self, uri: &Uri) -> Res<PlayableItem> {
        self.get_item(uri).await
    }

    async fn context(&self, uri: &Uri) -> Res<ContextObject> {
        self.get_context(uri).await
    }

    async fn fetch_image(&self, url: &str) -> Res<Vec<u8>> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn authentication(&self) -> Authentication {
        self.auth.lock().await.clone()
    }
}
