use serde::{Deserialize, Serialize};
use serde_json::Value;

/// OAuth token as returned by the accounts service, stamped with the time it
/// was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    /// Seconds before the real expiry at which the token is already treated
    /// as expired.
    pub const EXPIRY_MARGIN: u64 = 240;

    pub fn is_expired(&self, now: u64) -> bool {
        now >= (self.obtained_at + self.expires_in).saturating_sub(Self::EXPIRY_MARGIN)
    }
}

/// Everything needed to talk to the Web API on behalf of the user.
///
/// Persisted as the `authentication` cache file at the end of every
/// invocation so refreshed tokens survive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authentication {
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
    #[serde(default = "crate::config::default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default)]
    pub token: Option<Token>,
}

/// Shared between the authorization flow and the callback handler while the
/// user grants access in the browser.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    pub state: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token: Option<Token>,
}

/// Reduced form of a domain object: identity and display name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalRecord {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Objects that can be written to caches and JSON output in minimal form.
pub trait Cacheable {
    fn minimal(&self) -> MinimalRecord;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub album: Album,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Show {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub show: Show,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlayableItem {
    Track(Track),
    Episode(Episode),
}

impl PlayableItem {
    pub fn id(&self) -> Option<&str> {
        match self {
            PlayableItem::Track(t) => t.id.as_deref(),
            PlayableItem::Episode(e) => e.id.as_deref(),
        }
    }

    pub fn uri(&self) -> &str {
        match self {
            PlayableItem::Track(t) => &t.uri,
            PlayableItem::Episode(e) => &e.uri,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PlayableItem::Track(t) => &t.name,
            PlayableItem::Episode(e) => &e.name,
        }
    }

    /// Cover art: the album's for tracks, the episode's own for episodes.
    pub fn images(&self) -> &[Image] {
        match self {
            PlayableItem::Track(t) => &t.album.images,
            PlayableItem::Episode(e) => &e.images,
        }
    }

    /// Second line of a notification: artists and album, or the show.
    pub fn description(&self) -> String {
        match self {
            PlayableItem::Track(t) => {
                let artists = t
                    .artists
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} - {}", artists, t.album.name)
            }
            PlayableItem::Episode(e) => e.show.name.clone(),
        }
    }
}

/// Context object as embedded in the playback state. Carries no name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub uri: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// A context looked up by its uri (playlist, album, artist or show).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextObject {
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_restricted: bool,
    #[serde(default)]
    pub volume_percent: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<Device>,
}

/// Response of `GET /me/player`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    pub device: Device,
    #[serde(default)]
    pub shuffle_state: bool,
    #[serde(default)]
    pub repeat_state: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub context: Option<Context>,
    #[serde(default)]
    pub progress_ms: Option<u64>,
    #[serde(default)]
    pub item: Option<PlayableItem>,
    #[serde(default)]
    pub currently_playing_type: String,
    #[serde(default)]
    pub actions: Value,
    #[serde(default)]
    pub is_playing: bool,
}

/// Content of the `status` cache file: a playback state whose item and
/// context are stored in minimal form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub device: Device,
    pub shuffle_state: bool,
    pub repeat_state: String,
    pub timestamp: i64,
    pub context: Option<MinimalRecord>,
    pub progress_ms: Option<u64>,
    pub item: Option<MinimalRecord>,
    pub currently_playing_type: String,
    #[serde(default)]
    pub actions: Value,
    pub is_playing: bool,
}

impl Status {
    /// Bare id of the cached item, taken from its uri.
    pub fn item_id(&self) -> Option<String> {
        self.item
            .as_ref()
            .and_then(|item| item.uri.parse::<crate::uri::Uri>().ok())
            .map(|uri| uri.id)
    }
}

impl From<&Playback> for Status {
    fn from(playback: &Playback) -> Self {
        Self {
            device: playback.device.clone(),
            shuffle_state: playback.shuffle_state,
            repeat_state: playback.repeat_state.clone(),
            timestamp: playback.timestamp,
            context: playback.context.as_ref().map(Cacheable::minimal),
            progress_ms: playback.progress_ms,
            item: playback.item.as_ref().map(Cacheable::minimal),
            currently_playing_type: playback.currently_playing_type.clone(),
            actions: playback.actions.clone(),
            is_playing: playback.is_playing,
        }
    }
}

/// Playback state with the context resolved to a named object. Built either
/// from a live query or from the status cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub device: Device,
    pub shuffle_state: bool,
    pub repeat_state: String,
    pub timestamp: i64,
    pub context: Option<ContextObject>,
    pub progress_ms: Option<u64>,
    pub item: Option<PlayableItem>,
    pub currently_playing_type: String,
    pub actions: Value,
    pub is_playing: bool,
}

impl Snapshot {
    pub fn from_playback(playback: Playback, context: Option<ContextObject>) -> Self {
        Self {
            device: playback.device,
            shuffle_state: playback.shuffle_state,
            repeat_state: playback.repeat_state,
            timestamp: playback.timestamp,
            context,
            progress_ms: playback.progress_ms,
            item: playback.item,
            currently_playing_type: playback.currently_playing_type,
            actions: playback.actions,
            is_playing: playback.is_playing,
        }
    }

    pub fn from_status(
        status: Status,
        item: Option<PlayableItem>,
        context: Option<ContextObject>,
    ) -> Self {
        Self {
            device: status.device,
            shuffle_state: status.shuffle_state,
            repeat_state: status.repeat_state,
            timestamp: status.timestamp,
            context,
            progress_ms: status.progress_ms,
            item,
            currently_playing_type: status.currently_playing_type,
            actions: status.actions,
            is_playing: status.is_playing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub message: String,
}

impl Cacheable for Artist {
    fn minimal(&self) -> MinimalRecord {
        MinimalRecord {
            uri: self.uri.clone(),
            name: Some(self.name.clone()),
        }
    }
}

impl Cacheable for Album {
    fn minimal(&self) -> MinimalRecord {
        MinimalRecord {
            uri: self.uri.clone(),
            name: Some(self.name.clone()),
        }
    }
}

impl Cacheable for Show {
    fn minimal(&self) -> MinimalRecord {
        MinimalRecord {
            uri: self.uri.clone(),
            name: Some(self.name.clone()),
        }
    }
}

impl Cacheable for PlayableItem {
    fn minimal(&self) -> MinimalRecord {
        MinimalRecord {
            uri: self.uri().to_string(),
            name: Some(self.name().to_string()),
        }
    }
}

impl Cacheable for Context {
    fn minimal(&self) -> MinimalRecord {
        MinimalRecord {
            uri: self.uri.clone(),
            name: None,
        }
    }
}

impl Cacheable for ContextObject {
    fn minimal(&self) -> MinimalRecord {
        MinimalRecord {
            uri: self.uri.clone(),
            name: self.name.clone(),
        }
    }
}
