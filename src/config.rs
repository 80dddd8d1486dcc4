//! Configuration management for spotcli.
//!
//! The configuration lives in an INI file (`~/.config/spotcli/config` on
//! Linux) with two sections:
//!
//! ```ini
//! [Authentication]
//! client_id = ...
//! client_secret = ...
//! redirect_uri = http://127.0.0.1:8888/callback
//!
//! [spotifyd]
//! notify = false
//! ```
//!
//! Only the `Authentication` section is needed, and only until the first
//! successful run has written the `authentication` cache file: from then on
//! the cache takes precedence over the config file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Res, management::AuthManager, types::Authentication};

/// Permissions requested from the user.
pub const SCOPE: &str = "playlist-read-private user-modify-playback-state user-library-read user-read-playback-state user-read-currently-playing user-read-recently-played user-read-playback-position user-read-private";

const APP_DIR: &str = "spotcli";

pub fn default_redirect_uri() -> String {
    "http://127.0.0.1:8888/callback".to_string()
}

/// Default location of the config file.
pub fn config_file() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push("config");
    path
}

/// Default location of the cache directory.
pub fn cache_dir() -> PathBuf {
    let mut path = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default, alias = "Authentication")]
    pub authentication: Option<AuthenticationSection>,
    #[serde(default)]
    pub spotifyd: Option<SpotifydSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthenticationSection {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifydSection {
    pub notify: Option<bool>,
}

impl Config {
    /// Reads the INI file at `path`. A missing file is an empty config; the
    /// error only surfaces once credentials are actually needed.
    pub async fn load(path: &Path) -> Res<Self> {
        if !path.is_file() {
            tracing::debug!("no config file at {}", path.display());
            return Ok(Self::default());
        }

        let content = async_fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Res<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Ini))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Whether the spotifyd hook may send notifications at all.
    pub fn notify_enabled(&self) -> bool {
        self.spotifyd
            .as_ref()
            .and_then(|s| s.notify)
            .unwrap_or(true)
    }

    /// Builds a fresh authentication context from the config credentials.
    pub fn authentication(&self) -> Res<Authentication> {
        let section = self
            .authentication
            .as_ref()
            .ok_or_else(|| Error::Config("missing section [Authentication]".to_string()))?;
        let client_id = section.client_id.clone().ok_or_else(|| {
            Error::Config("missing key client_id in section [Authentication]".to_string())
        })?;
        let client_secret = section.client_secret.clone().ok_or_else(|| {
            Error::Config("missing key client_secret in section [Authentication]".to_string())
        })?;

        Ok(Authentication {
            client_id,
            client_secret,
            scope: SCOPE.to_string(),
            redirect_uri: section
                .redirect_uri
                .clone()
                .unwrap_or_else(default_redirect_uri),
            token: None,
        })
    }
}

/// Loads the authentication context: the cached one if present, otherwise
/// one built from the config file.
pub async fn load_authentication(cache_dir: &Path, config: &Config) -> Res<Authentication> {
    if let Some(authentication) = AuthManager::new(cache_dir).load().await? {
        tracing::debug!("using cached authentication");
        return Ok(authentication);
    }

    tracing::info!("no cached authentication, using config credentials");
    config.authentication()
}
