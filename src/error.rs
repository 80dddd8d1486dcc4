use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed configuration; reported before any API call.
    #[error("configuration error: {0}")]
    Config(String),

    /// The Web API answered 404, e.g. because no device is active.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("spotify api error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("nothing is playing right now")]
    NothingPlaying,

    #[error("invalid spotify uri: {0}")]
    InvalidUri(String),

    #[error("field {0} not found")]
    FieldNotFound(String),

    #[error("notification failed: {0}")]
    Notification(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
