//! Spotify URIs.
//!
//! Accepts the canonical `spotify:<kind>:<id>` form, the legacy
//! `spotify:user:<name>:playlist:<id>` form and `https://open.spotify.com`
//! share links (with or without query string or locale prefix).

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UriKind {
    Track,
    Episode,
    Album,
    Artist,
    Playlist,
    Show,
}

impl UriKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UriKind::Track => "track",
            UriKind::Episode => "episode",
            UriKind::Album => "album",
            UriKind::Artist => "artist",
            UriKind::Playlist => "playlist",
            UriKind::Show => "show",
        }
    }

    /// Containers that can be the subject of contextual playback.
    pub fn is_context(&self) -> bool {
        matches!(
            self,
            UriKind::Album | UriKind::Artist | UriKind::Playlist | UriKind::Show
        )
    }

    /// Items that can be streamed on their own.
    pub fn is_playable(&self) -> bool {
        matches!(self, UriKind::Track | UriKind::Episode)
    }
}

impl FromStr for UriKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "track" => Ok(UriKind::Track),
            "episode" => Ok(UriKind::Episode),
            "album" => Ok(UriKind::Album),
            "artist" => Ok(UriKind::Artist),
            "playlist" => Ok(UriKind::Playlist),
            "show" => Ok(UriKind::Show),
            other => Err(Error::InvalidUri(format!("unknown type {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uri {
    pub kind: UriKind,
    pub id: String,
}

impl Uri {
    pub fn new(kind: UriKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn is_context(&self) -> bool {
        self.kind.is_context()
    }

    pub fn is_playable(&self) -> bool {
        self.kind.is_playable()
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spotify:{}:{}", self.kind.as_str(), self.id)
    }
}

impl FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidUri(s.to_string());

        if let Some(rest) = s.strip_prefix("spotify:") {
            let parts: Vec<&str> = rest.split(':').collect();
            let (kind, id) = match parts.as_slice() {
                [kind, id] => (*kind, *id),
                ["user", _, "playlist", id] => ("playlist", *id),
                _ => return Err(invalid()),
            };
            return parse_parts(kind, id).map_err(|_| invalid());
        }

        if let Some(rest) = s
            .strip_prefix("https://open.spotify.com/")
            .or_else(|| s.strip_prefix("http://open.spotify.com/"))
        {
            let path = rest.split(['?', '#']).next().unwrap_or_default();
            let segments: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
            // skip an optional locale segment like `intl-de`
            let segments = match segments.first() {
                Some(first) if first.starts_with("intl-") => &segments[1..],
                _ => &segments[..],
            };
            return match segments {
                [kind, id] => parse_parts(kind, id).map_err(|_| invalid()),
                ["user", _, "playlist", id] => parse_parts("playlist", id).map_err(|_| invalid()),
                _ => Err(invalid()),
            };
        }

        Err(invalid())
    }
}

fn parse_parts(kind: &str, id: &str) -> Result<Uri, Error> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::InvalidUri(id.to_string()));
    }
    Ok(Uri::new(kind.parse()?, id))
}

impl Serialize for Uri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Uri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
