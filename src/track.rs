//! Playlist entries.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// How a track's URL is attached to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransportKind {
    /// Infer from the URL: segmented playlists go adaptive, anything else direct.
    #[default]
    Auto,
    /// Bind the URL straight to the sink.
    Normal,
    /// HTTP live streaming through an adaptive-streaming delegate.
    Hls,
    /// Resolved by a custom transport registered under this name.
    Custom(String),
}

impl TransportKind {
    pub fn as_str(&self) -> &str {
        match self {
            TransportKind::Auto => "auto",
            TransportKind::Normal => "normal",
            TransportKind::Hls => "hls",
            TransportKind::Custom(name) => name,
        }
    }
}

impl FromStr for TransportKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TransportKind::from(s))
    }
}

impl From<&str> for TransportKind {
    fn from(s: &str) -> Self {
        match s.trim() {
            "" | "auto" => TransportKind::Auto,
            "normal" => TransportKind::Normal,
            "hls" => TransportKind::Hls,
            other => TransportKind::Custom(other.to_string()),
        }
    }
}

impl From<String> for TransportKind {
    fn from(s: String) -> Self {
        TransportKind::from(s.as_str())
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransportKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(TransportKind::from)
    }
}

/// One playlist entry. Only `theme` changes after load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub url: String,
    #[serde(default, rename = "type")]
    pub kind: TransportKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub cover: Option<String>,
    /// Per-track accent color.
    #[serde(default)]
    pub theme: Option<String>,
    /// Raw lyric text handed to the lyric collaborator.
    #[serde(default)]
    pub lrc: Option<String>,
}

impl Track {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: TransportKind::Auto,
            name: String::new(),
            artist: String::new(),
            cover: None,
            theme: None,
            lrc: None,
        }
    }

    pub fn with_kind(mut self, kind: TransportKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    pub fn with_theme(mut self, color: impl Into<String>) -> Self {
        self.theme = Some(color.into());
        self
    }

    /// "Artist - Name", or whichever half is present.
    pub fn display(&self) -> String {
        match (self.artist.trim(), self.name.trim()) {
            ("", "") => self.url.clone(),
            ("", name) => name.to_string(),
            (artist, "") => artist.to_string(),
            (artist, name) => format!("{artist} - {name}"),
        }
    }
}
