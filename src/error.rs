//! Error types shared across the engine.

use thiserror::Error;

/// Failures reported by a [`MediaSink`](crate::sink::MediaSink).
#[derive(Error, Debug)]
pub enum SinkError {
    /// Playback start refused by policy (autoplay restrictions and the like).
    #[error("playback not allowed: {0}")]
    NotAllowed(String),
    /// The bound source cannot be decoded or played.
    #[error("source not supported: {0}")]
    NotSupported(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("no source bound to the sink")]
    NoSource,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SinkError {
    /// Rejections force the session back into the paused state.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            SinkError::NotAllowed(_) | SinkError::NotSupported(_) | SinkError::NoSource
        )
    }
}

/// Failures while resolving or attaching a track's transport.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{0} is not supported")]
    Unsupported(String),
    #[error("illegal custom transport type: {0}")]
    UnknownCustomType(String),
    #[error("invalid custom transport name {0:?}")]
    InvalidName(String),
    #[error("custom transport {0:?} is already registered")]
    DuplicateName(String),
    #[error("transport delegate failed: {0}")]
    Delegate(String),
}

/// Failures of the preference store.
#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid preference file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors returned by the public [`Player`](crate::player::Player) API.
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("playback rejected: {0}")]
    Rejected(#[from] SinkError),
    #[error("track index {index} is out of range for a playlist of {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("player has been destroyed")]
    Destroyed,
    #[error(transparent)]
    Transport(#[from] TransportError),
}
