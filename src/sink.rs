//! The media sink: the single audio primitive a player instance owns.
//!
//! A sink never calls back into the player. It queues [`MediaEvent`]s that
//! the host drains through [`MediaSink::poll_events`] on its event loop.

mod rodio_sink;

#[cfg(test)]
pub(crate) mod fake;

pub use rodio_sink::RodioSink;

use std::time::Duration;

use crate::error::SinkError;
use crate::events::MediaEvent;

pub trait MediaSink {
    /// Bind `url` (or nothing). Resets position to zero and leaves the sink paused.
    fn set_source(&mut self, url: Option<&str>);
    fn source(&self) -> Option<String>;

    /// Whether the sink can natively play a container of this MIME type.
    fn can_play_type(&self, mime: &str) -> bool;

    fn play(&mut self) -> Result<(), SinkError>;
    fn pause(&mut self);
    fn is_paused(&self) -> bool;

    fn seek(&mut self, position: Duration);
    fn position(&self) -> Duration;
    /// `None` while unknown.
    fn duration(&self) -> Option<Duration>;
    /// End of the furthest buffered range.
    fn buffered(&self) -> Option<Duration>;

    fn set_volume(&mut self, volume: f64);
    fn volume(&self) -> f64;
    fn set_muted(&mut self, muted: bool);
    fn is_muted(&self) -> bool;

    /// Drain pending media signals, oldest first.
    fn poll_events(&mut self) -> Vec<MediaEvent>;
}
