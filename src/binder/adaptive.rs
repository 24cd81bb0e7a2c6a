//! The pluggable adaptive-streaming transport.

use crate::error::TransportError;
use crate::sink::MediaSink;

/// Factory for stream delegates; stands for the platform's adaptive
/// streaming support.
pub trait AdaptiveStreaming {
    /// False when the platform cannot run a delegate at all.
    fn is_supported(&self) -> bool;
    fn create(&self) -> Box<dyn StreamDelegate>;
}

/// One live demuxing session feeding the sink. Owned by the binder and
/// destroyed before the next bind.
pub trait StreamDelegate {
    fn load_source(&mut self, url: &str) -> Result<(), TransportError>;
    fn attach(&mut self, sink: &mut dyn MediaSink) -> Result<(), TransportError>;
    fn destroy(&mut self);
}
