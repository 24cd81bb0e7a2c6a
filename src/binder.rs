//! Resolves a track's transport and attaches it to the sink.
//!
//! Resolution order: a registered custom transport whose name matches the
//! track's type wins; otherwise `normal`/`hls` are taken literally and `auto`
//! looks at the URL. Adaptive streams go through an [`AdaptiveStreaming`]
//! delegate when one is available, else through the sink's native support.

mod adaptive;

pub use adaptive::{AdaptiveStreaming, StreamDelegate};

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::TransportError;
use crate::sink::MediaSink;
use crate::track::{Track, TransportKind};

static SEGMENTED_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)m3u8(#|\?|$)").expect("static pattern"));

/// MIME types a sink may natively accept for segmented streams.
const NATIVE_HLS_TYPES: &[&str] = &["application/x-mpegURL", "application/vnd.apple.mpegURL"];

/// What a custom transport gets to see besides the sink and the track.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BindContext {
    pub index: usize,
    pub paused: bool,
}

/// A named custom transport.
pub trait TransportResolver {
    fn bind(
        &self,
        sink: &mut dyn MediaSink,
        track: &Track,
        ctx: &BindContext,
    ) -> Result<(), TransportError>;
}

impl<F> TransportResolver for F
where
    F: Fn(&mut dyn MediaSink, &Track, &BindContext) -> Result<(), TransportError>,
{
    fn bind(
        &self,
        sink: &mut dyn MediaSink,
        track: &Track,
        ctx: &BindContext,
    ) -> Result<(), TransportError> {
        self(sink, track, ctx)
    }
}

/// How the last track ended up attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Direct,
    /// Through the adaptive-streaming delegate.
    Adaptive,
    /// Segmented stream handed straight to a sink that plays it natively.
    NativeAdaptive,
    Custom(String),
}

/// Resolved transport for a track, before anything is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Custom(String),
    Hls,
    Normal,
    Unknown(String),
}

pub fn is_segmented_url(url: &str) -> bool {
    SEGMENTED_URL.is_match(url)
}

#[derive(Default)]
pub struct SourceBinder {
    custom: HashMap<String, Box<dyn TransportResolver>>,
    adaptive: Option<Box<dyn AdaptiveStreaming>>,
    delegate: Option<Box<dyn StreamDelegate>>,
}

impl SourceBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_adaptive(&mut self, adaptive: Box<dyn AdaptiveStreaming>) {
        self.adaptive = Some(adaptive);
    }

    /// Register a custom transport. Names are checked here, not at bind time.
    pub fn register(
        &mut self,
        name: &str,
        resolver: Box<dyn TransportResolver>,
    ) -> Result<(), TransportError> {
        let name = name.trim();
        if name.is_empty() || name == "auto" {
            return Err(TransportError::InvalidName(name.to_string()));
        }
        if self.custom.contains_key(name) {
            return Err(TransportError::DuplicateName(name.to_string()));
        }
        self.custom.insert(name.to_string(), resolver);
        Ok(())
    }

    pub fn route(&self, track: &Track) -> Route {
        let name = track.kind.as_str();
        if self.custom.contains_key(name) {
            return Route::Custom(name.to_string());
        }
        match &track.kind {
            TransportKind::Auto if is_segmented_url(&track.url) => Route::Hls,
            TransportKind::Auto | TransportKind::Normal => Route::Normal,
            TransportKind::Hls => Route::Hls,
            TransportKind::Custom(name) => Route::Unknown(name.clone()),
        }
    }

    /// Attach `track` to `sink`, releasing any previous delegate first.
    ///
    /// On error the sink is left without a source.
    pub fn bind(
        &mut self,
        sink: &mut dyn MediaSink,
        track: &Track,
        ctx: &BindContext,
    ) -> Result<Binding, TransportError> {
        self.release();

        let result = match self.route(track) {
            Route::Custom(name) => match self.custom.get(&name) {
                Some(resolver) => resolver
                    .bind(sink, track, ctx)
                    .map(|()| Binding::Custom(name)),
                None => Err(TransportError::UnknownCustomType(name)),
            },
            Route::Unknown(name) => Err(TransportError::UnknownCustomType(name)),
            Route::Normal => {
                sink.set_source(Some(&track.url));
                Ok(Binding::Direct)
            }
            Route::Hls => self.bind_adaptive(sink, &track.url),
        };

        match &result {
            Ok(binding) => debug!(url = %track.url, ?binding, "source bound"),
            Err(_) => sink.set_source(None),
        }
        result
    }

    fn bind_adaptive(
        &mut self,
        sink: &mut dyn MediaSink,
        url: &str,
    ) -> Result<Binding, TransportError> {
        if let Some(adaptive) = self.adaptive.as_ref().filter(|a| a.is_supported()) {
            let mut delegate = adaptive.create();
            let attached = delegate
                .load_source(url)
                .and_then(|()| delegate.attach(sink));
            if let Err(e) = attached {
                delegate.destroy();
                return Err(e);
            }
            self.delegate = Some(delegate);
            return Ok(Binding::Adaptive);
        }
        if NATIVE_HLS_TYPES.iter().any(|t| sink.can_play_type(t)) {
            sink.set_source(Some(url));
            return Ok(Binding::NativeAdaptive);
        }
        Err(TransportError::Unsupported("HLS".to_string()))
    }

    /// Tear down the adaptive delegate, if any. Safe to call repeatedly.
    pub fn release(&mut self) {
        if let Some(mut delegate) = self.delegate.take() {
            delegate.destroy();
        }
    }

    pub fn has_delegate(&self) -> bool {
        self.delegate.is_some()
    }
}

impl Drop for SourceBinder {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests;
