//! Playback orchestration for a single media sink: playlist traversal with
//! ordering and loop policies, mutual exclusion between player instances,
//! transient notices and UI-state sync through a typed event bus.
//!
//! The engine is single-threaded. Hosts drive it by calling
//! [`Player::pump`] (or feeding [`MediaEvent`]s and calling
//! [`Player::poll_timers`]) from their own loop.

pub mod binder;
pub mod config;
pub mod error;
pub mod events;
pub mod library;
pub mod player;
pub mod prefs;
pub mod registry;
pub mod runtime;
pub mod sequencer;
pub mod sink;
pub mod surface;
pub mod timer;
pub mod track;

pub use error::{PlayerError, PreferenceError, SinkError, TransportError};
pub use events::{Event, EventBus, MediaEvent, Subscription, Topic};
pub use player::{Player, PlayerBuilder, PlayerOptions};
pub use registry::Registry;
pub use sequencer::{LoopMode, OrderMode, Policy};
pub use sink::{MediaSink, RodioSink};
pub use track::{Track, TransportKind};
