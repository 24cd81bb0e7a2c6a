//! The playback orchestration engine.
//!
//! A [`Player`] owns one media sink and decides what it does at every
//! transition: manual switch, natural end of track, play/pause, seek and
//! volume. Observers learn about it through the event bus and the render
//! surface.
//!
//! Everything is single-threaded. The host drives the engine from its event
//! loop with [`Player::pump`], which drains sink events and fires due timers.
//!
//! Internal state lives behind `RefCell`s. No borrow is held while the bus
//! dispatches or while peers are paused, so handlers may call back into the
//! player freely.

mod builder;
mod notice;
mod options;
mod reactions;
mod sequencing;
mod transport;

pub use builder::PlayerBuilder;
pub use options::PlayerOptions;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::info;

use crate::binder::SourceBinder;
use crate::error::PlayerError;
use crate::events::{Event, EventBus, MediaEvent, Subscription, Topic};
use crate::prefs::PreferenceStore;
use crate::registry::{InstanceId, Pausable, Registry};
use crate::sequencer::{LoopMode, OrderMode, Playlist, Policy};
use crate::sink::MediaSink;
use crate::surface::{Change, Icon, Renderer, View};
use crate::timer::{Clock, TimerId, Timers};
use crate::track::Track;

/// Delay before the play/pause glyph is drawn after the button flips.
const GLYPH_DELAY: Duration = Duration::from_millis(100);
const WATCHDOG_INTERVAL: Duration = Duration::from_millis(100);

const AUDIO_ERROR_NOTICE: &str = "An audio error has occurred.";

/// Receives the time cursor of the active track.
pub trait LyricCursor {
    fn switch(&mut self, index: usize);
    fn update(&mut self, position: Duration);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum TimerKind {
    Glyph(Icon),
    LoadingCheck,
    NoticeHide,
}

/// Stuck-loading detector, armed between play and pause.
struct Watchdog {
    timer: TimerId,
    last: Duration,
    loading: bool,
}

struct State {
    paused: bool,
    playlist: Playlist,
    policy: Policy,
    timers: Timers<TimerKind>,
    glyph: Option<TimerId>,
    notice: Option<TimerId>,
    watchdog: Option<Watchdog>,
}

struct Inner {
    id: InstanceId,
    options: PlayerOptions,
    bus: EventBus,
    registry: Registry,
    clock: Rc<dyn Clock>,
    state: RefCell<State>,
    sink: RefCell<Box<dyn MediaSink>>,
    binder: RefCell<SourceBinder>,
    view: RefCell<Renderer>,
    prefs: RefCell<Box<dyn PreferenceStore>>,
    lyrics: RefCell<Option<Box<dyn LyricCursor>>>,
    subscriptions: RefCell<Vec<Subscription>>,
    destroyed: Cell<bool>,
}

/// Fill ratio of `part` over `whole`; zero while `whole` is unknown.
fn ratio(part: Duration, whole: Option<Duration>) -> f64 {
    match whole {
        Some(w) if !w.is_zero() => part.as_secs_f64() / w.as_secs_f64(),
        _ => 0.0,
    }
}

impl Inner {
    fn alive(&self) -> Result<(), PlayerError> {
        if self.destroyed.get() {
            return Err(PlayerError::Destroyed);
        }
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn render(&self, change: Change) {
        self.view.borrow_mut().set(change);
    }

    fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        self.bus.trigger(&Event::Destroy);
        self.pause();
        self.sink.borrow_mut().set_source(None);
        self.binder.borrow_mut().release();
        {
            let mut st = self.state.borrow_mut();
            st.timers.clear();
            st.glyph = None;
            st.notice = None;
            st.watchdog = None;
        }
        for sub in self.subscriptions.take() {
            self.bus.off(&sub);
        }
        self.bus.clear();
        self.registry.remove(self.id);
        info!(id = ?self.id, "player destroyed");
    }
}

impl Pausable for Inner {
    fn pause(&self) {
        if !self.destroyed.get() {
            Inner::pause(self);
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.registry.remove(self.id);
    }
}

/// Handle to one player instance. Clones share the instance.
#[derive(Clone)]
pub struct Player {
    inner: Rc<Inner>,
}

impl Player {
    pub fn builder(sink: Box<dyn MediaSink>) -> PlayerBuilder {
        PlayerBuilder::new(sink)
    }

    pub fn id(&self) -> InstanceId {
        self.inner.id
    }

    /// Start playback. A sink rejection leaves the player paused and is
    /// returned as [`PlayerError::Rejected`].
    pub fn play(&self) -> Result<(), PlayerError> {
        self.inner.alive()?;
        self.inner.play()
    }

    pub fn pause(&self) {
        if self.inner.alive().is_ok() {
            self.inner.pause();
        }
    }

    pub fn toggle(&self) -> Result<(), PlayerError> {
        self.inner.alive()?;
        if self.inner.is_paused() {
            self.inner.play()
        } else {
            self.inner.pause();
            Ok(())
        }
    }

    /// Jump to `secs`, clamped to the known duration (0 while unknown).
    pub fn seek(&self, secs: f64) {
        if self.inner.alive().is_ok() {
            self.inner.seek(secs);
        }
    }

    /// Effective volume: 0 while muted.
    pub fn volume(&self) -> f64 {
        self.inner.volume()
    }

    /// Set the volume, clamped to `[0, 1]`, and unmute. `NaN` changes
    /// nothing. Returns the effective volume.
    pub fn set_volume(&self, level: f64, persist: bool) -> f64 {
        if self.inner.alive().is_err() {
            return self.inner.volume();
        }
        self.inner.set_volume(level, persist)
    }

    pub fn toggle_mute(&self) {
        if self.inner.alive().is_ok() {
            self.inner.toggle_mute();
        }
    }

    pub fn is_muted(&self) -> bool {
        self.inner.sink.borrow().is_muted()
    }

    pub fn switch_to(&self, index: usize) -> Result<(), PlayerError> {
        self.inner.alive()?;
        self.inner.switch_to(index)
    }

    pub fn skip_forward(&self) -> Result<(), PlayerError> {
        self.inner.alive()?;
        self.inner.skip(true)
    }

    pub fn skip_back(&self) -> Result<(), PlayerError> {
        self.inner.alive()?;
        self.inner.skip(false)
    }

    pub fn set_order(&self, order: OrderMode) {
        if self.inner.alive().is_ok() {
            self.inner.state.borrow_mut().policy.order = order;
        }
    }

    pub fn set_loop(&self, looping: LoopMode) {
        if self.inner.alive().is_ok() {
            self.inner.state.borrow_mut().policy.looping = looping;
        }
    }

    pub fn add(&self, tracks: Vec<Track>) -> Result<(), PlayerError> {
        self.inner.alive()?;
        self.inner.add(tracks)
    }

    pub fn remove(&self, index: usize) -> Result<(), PlayerError> {
        self.inner.alive()?;
        self.inner.remove(index)
    }

    pub fn clear(&self) -> Result<(), PlayerError> {
        self.inner.alive()?;
        self.inner.clear();
        Ok(())
    }

    pub fn set_accent(&self, index: usize, color: impl Into<String>) -> Result<(), PlayerError> {
        self.inner.alive()?;
        self.inner.set_accent(index, color.into())
    }

    pub fn on<F>(&self, topic: impl Into<Topic>, handler: F) -> Subscription
    where
        F: Fn(&Event) + 'static,
    {
        self.inner.bus.on(topic, handler)
    }

    pub fn off(&self, sub: &Subscription) -> bool {
        self.inner.bus.off(sub)
    }

    /// Show `text` with the configured duration and opacity.
    pub fn notice(&self, text: impl Into<String>) {
        if self.inner.alive().is_ok() {
            self.inner.notice(text.into());
        }
    }

    /// Show `text`; a zero `duration` keeps it until the next notice.
    pub fn notify(&self, text: impl Into<String>, duration: Duration, opacity: f64) {
        if self.inner.alive().is_ok() {
            self.inner.notify(text.into(), duration, opacity);
        }
    }

    /// Publish one sink signal on the bus.
    pub fn handle_media_event(&self, event: MediaEvent) {
        if self.inner.alive().is_ok() {
            self.inner.bus.trigger(&event.into());
        }
    }

    pub fn poll_timers(&self) {
        if self.inner.alive().is_ok() {
            self.inner.poll_timers();
        }
    }

    /// Drain sink events, then fire due timers.
    pub fn pump(&self) {
        if self.inner.alive().is_ok() {
            self.inner.pump();
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.inner.state.borrow().timers.next_deadline()
    }

    /// Release the sink and leave the registry. Idempotent.
    pub fn destroy(&self) {
        self.inner.destroy();
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    pub fn is_paused(&self) -> bool {
        self.inner.is_paused()
    }

    pub fn index(&self) -> usize {
        self.inner.state.borrow().playlist.index()
    }

    pub fn len(&self) -> usize {
        self.inner.state.borrow().playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current(&self) -> Option<Track> {
        self.inner.state.borrow().playlist.current().cloned()
    }

    pub fn tracks(&self) -> Vec<Track> {
        self.inner.state.borrow().playlist.tracks().to_vec()
    }

    pub fn policy(&self) -> Policy {
        self.inner.state.borrow().policy
    }

    pub fn shuffle_order(&self) -> Vec<usize> {
        self.inner
            .state
            .borrow()
            .playlist
            .shuffle_order()
            .as_slice()
            .to_vec()
    }

    pub fn position(&self) -> Duration {
        self.inner.sink.borrow().position()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.inner.sink.borrow().duration()
    }

    /// Snapshot of what the surface currently shows.
    pub fn view(&self) -> View {
        self.inner.view.borrow().view().clone()
    }
}
