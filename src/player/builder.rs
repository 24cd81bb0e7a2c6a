use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{info, warn};

use crate::binder::{AdaptiveStreaming, SourceBinder, TransportResolver};
use crate::error::PlayerError;
use crate::events::EventBus;
use crate::prefs::{MemoryPreferences, PreferenceStore, VOLUME_KEY};
use crate::registry::{Pausable, Registry};
use crate::sequencer::{Playlist, Policy};
use crate::sink::MediaSink;
use crate::surface::{ButtonState, Change, Icon, LogSurface, Renderer, Surface, format_clock};
use crate::timer::{Clock, SystemClock, Timers};
use crate::track::Track;

use super::{Inner, LyricCursor, Player, PlayerOptions, State};

/// Collects a player's collaborators. Only the sink is required.
pub struct PlayerBuilder {
    sink: Box<dyn MediaSink>,
    options: PlayerOptions,
    tracks: Vec<Track>,
    registry: Option<Registry>,
    surface: Option<Box<dyn Surface>>,
    prefs: Option<Box<dyn PreferenceStore>>,
    clock: Option<Rc<dyn Clock>>,
    seed: Option<u64>,
    adaptive: Option<Box<dyn AdaptiveStreaming>>,
    transports: Vec<(String, Box<dyn TransportResolver>)>,
    lyrics: Option<Box<dyn LyricCursor>>,
}

impl PlayerBuilder {
    pub(super) fn new(sink: Box<dyn MediaSink>) -> Self {
        Self {
            sink,
            options: PlayerOptions::default(),
            tracks: Vec::new(),
            registry: None,
            surface: None,
            prefs: None,
            clock: None,
            seed: None,
            adaptive: None,
            transports: Vec::new(),
            lyrics: None,
        }
    }

    pub fn options(mut self, options: PlayerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn playlist(mut self, tracks: Vec<Track>) -> Self {
        self.tracks = tracks;
        self
    }

    /// Share a registry with other players for mutual exclusion. Without
    /// one the player gets a private registry.
    pub fn registry(mut self, registry: &Registry) -> Self {
        self.registry = Some(registry.clone());
        self
    }

    pub fn surface(mut self, surface: Box<dyn Surface>) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn preferences(mut self, prefs: Box<dyn PreferenceStore>) -> Self {
        self.prefs = Some(prefs);
        self
    }

    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Fix the shuffle permutation's seed.
    pub fn shuffle_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn adaptive(mut self, adaptive: Box<dyn AdaptiveStreaming>) -> Self {
        self.adaptive = Some(adaptive);
        self
    }

    /// Register a custom transport for tracks whose `type` is `name`.
    pub fn transport(mut self, name: impl Into<String>, resolver: Box<dyn TransportResolver>) -> Self {
        self.transports.push((name.into(), resolver));
        self
    }

    pub fn lyrics(mut self, lyrics: Box<dyn LyricCursor>) -> Self {
        self.lyrics = Some(lyrics);
        self
    }

    /// Fails only on an invalid custom transport registration.
    pub fn build(self) -> Result<Player, PlayerError> {
        let mut binder = SourceBinder::new();
        if let Some(adaptive) = self.adaptive {
            binder.set_adaptive(adaptive);
        }
        for (name, resolver) in self.transports {
            binder.register(&name, resolver)?;
        }

        let playlist = match self.seed {
            Some(seed) => Playlist::seeded(self.tracks, seed),
            None => Playlist::new(self.tracks),
        };
        let policy = Policy {
            order: self.options.order,
            looping: self.options.looping,
        };
        let registry = self.registry.unwrap_or_default();
        let surface = self.surface.unwrap_or_else(|| Box::new(LogSurface));
        let prefs = self
            .prefs
            .unwrap_or_else(|| Box::new(MemoryPreferences::new()));
        let clock = self.clock.unwrap_or_else(|| Rc::new(SystemClock));
        let options = self.options;
        let sink = self.sink;
        let lyrics = self.lyrics;

        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let member: Weak<dyn Pausable> = weak.clone();
            let id = registry.register(member);
            Inner {
                id,
                options,
                bus: EventBus::new(),
                registry: registry.clone(),
                clock,
                state: RefCell::new(State {
                    paused: true,
                    playlist,
                    policy,
                    timers: Timers::new(),
                    glyph: None,
                    notice: None,
                    watchdog: None,
                }),
                sink: RefCell::new(sink),
                binder: RefCell::new(binder),
                view: RefCell::new(Renderer::new(surface)),
                prefs: RefCell::new(prefs),
                lyrics: RefCell::new(lyrics),
                subscriptions: RefCell::new(Vec::new()),
                destroyed: Cell::new(false),
            }
        });
        inner.wire();

        inner.render(Change::Button(ButtonState::Play));
        inner.render(Change::ButtonIcon(Some(Icon::Play)));
        inner.render(Change::Elapsed(format_clock(None)));
        inner.render(Change::Total(format_clock(None)));

        let stored = inner.prefs.borrow().get_f64(VOLUME_KEY);
        inner.set_volume(stored.unwrap_or(inner.options.volume), false);

        let (len, first) = {
            let st = inner.state.borrow();
            (st.playlist.len(), st.playlist.first_index(st.policy.order))
        };
        if len > 0 {
            inner.refresh_list_accents(0);
            inner.switch_to(first)?;
        }
        if inner.options.autoplay {
            if let Err(e) = inner.play() {
                warn!(error = %e, "autoplay did not start");
            }
        }

        info!(id = ?inner.id, tracks = len, "player ready");
        Ok(Player { inner })
    }
}
