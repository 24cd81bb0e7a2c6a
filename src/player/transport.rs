use std::time::Duration;

use toml::Value;
use tracing::{debug, warn};

use crate::error::PlayerError;
use crate::prefs::VOLUME_KEY;
use crate::surface::{Bar, ButtonState, Change, Icon, format_clock};
use crate::timer::TimerId;

use super::{GLYPH_DELAY, Inner, TimerKind, WATCHDOG_INTERVAL, Watchdog, ratio};

impl Inner {
    pub(super) fn play(&self) -> Result<(), PlayerError> {
        self.ui_playing();
        self.start_sink()
    }

    /// Ask the sink to play. A rejection flips the session back to paused.
    pub(super) fn start_sink(&self) -> Result<(), PlayerError> {
        let result = self.sink.borrow_mut().play();
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_rejection() => {
                warn!(error = %e, "playback rejected");
                self.ui_paused();
                Err(e.into())
            }
            Err(e) => {
                warn!(error = %e, "playback failed to start");
                Err(e.into())
            }
        }
    }

    pub(super) fn pause(&self) {
        self.ui_paused();
        self.sink.borrow_mut().pause();
    }

    /// Enter the playing state. Peers are paused on every call, not only on
    /// the paused-to-playing edge.
    pub(super) fn ui_playing(&self) {
        let was_paused = std::mem::replace(&mut self.state.borrow_mut().paused, false);
        if was_paused {
            self.flip_button(ButtonState::Pause, Icon::Pause);
        }
        self.enable_watchdog();
        if self.options.mutex {
            let paused = self.registry.broadcast_pause_except(self.id);
            debug!(id = ?self.id, paused, "paused peers");
        }
    }

    pub(super) fn ui_paused(&self) {
        let was_playing = !std::mem::replace(&mut self.state.borrow_mut().paused, true);
        if was_playing {
            self.flip_button(ButtonState::Play, Icon::Play);
        }
        self.disable_watchdog();
    }

    /// Swap the button now and draw its glyph after a short delay.
    fn flip_button(&self, state: ButtonState, icon: Icon) {
        self.render(Change::Button(state));
        self.render(Change::ButtonIcon(None));
        let now = self.clock.now();
        let mut st = self.state.borrow_mut();
        if let Some(old) = st.glyph.take() {
            st.timers.cancel(old);
        }
        let id = st.timers.schedule(now, GLYPH_DELAY, TimerKind::Glyph(icon));
        st.glyph = Some(id);
    }

    pub(super) fn draw_glyph(&self, id: TimerId, icon: Icon) {
        {
            let mut st = self.state.borrow_mut();
            if st.glyph != Some(id) {
                return;
            }
            st.glyph = None;
        }
        self.render(Change::ButtonIcon(Some(icon)));
    }

    pub(super) fn seek(&self, secs: f64) {
        let duration = self.sink.borrow().duration();
        // Unknown duration: only the lower bound applies, the bar stays at 0.
        let target = match duration {
            _ if !secs.is_finite() || secs <= 0.0 => 0.0,
            Some(d) => secs.min(d.as_secs_f64()),
            None => secs,
        };
        let target = Duration::try_from_secs_f64(target).unwrap_or_default();
        self.sink.borrow_mut().seek(target);
        self.render(Change::Bar(Bar::Played, ratio(target, duration)));
        self.render(Change::Elapsed(format_clock(Some(target))));
    }

    pub(super) fn volume(&self) -> f64 {
        let sink = self.sink.borrow();
        if sink.is_muted() { 0.0 } else { sink.volume() }
    }

    pub(super) fn set_volume(&self, level: f64, persist: bool) -> f64 {
        if level.is_nan() {
            return self.volume();
        }
        let level = level.clamp(0.0, 1.0);
        self.render(Change::Bar(Bar::Volume, level));
        if persist {
            if let Err(e) = self.prefs.borrow_mut().set(VOLUME_KEY, Value::Float(level)) {
                warn!(error = %e, "failed to store volume");
            }
        }
        {
            let mut sink = self.sink.borrow_mut();
            sink.set_volume(level);
            if sink.is_muted() {
                sink.set_muted(false);
            }
        }
        let effective = self.volume();
        self.render(Change::VolumeIcon(Icon::for_volume(effective)));
        effective
    }

    pub(super) fn toggle_mute(&self) {
        let muted = {
            let mut sink = self.sink.borrow_mut();
            let muted = !sink.is_muted();
            sink.set_muted(muted);
            muted
        };
        let effective = self.volume();
        self.render(Change::VolumeIcon(Icon::for_volume(effective)));
        self.render(Change::Bar(Bar::Volume, if muted { 0.0 } else { effective }));
    }

    fn enable_watchdog(&self) {
        let now = self.clock.now();
        let last = self.sink.borrow().position();
        let mut st = self.state.borrow_mut();
        if st.watchdog.is_some() {
            return;
        }
        let timer = st
            .timers
            .schedule(now, WATCHDOG_INTERVAL, TimerKind::LoadingCheck);
        st.watchdog = Some(Watchdog {
            timer,
            last,
            loading: false,
        });
    }

    fn disable_watchdog(&self) {
        {
            let mut st = self.state.borrow_mut();
            if let Some(w) = st.watchdog.take() {
                st.timers.cancel(w.timer);
            }
        }
        self.render(Change::Loading(false));
    }

    /// One watchdog sample: a playing sink whose position stands still is
    /// loading; it stops loading once the position moves again.
    pub(super) fn check_loading(&self, id: TimerId) {
        let (paused, position) = {
            let sink = self.sink.borrow();
            (sink.is_paused(), sink.position())
        };
        let now = self.clock.now();
        let loading = {
            let mut st = self.state.borrow_mut();
            let st = &mut *st;
            let Some(w) = st.watchdog.as_mut().filter(|w| w.timer == id) else {
                return;
            };
            if !paused {
                if !w.loading && position == w.last {
                    w.loading = true;
                } else if w.loading && position > w.last {
                    w.loading = false;
                }
            }
            w.last = position;
            w.timer = st
                .timers
                .schedule(now, WATCHDOG_INTERVAL, TimerKind::LoadingCheck);
            w.loading
        };
        self.render(Change::Loading(loading));
    }
}
