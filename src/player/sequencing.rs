use tracing::{debug, error, warn};

use crate::binder::BindContext;
use crate::error::{PlayerError, TransportError};
use crate::events::Event;
use crate::sequencer::{Removal, on_track_end};
use crate::surface::{Bar, Change, format_clock};
use crate::track::Track;

use super::Inner;

impl Inner {
    /// Make `index` the active track and bind it. Playback continues if the
    /// session was playing.
    pub(super) fn switch_to(&self, index: usize) -> Result<(), PlayerError> {
        let len = self.state.borrow().playlist.len();
        if index >= len {
            return Err(PlayerError::IndexOutOfRange { index, len });
        }
        self.bus.trigger(&Event::ListSwitch { index });

        let track = {
            let mut st = self.state.borrow_mut();
            let Some(track) = st.playlist.get(index).cloned() else {
                return Ok(());
            };
            st.playlist.set_index(index);
            track
        };

        self.render(Change::NowPlaying {
            index,
            title: track.name.clone(),
            artist: track.artist.clone(),
            cover: track.cover.clone(),
        });
        self.show_accent(index, track.theme.as_deref(), true);
        self.bind(index, &track);
        if let Some(lyrics) = self.lyrics.borrow_mut().as_mut() {
            lyrics.switch(index);
        }
        let duration = self.sink.borrow().duration();
        self.render(Change::Total(format_clock(duration)));
        Ok(())
    }

    fn bind(&self, index: usize, track: &Track) {
        let ctx = BindContext {
            index,
            paused: self.is_paused(),
        };
        let result = {
            let mut sink = self.sink.borrow_mut();
            self.binder.borrow_mut().bind(&mut **sink, track, &ctx)
        };
        match result {
            Ok(_) => {}
            Err(TransportError::Unsupported(what)) => {
                warn!(url = %track.url, %what, "transport not supported");
                self.notice(format!("Error: {what} is not supported."));
            }
            Err(e) => error!(url = %track.url, error = %e, "track not bound"),
        }

        self.seek(0.0);
        if !self.is_paused() {
            if let Err(e) = self.start_sink() {
                debug!(error = %e, "playback did not continue after switch");
            }
        }
    }

    fn show_accent(&self, index: usize, theme: Option<&str>, active: bool) {
        let color = theme.unwrap_or(&self.options.theme).to_string();
        if active {
            self.render(Change::ListAccent {
                index,
                color: color.clone(),
            });
            self.render(Change::Accent(color));
        } else {
            self.render(Change::ListAccent { index, color });
        }
    }

    /// Redraw list accents from `from` on, after indices shifted.
    pub(super) fn refresh_list_accents(&self, from: usize) {
        let themes: Vec<Option<String>> = {
            let st = self.state.borrow();
            st.playlist
                .tracks()
                .iter()
                .skip(from)
                .map(|t| t.theme.clone())
                .collect()
        };
        let len = from + themes.len();
        self.view.borrow_mut().truncate_list(len);
        for (offset, theme) in themes.into_iter().enumerate() {
            self.show_accent(from + offset, theme.as_deref(), false);
        }
    }

    pub(super) fn on_ended(&self) {
        let transition = {
            let st = self.state.borrow();
            if st.playlist.is_empty() {
                return;
            }
            on_track_end(
                st.policy,
                st.playlist.index(),
                st.playlist.len(),
                st.playlist.shuffle_order(),
            )
        };
        debug!(?transition, "track ended");

        if let Err(e) = self.switch_to(transition.index) {
            warn!(error = %e, "cannot advance after track end");
            return;
        }
        if transition.resume {
            if let Err(e) = self.play() {
                debug!(error = %e, "playback did not resume after track end");
            }
        } else {
            self.pause();
        }
    }

    pub(super) fn skip(&self, forward: bool) -> Result<(), PlayerError> {
        let target = {
            let st = self.state.borrow();
            if st.playlist.is_empty() {
                return Ok(());
            }
            if forward {
                st.playlist.next(st.policy.order)
            } else {
                st.playlist.prev(st.policy.order)
            }
        };
        self.switch_to(target)
    }

    pub(super) fn add(&self, tracks: Vec<Track>) -> Result<(), PlayerError> {
        let count = tracks.len();
        if count == 0 {
            return Ok(());
        }
        self.bus.trigger(&Event::ListAdd { count });

        let (start, first) = {
            let mut st = self.state.borrow_mut();
            let start = st.playlist.len();
            st.playlist.extend(tracks);
            (start, st.playlist.first_index(st.policy.order))
        };
        self.refresh_list_accents(start);
        if start == 0 {
            self.switch_to(first)?;
        }
        Ok(())
    }

    pub(super) fn remove(&self, index: usize) -> Result<(), PlayerError> {
        let len = self.state.borrow().playlist.len();
        if index >= len {
            return Err(PlayerError::IndexOutOfRange { index, len });
        }
        self.bus.trigger(&Event::ListRemove { index });

        let removal = self.state.borrow_mut().playlist.remove(index);
        match removal {
            None => Ok(()),
            Some(Removal::Cleared) => {
                self.clear();
                Ok(())
            }
            Some(Removal::Kept) => {
                self.refresh_list_accents(index);
                Ok(())
            }
            Some(Removal::Switch(next)) => {
                self.refresh_list_accents(index);
                self.switch_to(next)
            }
        }
    }

    pub(super) fn clear(&self) {
        self.bus.trigger(&Event::ListClear);
        self.state.borrow_mut().playlist.clear();
        self.pause();
        self.sink.borrow_mut().set_source(None);
        self.binder.borrow_mut().release();

        self.view.borrow_mut().truncate_list(0);
        self.render(Change::NowPlaying {
            index: 0,
            title: "No audio".to_string(),
            artist: String::new(),
            cover: None,
        });
        self.render(Change::Elapsed(format_clock(None)));
        self.render(Change::Total(format_clock(None)));
        self.render(Change::Bar(Bar::Played, 0.0));
        self.render(Change::Bar(Bar::Loaded, 0.0));
    }

    pub(super) fn set_accent(&self, index: usize, color: String) -> Result<(), PlayerError> {
        let active = {
            let mut st = self.state.borrow_mut();
            let len = st.playlist.len();
            let active = st.playlist.index() == index;
            let track = st
                .playlist
                .get_mut(index)
                .ok_or(PlayerError::IndexOutOfRange { index, len })?;
            track.theme = Some(color.clone());
            active
        };
        self.show_accent(index, Some(&color), active);
        Ok(())
    }
}
