use std::rc::Rc;

use tracing::debug;

use crate::events::{Event, MediaEvent, Subscription};
use crate::surface::{Bar, Change, format_clock};

use super::{AUDIO_ERROR_NOTICE, Inner, TimerKind, ratio};

impl Inner {
    /// Subscribe the engine's own reactions to sink signals. They are
    /// registered before any outside handler and removed on destroy.
    pub(super) fn wire(self: &Rc<Self>) {
        let subs = vec![
            self.react(MediaEvent::Play, |p| {
                if p.is_paused() {
                    p.ui_playing();
                }
            }),
            self.react(MediaEvent::Pause, |p| {
                if !p.is_paused() {
                    p.ui_paused();
                }
            }),
            self.react(MediaEvent::TimeUpdate, Inner::on_time_update),
            self.react(MediaEvent::DurationChange, |p| {
                let duration = p.sink.borrow().duration();
                p.render(Change::Total(format_clock(duration)));
            }),
            self.react(MediaEvent::Progress, |p| {
                let (buffered, duration) = {
                    let sink = p.sink.borrow();
                    (sink.buffered(), sink.duration())
                };
                let loaded = buffered.map_or(0.0, |b| ratio(b, duration));
                p.render(Change::Bar(Bar::Loaded, loaded));
            }),
            self.react(MediaEvent::Error, |p| p.notice(AUDIO_ERROR_NOTICE.to_string())),
            self.react(MediaEvent::Ended, Inner::on_ended),
        ];
        self.subscriptions.borrow_mut().extend(subs);
    }

    fn react(self: &Rc<Self>, event: MediaEvent, f: fn(&Inner)) -> Subscription {
        let weak = Rc::downgrade(self);
        self.bus.on(event, move |_| {
            if let Some(player) = weak.upgrade() {
                f(&player);
            }
        })
    }

    fn on_time_update(&self) {
        let (position, duration) = {
            let sink = self.sink.borrow();
            (sink.position(), sink.duration())
        };
        self.render(Change::Bar(Bar::Played, ratio(position, duration)));
        if let Some(lyrics) = self.lyrics.borrow_mut().as_mut() {
            lyrics.update(position);
        }
        self.render(Change::Elapsed(format_clock(Some(position))));
    }

    pub(super) fn poll_timers(&self) {
        let now = self.clock.now();
        let due = self.state.borrow_mut().timers.take_due(now);
        for (id, kind) in due {
            if self.destroyed.get() {
                return;
            }
            match kind {
                TimerKind::Glyph(icon) => self.draw_glyph(id, icon),
                TimerKind::LoadingCheck => self.check_loading(id),
                TimerKind::NoticeHide => self.hide_notice(id),
            }
        }
    }

    pub(super) fn pump(&self) {
        let events = self.sink.borrow_mut().poll_events();
        for event in events {
            if self.destroyed.get() {
                return;
            }
            debug!(?event, "media event");
            self.bus.trigger(&Event::Media(event));
        }
        self.poll_timers();
    }
}
