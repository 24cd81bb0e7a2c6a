use std::time::Duration;

use crate::events::Event;
use crate::surface::Change;
use crate::timer::TimerId;

use super::{Inner, TimerKind};

impl Inner {
    pub(super) fn notice(&self, text: String) {
        self.notify(
            text,
            self.options.notice_duration(),
            self.options.notice_opacity,
        );
    }

    /// Replaces any pending auto-hide. A zero `duration` never hides.
    pub(super) fn notify(&self, text: String, duration: Duration, opacity: f64) {
        let now = self.clock.now();
        {
            let mut st = self.state.borrow_mut();
            if let Some(old) = st.notice.take() {
                st.timers.cancel(old);
            }
            if !duration.is_zero() {
                let id = st.timers.schedule(now, duration, TimerKind::NoticeHide);
                st.notice = Some(id);
            }
        }
        self.render(Change::Notice {
            text: text.clone(),
            opacity,
        });
        self.bus.trigger(&Event::NoticeShow(text));
    }

    pub(super) fn hide_notice(&self, id: TimerId) {
        {
            let mut st = self.state.borrow_mut();
            if st.notice != Some(id) {
                return;
            }
            st.notice = None;
        }
        let text = self
            .view
            .borrow()
            .view()
            .notice
            .as_ref()
            .map(|(text, _)| text.clone())
            .unwrap_or_default();
        self.render(Change::Notice { text, opacity: 0.0 });
        self.bus.trigger(&Event::NoticeHide);
    }
}
