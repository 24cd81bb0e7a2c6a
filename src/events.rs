//! Named-topic publish/subscribe used between the media sink, the engine and
//! outside observers.
//!
//! Handlers run synchronously in registration order. A panicking handler
//! unwinds into the caller of [`EventBus::trigger`]; callers that need
//! isolation guard themselves.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Signals produced by the media sink.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MediaEvent {
    LoadStart,
    DurationChange,
    Progress,
    CanPlay,
    Play,
    Playing,
    Pause,
    Waiting,
    Seeking,
    Seeked,
    TimeUpdate,
    VolumeChange,
    Ended,
    Error,
}

/// Everything that can be published on a player's bus.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Media(MediaEvent),
    NoticeShow(String),
    NoticeHide,
    ListSwitch { index: usize },
    ListAdd { count: usize },
    ListRemove { index: usize },
    ListClear,
    Destroy,
}

/// Subscription key. Payload-free mirror of [`Event`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    Media(MediaEvent),
    NoticeShow,
    NoticeHide,
    ListSwitch,
    ListAdd,
    ListRemove,
    ListClear,
    Destroy,
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Media(m) => Topic::Media(*m),
            Event::NoticeShow(_) => Topic::NoticeShow,
            Event::NoticeHide => Topic::NoticeHide,
            Event::ListSwitch { .. } => Topic::ListSwitch,
            Event::ListAdd { .. } => Topic::ListAdd,
            Event::ListRemove { .. } => Topic::ListRemove,
            Event::ListClear => Topic::ListClear,
            Event::Destroy => Topic::Destroy,
        }
    }
}

impl From<MediaEvent> for Event {
    fn from(m: MediaEvent) -> Self {
        Event::Media(m)
    }
}

impl From<MediaEvent> for Topic {
    fn from(m: MediaEvent) -> Self {
        Topic::Media(m)
    }
}

type Handler = Rc<dyn Fn(&Event)>;

/// Handle returned by [`EventBus::on`]; pass it to [`EventBus::off`] to detach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    topic: Topic,
    id: u64,
}

impl Subscription {
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

#[derive(Default)]
struct Handlers {
    next_id: u64,
    by_topic: HashMap<Topic, Vec<(u64, Handler)>>,
}

/// Cheap-to-clone bus handle; clones share the same handler table.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Rc<RefCell<Handlers>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `topic`. Topics need not be declared beforehand.
    pub fn on<F>(&self, topic: impl Into<Topic>, handler: F) -> Subscription
    where
        F: Fn(&Event) + 'static,
    {
        let topic = topic.into();
        let mut h = self.handlers.borrow_mut();
        let id = h.next_id;
        h.next_id += 1;
        h.by_topic
            .entry(topic)
            .or_default()
            .push((id, Rc::new(handler)));
        Subscription { topic, id }
    }

    /// Detach a handler. Returns false if it was already gone.
    pub fn off(&self, sub: &Subscription) -> bool {
        let mut h = self.handlers.borrow_mut();
        let Some(list) = h.by_topic.get_mut(&sub.topic) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != sub.id);
        before != list.len()
    }

    /// Deliver `event` to every handler of its topic.
    ///
    /// The handler list is snapshotted first, so handlers may subscribe,
    /// unsubscribe or trigger further events without deadlocking the bus.
    pub fn trigger(&self, event: &Event) {
        let snapshot: Vec<Handler> = {
            let h = self.handlers.borrow();
            match h.by_topic.get(&event.topic()) {
                Some(list) => list.iter().map(|(_, f)| Rc::clone(f)).collect(),
                None => return,
            }
        };
        for f in snapshot {
            f(event);
        }
    }

    pub fn handler_count(&self, topic: impl Into<Topic>) -> usize {
        self.handlers
            .borrow()
            .by_topic
            .get(&topic.into())
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Drop every handler on every topic.
    pub fn clear(&self) {
        self.handlers.borrow_mut().by_topic.clear();
    }
}

#[cfg(test)]
mod tests;
