//! Scripted in-memory sink for tests. Clones share state, so a test keeps one
//! clone for inspection while the player owns the other.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::error::SinkError;
use crate::events::MediaEvent;

use super::MediaSink;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Reject {
    NotAllowed,
    NotSupported,
    Decode,
}

#[derive(Default)]
pub(crate) struct FakeState {
    pub src: Option<String>,
    pub paused: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub buffered: Option<Duration>,
    pub volume: f64,
    pub muted: bool,
    pub native: Vec<String>,
    pub reject: Option<Reject>,
    pub play_calls: usize,
    pub pause_calls: usize,
    pub sources: Vec<Option<String>>,
    pub events: VecDeque<MediaEvent>,
}

#[derive(Clone)]
pub(crate) struct FakeSink {
    state: Rc<RefCell<FakeState>>,
}

impl FakeSink {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeState {
                paused: true,
                volume: 1.0,
                ..FakeState::default()
            })),
        }
    }

    pub fn state(&self) -> std::cell::Ref<'_, FakeState> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> std::cell::RefMut<'_, FakeState> {
        self.state.borrow_mut()
    }

    pub fn boxed(&self) -> Box<dyn MediaSink> {
        Box::new(self.clone())
    }

    pub fn with_native(self, mime: &str) -> Self {
        self.state.borrow_mut().native.push(mime.to_string());
        self
    }

    pub fn reject_play(&self, reject: Option<Reject>) {
        self.state.borrow_mut().reject = reject;
    }
}

impl MediaSink for FakeSink {
    fn set_source(&mut self, url: Option<&str>) {
        let mut s = self.state.borrow_mut();
        let src = url.map(str::to_string);
        s.sources.push(src.clone());
        s.src = src;
        s.position = Duration::ZERO;
        s.duration = None;
        s.paused = true;
    }

    fn source(&self) -> Option<String> {
        self.state.borrow().src.clone()
    }

    fn can_play_type(&self, mime: &str) -> bool {
        self.state.borrow().native.iter().any(|m| m == mime)
    }

    fn play(&mut self) -> Result<(), SinkError> {
        let mut s = self.state.borrow_mut();
        s.play_calls += 1;
        if s.src.is_none() {
            return Err(SinkError::NoSource);
        }
        match s.reject {
            Some(Reject::NotAllowed) => return Err(SinkError::NotAllowed("autoplay".into())),
            Some(Reject::NotSupported) => return Err(SinkError::NotSupported("codec".into())),
            Some(Reject::Decode) => return Err(SinkError::Decode("corrupt frame".into())),
            None => {}
        }
        if s.paused {
            s.paused = false;
            s.events.push_back(MediaEvent::Play);
        }
        Ok(())
    }

    fn pause(&mut self) {
        let mut s = self.state.borrow_mut();
        s.pause_calls += 1;
        if !s.paused {
            s.paused = true;
            s.events.push_back(MediaEvent::Pause);
        }
    }

    fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn seek(&mut self, position: Duration) {
        self.state.borrow_mut().position = position;
    }

    fn position(&self) -> Duration {
        self.state.borrow().position
    }

    fn duration(&self) -> Option<Duration> {
        self.state.borrow().duration
    }

    fn buffered(&self) -> Option<Duration> {
        self.state.borrow().buffered
    }

    fn set_volume(&mut self, volume: f64) {
        self.state.borrow_mut().volume = volume;
    }

    fn volume(&self) -> f64 {
        self.state.borrow().volume
    }

    fn set_muted(&mut self, muted: bool) {
        self.state.borrow_mut().muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.state.borrow().muted
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        self.state.borrow_mut().events.drain(..).collect()
    }
}
