use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use super::{Change, Surface};

/// Keeps every forwarded change. Clones share the log, so a caller can hand
/// one clone to a player and inspect the other.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    changes: Rc<RefCell<Vec<Change>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> Vec<Change> {
        self.changes.borrow().clone()
    }

    pub fn take(&self) -> Vec<Change> {
        std::mem::take(&mut *self.changes.borrow_mut())
    }

    pub fn count(&self, pred: impl Fn(&Change) -> bool) -> usize {
        self.changes.borrow().iter().filter(|c| pred(c)).count()
    }
}

impl Surface for RecordingSurface {
    fn apply(&mut self, change: &Change) {
        self.changes.borrow_mut().push(change.clone());
    }
}

/// Writes state changes to the log; the headless binary's only UI.
#[derive(Debug, Default)]
pub struct LogSurface;

impl Surface for LogSurface {
    fn apply(&mut self, change: &Change) {
        match change {
            Change::NowPlaying { index, title, artist, .. } => {
                info!(index, %title, %artist, "now playing")
            }
            Change::Notice { text, opacity } if *opacity > 0.0 => info!("{text}"),
            Change::Button(state) => info!(?state, "button"),
            Change::Total(t) => info!(total = %t, "duration"),
            Change::Loading(true) => info!("buffering"),
            other => debug!(?other, "view"),
        }
    }
}
