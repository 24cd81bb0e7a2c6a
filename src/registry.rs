//! Shared set of live player instances, used only to keep playback
//! mutually exclusive.
//!
//! One registry is created per application context and handed to every
//! player. It holds weak references: membership never keeps an instance
//! alive, and dead entries are pruned on the next broadcast.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use tracing::warn;

/// Something that can be told to pause because a peer started playing.
pub trait Pausable {
    fn pause(&self);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

#[derive(Default)]
struct Members {
    next_id: u64,
    entries: Vec<(InstanceId, Weak<dyn Pausable>)>,
}

#[derive(Clone, Default)]
pub struct Registry {
    members: Rc<RefCell<Members>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, member: Weak<dyn Pausable>) -> InstanceId {
        let mut m = self.members.borrow_mut();
        let id = InstanceId(m.next_id);
        m.next_id += 1;
        m.entries.push((id, member));
        id
    }

    pub fn remove(&self, id: InstanceId) -> bool {
        let mut m = self.members.borrow_mut();
        let before = m.entries.len();
        m.entries.retain(|(i, _)| *i != id);
        before != m.entries.len()
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.members.borrow().entries.iter().any(|(i, _)| *i == id)
    }

    /// Number of registered instances that are still alive.
    pub fn len(&self) -> usize {
        self.members
            .borrow()
            .entries
            .iter()
            .filter(|(_, w)| w.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pause every live instance except `id`. Returns how many were paused.
    ///
    /// A panicking peer is logged and skipped; the remaining peers are still
    /// paused.
    pub fn broadcast_pause_except(&self, id: InstanceId) -> usize {
        let peers: Vec<(InstanceId, Rc<dyn Pausable>)> = {
            let mut m = self.members.borrow_mut();
            m.entries.retain(|(_, w)| w.strong_count() > 0);
            m.entries
                .iter()
                .filter(|(i, _)| *i != id)
                .filter_map(|(i, w)| w.upgrade().map(|p| (*i, p)))
                .collect()
        };

        let mut paused = 0;
        for (peer_id, peer) in peers {
            match panic::catch_unwind(AssertUnwindSafe(|| peer.pause())) {
                Ok(()) => paused += 1,
                Err(_) => warn!(?peer_id, "peer failed to pause"),
            }
        }
        paused
    }
}
