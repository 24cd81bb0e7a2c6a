//! Single-threaded timers driven by the host's event loop.
//!
//! Nothing here sleeps or spawns. The host calls `Player::poll_timers`
//! (or `Player::pump`) and whatever is due fires in deadline order.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<K> {
    id: TimerId,
    due: Instant,
    kind: K,
}

/// Pending one-shot timers carrying a `K` payload.
#[derive(Debug)]
pub struct Timers<K> {
    next_id: u64,
    pending: Vec<Pending<K>>,
}

impl<K> Default for Timers<K> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<K> Timers<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, after: Duration, kind: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: now + after,
            kind,
        });
        id
    }

    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        before != self.pending.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Remove and return everything due at `now`, earliest first
    /// (scheduling order breaks ties).
    pub fn take_due(&mut self, now: Instant) -> Vec<(TimerId, K)> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = rest;
        due.sort_by_key(|p| (p.due, p.id.0));
        due.into_iter().map(|p| (p.id, p.kind)).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_timers_fire_in_deadline_order() {
        let clock = ManualClock::new();
        let mut t = Timers::new();
        t.schedule(clock.now(), Duration::from_millis(300), "late");
        t.schedule(clock.now(), Duration::from_millis(100), "early");
        t.schedule(clock.now(), Duration::from_millis(100), "early-2");

        clock.advance(Duration::from_millis(50));
        assert!(t.take_due(clock.now()).is_empty());

        clock.advance(Duration::from_millis(100));
        let fired: Vec<_> = t.take_due(clock.now()).into_iter().map(|(_, k)| k).collect();
        assert_eq!(fired, vec!["early", "early-2"]);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let clock = ManualClock::new();
        let mut t = Timers::new();
        let id = t.schedule(clock.now(), Duration::from_millis(10), ());
        assert!(t.is_pending(id));
        assert!(t.cancel(id));
        assert!(!t.cancel(id));

        clock.advance(Duration::from_secs(1));
        assert!(t.take_due(clock.now()).is_empty());
        assert_eq!(t.next_deadline(), None);
    }
}
