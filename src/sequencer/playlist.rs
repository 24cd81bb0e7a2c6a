use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::track::Track;

use super::{OrderMode, ShuffleOrder, next_index, prev_index};

/// What the caller must do after [`Playlist::remove`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Removal {
    /// A non-active track went away; the active track is unchanged.
    Kept,
    /// The active track was removed; bind this index next.
    Switch(usize),
    /// The last remaining track was removed.
    Cleared,
}

/// Ordered tracks plus the active index and the shuffle permutation.
///
/// `index` is always in `0..len` while the playlist is non-empty.
pub struct Playlist {
    tracks: Vec<Track>,
    index: usize,
    shuffle: ShuffleOrder,
    rng: StdRng,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self::with_rng(tracks, StdRng::from_os_rng())
    }

    /// Deterministic shuffle order, for reproducible sessions and tests.
    pub fn seeded(tracks: Vec<Track>, seed: u64) -> Self {
        Self::with_rng(tracks, StdRng::seed_from_u64(seed))
    }

    fn with_rng(tracks: Vec<Track>, mut rng: StdRng) -> Self {
        let shuffle = ShuffleOrder::new(tracks.len(), &mut rng);
        Self {
            tracks,
            index: 0,
            shuffle,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Caller validates `index < len`.
    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn shuffle_order(&self) -> &ShuffleOrder {
        &self.shuffle
    }

    /// Index the traversal starts at under `order`.
    pub fn first_index(&self, order: OrderMode) -> usize {
        match order {
            OrderMode::List => 0,
            OrderMode::Random => self.shuffle.first().unwrap_or(0),
        }
    }

    pub fn next(&self, order: OrderMode) -> usize {
        next_index(order, self.index, self.tracks.len(), &self.shuffle)
    }

    pub fn prev(&self, order: OrderMode) -> usize {
        prev_index(order, self.index, self.tracks.len(), &self.shuffle)
    }

    fn reshuffle(&mut self) {
        self.shuffle = ShuffleOrder::new(self.tracks.len(), &mut self.rng);
    }

    /// Append tracks. The permutation is regenerated since the size changed.
    pub fn extend(&mut self, tracks: Vec<Track>) {
        if tracks.is_empty() {
            return;
        }
        self.tracks.extend(tracks);
        self.reshuffle();
    }

    /// Remove the track at `index`; `None` when out of range.
    pub fn remove(&mut self, index: usize) -> Option<Removal> {
        if index >= self.tracks.len() {
            return None;
        }
        if self.tracks.len() == 1 {
            self.clear();
            return Some(Removal::Cleared);
        }

        self.tracks.remove(index);
        self.reshuffle();

        if index == self.index {
            let next = if index < self.tracks.len() {
                index
            } else {
                index - 1
            };
            self.index = next;
            return Some(Removal::Switch(next));
        }
        if self.index > index {
            self.index -= 1;
        }
        Some(Removal::Kept)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.index = 0;
        self.shuffle = ShuffleOrder::default();
    }
}
