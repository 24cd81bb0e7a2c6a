//! Playlist traversal: ordering policy, loop policy and the end-of-track
//! transition table.
//!
//! Everything here is pure state; the player binds the resulting index to
//! the sink.

mod order;
mod playlist;

pub use order::ShuffleOrder;
pub use playlist::{Playlist, Removal};

use serde::Deserialize;

/// Which index follows the current one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderMode {
    /// Insertion order.
    #[default]
    #[serde(alias = "sequential", alias = "normal")]
    List,
    /// Follow the playlist's fixed shuffle permutation.
    #[serde(alias = "shuffle", alias = "shuffled")]
    Random,
}

/// What happens when a track ends naturally.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoopMode {
    /// Advance, but stop at the wrap-around point.
    #[serde(alias = "none", alias = "no_loop", alias = "noloop")]
    NoLoop,
    /// Repeat the current track.
    #[serde(alias = "one", alias = "loop_one", alias = "repeat-one")]
    LoopOne,
    /// Advance forever.
    #[default]
    #[serde(alias = "all", alias = "loop_all", alias = "loop-around")]
    LoopAll,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Policy {
    pub order: OrderMode,
    pub looping: LoopMode,
}

/// Outcome of a natural end-of-track.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Transition {
    pub index: usize,
    /// Keep playing after switching; false means switch and stay paused.
    pub resume: bool,
}

/// Successor of `index`. Always wraps.
pub fn next_index(order: OrderMode, index: usize, len: usize, shuffle: &ShuffleOrder) -> usize {
    if len <= 1 {
        return 0;
    }
    match order {
        OrderMode::List => (index + 1) % len,
        OrderMode::Random => shuffle.successor(index),
    }
}

/// Predecessor of `index`. Always wraps.
pub fn prev_index(order: OrderMode, index: usize, len: usize, shuffle: &ShuffleOrder) -> usize {
    if len <= 1 {
        return 0;
    }
    match order {
        OrderMode::List => (index + len - 1) % len,
        OrderMode::Random => shuffle.predecessor(index),
    }
}

/// True when advancing from `index` crosses the end of the traversal.
fn is_last(order: OrderMode, index: usize, len: usize, shuffle: &ShuffleOrder) -> bool {
    match order {
        OrderMode::List => index + 1 >= len,
        OrderMode::Random => shuffle.is_last(index),
    }
}

/// The end-of-track transition table.
///
/// | loop    | behavior                                           |
/// |---------|----------------------------------------------------|
/// | one     | reload the same index, keep playing                |
/// | all     | advance, keep playing                              |
/// | none    | advance; stay paused if the advance wrapped around |
pub fn on_track_end(policy: Policy, index: usize, len: usize, shuffle: &ShuffleOrder) -> Transition {
    match policy.looping {
        LoopMode::LoopOne => Transition {
            index,
            resume: true,
        },
        LoopMode::LoopAll => Transition {
            index: next_index(policy.order, index, len, shuffle),
            resume: true,
        },
        LoopMode::NoLoop => Transition {
            index: next_index(policy.order, index, len, shuffle),
            resume: !is_last(policy.order, index, len, shuffle),
        },
    }
}
