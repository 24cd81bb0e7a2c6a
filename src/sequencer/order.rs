//! The fixed shuffle permutation used for random traversal.

use rand::Rng;
use rand::seq::SliceRandom;

/// A bijection over `0..len`, generated once per playlist size.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShuffleOrder {
    order: Vec<usize>,
    // position of each track index inside `order`
    pos: Vec<usize>,
}

impl ShuffleOrder {
    pub fn new<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(rng);
        Self::from_order(order)
    }

    /// Build from an explicit permutation; `None` if it is not a bijection
    /// over `0..order.len()`.
    pub fn from_permutation(order: Vec<usize>) -> Option<Self> {
        let mut seen = vec![false; order.len()];
        for &i in &order {
            if i >= order.len() || seen[i] {
                return None;
            }
            seen[i] = true;
        }
        Some(Self::from_order(order))
    }

    fn from_order(order: Vec<usize>) -> Self {
        let mut pos = vec![0; order.len()];
        for (p, &i) in order.iter().enumerate() {
            pos[i] = p;
        }
        Self { order, pos }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    pub fn first(&self) -> Option<usize> {
        self.order.first().copied()
    }

    pub fn position(&self, index: usize) -> Option<usize> {
        self.pos.get(index).copied()
    }

    /// The entry after `index`, wrapping to the first entry.
    /// Indices outside the permutation map to its first entry.
    pub fn successor(&self, index: usize) -> usize {
        match self.position(index) {
            Some(p) if p + 1 < self.order.len() => self.order[p + 1],
            _ => self.first().unwrap_or(0),
        }
    }

    /// The entry before `index`, wrapping to the last entry.
    pub fn predecessor(&self, index: usize) -> usize {
        match self.position(index) {
            Some(p) if p > 0 => self.order[p - 1],
            _ => self.order.last().copied().unwrap_or(0),
        }
    }

    pub fn is_last(&self, index: usize) -> bool {
        match self.position(index) {
            Some(p) => p + 1 >= self.order.len(),
            None => true,
        }
    }
}
