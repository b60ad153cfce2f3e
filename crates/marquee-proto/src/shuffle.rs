//! Non-repeating random slide order.
//!
//! Uses `rand`'s general-purpose generator. Nothing here needs
//! unpredictability, only a fair permutation.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// A shuffled permutation of `[0, total)` consumed one index at a time.
/// Each full pass visits every index exactly once; the next pass is
/// reshuffled.
#[derive(Debug)]
pub struct Shuffler<R = StdRng> {
    order: Option<Vec<usize>>,
    cursor: usize,
    rng: R,
}

impl Shuffler<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Shuffler<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Shuffler<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            order: None,
            cursor: 0,
            rng,
        }
    }

    /// Make sure a permutation of `[0, total)` exists, building a fresh
    /// one when there is none or the pool size changed.
    pub fn ensure(&mut self, total: usize) {
        if self.order.as_ref().is_some_and(|o| o.len() == total) {
            return;
        }
        let mut order: Vec<usize> = (0..total).collect();
        // Fisher-Yates: one backward pass, each slot swapped with a
        // uniformly chosen slot at or before it.
        order.shuffle(&mut self.rng);
        self.order = Some(order);
        self.cursor = 0;
    }

    /// Next index of the current pass. The permutation is dropped once
    /// exhausted so the following `ensure` reshuffles.
    pub fn next(&mut self) -> Option<usize> {
        let order = self.order.as_ref()?;
        let value = order.get(self.cursor).copied();
        self.cursor += 1;
        if self.cursor >= order.len() {
            self.reset();
        }
        value
    }

    /// Forget the permutation.
    pub fn reset(&mut self) {
        self.order = None;
        self.cursor = 0;
    }

    pub fn remaining(&self) -> usize {
        self.order
            .as_ref()
            .map_or(0, |o| o.len().saturating_sub(self.cursor))
    }
}
