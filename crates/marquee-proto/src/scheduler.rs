//! Which slide comes next.

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::SlideOrder;
use crate::shuffle::Shuffler;

/// Result of one slide tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Show the slide at this global index.
    Show(usize),
    /// Nothing to show; index and shuffle state were reset.
    Empty,
}

#[derive(Debug)]
pub struct Scheduler<R = StdRng> {
    order: SlideOrder,
    current: usize,
    shuffler: Shuffler<R>,
}

impl Scheduler<StdRng> {
    pub fn new(order: SlideOrder) -> Self {
        Self::with_shuffler(order, Shuffler::new())
    }
}

impl<R: Rng> Scheduler<R> {
    pub fn with_shuffler(order: SlideOrder, shuffler: Shuffler<R>) -> Self {
        Self {
            order,
            current: 0,
            shuffler,
        }
    }

    pub fn order(&self) -> SlideOrder {
        self.order
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Advance one slide over a pool of `total` slides.
    pub fn tick(&mut self, total: usize) -> Advance {
        if total == 0 {
            self.current = 0;
            self.shuffler.reset();
            return Advance::Empty;
        }

        self.current = match self.order {
            SlideOrder::Sequential => self.sequential_next(total),
            SlideOrder::Random => {
                self.shuffler.ensure(total);
                self.shuffler
                    .next()
                    .unwrap_or_else(|| self.sequential_next(total))
            }
        };
        Advance::Show(self.current)
    }

    /// Keep the index inside a pool that just changed size.
    pub fn reclamp(&mut self, total: usize) {
        self.current = if total == 0 { 0 } else { self.current % total };
    }

    fn sequential_next(&self, total: usize) -> usize {
        (self.current + 1) % total
    }
}
