//! All slideshow state in one place.
//!
//! The daemon core owns exactly one `Deck` and funnels every mutation
//! through it: snapshot swaps (`apply_library`, `apply_sessions`) and slide
//! ticks (`tick`). Each poll is tagged with a sequence number when it is
//! issued, and a response older than the snapshot already applied is
//! dropped, so a slow request can never overwrite fresher data.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

use crate::card::Card;
use crate::config::{Config, SlideOrder};
use crate::pipeline::{NowStreaming, RecentlyAdded};
use crate::pool::{Categories, Resolved, SlidePool};
use crate::protocol::{DeckView, EpisodeRecord, MovieRecord, SessionRecord};
use crate::scheduler::{Advance, Scheduler};
use crate::shuffle::Shuffler;

/// Issued/applied sequence numbers for one kind of poll.
#[derive(Debug, Default, Clone, Copy)]
struct PollSeq {
    issued: u64,
    applied: u64,
}

impl PollSeq {
    fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Accept `seq` if it is newer than what is already applied.
    fn accept(&mut self, seq: u64) -> bool {
        if seq <= self.applied {
            return false;
        }
        self.applied = seq;
        true
    }
}

#[derive(Debug)]
pub struct Deck<R = StdRng> {
    categories: Categories,
    movies: Vec<MovieRecord>,
    episodes: Vec<EpisodeRecord>,
    sessions: Vec<SessionRecord>,
    scheduler: Scheduler<R>,
    library_seq: PollSeq,
    sessions_seq: PollSeq,
    library_error: Option<String>,
    sessions_error: Option<String>,
    library_updated_at: Option<DateTime<Utc>>,
    sessions_updated_at: Option<DateTime<Utc>>,
}

impl Deck<StdRng> {
    pub fn new(categories: Categories, order: SlideOrder) -> Self {
        Self::with_scheduler(categories, Scheduler::new(order))
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Categories::from(&config.slides), config.slides.order)
    }

    pub fn seeded(categories: Categories, order: SlideOrder, seed: u64) -> Self {
        Self::with_scheduler(
            categories,
            Scheduler::with_shuffler(order, Shuffler::seeded(seed)),
        )
    }
}

impl<R: Rng> Deck<R> {
    pub fn with_scheduler(categories: Categories, scheduler: Scheduler<R>) -> Self {
        Self {
            categories,
            movies: Vec::new(),
            episodes: Vec::new(),
            sessions: Vec::new(),
            scheduler,
            library_seq: PollSeq::default(),
            sessions_seq: PollSeq::default(),
            library_error: None,
            sessions_error: None,
            library_updated_at: None,
            sessions_updated_at: None,
        }
    }

    pub fn begin_library_poll(&mut self) -> u64 {
        self.library_seq.begin()
    }

    pub fn begin_sessions_poll(&mut self) -> u64 {
        self.sessions_seq.begin()
    }

    /// Replace the movie and episode snapshots. Returns `false` when the
    /// response is stale and was ignored.
    pub fn apply_library(&mut self, seq: u64, result: RecentlyAdded) -> bool {
        if !self.library_seq.accept(seq) {
            debug!("dropping stale recently-added response #{}", seq);
            return false;
        }
        info!(
            "library snapshot #{}: {} movies, {} episodes",
            seq,
            result.movies.len(),
            result.episodes.len()
        );
        self.movies = result.movies;
        self.episodes = result.episodes;
        self.library_error = result.error;
        self.library_updated_at = Some(Utc::now());
        self.reclamp();
        true
    }

    /// Replace the session snapshot. Returns `false` when stale.
    pub fn apply_sessions(&mut self, seq: u64, result: NowStreaming) -> bool {
        if !self.sessions_seq.accept(seq) {
            debug!("dropping stale now-streaming response #{}", seq);
            return false;
        }
        if result.sessions.len() != self.sessions.len() {
            info!("sessions snapshot #{}: {} active", seq, result.sessions.len());
        }
        self.sessions = result.sessions;
        self.sessions_error = result.error;
        self.sessions_updated_at = Some(Utc::now());
        self.reclamp();
        true
    }

    pub fn pool(&self) -> SlidePool<'_> {
        SlidePool::new(self.categories, &self.movies, &self.episodes, &self.sessions)
    }

    pub fn total(&self) -> usize {
        self.pool().total()
    }

    /// Advance the slideshow by one slide.
    pub fn tick(&mut self) -> Advance {
        let total = self.total();
        self.scheduler.tick(total)
    }

    /// The slide at the current index, if there is any slide at all.
    pub fn current(&self) -> Option<Resolved<'_>> {
        self.pool().resolve(self.scheduler.current())
    }

    pub fn current_index(&self) -> usize {
        self.scheduler.current()
    }

    pub fn order(&self) -> SlideOrder {
        self.scheduler.order()
    }

    /// Published view of the deck; `rev` is left for the state manager.
    pub fn view(&self, config: &Config) -> DeckView {
        let pool = self.pool();
        let current = self.current();
        DeckView {
            rev: 0,
            order: self.order(),
            total: pool.total(),
            current_index: self.current_index(),
            movies: self.movies.len(),
            episodes: self.episodes.len(),
            sessions: self.sessions.len(),
            current: current.map(|r| r.slide.to_slide()),
            card: current.map(|r| Card::build(r.slide, &config.display, &config.server)),
            library_error: self.library_error.clone(),
            sessions_error: self.sessions_error.clone(),
            library_updated_at: self.library_updated_at,
            sessions_updated_at: self.sessions_updated_at,
        }
    }

    fn reclamp(&mut self) {
        let total = self.total();
        self.scheduler.reclamp(total);
    }
}
