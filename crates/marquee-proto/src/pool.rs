//! The three record collections viewed as one ordered sequence:
//! movies, then episodes, then sessions. Disabled or empty categories
//! contribute nothing.

use serde::Serialize;

use crate::protocol::{EpisodeRecord, MovieRecord, SessionRecord, Slide, SlideCategory};

/// Which categories take part in the slideshow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Categories {
    pub movies: bool,
    pub episodes: bool,
    pub sessions: bool,
}

impl Default for Categories {
    fn default() -> Self {
        Self {
            movies: true,
            episodes: true,
            sessions: true,
        }
    }
}

impl From<&crate::config::SlidesConfig> for Categories {
    fn from(slides: &crate::config::SlidesConfig) -> Self {
        Self {
            movies: slides.show_movies,
            episodes: slides.show_episodes,
            sessions: slides.show_sessions,
        }
    }
}

/// A slide borrowed from the pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "category", content = "item", rename_all = "lowercase")]
pub enum SlideRef<'a> {
    Movie(&'a MovieRecord),
    Episode(&'a EpisodeRecord),
    Session(&'a SessionRecord),
}

impl SlideRef<'_> {
    pub fn category(&self) -> SlideCategory {
        match self {
            Self::Movie(_) => SlideCategory::Movie,
            Self::Episode(_) => SlideCategory::Episode,
            Self::Session(_) => SlideCategory::Session,
        }
    }

    pub fn to_slide(&self) -> Slide {
        match *self {
            Self::Movie(m) => Slide::Movie(m.clone()),
            Self::Episode(e) => Slide::Episode(e.clone()),
            Self::Session(s) => Slide::Session(s.clone()),
        }
    }
}

/// A global index resolved to its category and position within it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<'a> {
    pub local_index: usize,
    pub slide: SlideRef<'a>,
}

impl Resolved<'_> {
    pub fn category(&self) -> SlideCategory {
        self.slide.category()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SlidePool<'a> {
    movies: &'a [MovieRecord],
    episodes: &'a [EpisodeRecord],
    sessions: &'a [SessionRecord],
}

impl<'a> SlidePool<'a> {
    pub fn new(
        categories: Categories,
        movies: &'a [MovieRecord],
        episodes: &'a [EpisodeRecord],
        sessions: &'a [SessionRecord],
    ) -> Self {
        Self {
            movies: if categories.movies { movies } else { &[] },
            episodes: if categories.episodes { episodes } else { &[] },
            sessions: if categories.sessions { sessions } else { &[] },
        }
    }

    pub fn total(&self) -> usize {
        self.movies.len() + self.episodes.len() + self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Map a global index in `[0, total)` to its slide. Anything outside
    /// that range has no slide.
    pub fn resolve(&self, index: usize) -> Option<Resolved<'a>> {
        let mut idx = index;

        if idx < self.movies.len() {
            return Some(Resolved {
                local_index: idx,
                slide: SlideRef::Movie(&self.movies[idx]),
            });
        }
        idx -= self.movies.len();

        if idx < self.episodes.len() {
            return Some(Resolved {
                local_index: idx,
                slide: SlideRef::Episode(&self.episodes[idx]),
            });
        }
        idx -= self.episodes.len();

        self.sessions.get(idx).map(|session| Resolved {
            local_index: idx,
            slide: SlideRef::Session(session),
        })
    }

    /// Per-category lengths as seen by the pool (disabled ones are 0).
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.movies.len(), self.episodes.len(), self.sessions.len())
    }
}
