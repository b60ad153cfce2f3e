//! The two polls the daemon runs: "recently added" and "now streaming".
//!
//! Neither returns an error. A failed request degrades to empty collections
//! with a description in `error`, and the next scheduled poll tries again.

use tracing::{info, warn};

use crate::config::Config;
use crate::fetch::Fetcher;
use crate::lookback::Lookback;
use crate::normalize::{normalize_recently_added, normalize_sessions};
use crate::protocol::{EpisodeRecord, MovieRecord, SessionRecord};
use crate::sections::scan_episodes;

pub const RECENTLY_ADDED_PATH: &str = "/library/recentlyAdded";
pub const SESSIONS_PATH: &str = "/status/sessions";

/// Inputs of the recently-added poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentlyAddedRequest {
    pub movie_limit: usize,
    pub episode_limit: usize,
    pub lookback: Lookback,
}

impl From<&Config> for RecentlyAddedRequest {
    fn from(config: &Config) -> Self {
        Self {
            movie_limit: config.limits.movies(),
            episode_limit: config.limits.episodes(),
            lookback: Lookback::days(config.limits.lookback_days),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentlyAdded {
    pub movies: Vec<MovieRecord>,
    pub episodes: Vec<EpisodeRecord>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NowStreaming {
    pub sessions: Vec<SessionRecord>,
    pub error: Option<String>,
}

/// Movies from the global recently-added feed, episodes from a scan of the
/// TV sections, both limited first and then age-filtered against `now`
/// (epoch seconds).
pub async fn fetch_recently_added<F: Fetcher>(
    fetcher: &F,
    request: RecentlyAddedRequest,
    now: i64,
) -> RecentlyAdded {
    let body = match fetcher.get(RECENTLY_ADDED_PATH).await {
        Ok(body) => body,
        Err(e) => {
            warn!("recently added movies: {}", e);
            return RecentlyAdded {
                error: Some(e.to_string()),
                ..RecentlyAdded::default()
            };
        }
    };
    let movies = normalize_recently_added(&body, request.movie_limit, 0).movies;

    let mut error = None;
    let episodes = match scan_episodes(fetcher, request.episode_limit).await {
        Ok(outcome) => {
            if outcome.all_failed() {
                let reasons: Vec<_> = outcome
                    .failed
                    .iter()
                    .map(|(id, reason)| format!("section {id}: {reason}"))
                    .collect();
                error = Some(format!("every TV section failed ({})", reasons.join("; ")));
            }
            outcome.episodes
        }
        Err(e) => {
            warn!("recently added episodes (sections): {}", e);
            Vec::new()
        }
    };

    let movies = request.lookback.apply(movies, now);
    let episodes = request.lookback.apply(episodes, now);
    info!(
        "recently added: {} movies, {} episodes",
        movies.len(),
        episodes.len()
    );

    RecentlyAdded {
        movies,
        episodes,
        error,
    }
}

pub async fn fetch_now_streaming<F: Fetcher>(fetcher: &F, limit: usize) -> NowStreaming {
    match fetcher.get(SESSIONS_PATH).await {
        Ok(body) => NowStreaming {
            sessions: normalize_sessions(&body, limit),
            error: None,
        },
        Err(e) => {
            warn!("now streaming: {}", e);
            NowStreaming {
                sessions: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}
