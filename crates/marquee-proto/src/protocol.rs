use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::config::SlideOrder;

/// Stream characteristics read from the first media descriptor of an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    /// "1080p", "720p", ... Resolution label first, pixel height second.
    pub quality: Option<String>,
    /// Uppercased codec name, e.g. "HEVC".
    pub video_codec: Option<String>,
    pub bitrate_kbps: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub id: Option<String>,
    pub title: String,
    pub year: Option<u32>,
    pub rating: Option<f64>,
    pub content_rating: Option<String>,
    pub summary: String,
    pub runtime_ms: Option<u64>,
    /// Epoch seconds.
    pub added_at: Option<i64>,
    pub thumb: Option<String>,
    pub art: Option<String>,
    #[serde(flatten)]
    pub media: MediaInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRecord {
    pub id: Option<String>,
    pub series_title: String,
    pub season_number: Option<u32>,
    pub episode_number: Option<u32>,
    pub episode_title: String,
    pub content_rating: Option<String>,
    pub summary: String,
    pub runtime_ms: Option<u64>,
    /// Epoch seconds.
    pub added_at: Option<i64>,
    pub thumb: Option<String>,
    pub art: Option<String>,
    /// Series poster, falling back to the season poster, then `thumb`.
    pub series_thumb: Option<String>,
    #[serde(flatten)]
    pub media: MediaInfo,
}

/// What a playback session is playing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mediaType", rename_all = "lowercase")]
pub enum SessionMedia {
    Movie {
        title: String,
    },
    #[serde(rename_all = "camelCase")]
    Episode {
        series_title: String,
        episode_title: String,
        season_number: Option<u32>,
        episode_number: Option<u32>,
    },
}

impl Default for SessionMedia {
    fn default() -> Self {
        Self::Movie {
            title: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: Option<String>,
    #[serde(flatten)]
    pub playing: SessionMedia,
    pub year: Option<u32>,
    pub content_rating: Option<String>,
    pub summary: String,
    pub runtime_ms: Option<u64>,
    pub view_offset_ms: Option<u64>,
    pub thumb: Option<String>,
    pub art: Option<String>,
    pub series_thumb: Option<String>,
    /// `bitrate_kbps` prefers the live session bandwidth over the file bitrate.
    #[serde(flatten)]
    pub media: MediaInfo,
    pub user_name: Option<String>,
    pub player_product: Option<String>,
    pub player_state: Option<String>,
}

impl SessionRecord {
    pub fn is_episode(&self) -> bool {
        matches!(self.playing, SessionMedia::Episode { .. })
    }
}

/// Records that carry an `addedAt` timestamp and can be age-filtered.
pub trait Added {
    fn added_at(&self) -> Option<i64>;
}

impl Added for MovieRecord {
    fn added_at(&self) -> Option<i64> {
        self.added_at
    }
}

impl Added for EpisodeRecord {
    fn added_at(&self) -> Option<i64> {
        self.added_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideCategory {
    Movie,
    Episode,
    Session,
}

impl SlideCategory {
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Movie => "Recently Added Movie",
            Self::Episode => "Recently Added Episode",
            Self::Session => "Now Streaming",
        }
    }
}

/// One displayable unit, owned. See `pool::SlideRef` for the borrowed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", content = "item", rename_all = "lowercase")]
pub enum Slide {
    Movie(MovieRecord),
    Episode(EpisodeRecord),
    Session(SessionRecord),
}

impl Slide {
    pub fn category(&self) -> SlideCategory {
        match self {
            Self::Movie(_) => SlideCategory::Movie,
            Self::Episode(_) => SlideCategory::Episode,
            Self::Session(_) => SlideCategory::Session,
        }
    }
}

/// Snapshot of the deck published to the HTTP API.
/// `rev` increases on every change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckView {
    pub rev: u64,
    pub order: SlideOrder,
    pub total: usize,
    pub current_index: usize,
    pub movies: usize,
    pub episodes: usize,
    pub sessions: usize,
    pub current: Option<Slide>,
    pub card: Option<Card>,
    pub library_error: Option<String>,
    pub sessions_error: Option<String>,
    pub library_updated_at: Option<DateTime<Utc>>,
    pub sessions_updated_at: Option<DateTime<Utc>>,
}

/// Requests into the daemon core from the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum Command {
    /// Advance to the next slide now instead of waiting for the tick.
    Next,
    /// Poll both sources now.
    Refresh,
}
