//! Raw documents → typed records.
//!
//! Zero, empty and absent all normalize to "unset": a year of `0` or an
//! empty `contentRating` is treated exactly like a missing one.

use tracing::warn;

use crate::document::{parse_container, Item, ItemKind, Media, MediaContainer};
use crate::protocol::{EpisodeRecord, MediaInfo, MovieRecord, SessionMedia, SessionRecord};

/// Movies and episodes from one recently-added style document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentItems {
    pub movies: Vec<MovieRecord>,
    pub episodes: Vec<EpisodeRecord>,
}

/// Parse `body` and normalize it. A document that does not parse yields
/// empty collections; the failure is only logged.
pub fn normalize_recently_added(body: &str, movie_limit: usize, episode_limit: usize) -> RecentItems {
    match parse_container(body) {
        Ok(container) => partition_recent(&container, movie_limit, episode_limit),
        Err(e) => {
            warn!("recently added: {}", e);
            RecentItems::default()
        }
    }
}

/// Split a container's items by kind and take a prefix of each partition.
/// Server order is preserved; nothing is re-sorted.
pub fn partition_recent(container: &MediaContainer, movie_limit: usize, episode_limit: usize) -> RecentItems {
    let movies = container
        .items
        .iter()
        .filter(|item| item.kind() == ItemKind::Movie)
        .take(movie_limit)
        .map(movie_record)
        .collect();
    let episodes = container
        .items
        .iter()
        .filter(|item| item.kind() == ItemKind::Episode)
        .take(episode_limit)
        .map(episode_record)
        .collect();
    RecentItems { movies, episodes }
}

pub fn normalize_sessions(body: &str, limit: usize) -> Vec<SessionRecord> {
    match parse_container(body) {
        Ok(container) => sessions_from(&container, limit),
        Err(e) => {
            warn!("sessions: {}", e);
            Vec::new()
        }
    }
}

pub fn sessions_from(container: &MediaContainer, limit: usize) -> Vec<SessionRecord> {
    container
        .items
        .iter()
        .filter(|item| item.kind().is_video())
        .take(limit)
        .map(session_record)
        .collect()
}

pub fn movie_record(item: &Item) -> MovieRecord {
    MovieRecord {
        id: item.rating_key.clone(),
        title: item.title.clone().unwrap_or_default(),
        year: count(item.year),
        rating: item.rating.filter(|r| *r != 0.0),
        content_rating: item.content_rating.clone(),
        summary: item.summary.clone().unwrap_or_default(),
        runtime_ms: nonzero(item.duration),
        added_at: item.added_at.filter(|t| *t != 0),
        thumb: item.thumb.clone(),
        art: item.art.clone(),
        media: media_info(item.primary_media()),
    }
}

pub fn episode_record(item: &Item) -> EpisodeRecord {
    EpisodeRecord {
        id: item.rating_key.clone(),
        series_title: item.grandparent_title.clone().unwrap_or_default(),
        season_number: count(item.parent_index),
        episode_number: count(item.index),
        episode_title: item.title.clone().unwrap_or_default(),
        content_rating: item.content_rating.clone(),
        summary: item.summary.clone().unwrap_or_default(),
        runtime_ms: nonzero(item.duration),
        added_at: item.added_at.filter(|t| *t != 0),
        thumb: item.thumb.clone(),
        art: item.art.clone(),
        series_thumb: series_thumb(item),
        media: media_info(item.primary_media()),
    }
}

pub fn session_record(item: &Item) -> SessionRecord {
    let playing = if item.kind() == ItemKind::Episode {
        SessionMedia::Episode {
            series_title: item.grandparent_title.clone().unwrap_or_default(),
            episode_title: item.title.clone().unwrap_or_default(),
            season_number: count(item.parent_index),
            episode_number: count(item.index),
        }
    } else {
        SessionMedia::Movie {
            title: item.title.clone().unwrap_or_default(),
        }
    };

    let mut media = media_info(item.primary_media());
    media.bitrate_kbps = live_bitrate(item).or(media.bitrate_kbps);

    SessionRecord {
        id: item.rating_key.clone(),
        playing,
        year: count(item.year),
        content_rating: item.content_rating.clone(),
        summary: item.summary.clone().unwrap_or_default(),
        runtime_ms: nonzero(item.duration),
        view_offset_ms: nonzero(item.view_offset),
        thumb: item.thumb.clone(),
        art: item.art.clone(),
        series_thumb: series_thumb(item),
        media,
        user_name: item.user.as_ref().and_then(|u| u.title.clone()),
        player_product: item.player.as_ref().and_then(|p| p.product.clone()),
        player_state: item.player.as_ref().and_then(|p| p.state.clone()),
    }
}

/// Session bandwidth, then transcode bitrate.
fn live_bitrate(item: &Item) -> Option<u64> {
    nonzero(item.session.as_ref().and_then(|s| s.bandwidth))
        .or_else(|| nonzero(item.transcode.as_ref().and_then(|t| t.bitrate)))
}

/// Series poster, then season poster, then the item's own.
fn series_thumb(item: &Item) -> Option<String> {
    item.grandparent_thumb
        .clone()
        .or_else(|| item.parent_thumb.clone())
        .or_else(|| item.thumb.clone())
}

pub fn media_info(media: Option<&Media>) -> MediaInfo {
    let Some(media) = media else {
        return MediaInfo::default();
    };
    MediaInfo {
        quality: quality_label(media.video_resolution.as_deref(), media.height),
        video_codec: media.video_codec.as_ref().map(|c| c.to_uppercase()),
        bitrate_kbps: nonzero(media.bitrate),
    }
}

/// Resolution label as given plus "p", else pixel height plus "p".
pub fn quality_label(resolution: Option<&str>, height: Option<u64>) -> Option<String> {
    match (resolution, nonzero(height)) {
        (Some(label), _) => Some(format!("{label}p")),
        (None, Some(height)) => Some(format!("{height}p")),
        (None, None) => None,
    }
}

fn nonzero(value: Option<u64>) -> Option<u64> {
    value.filter(|v| *v != 0)
}

fn count(value: Option<u64>) -> Option<u32> {
    nonzero(value).and_then(|v| u32::try_from(v).ok())
}
