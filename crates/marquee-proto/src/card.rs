//! Plain-text rendering of a slide: the lines a display surface shows,
//! with no styling. Every element honours its `[display]` toggle.

use serde::{Deserialize, Serialize};

use crate::config::{DisplayConfig, ServerConfig};
use crate::fetch::{Target, TOKEN_PARAM};
use crate::pool::SlideRef;
use crate::protocol::{MediaInfo, SessionMedia, Slide};

const SUMMARY_MAX_CHARS: usize = 160;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// "<server> - Recently Added Movie" and friends.
    pub heading: String,
    pub title: String,
    pub details: String,
    pub meta: String,
    /// Summary for library items, quality/codec for sessions.
    pub extra: Option<String>,
    pub poster_url: Option<String>,
}

impl Card {
    pub fn build(slide: SlideRef<'_>, display: &DisplayConfig, server: &ServerConfig) -> Self {
        let heading = format!("{} - {}", server_label(server), slide.category().heading());
        let poster_url = if display.posters {
            poster_path(slide).map(|path| poster_url(path, server))
        } else {
            None
        };

        match slide {
            SlideRef::Movie(m) => Self {
                heading,
                title: with_year(&m.title, m.year, display),
                details: join(
                    [
                        m.runtime_ms.filter(|_| display.runtime).and_then(format_runtime),
                        m.rating.filter(|_| display.rating).map(|r| format!("Rating: {r}")),
                        m.content_rating.clone().filter(|_| display.content_rating),
                    ],
                    " | ",
                ),
                meta: quality_line(&m.media, display),
                extra: summary(&m.summary, display),
                poster_url,
            },
            SlideRef::Episode(e) => Self {
                heading,
                title: e.series_title.clone(),
                details: episode_label(e.season_number, e.episode_number, &e.episode_title),
                meta: quality_line(&e.media, display),
                extra: summary(&e.summary, display),
                poster_url,
            },
            SlideRef::Session(s) => {
                let (title, details) = match &s.playing {
                    SessionMedia::Episode {
                        series_title,
                        episode_title,
                        season_number,
                        episode_number,
                    } if !series_title.is_empty() => (
                        series_title.clone(),
                        episode_label(*season_number, *episode_number, episode_title),
                    ),
                    SessionMedia::Episode {
                        episode_title,
                        season_number,
                        episode_number,
                        ..
                    } => (
                        with_year("", s.year, display),
                        episode_label(*season_number, *episode_number, episode_title),
                    ),
                    SessionMedia::Movie { title } => (with_year(title, s.year, display), String::new()),
                };
                let meta = join(
                    [
                        s.user_name.clone().filter(|_| display.user),
                        s.media
                            .bitrate_kbps
                            .filter(|_| display.bitrate)
                            .map(|kbps| format!("{:.1} Mbps", kbps as f64 / 1000.0)),
                        if display.progress {
                            format_progress(s.view_offset_ms, s.runtime_ms)
                        } else {
                            None
                        },
                    ],
                    " | ",
                );
                let quality = quality_line(&s.media, display);
                Self {
                    heading,
                    title,
                    details,
                    meta,
                    extra: (!quality.is_empty()).then_some(quality),
                    poster_url,
                }
            }
        }
    }

    /// Single-line form for logs.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.heading.as_str(), self.title.as_str()];
        for part in [self.details.as_str(), self.meta.as_str()] {
            if !part.is_empty() {
                parts.push(part);
            }
        }
        parts.join(" · ")
    }
}

impl Slide {
    pub fn as_slide_ref(&self) -> SlideRef<'_> {
        match self {
            Slide::Movie(m) => SlideRef::Movie(m),
            Slide::Episode(e) => SlideRef::Episode(e),
            Slide::Session(s) => SlideRef::Session(s),
        }
    }
}

fn server_label(server: &ServerConfig) -> &str {
    [server.name.as_str(), server.address.as_str()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("Plex")
}

fn with_year(title: &str, year: Option<u32>, display: &DisplayConfig) -> String {
    match year.filter(|_| display.year) {
        Some(year) => format!("{title} ({year})"),
        None => title.to_string(),
    }
}

fn episode_label(season: Option<u32>, episode: Option<u32>, title: &str) -> String {
    let label = join(
        [
            season.map(|s| format!("Season {s}")),
            episode.map(|e| format!("Episode {e}")),
        ],
        ", ",
    );
    if title.is_empty() {
        label
    } else {
        format!("{label} - \"{title}\"")
    }
}

fn quality_line(media: &MediaInfo, display: &DisplayConfig) -> String {
    join(
        [
            media.quality.clone().filter(|_| display.quality),
            media.video_codec.clone().filter(|_| display.codec),
        ],
        " • ",
    )
}

fn summary(text: &str, display: &DisplayConfig) -> Option<String> {
    if !display.summary || text.is_empty() {
        return None;
    }
    if text.chars().count() > SUMMARY_MAX_CHARS {
        let cut: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
        Some(format!("{cut}…"))
    } else {
        Some(text.to_string())
    }
}

fn join<const N: usize>(parts: [Option<String>; N], sep: &str) -> String {
    parts.into_iter().flatten().collect::<Vec<_>>().join(sep)
}

/// "1h 5m" or "42m".
pub fn format_runtime(ms: u64) -> Option<String> {
    if ms == 0 {
        return None;
    }
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    Some(if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    })
}

/// "12:04 of 1:58:00".
pub fn format_progress(offset_ms: Option<u64>, runtime_ms: Option<u64>) -> Option<String> {
    let runtime_ms = runtime_ms.filter(|r| *r > 0)?;
    let offset_ms = offset_ms?;
    Some(format!(
        "{} of {}",
        clock(offset_ms / 1000),
        clock(runtime_ms / 1000)
    ))
}

fn clock(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

fn poster_path(slide: SlideRef<'_>) -> Option<&str> {
    match slide {
        SlideRef::Movie(m) => m.thumb.as_deref(),
        SlideRef::Episode(e) => e.series_thumb.as_deref().or(e.thumb.as_deref()),
        SlideRef::Session(s) => s.series_thumb.as_deref().or(s.thumb.as_deref()),
    }
}

fn poster_url(path: &str, server: &ServerConfig) -> String {
    let mut url = if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{}{}", Target::from(server).base_url(), path)
    };
    if !server.token.is_empty() {
        let sep = if url.contains('?') { '&' } else { '?' };
        url.push_str(&format!("{sep}{TOKEN_PARAM}={}", server.token));
    }
    url
}
