//! Typed schema for the media server's JSON documents.
//!
//! The server is loose about shapes: a list with one element may arrive as a
//! bare object, numbers may arrive as strings, and empty attributes may be
//! present as `""`. The helpers here absorb all of that at the boundary so
//! the normalizer only ever sees `Vec`s and `Option`s.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::Result;

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(rename = "MediaContainer", default)]
    container: MediaContainer,
}

/// Root of every response document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaContainer {
    #[serde(rename = "Metadata", alias = "Video", default, deserialize_with = "one_or_many")]
    pub items: Vec<Item>,
    #[serde(rename = "Directory", default, deserialize_with = "one_or_many")]
    pub directories: Vec<Directory>,
    /// Only present on `/identity`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub machine_identifier: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,
}

/// A library item (movie, episode, ...) or an active session entry.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, deserialize_with = "lenient_string")]
    pub rating_key: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub year: Option<u64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content_rating: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration: Option<u64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub added_at: Option<i64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub view_offset: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumb: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub art: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub parent_thumb: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub parent_index: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub index: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub grandparent_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub grandparent_thumb: Option<String>,
    #[serde(rename = "Media", default, deserialize_with = "one_or_many")]
    pub media: Vec<Media>,
    #[serde(rename = "Session", default)]
    pub session: Option<SessionInfo>,
    #[serde(rename = "TranscodeSession", default)]
    pub transcode: Option<TranscodeInfo>,
    #[serde(rename = "User", default)]
    pub user: Option<UserInfo>,
    #[serde(rename = "Player", default)]
    pub player: Option<PlayerInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub bitrate: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub height: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub video_resolution: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub video_codec: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionInfo {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub bandwidth: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TranscodeInfo {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub bitrate: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub product: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
}

/// A library section from `/library/sections`.
#[derive(Debug, Default, Deserialize)]
pub struct Directory {
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Movie,
    Episode,
    Clip,
    Other(String),
    Unknown,
}

impl ItemKind {
    /// Video kinds are the only ones the session feed turns into slides.
    pub fn is_video(&self) -> bool {
        matches!(self, Self::Movie | Self::Episode | Self::Clip)
    }
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self.kind.as_deref() {
            Some("movie") => ItemKind::Movie,
            Some("episode") => ItemKind::Episode,
            Some("clip") => ItemKind::Clip,
            Some(other) => ItemKind::Other(other.to_string()),
            None => ItemKind::Unknown,
        }
    }

    /// The first media descriptor is authoritative when several exist.
    pub fn primary_media(&self) -> Option<&Media> {
        self.media.first()
    }
}

impl Directory {
    pub fn is_show_section(&self) -> bool {
        self.kind.as_deref() == Some("show")
    }
}

pub fn parse_container(body: &str) -> Result<MediaContainer> {
    let envelope: Envelope = serde_json::from_str(body)?;
    Ok(envelope.container)
}

// ── Boundary helpers ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Accept `[a, b]`, a bare `a`, `null` or a missing key as a `Vec`.
pub fn one_or_many<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
        None => Vec::new(),
    })
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn number(value: Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(Value::deserialize(deserializer)?))
}

fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(Value::deserialize(deserializer)?)
        .filter(|n| *n >= 0.0)
        .map(|n| n as u64))
}

fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(Value::deserialize(deserializer)?).map(|n| n as i64))
}
