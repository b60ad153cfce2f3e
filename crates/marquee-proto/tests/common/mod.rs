#![allow(dead_code)]

use marquee_proto::error::{PlexError, Result};
use marquee_proto::fetch::Fetcher;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves canned documents by exact path and records every request.
#[derive(Default)]
pub struct FakeFetcher {
    routes: HashMap<String, std::result::Result<String, u16>>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(mut self, path: impl Into<String>, document: Value) -> Self {
        self.routes.insert(path.into(), Ok(document.to_string()));
        self
    }

    pub fn serve_raw(mut self, path: impl Into<String>, body: &str) -> Self {
        self.routes.insert(path.into(), Ok(body.to_string()));
        self
    }

    pub fn fail(mut self, path: impl Into<String>, status: u16) -> Self {
        self.routes.insert(path.into(), Err(status));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetcher for FakeFetcher {
    async fn get(&self, path: &str) -> Result<String> {
        self.requests.lock().unwrap().push(path.to_string());
        match self.routes.get(path) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(PlexError::Status {
                path: path.to_string(),
                status: *status,
            }),
            None => Err(PlexError::Status {
                path: path.to_string(),
                status: 404,
            }),
        }
    }
}

pub fn container(items: Vec<Value>) -> Value {
    json!({ "MediaContainer": { "size": items.len(), "Metadata": items } })
}

pub fn sections(directories: Vec<Value>) -> Value {
    json!({ "MediaContainer": { "Directory": directories } })
}

pub fn show_section(key: &str) -> Value {
    json!({ "key": key, "type": "show", "title": format!("TV {key}") })
}

pub fn movie_section(key: &str) -> Value {
    json!({ "key": key, "type": "movie", "title": "Movies" })
}

pub fn movie(key: u32, title: &str, added_at: i64) -> Value {
    json!({
        "ratingKey": key.to_string(),
        "type": "movie",
        "title": title,
        "year": 2020,
        "addedAt": added_at,
        "Media": [{ "videoResolution": "1080", "videoCodec": "h264", "bitrate": 8000 }]
    })
}

pub fn episode(key: u32, series: &str, season: u32, number: u32, added_at: i64) -> Value {
    json!({
        "ratingKey": key.to_string(),
        "type": "episode",
        "title": format!("Episode {number}"),
        "grandparentTitle": series,
        "parentIndex": season,
        "index": number,
        "addedAt": added_at,
        "grandparentThumb": format!("/library/metadata/{key}/thumb")
    })
}
