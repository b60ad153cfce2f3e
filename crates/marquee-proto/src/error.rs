use thiserror::Error;

/// Everything that can go wrong talking to the media server.
///
/// None of these escape the polling pipeline: `pipeline` folds them into the
/// `error` field of its results so a failed cycle simply yields empty data.
#[derive(Debug, Error)]
pub enum PlexError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{path} returned HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("invalid request URL {url}: {reason}")]
    Url { url: String, reason: String },

    #[error("failed to parse response document: {0}")]
    Parse(#[from] serde_json::Error),
}

impl PlexError {
    /// True for failures that happened before a body was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. } | Self::Url { .. })
    }
}

pub type Result<T> = std::result::Result<T, PlexError>;
