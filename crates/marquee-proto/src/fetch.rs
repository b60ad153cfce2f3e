//! One GET against the media server. No retries, no timeout.

use std::future::Future;

use reqwest::{Client, Url};
use tracing::debug;

use crate::config::ServerConfig;
use crate::document::parse_container;
use crate::error::{PlexError, Result};

pub const TOKEN_PARAM: &str = "X-Plex-Token";

/// Where requests go and how they authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub https: bool,
    pub token: String,
}

impl Target {
    pub fn scheme(&self) -> &'static str {
        if self.https {
            "https"
        } else {
            "http"
        }
    }

    /// `scheme://host:port`, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.port)
    }
}

impl From<&ServerConfig> for Target {
    fn from(server: &ServerConfig) -> Self {
        Self {
            host: server.address.clone(),
            port: server.port,
            https: server.https,
            token: server.token.clone(),
        }
    }
}

/// Build the full request URL for `path`, appending the token as a query
/// parameter (`?` or `&` depending on whether `path` already has a query).
pub fn request_url(target: &Target, path: &str) -> Result<Url> {
    let raw = format!("{}{}", target.base_url(), path);
    let mut url = Url::parse(&raw).map_err(|e| PlexError::Url {
        url: raw.clone(),
        reason: e.to_string(),
    })?;
    url.query_pairs_mut().append_pair(TOKEN_PARAM, &target.token);
    Ok(url)
}

/// Anything that can turn a server path into a response body.
///
/// The pipeline only talks to this trait so tests can serve canned documents.
pub trait Fetcher {
    fn get(&self, path: &str) -> impl Future<Output = Result<String>> + Send;
}

/// `reqwest`-backed fetcher. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    target: Target,
}

impl HttpFetcher {
    pub fn new(target: Target) -> Self {
        Self {
            client: Client::new(),
            target,
        }
    }

    pub fn with_client(client: Client, target: Target) -> Self {
        Self { client, target }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }
}

impl Fetcher for HttpFetcher {
    async fn get(&self, path: &str) -> Result<String> {
        let url = request_url(&self.target, path)?;
        // Never log `url` itself, it carries the token.
        debug!("requesting {}{}", self.target.base_url(), path);

        let transport = |source| PlexError::Transport {
            path: path.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlexError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(transport)
    }
}

/// Result of the `/identity` connectivity probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    pub machine_identifier: Option<String>,
    pub version: Option<String>,
}

pub async fn probe_identity<F: Fetcher>(fetcher: &F) -> Result<ServerIdentity> {
    let body = fetcher.get("/identity").await?;
    let container = parse_container(&body)?;
    Ok(ServerIdentity {
        machine_identifier: container.machine_identifier,
        version: container.version,
    })
}
