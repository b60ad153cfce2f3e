use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;

/// Limit used when a configured limit is zero.
pub const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub slides: SlidesConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Media server connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_address")]
    pub address: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default)]
    pub https: bool,
    /// Pre-shared `X-Plex-Token`. Required for real data.
    #[serde(default)]
    pub token: String,
    /// Friendly name used in card headings.
    #[serde(default = "default_server_name")]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideOrder {
    #[default]
    Sequential,
    Random,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlidesConfig {
    #[serde(default = "default_true")]
    pub show_movies: bool,
    #[serde(default = "default_true")]
    pub show_episodes: bool,
    #[serde(default = "default_true")]
    pub show_sessions: bool,
    #[serde(default)]
    pub order: SlideOrder,
    #[serde(default = "default_slide_interval")]
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_limit")]
    pub movies: usize,
    #[serde(default = "default_limit")]
    pub episodes: usize,
    #[serde(default = "default_limit")]
    pub sessions: usize,
    /// Drop recently-added items older than this many days. 0 disables.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_recently_added_secs")]
    pub recently_added_secs: u64,
    #[serde(default = "default_now_streaming_secs")]
    pub now_streaming_secs: u64,
}

/// Per-element toggles for the text cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub posters: bool,
    #[serde(default = "default_true")]
    pub year: bool,
    #[serde(default = "default_true")]
    pub runtime: bool,
    #[serde(default = "default_true")]
    pub content_rating: bool,
    #[serde(default = "default_true")]
    pub rating: bool,
    #[serde(default = "default_true")]
    pub quality: bool,
    #[serde(default = "default_true")]
    pub codec: bool,
    #[serde(default = "default_true")]
    pub summary: bool,
    #[serde(default = "default_true")]
    pub user: bool,
    #[serde(default = "default_true")]
    pub bitrate: bool,
    #[serde(default = "default_true")]
    pub progress: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_server_address(),
            port: default_server_port(),
            https: false,
            token: String::new(),
            name: default_server_name(),
        }
    }
}

impl Default for SlidesConfig {
    fn default() -> Self {
        Self {
            show_movies: true,
            show_episodes: true,
            show_sessions: true,
            order: SlideOrder::default(),
            interval_secs: default_slide_interval(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            movies: default_limit(),
            episodes: default_limit(),
            sessions: default_limit(),
            lookback_days: default_lookback_days(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            recently_added_secs: default_recently_added_secs(),
            now_streaming_secs: default_now_streaming_secs(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            posters: true,
            year: true,
            runtime: true,
            content_rating: true,
            rating: true,
            quality: true,
            codec: true,
            summary: true,
            user: true,
            bitrate: true,
            progress: true,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: default_bind_address(),
            port: default_http_port(),
        }
    }
}

impl LimitsConfig {
    pub fn movies(&self) -> usize {
        effective_limit(self.movies)
    }

    pub fn episodes(&self) -> usize {
        effective_limit(self.episodes)
    }

    pub fn sessions(&self) -> usize {
        effective_limit(self.sessions)
    }
}

/// A zero limit means "not configured", same as leaving the key out.
pub fn effective_limit(limit: usize) -> usize {
    if limit == 0 {
        DEFAULT_LIMIT
    } else {
        limit
    }
}

impl SlidesConfig {
    pub fn interval(&self) -> Duration {
        secs_at_least_one(self.interval_secs)
    }
}

impl PollingConfig {
    pub fn recently_added_interval(&self) -> Duration {
        secs_at_least_one(self.recently_added_secs)
    }

    pub fn now_streaming_interval(&self) -> Duration {
        secs_at_least_one(self.now_streaming_secs)
    }
}

fn secs_at_least_one(secs: u64) -> Duration {
    Duration::from_secs(secs.max(1))
}

fn default_true() -> bool {
    true
}

fn default_server_address() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    32400
}

fn default_server_name() -> String {
    "Plex".to_string()
}

fn default_slide_interval() -> u64 {
    15
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_lookback_days() -> u32 {
    30
}

fn default_recently_added_secs() -> u64 {
    5 * 60
}

fn default_now_streaming_secs() -> u64 {
    15
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    8787
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load `path`, writing the defaults there first if it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
