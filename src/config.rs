//! Configuration file parser for ~/.config/woolly/config.toml.
//!
//! The config file is optional: a missing or empty file yields
//! `Config::default()`. Unknown keys are accepted but logged, since they are
//! usually typos. Command-line flags override whatever the file sets.
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::app::Screen;
use crate::paging::PagingConfig;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("No Mastodon instance configured (set instance_url or pass --instance)")]
    MissingInstance,

    #[error("Invalid instance URL: {0}")]
    InvalidInstance(String),

    /// Tokens are only ever sent over HTTPS, except to a local test server.
    #[error("Instance URL must use https: {0}")]
    InsecureInstance(String),

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// The access token is masked in `Debug` output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Mastodon instance, e.g. `https://mastodon.social`.
    pub instance_url: Option<String>,

    /// OAuth bearer token. Without one only public screens work.
    pub access_token: Option<String>,

    /// Screen shown at startup.
    pub default_screen: Screen,

    /// Items requested per page.
    pub page_size: u32,

    /// Rows from either end of the list that trigger loading the next page.
    pub prefetch_distance: usize,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Theme variant name ("dark" or "light").
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        let paging = PagingConfig::default();
        Self {
            instance_url: None,
            access_token: None,
            default_screen: Screen::Home,
            page_size: paging.page_size,
            prefetch_distance: paging.prefetch_distance,
            request_timeout_secs: 30,
            theme: "dark".to_string(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("instance_url", &self.instance_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("default_screen", &self.default_screen)
            .field("page_size", &self.page_size)
            .field("prefetch_distance", &self.prefetch_distance)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("theme", &self.theme)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Mastodon rejects `limit` above this for timelines.
    pub const MAX_PAGE_SIZE: u32 = 40;

    const KNOWN_KEYS: [&'static str; 7] = [
        "instance_url",
        "access_token",
        "default_screen",
        "page_size",
        "prefetch_distance",
        "request_timeout_secs",
        "theme",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let mut config: Config = toml::from_str(content)?;
        config.normalize();
        tracing::info!(
            instance = config.instance_url.as_deref().unwrap_or("<unset>"),
            page_size = config.page_size,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Clamp values the server or the pager cannot work with.
    pub fn normalize(&mut self) {
        if self.page_size == 0 || self.page_size > Self::MAX_PAGE_SIZE {
            let clamped = self.page_size.clamp(1, Self::MAX_PAGE_SIZE);
            tracing::warn!(
                page_size = self.page_size,
                clamped = clamped,
                "page_size out of range"
            );
            self.page_size = clamped;
        }
        if self.request_timeout_secs == 0 {
            tracing::warn!("request_timeout_secs must be positive, using 30");
            self.request_timeout_secs = 30;
        }
        if let Some(token) = &self.access_token {
            if token.trim().is_empty() {
                self.access_token = None;
            }
        }
    }

    /// Mastodon reports no unloaded counts, so placeholders stay off.
    pub fn paging(&self) -> PagingConfig {
        PagingConfig {
            page_size: self.page_size,
            prefetch_distance: self.prefetch_distance,
            ..PagingConfig::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn access_token(&self) -> Option<SecretString> {
        self.access_token.clone().map(SecretString::from)
    }
}

// ============================================================================
// Tests
// ============================================================================
