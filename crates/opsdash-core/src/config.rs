//! Dashboard configuration, resolved once at startup.
//!
//! The data source URL is looked up in order:
//!
//! 1. an explicit override (command line)
//! 2. the secrets file (`DATA_CSV_URL = "..."` in TOML)
//! 3. the `DATA_CSV_URL` environment variable
//! 4. [`DEFAULT_SOURCE_URL`], for local development only
//!
//! Blank values at any layer fall through to the next one.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::schema::HeaderMatch;

/// Key used both in the secrets file and as the environment variable name.
pub const SOURCE_URL_KEY: &str = "DATA_CSV_URL";

/// Local development fallback. Never point production at this.
pub const DEFAULT_SOURCE_URL: &str = "http://127.0.0.1:8000/operations.csv";

pub const DEFAULT_SECRETS_PATH: &str = "secrets.toml";

/// Shorter than the refresh interval so each tick sees fresh data.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(25);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Where the source URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Override,
    SecretsFile,
    Environment,
    Default,
}

/// On-disk secrets file layout.
#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    #[serde(rename = "DATA_CSV_URL")]
    data_csv_url: Option<String>,
    cache_ttl_secs: Option<u64>,
    fetch_timeout_secs: Option<u64>,
    refresh_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub source_url: String,
    pub source: ConfigSource,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    pub refresh_interval: Duration,
    pub header_match: HeaderMatch,
}

impl DashboardConfig {
    /// Resolve from the process environment and an optional secrets file.
    pub fn load(secrets_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve(secrets_path, |key| std::env::var(key).ok())
    }

    /// Resolve with an injectable environment lookup.
    ///
    /// A missing secrets file is not an error; an unreadable or malformed one is.
    pub fn resolve<F>(secrets_path: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = secrets_path.unwrap_or(Path::new(DEFAULT_SECRETS_PATH));
        let secrets = read_secrets(path)?;

        let (source_url, source) = if let Some(url) = non_blank(secrets.data_csv_url) {
            (url, ConfigSource::SecretsFile)
        } else if let Some(url) = non_blank(env(SOURCE_URL_KEY)) {
            (url, ConfigSource::Environment)
        } else {
            warn!(
                url = DEFAULT_SOURCE_URL,
                "no {SOURCE_URL_KEY} configured, using development default"
            );
            (DEFAULT_SOURCE_URL.to_string(), ConfigSource::Default)
        };
        debug!(url = %source_url, source = ?source, "resolved data source");

        Ok(Self {
            source_url,
            source,
            cache_ttl: secs_or(secrets.cache_ttl_secs, DEFAULT_CACHE_TTL),
            fetch_timeout: secs_or(secrets.fetch_timeout_secs, DEFAULT_FETCH_TIMEOUT),
            refresh_interval: secs_or(secrets.refresh_interval_secs, DEFAULT_REFRESH_INTERVAL),
            header_match: HeaderMatch::default(),
        })
    }

    /// Replace the source URL with an explicit value, if one is given.
    pub fn with_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = non_blank(url) {
            self.source_url = url;
            self.source = ConfigSource::Override;
        }
        self
    }

    pub fn with_header_match(mut self, header_match: HeaderMatch) -> Self {
        self.header_match = header_match;
        self
    }
}

fn read_secrets(path: &Path) -> Result<SecretsFile, ConfigError> {
    if !path.exists() {
        return Ok(SecretsFile::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn secs_or(secs: Option<u64>, default: Duration) -> Duration {
    secs.map(Duration::from_secs).unwrap_or(default)
}
