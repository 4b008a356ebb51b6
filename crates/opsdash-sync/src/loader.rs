//! Dataset loader: cache → fetch → parse, plus the never-failing refresh
//! used by timer-driven callers.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use opsdash_core::{DashboardConfig, Dataset, HeaderMatch, SchemaError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, DatasetCache};
use crate::http::{CsvSource, FetchError, HttpSource};
use crate::parse::parse_csv;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),
}

/// How current a [`Snapshot`]'s dataset is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// Fetched (or served from cache) without error.
    Online,
    /// The latest fetch failed; the dataset is from an earlier success.
    Stale { error: String },
    /// The latest fetch failed and there is nothing to fall back to.
    Offline { error: String },
}

/// Result of one refresh: whatever data is available plus how fresh it is.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub dataset: Option<Arc<Dataset>>,
    pub freshness: Freshness,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    fn online(entry: CacheEntry) -> Self {
        Self {
            dataset: Some(entry.dataset),
            freshness: Freshness::Online,
            fetched_at: Some(entry.fetched_at),
        }
    }

    pub fn is_online(&self) -> bool {
        self.freshness == Freshness::Online
    }
}

/// Loads datasets from a [`CsvSource`], caching the last success for a TTL.
pub struct DatasetLoader<S = HttpSource> {
    source: S,
    cache: DatasetCache,
    header_match: HeaderMatch,
}

impl DatasetLoader<HttpSource> {
    /// HTTP loader using the timeouts and TTL from `config`.
    pub fn from_config(config: &DashboardConfig) -> Result<Self, FetchError> {
        let source = HttpSource::new(config.fetch_timeout)?;
        Ok(Self::new(source, config.cache_ttl).with_header_match(config.header_match))
    }
}

impl<S: CsvSource> DatasetLoader<S> {
    pub fn new(source: S, cache_ttl: Duration) -> Self {
        Self {
            source,
            cache: DatasetCache::new(cache_ttl),
            header_match: HeaderMatch::default(),
        }
    }

    pub fn with_header_match(mut self, header_match: HeaderMatch) -> Self {
        self.header_match = header_match;
        self
    }

    /// Return the cached dataset for `url` if still fresh, else fetch and parse.
    ///
    /// A failed fetch leaves the cache untouched.
    pub async fn load(&self, url: &str) -> Result<Arc<Dataset>, LoadError> {
        self.load_entry(url).await.map(|entry| entry.dataset)
    }

    /// Like [`load`](Self::load), but never fails: errors degrade to stale or
    /// offline snapshots.
    pub async fn refresh(&self, url: &str) -> Snapshot {
        match self.load_entry(url).await {
            Ok(entry) => Snapshot::online(entry),
            Err(err) => {
                let error = err.to_string();
                match self.cache.last(url).await {
                    Some(prev) => {
                        warn!(url = %url, error = %error, "refresh failed, serving stale data");
                        Snapshot {
                            dataset: Some(prev.dataset),
                            freshness: Freshness::Stale { error },
                            fetched_at: Some(prev.fetched_at),
                        }
                    }
                    None => {
                        warn!(url = %url, error = %error, "refresh failed, no data available");
                        Snapshot {
                            dataset: None,
                            freshness: Freshness::Offline { error },
                            fetched_at: None,
                        }
                    }
                }
            }
        }
    }

    /// Force the next load to fetch, e.g. after a manual refresh request.
    pub async fn invalidate(&self) {
        self.cache.expire().await;
    }

    async fn load_entry(&self, url: &str) -> Result<CacheEntry, LoadError> {
        if let Some(entry) = self.cache.fresh(url).await {
            debug!(url = %url, age_ms = entry.age().as_millis() as u64, "dataset cache hit");
            return Ok(entry);
        }

        let text = self.source.fetch(url).await?;
        let dataset = parse_csv(&text, self.header_match)?;
        info!(url = %url, rows = dataset.len(), "loaded dataset");
        Ok(self.cache.store(url, Arc::new(dataset)).await)
    }
}
