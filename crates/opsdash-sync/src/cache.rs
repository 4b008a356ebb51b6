//! Single-entry, time-boxed dataset cache.
//!
//! Holds at most one dataset (the latest successful fetch) keyed by its URL.
//! Concurrent refreshes race; whichever stores last wins. Expired entries are
//! kept so a failed fetch can still fall back to them as stale data.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use opsdash_core::Dataset;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub url: String,
    pub dataset: Arc<Dataset>,
    pub fetched_at: DateTime<Utc>,
    stored: Instant,
    expired: bool,
}

impl CacheEntry {
    pub fn age(&self) -> Duration {
        self.stored.elapsed()
    }
}

pub struct DatasetCache {
    ttl: Duration,
    slot: Mutex<Option<CacheEntry>>,
}

impl DatasetCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// The entry for `url` if it is younger than the TTL.
    pub async fn fresh(&self, url: &str) -> Option<CacheEntry> {
        let slot = self.slot.lock().await;
        slot.as_ref()
            .filter(|e| e.url == url && !e.expired && e.age() < self.ttl)
            .cloned()
    }

    /// The entry for `url` regardless of age.
    pub async fn last(&self, url: &str) -> Option<CacheEntry> {
        let slot = self.slot.lock().await;
        slot.as_ref().filter(|e| e.url == url).cloned()
    }

    /// Replace whatever is cached with `dataset`.
    pub async fn store(&self, url: &str, dataset: Arc<Dataset>) -> CacheEntry {
        let entry = CacheEntry {
            url: url.to_string(),
            dataset,
            fetched_at: Utc::now(),
            stored: Instant::now(),
            expired: false,
        };
        *self.slot.lock().await = Some(entry.clone());
        entry
    }

    /// Make the next lookup miss, but keep the entry as a stale fallback.
    pub async fn expire(&self) {
        if let Some(entry) = self.slot.lock().await.as_mut() {
            entry.expired = true;
        }
    }
}
