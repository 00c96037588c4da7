//! Time-bounded memoizing store for rate series.
//!
//! Entries are evicted lazily: an expired entry is removed by the next `get`
//! for its key, never by a background sweep.

use crate::domain::model::{CacheKey, RateSeries};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry {
    series: RateSeries,
    created_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= ttl
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    expirations: AtomicU64,
}

/// Point-in-time diagnostics snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub expirations: u64,
}

#[derive(Debug)]
pub struct RateCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
    counters: Counters,
}

impl RateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            counters: Counters::default(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &CacheKey) -> Option<RateSeries> {
        let now = Instant::now();

        // 讀取守衛必須在 remove_if 之前釋放，否則同一個 shard 會死鎖
        match self.entries.get(key) {
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Some(entry) if !entry.is_expired(now, self.ttl) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(%key, "Cache hit");
                return Some(entry.series.clone());
            }
            Some(_) => {}
        }

        // A concurrent `set` may have replaced the entry since the read above.
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(now, self.ttl))
            .is_some()
        {
            self.counters.expirations.fetch_add(1, Ordering::Relaxed);
            tracing::info!(%key, "Cache expired");
        }
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn set(&self, key: CacheKey, series: RateSeries) {
        tracing::info!(%key, days = series.len(), "Cached rate series");
        self.entries.insert(
            key,
            CacheEntry {
                series,
                created_at: Instant::now(),
            },
        );
        self.counters.stores.fetch_add(1, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        let count = self.entries.len();
        self.entries.clear();
        tracing::info!(entries = count, "Cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            stores: self.counters.stores.load(Ordering::Relaxed),
            expirations: self.counters.expirations.load(Ordering::Relaxed),
        }
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
