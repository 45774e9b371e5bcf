// URL-keyed response cache with per-entry expiry.
//
// Entries are evicted lazily on lookup and in bulk by `sweep`, which the
// scheduler drives on a fixed cadence. Time comes through the `Clock`
// trait so tests step a manual clock instead of sleeping.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

/// Time source for expiry decisions.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Wall clock, used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Arc<Value>,
    fetched_at: Instant,
    expires_at: Instant,
}

/// Counters snapshot, cumulative since construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Shared response cache, keyed by request URL (verbatim, no
/// normalization). At most one entry per URL; a store replaces the
/// previous entry wholesale.
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up `url`, evicting the entry first when it has expired.
    ///
    /// An entry is live through `expires_at` inclusive.
    pub fn get(&self, url: &str) -> Option<Arc<Value>> {
        let now = self.clock.now();

        let expired = match self.entries.get(url) {
            Some(entry) if now <= entry.expires_at => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(url, age = ?now.duration_since(entry.fetched_at), "cache hit");
                return Some(Arc::clone(&entry.value));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(url);
            debug!(url, "cache entry expired");
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Insert or replace the entry for `url`.
    ///
    /// A zero `ttl` stores an entry that the next lookup will already
    /// find expired.
    pub fn set(&self, url: impl Into<String>, value: Arc<Value>, ttl: Duration) {
        let now = self.clock.now();
        let url = url.into();
        debug!(url = %url, ttl = ?ttl, "cache store");
        self.entries.insert(
            url,
            CacheEntry {
                value,
                fetched_at: now,
                expires_at: now + ttl,
            },
        );
    }

    /// Drop every expired entry, returning the eviction count.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| now <= entry.expires_at);
        let evicted = before.saturating_sub(self.entries.len());
        if evicted > 0 {
            debug!(evicted, remaining = self.entries.len(), "cache sweep");
        }
        evicted
    }

    /// Drop the entry for `url`, if present.
    pub fn invalidate(&self, url: &str) -> bool {
        let removed = self.entries.remove(url).is_some();
        if removed {
            debug!(url, "cache invalidated");
        }
        removed
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.entries.clear();
        debug!("cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit/miss counters plus the live entry count.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
