//! # TTL Cache
//!
//! Process-local key/value cache with absolute per-entry expiry.
//!
//! Expiry is lazy: an entry past its `expires_at` is removed the next time it
//! is read and counts as a miss. [`TtlCache::purge_expired`] sweeps eagerly
//! for administrative use.
//!
//! Storage is a [`DashMap`], so concurrent reads and writes from many
//! in-flight aggregations are race-free. There is no cross-key atomicity;
//! the last write for a key wins.
//!
//! # Examples
//!
//! ```
//! use fare_compare::infrastructure::cache::TtlCache;
//! use fare_compare::domain::services::clock::SystemClock;
//! use std::sync::Arc;
//!
//! let cache: TtlCache<f64> = TtlCache::new(Arc::new(SystemClock::new()), 1800);
//! cache.set("uber_1_2_3_4", 245.0, 60);
//!
//! assert_eq!(cache.get("uber_1_2_3_4"), Some(245.0));
//! assert_eq!(cache.get("ola_1_2_3_4"), None);
//! ```

use crate::domain::services::clock::Clock;
use crate::domain::value_objects::Timestamp;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default time-to-live in seconds (30 minutes).
pub const DEFAULT_TTL_SECS: u64 = 1800;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Timestamp,
}

/// Snapshot of cache contents and counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Live (unexpired) keys, sorted.
    pub keys: Vec<String>,
    /// Number of live keys.
    pub key_count: usize,
    /// Reads that returned a value.
    pub hits: u64,
    /// Reads that found nothing usable.
    pub misses: u64,
}

/// Thread-safe cache with per-entry time-to-live.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    clock: Arc<dyn Clock>,
    default_ttl_secs: u64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    /// Creates an empty cache reading time from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, default_ttl_secs: u64) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            default_ttl_secs,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the value for `key` if present and not expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.timestamp();

        {
            if let Some(entry) = self.entries.get(key) {
                if !entry.expires_at.has_passed(now) {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.value.clone());
                }
            }
        }

        // The read guard is released above; removing under it would deadlock the shard.
        self.entries
            .remove_if(key, |_, entry| entry.expires_at.has_passed(now));
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Stores `value` until `now + ttl_secs`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, value: V, ttl_secs: u64) {
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        let expires_at = self.clock.timestamp().add_secs(ttl);
        self.entries
            .insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Stores `value` with the cache's default TTL.
    pub fn set_default(&self, key: impl Into<String>, value: V) {
        self.set(key, value, self.default_ttl_secs);
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Removes all expired entries and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.timestamp();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.expires_at.has_passed(now));
        before.saturating_sub(self.entries.len())
    }

    /// Returns live keys and hit/miss counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.timestamp();
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| !entry.value().expires_at.has_passed(now))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();

        CacheStats {
            key_count: keys.len(),
            keys,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Returns the number of stored entries, including expired ones not yet purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
