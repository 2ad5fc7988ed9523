// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! Expiring key-value cache over the durable store.
//!
//! Every cache entry is one durable record under the `cache:` namespace,
//! carrying its own expiry. Reads are self-cleaning: an expired or
//! unparsable record is deleted on sight and reported as absent, so stale
//! data is never served.
//!
//! Write failures never reach the caller. When the store reports it is
//! full, the cache evicts expired entries once and moves on; the entry
//! that failed to write is simply not cached.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::{datetime_from_ms, ClockSource};
use crate::store::Store;

/// Namespace prefix for cache records in the durable store.
pub const CACHE_PREFIX: &str = "cache:";

/// Time-to-live applied when the caller does not specify one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Serialized form of one cache entry.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    data: Value,
    stored_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Expiring cache view over a shared durable store.
pub struct Cache {
    store: Arc<dyn Store>,
    clock: Arc<dyn ClockSource>,
    default_ttl: Duration,
}

impl Cache {
    /// Creates a cache with the default 30-minute TTL.
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn ClockSource>) -> Self {
        Cache { store, clock, default_ttl: DEFAULT_TTL }
    }

    /// Overrides the TTL used when `set` is called without one.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Stores a value under `key`, expiring after `ttl` (or the default).
    ///
    /// Last writer wins on overwrite. A store write failure triggers one
    /// best-effort [`Cache::evict_expired`] pass and is otherwise
    /// swallowed.
    pub fn set(&self, key: &str, data: Value, ttl: Option<Duration>) {
        let now_ms = self.clock.now_ms();
        let ttl = ttl.unwrap_or(self.default_ttl);

        let record = CacheRecord {
            data,
            stored_at: datetime_from_ms(now_ms),
            expires_at: datetime_from_ms(now_ms.saturating_add(ttl.as_millis() as u64)),
        };

        let json = match serde_json::to_string(&record) {
            Ok(json) => json,
            Err(_) => return,
        };

        if self.store.write(&storage_key(key), &json).is_err() {
            self.evict_expired();
        }
    }

    /// Returns the cached value, or `None` if absent, expired, or corrupt.
    ///
    /// Expired and corrupt records are deleted eagerly so a later
    /// `keys` scan no longer sees them.
    pub fn get(&self, key: &str) -> Option<Value> {
        let skey = storage_key(key);
        let raw = self.store.read(&skey).ok().flatten()?;

        let record: CacheRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(_) => {
                let _ = self.store.remove(&skey);
                return None;
            }
        };

        if self.clock.now_ms() >= record.expires_at.timestamp_millis() as u64 {
            let _ = self.store.remove(&skey);
            return None;
        }

        Some(record.data)
    }

    /// Removes cache entries.
    ///
    /// With no pattern, every cache record is removed. With a pattern, only
    /// entries whose caller-supplied key contains the substring are
    /// removed. Returns the number removed.
    pub fn invalidate(&self, pattern: Option<&str>) -> usize {
        let keys = match self.store.keys(CACHE_PREFIX) {
            Ok(keys) => keys,
            Err(_) => return 0,
        };

        let mut removed = 0;
        for skey in keys {
            let name = &skey[CACHE_PREFIX.len()..];
            let matches = pattern.map_or(true, |p| name.contains(p));
            if matches && self.store.remove(&skey).is_ok() {
                removed += 1;
            }
        }
        removed
    }

    /// Deletes every expired or unparsable cache record.
    ///
    /// Returns the number removed. Called internally on write failure and
    /// usable by the host for periodic maintenance.
    pub fn evict_expired(&self) -> usize {
        let keys = match self.store.keys(CACHE_PREFIX) {
            Ok(keys) => keys,
            Err(_) => return 0,
        };

        let now_ms = self.clock.now_ms();
        let mut removed = 0;

        for skey in keys {
            let raw = match self.store.read(&skey) {
                Ok(Some(raw)) => raw,
                _ => continue,
            };

            let expired = match serde_json::from_str::<CacheRecord>(&raw) {
                Ok(record) => (record.expires_at.timestamp_millis() as u64) < now_ms,
                Err(_) => true,
            };

            if expired && self.store.remove(&skey).is_ok() {
                removed += 1;
            }
        }
        removed
    }

    /// Number of cache records currently in the store (including any not
    /// yet evicted expired ones).
    pub fn len(&self) -> usize {
        self.store.keys(CACHE_PREFIX).map(|keys| keys.len()).unwrap_or(0)
    }

    /// Returns true if no cache records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn storage_key(key: &str) -> String {
    format!("{CACHE_PREFIX}{key}")
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
