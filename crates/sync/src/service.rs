// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! The sync service: producer API, handler registry, and drain loop.
//!
//! [`SyncService`] composes the durable queue, the expiring cache, and the
//! connectivity monitor over one shared store. It is an explicit object
//! the application constructs and owns, not a process-wide singleton.
//!
//! Producer calls are fire-and-forget: storage trouble is recovered
//! internally (evict expired cache entries, retry once) and logged, never
//! surfaced to the calling UI flow. The only visibility into accumulated
//! failure is [`SyncService::storage_stats`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use ebb_core::{
    ActionKind, ActionQueue, BackgroundSync, Cache, ClockSource, Error, PendingAction, Store,
    SystemClock, CACHE_PREFIX, DEFAULT_TTL,
};

use crate::connectivity::{ConnectivityMonitor, SubscriptionId};
use crate::handler::SyncHandler;

/// Configuration for the sync service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// TTL applied to cached entries when the caller does not pass one.
    pub default_ttl: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig { default_ttl: DEFAULT_TTL }
    }
}

/// Outcome of one drain pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DrainReport {
    /// Actions delivered and removed from the queue.
    pub synced: usize,
    /// Actions that failed and were marked for retry.
    pub failed: usize,
    /// Queue length after the pass (leftovers plus concurrent enqueues).
    pub remaining: usize,
}

/// Human-readable storage summary for diagnostics.
///
/// Not consumed by any control-flow logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    pub pending_actions: usize,
    pub cached_items: usize,
    pub estimated_size: String,
}

/// Client-side durability service.
pub struct SyncService {
    store: Arc<dyn Store>,
    clock: Arc<dyn ClockSource>,
    cache: Cache,
    queue: ActionQueue,
    monitor: ConnectivityMonitor,
    handlers: HashMap<String, Box<dyn SyncHandler>>,
}

impl SyncService {
    /// Creates a service over the given store, seeded with the
    /// environment's current connectivity state.
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig, initial_online: bool) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), config, initial_online)
    }

    /// Creates a service with an injected clock (for testing expiry).
    pub fn with_clock(
        store: Arc<dyn Store>,
        clock: Arc<dyn ClockSource>,
        config: ServiceConfig,
        initial_online: bool,
    ) -> Self {
        let cache =
            Cache::new(store.clone(), clock.clone()).with_default_ttl(config.default_ttl);
        let queue = ActionQueue::new(store.clone(), clock.clone());

        SyncService {
            store,
            clock,
            cache,
            queue,
            monitor: ConnectivityMonitor::new(initial_online),
            handlers: HashMap::new(),
        }
    }

    /// Attaches a host background-sync capability, hinted on every
    /// enqueue. The service works identically without one.
    pub fn with_background(mut self, background: Arc<dyn BackgroundSync>) -> Self {
        self.queue = ActionQueue::new(self.store.clone(), self.clock.clone())
            .with_background(background);
        self
    }

    /// Releases handlers and subscribers. The durable state stays put.
    pub fn dispose(&mut self) {
        self.handlers.clear();
        self.monitor.clear_subscribers();
        tracing::debug!("sync service disposed");
    }

    // ---- Producer API -----------------------------------------------------

    /// Queues a mutation for replay, returning its generated id.
    ///
    /// Never fails from the caller's perspective. If the store is full the
    /// service evicts expired cache entries and retries the write once;
    /// a persistent failure is logged and swallowed.
    pub fn queue_action(&self, kind: ActionKind, entity: &str, data: Value) -> String {
        let action = PendingAction::new(kind, entity, data, self.clock.now_ms());
        let id = action.id.clone();

        match self.queue.push(action.clone()) {
            Ok(()) => {}
            Err(Error::CapacityExceeded) => {
                let evicted = self.cache.evict_expired();
                tracing::warn!(evicted, "store full, evicted expired cache entries");
                if let Err(e) = self.queue.push(action) {
                    tracing::warn!(error = %e, id = %id, "failed to persist queued action");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, id = %id, "failed to persist queued action");
            }
        }
        id
    }

    /// Caches a value under `key`, expiring after `ttl` (or the default).
    pub fn cache_data(&self, key: &str, data: Value, ttl: Option<Duration>) {
        self.cache.set(key, data, ttl);
    }

    /// Returns the cached value, or `None` if absent or expired.
    pub fn cached_data(&self, key: &str) -> Option<Value> {
        self.cache.get(key)
    }

    /// Removes cached entries, all of them or only keys containing the
    /// pattern. Returns the number removed.
    pub fn invalidate_cache(&self, pattern: Option<&str>) -> usize {
        self.cache.invalidate(pattern)
    }

    /// Evicts expired cache entries; for periodic maintenance by the host.
    pub fn evict_expired_cache(&self) -> usize {
        self.cache.evict_expired()
    }

    /// Queued actions in FIFO order, optionally filtered by entity.
    pub fn pending(&self, entity: Option<&str>) -> Vec<PendingAction> {
        self.queue.list(entity)
    }

    // ---- Handler registration ---------------------------------------------

    /// Registers the sync handler for an entity.
    ///
    /// A second registration for the same entity replaces the first.
    pub fn register_handler(&mut self, entity: &str, handler: impl SyncHandler + 'static) {
        if self.handlers.insert(entity.to_string(), Box::new(handler)).is_some() {
            tracing::debug!(entity, "replaced sync handler");
        }
    }

    // ---- Connectivity API -------------------------------------------------

    /// Current connectivity state.
    pub fn is_online(&self) -> bool {
        self.monitor.is_online()
    }

    /// Subscribes to connectivity transitions.
    pub fn subscribe(&mut self, callback: impl Fn(bool) + Send + 'static) -> SubscriptionId {
        self.monitor.subscribe(callback)
    }

    /// Removes a connectivity subscriber.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.monitor.unsubscribe(id)
    }

    /// Applies an environment connectivity signal.
    ///
    /// Subscribers are notified synchronously on a real transition. A
    /// transition into online additionally drains the queue; the report is
    /// logged and discarded, so the signal source never waits on sync
    /// results it did not ask for.
    pub async fn set_online(&mut self, online: bool) {
        let changed = self.monitor.set_online(online);
        if changed && online {
            tracing::info!("connectivity restored, draining pending actions");
            let _ = self.drain().await;
        }
    }

    // ---- Drain ------------------------------------------------------------

    /// Replays every currently queued action against its registered
    /// handler.
    ///
    /// Works from a snapshot taken up front: actions enqueued while the
    /// drain is in flight wait for the next pass. Per action, in FIFO
    /// order:
    ///
    /// - no handler registered: skipped, left queued, counted in neither
    ///   bucket;
    /// - handler returns `Ok(true)`: removed, counted as synced;
    /// - handler returns `Ok(false)` or errors: retry count bumped,
    ///   counted as failed, and the pass continues.
    pub async fn drain(&self) -> DrainReport {
        let snapshot = self.queue.list(None);
        let mut synced = 0;
        let mut failed = 0;

        for action in snapshot {
            let Some(handler) = self.handlers.get(&action.entity) else {
                tracing::debug!(entity = %action.entity, id = %action.id, "no handler, skipping");
                continue;
            };

            let id = action.id.clone();
            match handler.sync(action).await {
                Ok(true) => {
                    if let Err(e) = self.queue.remove(&id) {
                        tracing::warn!(error = %e, id = %id, "failed to remove synced action");
                    }
                    synced += 1;
                }
                Ok(false) => {
                    if let Err(e) = self.queue.mark_retried(&id) {
                        tracing::warn!(error = %e, id = %id, "failed to mark action retried");
                    }
                    failed += 1;
                }
                Err(e) => {
                    tracing::debug!(error = %e, id = %id, "handler error, will retry");
                    if let Err(e) = self.queue.mark_retried(&id) {
                        tracing::warn!(error = %e, id = %id, "failed to mark action retried");
                    }
                    failed += 1;
                }
            }
        }

        let report = DrainReport { synced, failed, remaining: self.queue.len() };
        tracing::info!(
            synced = report.synced,
            failed = report.failed,
            remaining = report.remaining,
            "drain complete"
        );
        report
    }

    // ---- Diagnostics ------------------------------------------------------

    /// Storage summary for operational visibility.
    pub fn storage_stats(&self) -> StorageStats {
        let cached_items = self.store.keys(CACHE_PREFIX).map(|k| k.len()).unwrap_or(0);
        let bytes = self.store.used_bytes().unwrap_or(0);

        StorageStats {
            pending_actions: self.queue.len(),
            cached_items,
            estimated_size: format_size(bytes),
        }
    }
}

/// Formats a byte count as a short human-readable string.
fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
