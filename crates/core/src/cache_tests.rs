// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! Tests for the expiring cache.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::clock::ManualClock;
use crate::store::{MemoryStore, Store};
use serde_json::json;

fn setup() -> (Arc<MemoryStore>, Arc<ManualClock>, Cache) {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(1_000));
    let cache = Cache::new(store.clone(), clock.clone());
    (store, clock, cache)
}

#[test]
fn set_then_get_returns_value() {
    let (_, _, cache) = setup();

    cache.set("report", json!({"rows": 3}), None);
    assert_eq!(cache.get("report"), Some(json!({"rows": 3})));
}

#[test]
fn get_absent_returns_none() {
    let (_, _, cache) = setup();
    assert_eq!(cache.get("missing"), None);
}

#[test]
fn overwrite_keeps_last_value() {
    let (_, _, cache) = setup();

    cache.set("k", json!("v1"), None);
    cache.set("k", json!("v2"), None);
    assert_eq!(cache.get("k"), Some(json!("v2")));
}

#[test]
fn expired_entry_is_absent_and_deleted() {
    let (store, clock, cache) = setup();

    cache.set("k", json!("v"), Some(Duration::from_millis(100)));
    assert_eq!(cache.get("k"), Some(json!("v")));

    clock.advance(150);
    assert_eq!(cache.get("k"), None);

    // The durable record is gone too, not just hidden
    assert!(store.keys(CACHE_PREFIX).unwrap().is_empty());
}

#[test]
fn default_ttl_is_thirty_minutes() {
    let (_, clock, cache) = setup();

    cache.set("k", json!("v"), None);

    clock.advance(30 * 60 * 1000 - 1);
    assert_eq!(cache.get("k"), Some(json!("v")));

    clock.advance(1);
    assert_eq!(cache.get("k"), None);
}

#[test]
fn corrupt_record_is_deleted_and_absent() {
    let (store, _, cache) = setup();

    store.write("cache:bad", "not json at all").unwrap();
    assert_eq!(cache.get("bad"), None);
    assert_eq!(store.read("cache:bad").unwrap(), None);
}

#[test]
fn invalidate_all_removes_only_cache_namespace() {
    let (store, _, cache) = setup();

    cache.set("a", json!(1), None);
    cache.set("b", json!(2), None);
    store.write("pending_actions", "[]").unwrap();

    let removed = cache.invalidate(None);
    assert_eq!(removed, 2);
    assert!(cache.is_empty());
    assert_eq!(store.read("pending_actions").unwrap(), Some("[]".to_string()));
}

#[test]
fn invalidate_pattern_matches_substring() {
    let (_, _, cache) = setup();

    cache.set("report:2026", json!(1), None);
    cache.set("report:2025", json!(2), None);
    cache.set("controls", json!(3), None);

    let removed = cache.invalidate(Some("report"));
    assert_eq!(removed, 2);
    assert_eq!(cache.get("controls"), Some(json!(3)));
    assert_eq!(cache.get("report:2026"), None);
}

#[test]
fn evict_expired_counts_expired_and_corrupt() {
    let (store, clock, cache) = setup();

    cache.set("fresh", json!(1), Some(Duration::from_secs(60)));
    cache.set("stale", json!(2), Some(Duration::from_millis(10)));
    store.write("cache:garbage", "{{{").unwrap();

    clock.advance(100);
    let removed = cache.evict_expired();

    assert_eq!(removed, 2);
    assert_eq!(cache.get("fresh"), Some(json!(1)));
    assert_eq!(cache.len(), 1);
}

#[test]
fn full_store_triggers_eviction_without_error() {
    let store = Arc::new(MemoryStore::new().with_capacity(120));
    let clock = Arc::new(ManualClock::new(1_000));
    let cache = Cache::new(store.clone(), clock.clone());

    cache.set("old", json!("x"), Some(Duration::from_millis(10)));
    clock.advance(100);

    // Too big to fit alongside the stale entry; set swallows the failure
    // and evicts expired records as recovery.
    let big = "y".repeat(200);
    cache.set("new", json!(big), None);

    assert_eq!(cache.get("old"), None);
    assert!(store.keys("cache:old").unwrap().is_empty());
}
