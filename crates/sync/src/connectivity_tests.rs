// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! Tests for the connectivity monitor.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::{Arc, Mutex};

use super::*;

#[test]
fn initial_state_comes_from_environment() {
    assert!(ConnectivityMonitor::new(true).is_online());
    assert!(!ConnectivityMonitor::new(false).is_online());
}

#[test]
fn set_online_reports_change() {
    let mut monitor = ConnectivityMonitor::new(true);

    assert!(!monitor.set_online(true)); // no transition
    assert!(monitor.set_online(false));
    assert!(monitor.set_online(true));
}

#[test]
fn subscribers_notified_in_registration_order() {
    let mut monitor = ConnectivityMonitor::new(true);
    let seen: Arc<Mutex<Vec<(u8, bool)>>> = Arc::new(Mutex::new(Vec::new()));

    let seen_a = seen.clone();
    monitor.subscribe(move |online| seen_a.lock().unwrap().push((1, online)));
    let seen_b = seen.clone();
    monitor.subscribe(move |online| seen_b.lock().unwrap().push((2, online)));

    monitor.set_online(false);
    monitor.set_online(true);

    let events = seen.lock().unwrap().clone();
    assert_eq!(events, vec![(1, false), (2, false), (1, true), (2, true)]);
}

#[test]
fn no_notification_without_transition() {
    let mut monitor = ConnectivityMonitor::new(true);
    let count = Arc::new(Mutex::new(0));

    let count_cb = count.clone();
    monitor.subscribe(move |_| *count_cb.lock().unwrap() += 1);

    monitor.set_online(true);
    monitor.set_online(true);

    assert_eq!(*count.lock().unwrap(), 0);
}

#[test]
fn unsubscribe_stops_notifications() {
    let mut monitor = ConnectivityMonitor::new(true);
    let count = Arc::new(Mutex::new(0));

    let count_cb = count.clone();
    let id = monitor.subscribe(move |_| *count_cb.lock().unwrap() += 1);

    assert!(monitor.unsubscribe(id));
    assert!(!monitor.unsubscribe(id)); // already gone

    monitor.set_online(false);
    assert_eq!(*count.lock().unwrap(), 0);
    assert_eq!(monitor.subscriber_count(), 0);
}

#[test]
fn clear_subscribers_drops_everything() {
    let mut monitor = ConnectivityMonitor::new(true);
    monitor.subscribe(|_| {});
    monitor.subscribe(|_| {});

    monitor.clear_subscribers();
    assert_eq!(monitor.subscriber_count(), 0);
}
