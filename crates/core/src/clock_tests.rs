// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! Tests for the clock module.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;

#[test]
fn system_clock_is_past_2020() {
    // 2020-01-01 in epoch milliseconds.
    assert!(SystemClock.now_ms() > 1_577_836_800_000);
}

#[test]
fn manual_clock_set_and_advance() {
    let clock = ManualClock::new(1_000);
    assert_eq!(clock.now_ms(), 1_000);

    clock.advance(500);
    assert_eq!(clock.now_ms(), 1_500);

    clock.set(10);
    assert_eq!(clock.now_ms(), 10);
}

#[test]
fn datetime_from_ms_round_trips() {
    let dt = datetime_from_ms(1_700_000_000_123);
    assert_eq!(dt.timestamp_millis(), 1_700_000_000_123);
}

#[test]
fn datetime_from_ms_out_of_range_falls_back_to_epoch() {
    // i64::MAX ms is far past chrono's representable range.
    let dt = datetime_from_ms(i64::MAX as u64);
    assert_eq!(dt.timestamp_millis(), 0);
}
