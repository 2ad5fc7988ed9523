// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! Tests for error display formatting.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    capacity = { Error::CapacityExceeded, "capacity" },
    corrupted = { Error::CorruptedRecord("cache:foo".into()), "cache:foo" },
    invalid_kind = { Error::InvalidActionKind("upsert".into()), "upsert" },
    no_state_dir = { Error::NoStateDir, "state directory" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn json_error_converts() {
    let bad: std::result::Result<serde_json::Value, _> = serde_json::from_str("{nope");
    let err: Error = bad.unwrap_err().into();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn invalid_kind_hint_lists_valid_kinds() {
    let msg = Error::InvalidActionKind("x".into()).to_string();
    assert!(msg.contains("create"));
    assert!(msg.contains("update"));
    assert!(msg.contains("delete"));
}
