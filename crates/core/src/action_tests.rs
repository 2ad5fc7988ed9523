// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! Tests for the pending action model.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use serde_json::json;
use yare::parameterized;

#[parameterized(
    create = { "create", ActionKind::Create },
    update = { "update", ActionKind::Update },
    delete = { "delete", ActionKind::Delete },
)]
fn kind_parses_and_displays(s: &str, kind: ActionKind) {
    assert_eq!(s.parse::<ActionKind>().unwrap(), kind);
    assert_eq!(kind.to_string(), s);
}

#[test]
fn kind_rejects_unknown() {
    assert!("upsert".parse::<ActionKind>().is_err());
}

#[test]
fn new_action_has_expected_shape() {
    let action = PendingAction::new(ActionKind::Create, "evidence", json!({"n": 1}), 1_000);

    assert!(action.id.starts_with("evidence_1000_"));
    assert_eq!(action.entity, "evidence");
    assert_eq!(action.kind, ActionKind::Create);
    assert_eq!(action.retry_count, 0);
    assert_eq!(action.timestamp.timestamp_millis(), 1_000);
}

#[test]
fn ids_are_unique_for_identical_inputs() {
    let a = PendingAction::new(ActionKind::Update, "control", json!(null), 42);
    let b = PendingAction::new(ActionKind::Update, "control", json!(null), 42);
    assert_ne!(a.id, b.id);
}

#[test]
fn retry_count_defaults_to_zero_when_missing() {
    // Records written before retry tracking carry no retry_count field.
    let raw = r#"{
        "id": "evidence_1_abc",
        "kind": "create",
        "entity": "evidence",
        "data": {},
        "timestamp": "2026-01-01T00:00:00Z"
    }"#;

    let action: PendingAction = serde_json::from_str(raw).unwrap();
    assert_eq!(action.retry_count, 0);
}
