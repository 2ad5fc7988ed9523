// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! Tests for the handler adapter.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use ebb_core::{ActionKind, PendingAction};
use serde_json::json;

fn make_action(entity: &str) -> PendingAction {
    PendingAction::new(ActionKind::Create, entity, json!({"n": 1}), 1_000)
}

#[tokio::test]
async fn closure_handler_sees_the_action() {
    let handler = handler_fn(|action: PendingAction| async move {
        Ok(action.entity == "evidence")
    });

    assert!(handler.sync(make_action("evidence")).await.unwrap());
    assert!(!handler.sync(make_action("control")).await.unwrap());
}

#[tokio::test]
async fn closure_handler_can_error() {
    let handler =
        handler_fn(|_action| async move { Err(HandlerError::new("connection refused")) });

    let err = handler.sync(make_action("evidence")).await.unwrap_err();
    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn handler_works_as_trait_object() {
    let handler: Box<dyn SyncHandler> = Box::new(handler_fn(|_action| async move { Ok(true) }));
    assert!(handler.sync(make_action("evidence")).await.unwrap());
}
