// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! Pending mutation records.
//!
//! A [`PendingAction`] describes one mutation attempted while offline (or
//! while a send failed). The queue never inspects `data`; it is an opaque
//! payload the registered sync handler for `entity` knows how to replay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::clock::datetime_from_ms;
use crate::error::{Error, Result};

/// The kind of mutation a pending action represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Create,
    Update,
    Delete,
}

impl ActionKind {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Update => "update",
            ActionKind::Delete => "delete",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create" => Ok(ActionKind::Create),
            "update" => Ok(ActionKind::Update),
            "delete" => Ok(ActionKind::Delete),
            other => Err(Error::InvalidActionKind(other.to_string())),
        }
    }
}

/// A queued mutation awaiting replay against the remote side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingAction {
    /// Globally unique id: `{entity}_{epoch_ms}_{random}`.
    pub id: String,
    /// What kind of mutation this is.
    pub kind: ActionKind,
    /// Logical resource type; the dispatch key for sync handlers.
    pub entity: String,
    /// Opaque mutation payload.
    pub data: serde_json::Value,
    /// Creation time. Insertion order in the queue, not this timestamp,
    /// is authoritative for replay order.
    pub timestamp: DateTime<Utc>,
    /// Number of failed replay attempts so far.
    #[serde(default)]
    pub retry_count: u32,
}

impl PendingAction {
    /// Builds a fresh action with a generated id and `retry_count = 0`.
    pub fn new(kind: ActionKind, entity: &str, data: serde_json::Value, now_ms: u64) -> Self {
        let mut suffix = Uuid::new_v4().simple().to_string();
        suffix.truncate(8);

        PendingAction {
            id: format!("{entity}_{now_ms}_{suffix}"),
            kind,
            entity: entity.to_string(),
            data,
            timestamp: datetime_from_ms(now_ms),
            retry_count: 0,
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
