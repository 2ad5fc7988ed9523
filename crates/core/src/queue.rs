// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! Durable queue of pending actions.
//!
//! The whole queue lives in a single durable record: a serialized
//! `Vec<PendingAction>` under [`QUEUE_KEY`]. Order in that sequence is the
//! replay order, FIFO across all entities.
//!
//! The queue is a dumb ledger. It decides nothing about success, failure,
//! or retry policy; the orchestrator in ebb-sync removes entries after a
//! handler confirms delivery and bumps `retry_count` otherwise.

use std::sync::Arc;

use serde_json::Value;

use crate::action::{ActionKind, PendingAction};
use crate::clock::ClockSource;
use crate::error::Result;
use crate::store::Store;

/// Durable store key holding the serialized action sequence.
pub const QUEUE_KEY: &str = "pending_actions";

/// Tag passed to the background-sync capability on every enqueue.
const SYNC_TAG: &str = "ebb-pending";

/// Optional host capability for requesting a background sync pass.
///
/// Some host environments can schedule work for when connectivity returns
/// even if the application is not running. Absence of the capability is
/// not an error; the queue simply skips the hint.
pub trait BackgroundSync: Send + Sync {
    /// Best-effort request for a sync pass identified by `tag`.
    fn request_sync(&self, tag: &str);
}

/// Ordered durable queue of mutations awaiting transmission.
pub struct ActionQueue {
    store: Arc<dyn Store>,
    clock: Arc<dyn ClockSource>,
    background: Option<Arc<dyn BackgroundSync>>,
}

impl ActionQueue {
    /// Creates a queue over the given store.
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn ClockSource>) -> Self {
        ActionQueue { store, clock, background: None }
    }

    /// Attaches a background-sync capability, hinted on every enqueue.
    pub fn with_background(mut self, background: Arc<dyn BackgroundSync>) -> Self {
        self.background = Some(background);
        self
    }

    /// Constructs and appends a new action, returning its generated id.
    pub fn enqueue(&self, kind: ActionKind, entity: &str, data: Value) -> Result<String> {
        let action = PendingAction::new(kind, entity, data, self.clock.now_ms());
        let id = action.id.clone();
        self.push(action)?;
        Ok(id)
    }

    /// Appends a pre-built action to the end of the queue.
    pub fn push(&self, action: PendingAction) -> Result<()> {
        let mut actions = self.load();
        actions.push(action);
        self.save(&actions)?;

        if let Some(background) = &self.background {
            background.request_sync(SYNC_TAG);
        }
        Ok(())
    }

    /// Returns queued actions in FIFO order, optionally filtered by entity.
    pub fn list(&self, entity: Option<&str>) -> Vec<PendingAction> {
        let actions = self.load();
        match entity {
            Some(entity) => actions.into_iter().filter(|a| a.entity == entity).collect(),
            None => actions,
        }
    }

    /// Removes the action with the given id. No-op if absent.
    ///
    /// Relative order of the remaining actions is unchanged.
    pub fn remove(&self, id: &str) -> Result<()> {
        let mut actions = self.load();
        let before = actions.len();
        actions.retain(|a| a.id != id);
        if actions.len() != before {
            self.save(&actions)?;
        }
        Ok(())
    }

    /// Increments `retry_count` on the matching action. No-op if absent.
    pub fn mark_retried(&self, id: &str) -> Result<()> {
        let mut actions = self.load();
        if let Some(action) = actions.iter_mut().find(|a| a.id == id) {
            action.retry_count += 1;
            self.save(&actions)?;
        }
        Ok(())
    }

    /// Empties the queue.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(QUEUE_KEY)
    }

    /// Number of queued actions.
    pub fn len(&self) -> usize {
        self.load().len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.load().is_empty()
    }

    /// Reads the stored sequence. A missing record is an empty queue; a
    /// corrupt record is deleted and also treated as empty.
    fn load(&self) -> Vec<PendingAction> {
        match self.store.read(QUEUE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(actions) => actions,
                Err(_) => {
                    let _ = self.store.remove(QUEUE_KEY);
                    Vec::new()
                }
            },
            _ => Vec::new(),
        }
    }

    fn save(&self, actions: &[PendingAction]) -> Result<()> {
        let json = serde_json::to_string(actions)?;
        self.store.write(QUEUE_KEY, &json)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
