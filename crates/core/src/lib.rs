// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! ebb-core: Durability primitives for offline-first clients.
//!
//! This crate provides the synchronous building blocks of the ebb offline
//! layer: a capacity-bounded key-value [`Store`] abstraction with SQLite and
//! in-memory backends, an expiring [`Cache`], and the durable
//! [`ActionQueue`] of pending mutations awaiting replay.
//!
//! The async orchestration (connectivity tracking, handler dispatch) lives
//! in the companion ebb-sync crate.

pub mod action;
pub mod cache;
pub mod clock;
pub mod error;
pub mod queue;
pub mod store;

pub use action::{ActionKind, PendingAction};
pub use cache::{Cache, CACHE_PREFIX, DEFAULT_TTL};
pub use clock::{datetime_from_ms, ClockSource, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use queue::{ActionQueue, BackgroundSync, QUEUE_KEY};
pub use store::{MemoryStore, SqliteStore, Store};
