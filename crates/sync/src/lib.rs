// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! ebb-sync: Offline sync orchestration.
//!
//! Sits on top of ebb-core's durable primitives and drives reconciliation
//! when connectivity returns.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ queue_action ┌──────────────┐    drain     ┌──────────────┐
//! │  Application │─────────────►│  SyncService │─────────────►│ SyncHandler  │
//! │  (producers) │  cache_data  │              │   per entity │ (transport)  │
//! └──────────────┘              └──────┬───────┘              └──────────────┘
//!                                      │ owns
//!                       ┌──────────────┼──────────────┐
//!                       ▼              ▼              ▼
//!                 ActionQueue        Cache      Connectivity
//!                       └──────────────┴─ shared Store ─┘
//! ```
//!
//! # Behavior
//!
//! - Producers queue mutations and cache reads regardless of network state.
//! - An offline→online transition notifies subscribers, then drains the
//!   queue automatically; the drain outcome is logged, not awaited by the
//!   signal source.
//! - One misbehaving handler never blocks the rest of a drain pass.

pub mod connectivity;
pub mod handler;
pub mod service;

pub use connectivity::{ConnectivityMonitor, SubscriptionId};
pub use handler::{handler_fn, FnHandler, HandlerError, HandlerResult, SyncHandler};
pub use service::{DrainReport, ServiceConfig, StorageStats, SyncService};
