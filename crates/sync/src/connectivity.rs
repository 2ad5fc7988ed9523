// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! Connectivity state tracking.
//!
//! A two-state machine (`OFFLINE` ⇄ `ONLINE`) driven purely by environment
//! signals fed in by the host; no timers, no polling. Subscribers are
//! notified synchronously, in registration order, on every transition.
//!
//! The monitor is plain owned state inside [`crate::SyncService`] rather
//! than a process-wide flag, so two services never share connectivity
//! state by accident.

/// Handle returned by [`ConnectivityMonitor::subscribe`], used to
/// unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn(bool) + Send>;

/// Tracks online/offline state and notifies subscribers on transitions.
pub struct ConnectivityMonitor {
    online: bool,
    subscribers: Vec<(SubscriptionId, Callback)>,
    next_id: u64,
}

impl ConnectivityMonitor {
    /// Creates a monitor seeded with the environment's current state.
    pub fn new(initial_online: bool) -> Self {
        ConnectivityMonitor { online: initial_online, subscribers: Vec::new(), next_id: 0 }
    }

    /// Current connectivity state.
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Registers a callback invoked with the new state on every transition.
    pub fn subscribe(&mut self, callback: impl Fn(bool) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscriber. Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Applies an environment signal.
    ///
    /// Returns true if the state actually changed. Subscribers are only
    /// notified on a real transition, in registration order.
    pub fn set_online(&mut self, online: bool) -> bool {
        if self.online == online {
            return false;
        }
        self.online = online;

        for (_, callback) in &self.subscribers {
            callback(online);
        }
        true
    }

    /// Drops all subscribers.
    pub fn clear_subscribers(&mut self) {
        self.subscribers.clear();
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
