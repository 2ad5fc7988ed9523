// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! Sync handler abstraction.
//!
//! A handler owns the actual transmission of one entity's actions: the
//! network call, idempotency keys, payload shaping. The orchestrator only
//! interprets the outcome:
//!
//! - `Ok(true)`  — delivered; the action is removed from the queue.
//! - `Ok(false)` — rejected or not delivered; the action stays queued and
//!   its retry count is bumped.
//! - `Err(_)`    — treated exactly like `Ok(false)`; a handler error never
//!   aborts the drain of the remaining actions.
//!
//! The trait uses boxed futures so handlers stay object-safe and mocks are
//! trivial to write.

use std::future::Future;
use std::pin::Pin;

use ebb_core::PendingAction;

/// Error a handler may surface instead of a boolean outcome.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    /// Creates a handler error from any message.
    pub fn new(msg: impl Into<String>) -> Self {
        HandlerError(msg.into())
    }
}

/// Outcome of one replay attempt.
pub type HandlerResult = Result<bool, HandlerError>;

/// Replays pending actions for one entity.
pub trait SyncHandler: Send + Sync {
    /// Attempts to transmit one action.
    fn sync(&self, action: PendingAction)
        -> Pin<Box<dyn Future<Output = HandlerResult> + Send + '_>>;
}

/// Adapter turning an async closure into a [`SyncHandler`].
pub struct FnHandler<F> {
    f: F,
}

/// Wraps an async closure as a [`SyncHandler`].
///
/// ```
/// use ebb_sync::handler_fn;
///
/// let handler = handler_fn(|action| async move {
///     // transport call goes here
///     Ok(action.retry_count < 5)
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(PendingAction) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    FnHandler { f }
}

impl<F, Fut> SyncHandler for FnHandler<F>
where
    F: Fn(PendingAction) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn sync(
        &self,
        action: PendingAction,
    ) -> Pin<Box<dyn Future<Output = HandlerResult> + Send + '_>> {
        Box::pin((self.f)(action))
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
