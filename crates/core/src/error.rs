// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! Error types for ebb-core operations.

use thiserror::Error;

/// All possible errors that can occur in ebb-core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The durable store has no room left for the write.
    ///
    /// Reported, not fatal: callers recover by evicting expired cache
    /// entries and may retry the write once.
    #[error("storage capacity exceeded")]
    CapacityExceeded,

    #[error("corrupted record: {0}")]
    CorruptedRecord(String),

    #[error("invalid action kind: '{0}'\n  hint: valid kinds are: create, update, delete")]
    InvalidActionKind(String),

    #[error("no state directory available for the default store location")]
    NoStateDir,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for ebb-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
