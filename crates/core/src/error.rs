// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for rp-core operations.

use thiserror::Error;

/// All possible errors that can occur in rp-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid ping: {0}")]
    InvalidPing(String),

    #[error("invalid session identifier: '{0}'\n  hint: identifiers look like 0192f3a8c1e0-00000000-1a2b3c4d")]
    InvalidSessionId(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("failed to lock {0}")]
    Lock(String),
}

/// A specialized Result type for rp-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
