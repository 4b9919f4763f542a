// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::tracking::{ApiError, PingError};

/// All possible errors that can occur in the readping CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("cannot determine {0} directory\n  hint: set {1} to choose one explicitly")]
    NoDirectory(&'static str, &'static str),

    #[error("{0}")]
    Ping(#[from] PingError),

    #[error("could not reach the reading service: {0}")]
    Api(#[from] ApiError),

    #[error("{remaining} archived ping(s) still pending after flush\n  hint: run 'readping flush' again once the service is reachable")]
    SweepIncomplete { remaining: usize },

    #[error("invalid session identifier: '{0}'")]
    SessionIdRejected(String),

    #[error(transparent)]
    Core(#[from] rp_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for readping operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
