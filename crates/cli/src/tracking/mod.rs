// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reading progress reporting.
//!
//! Sends reading pings to the reading service and keeps the ones that
//! could not be delivered until a later sweep gets them through.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ ReadingSession │────►│ ApiWrapper  │────►│   Reading   │
//! │  (one reading) │◄────│   (trait)   │◄────│   Service   │
//! └────────────────┘     └─────────────┘     └─────────────┘
//!        │   ▲                  ▲
//!   fail ▼   │ sweep            │ replay
//! ┌────────────────┐            │
//! │  ArchiveStore  │────────────┘
//! │ (undelivered)  │
//! └────────────────┘
//! ```
//!
//! # Features
//!
//! - HTTP wrapper for the reading service (bearer token, per-request timeout)
//! - Failed pings archived durably, one entry per failed attempt
//! - Sweeps on session creation and on demand, in insertion order
//! - Single in-flight delivery per session
//! - Session resumption through the session ledger
//! - Injectable API wrapper, archive and clock for testing

mod api;
mod http;
mod session;
mod sweep;

pub use api::{ApiError, ApiFuture, ApiResult, ApiWrapper};
pub use http::{HttpApiConfig, HttpApiWrapper};
pub use session::{PingError, PingErrorKind, ReadingSession, SessionContext};
pub use sweep::{flush_all_archived, flush_session_archived, SweepReport};

#[cfg(test)]
pub(crate) mod test_helpers;




#[cfg(test)]
mod sweep_tests;
