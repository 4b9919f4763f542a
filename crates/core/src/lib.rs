// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rp-core: Shared library for the readping progress reporter
//!
//! This crate provides the data model for reading pings, session identifier
//! generation, and the durable archive that holds pings which could not be
//! delivered to the reading service.

pub mod archive;
pub mod clock;
pub mod device;
pub mod error;
pub mod jsonl;
pub mod ledger;
pub mod ping;
pub mod session_id;

pub use archive::{ArchiveStore, JsonlArchive, MemoryArchive, SqliteArchive};
pub use clock::{ClockSource, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use ledger::{SessionLedger, SessionRecord};
pub use ping::{ArchivedPing, EntryId, Ping, PingPayload, ReadingId};
pub use session_id::{SessionId, SessionIdGenerator};
