// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable storage for pings that could not be delivered.
//!
//! An archive maps session identifiers to the pings that are still owed to
//! the reading service. Entries come back in the order they were appended,
//! which is the order they are replayed in. An entry leaves the archive only
//! through [`ArchiveStore::remove`], after its delivery was confirmed.
//!
//! Backends:
//! - [`JsonlArchive`]: one JSON line per entry, the default
//! - [`SqliteArchive`]: a single SQLite table
//! - [`MemoryArchive`]: process-local, for embedding and tests

mod file;
mod memory;
mod sqlite;

pub use file::JsonlArchive;
pub use memory::MemoryArchive;
pub use sqlite::SqliteArchive;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ping::{ArchivedPing, Ping};
use crate::session_id::SessionId;

/// Storage for undelivered pings.
///
/// Every mutation is atomic per entry, so a sweep and a fresh failure can
/// touch the same archive concurrently without losing or duplicating entries.
pub trait ArchiveStore: Send + Sync {
    /// Adds one entry for the ping and returns it with its assigned id.
    fn append(&self, ping: &Ping) -> Result<ArchivedPing>;

    /// Returns every outstanding entry, in insertion order.
    fn all_entries(&self) -> Result<Vec<ArchivedPing>>;

    /// Returns the outstanding entries of one session, in insertion order.
    fn entries_for(&self, session: &SessionId) -> Result<Vec<ArchivedPing>> {
        Ok(self
            .all_entries()?
            .into_iter()
            .filter(|entry| &entry.session_identifier == session)
            .collect())
    }

    /// Deletes exactly one entry.
    ///
    /// Returns `false` if the entry was no longer present.
    fn remove(&self, entry: &ArchivedPing) -> Result<bool>;

    /// Number of outstanding entries.
    fn len(&self) -> Result<usize> {
        Ok(self.all_entries()?.len())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<S: ArchiveStore + ?Sized> ArchiveStore for Arc<S> {
    fn append(&self, ping: &Ping) -> Result<ArchivedPing> {
        (**self).append(ping)
    }

    fn all_entries(&self) -> Result<Vec<ArchivedPing>> {
        (**self).all_entries()
    }

    fn entries_for(&self, session: &SessionId) -> Result<Vec<ArchivedPing>> {
        (**self).entries_for(session)
    }

    fn remove(&self, entry: &ArchivedPing) -> Result<bool> {
        (**self).remove(entry)
    }

    fn len(&self) -> Result<usize> {
        (**self).len()
    }
}

/// The on-disk format of an archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveBackend {
    #[default]
    Jsonl,
    Sqlite,
}

impl ArchiveBackend {
    /// Default file name for this backend inside a state directory.
    pub fn file_name(self) -> &'static str {
        match self {
            ArchiveBackend::Jsonl => "pings.jsonl",
            ArchiveBackend::Sqlite => "pings.db",
        }
    }

    /// Opens (creating if needed) an archive of this kind at `path`.
    pub fn open(self, path: &Path) -> Result<Arc<dyn ArchiveStore>> {
        Ok(match self {
            ArchiveBackend::Jsonl => Arc::new(JsonlArchive::open(path)?),
            ArchiveBackend::Sqlite => Arc::new(SqliteArchive::open(path)?),
        })
    }
}

impl fmt::Display for ArchiveBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveBackend::Jsonl => write!(f, "jsonl"),
            ArchiveBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for ArchiveBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "jsonl" => Ok(ArchiveBackend::Jsonl),
            "sqlite" => Ok(ArchiveBackend::Sqlite),
            other => Err(Error::CorruptedData(format!(
                "unknown archive backend '{other}' (expected jsonl or sqlite)"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
