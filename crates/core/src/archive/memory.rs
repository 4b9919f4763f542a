// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Mutex;

use super::ArchiveStore;
use crate::error::Result;
use crate::ping::{ArchivedPing, EntryId, Ping};

/// Process-local archive. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryArchive {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    last_id: u64,
    entries: Vec<ArchivedPing>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArchiveStore for MemoryArchive {
    fn append(&self, ping: &Ping) -> Result<ArchivedPing> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.last_id += 1;
        let entry = ArchivedPing::from_ping(EntryId(inner.last_id), ping);
        inner.entries.push(entry.clone());
        Ok(entry)
    }

    fn all_entries(&self) -> Result<Vec<ArchivedPing>> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.entries.clone())
    }

    fn remove(&self, entry: &ArchivedPing) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        match inner.entries.iter().position(|e| e.entry_id == entry.entry_id) {
            Some(index) => {
                inner.entries.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
