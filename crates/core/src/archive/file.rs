// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL-backed ping archive.
//!
//! Each entry is one line, fsynced on append. Removal rewrites the file
//! through a temp file and a rename. Lines that cannot be parsed (a torn
//! append after a crash) are skipped on read and moved to a `.corrupt`
//! sidecar on the next rewrite. Every operation runs under an
//! in-process mutex and an exclusive lock on a sidecar `.lock` file, so
//! separate processes sharing the archive cannot interleave their writes.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;

use super::ArchiveStore;
use crate::error::{Error, Result};
use crate::jsonl;
use crate::ping::{ArchivedPing, EntryId, Ping};

/// Ping archive stored as JSON lines.
pub struct JsonlArchive {
    /// Path to the archive file.
    path: PathBuf,
    /// Path to the sidecar lock file.
    lock_path: PathBuf,
    /// Where unreadable lines are kept once the archive is rewritten.
    corrupt_path: PathBuf,
    guard: Mutex<()>,
}

impl JsonlArchive {
    /// Create or open an archive at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)?;

        Ok(JsonlArchive {
            path: path.to_path_buf(),
            lock_path: path.with_extension("lock"),
            corrupt_path: path.with_extension("corrupt"),
            guard: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `f` while holding both the process and the file lock.
    fn locked<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let _guard = self.guard.lock().unwrap_or_else(|e| e.into_inner());

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)?;
        FileExt::lock_exclusive(&lock_file)
            .map_err(|e| Error::Lock(format!("{}: {e}", self.lock_path.display())))?;

        let result = f();
        // Closing the handle releases the lock
        drop(lock_file);
        result
    }

    pub fn corrupt_path(&self) -> &Path {
        &self.corrupt_path
    }

    fn read(&self) -> Result<Vec<ArchivedPing>> {
        Ok(jsonl::read_all(&self.path)?.records)
    }
}

impl ArchiveStore for JsonlArchive {
    fn append(&self, ping: &Ping) -> Result<ArchivedPing> {
        self.locked(|| {
            let next_id = self
                .read()?
                .iter()
                .map(|entry| entry.entry_id.0)
                .max()
                .map_or(1, |max| max + 1);

            let entry = ArchivedPing::from_ping(EntryId(next_id), ping);
            jsonl::append(&self.path, &entry)?;
            tracing::debug!("archived entry {} in {}", entry.entry_id, self.path.display());
            Ok(entry)
        })
    }

    fn all_entries(&self) -> Result<Vec<ArchivedPing>> {
        self.locked(|| self.read())
    }

    fn remove(&self, entry: &ArchivedPing) -> Result<bool> {
        self.locked(|| {
            let jsonl::Recovered { records: mut entries, rejected } =
                jsonl::read_all::<ArchivedPing>(&self.path)?;
            let Some(index) = entries.iter().position(|e| e == entry) else {
                return Ok(false);
            };
            entries.remove(index);

            // Keep unreadable lines before the rewrite drops them
            if !rejected.is_empty() {
                jsonl::append_lines(&self.corrupt_path, &rejected)?;
                tracing::warn!(
                    "moved {} unreadable line(s) to {}",
                    rejected.len(),
                    self.corrupt_path.display()
                );
            }
            jsonl::write_all(&self.path, &entries)?;
            tracing::debug!("removed entry {} from {}", entry.entry_id, self.path.display());
            Ok(true)
        })
    }
}
