// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Record of the most recent reading session.
//!
//! A reader who puts a book down and picks it up again a few minutes later
//! is still in the same session. The ledger remembers which session was
//! active last, for which reading, and when it was last touched, so a new
//! session for the same reading inside the resume window can pick the
//! identifier back up.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ping::ReadingId;
use crate::session_id::SessionId;

/// Default time after which a session can no longer be resumed.
pub const DEFAULT_RESUME_WINDOW: Duration = Duration::from_secs(30 * 60);

/// The last known session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_identifier: SessionId,
    pub reading_id: ReadingId,
    pub last_session_date: DateTime<Utc>,
}

impl SessionRecord {
    /// Returns true if a new session for `reading_id` at `now` should
    /// continue this one.
    pub fn is_resumable(&self, reading_id: ReadingId, now: DateTime<Utc>, window: Duration) -> bool {
        if self.reading_id != reading_id || !self.session_identifier.is_well_formed() {
            return false;
        }

        let Ok(window) = chrono::Duration::from_std(window) else {
            return false;
        };
        let age = now.signed_duration_since(self.last_session_date);
        age >= chrono::Duration::zero() && age <= window
    }
}

/// File-backed store for the last [`SessionRecord`].
#[derive(Debug, Clone)]
pub struct SessionLedger {
    path: PathBuf,
}

impl SessionLedger {
    pub fn open(path: &Path) -> Self {
        SessionLedger { path: path.to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the last record, if any.
    pub fn load(&self) -> Result<Option<SessionRecord>> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the stored record.
    pub fn touch(&self, record: &SessionRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(record)?)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
