// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replaying archived pings.
//!
//! A sweep walks archive entries in insertion order and tries each one
//! once. Delivered entries are removed right away. When an entry fails,
//! the rest of that session's entries wait for the next sweep, so a
//! replay never sends a session's archived pings out of order. Live pings
//! are not held back by archived ones and may overtake them. Other
//! sessions carry on. Entries whose session identifier is not well formed are left
//! untouched.

use std::collections::HashSet;
use std::fmt;

use rp_core::{ArchiveStore, ArchivedPing, SessionId};

use super::api::{ApiError, ApiWrapper};

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    /// Entries delivered and removed.
    pub delivered: usize,
    /// Entries whose delivery failed.
    pub failed: usize,
    /// Entries not attempted because an earlier entry of their session failed.
    pub deferred: usize,
    /// Entries with an invalid session identifier.
    pub skipped: usize,
    /// The most recent delivery failure.
    pub last_error: Option<ApiError>,
}

impl SweepReport {
    /// Entries still in the archive after the sweep.
    pub fn remaining(&self) -> usize {
        self.failed + self.deferred + self.skipped
    }

    /// True if the sweep found nothing to do.
    pub fn is_empty(&self) -> bool {
        self.delivered == 0 && self.remaining() == 0
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "delivered: {}, failed: {}, deferred: {}, skipped: {}",
            self.delivered, self.failed, self.deferred, self.skipped
        )
    }
}

/// Replay every archived ping of every session.
pub async fn flush_all_archived(
    api: &dyn ApiWrapper,
    archive: &dyn ArchiveStore,
) -> rp_core::Result<SweepReport> {
    let entries = archive.all_entries()?;
    replay(api, archive, entries).await
}

/// Replay the archived pings of one session.
pub async fn flush_session_archived(
    api: &dyn ApiWrapper,
    archive: &dyn ArchiveStore,
    session: &SessionId,
) -> rp_core::Result<SweepReport> {
    let entries = archive.entries_for(session)?;
    replay(api, archive, entries).await
}

async fn replay(
    api: &dyn ApiWrapper,
    archive: &dyn ArchiveStore,
    entries: Vec<ArchivedPing>,
) -> rp_core::Result<SweepReport> {
    let mut report = SweepReport::default();
    let mut blocked: HashSet<SessionId> = HashSet::new();

    for entry in entries {
        if !entry.session_identifier.is_well_formed() {
            tracing::warn!(
                "skipping archived entry {} with invalid session identifier '{}'",
                entry.entry_id,
                entry.session_identifier
            );
            report.skipped += 1;
            continue;
        }

        if blocked.contains(&entry.session_identifier) {
            report.deferred += 1;
            continue;
        }

        let ping = entry.to_ping();
        match api.send_ping(&ping).await {
            Ok(()) => {
                if !archive.remove(&entry)? {
                    // Another sweep delivered and removed it first
                    tracing::debug!("archived entry {} already removed", entry.entry_id);
                }
                report.delivered += 1;
            }
            Err(e) => {
                tracing::warn!(
                    "replay of archived entry {} (session {}) failed: {}",
                    entry.entry_id,
                    entry.session_identifier,
                    e
                );
                report.failed += 1;
                report.last_error = Some(e);
                blocked.insert(entry.session_identifier);
            }
        }
    }

    if !report.is_empty() {
        tracing::info!("sweep finished: {}", report);
    }
    Ok(report)
}
