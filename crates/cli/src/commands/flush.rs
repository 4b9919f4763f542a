// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{self, Write};

use rp_core::{ArchiveStore, SessionId};

use crate::error::{Error, Result};
use crate::tracking::{flush_all_archived, flush_session_archived, ApiWrapper, SweepReport};

use super::{block_on, App};

/// Replay archived pings, for every session or just one.
pub fn run(app: &App, session: Option<String>) -> Result<()> {
    let session = session.map(|s| SessionId::parse(&s)).transpose()?;
    let api = app.api()?;
    let archive = app.archive()?;

    let report = block_on(sweep(api.as_ref(), archive.as_ref(), session.as_ref()))??;
    write_report(&mut io::stdout().lock(), &report)?;
    outcome(&report)
}

pub(crate) async fn sweep(
    api: &dyn ApiWrapper,
    archive: &dyn ArchiveStore,
    session: Option<&SessionId>,
) -> rp_core::Result<SweepReport> {
    match session {
        Some(session) => flush_session_archived(api, archive, session).await,
        None => flush_all_archived(api, archive).await,
    }
}

pub(crate) fn write_report(out: &mut impl Write, report: &SweepReport) -> io::Result<()> {
    writeln!(out, "{}", report)?;
    if let Some(e) = &report.last_error {
        writeln!(out, "last error: {}", e)?;
    }
    Ok(())
}

/// Skipped entries never become deliverable, so only failed and deferred
/// ones make the flush unsuccessful.
pub(crate) fn outcome(report: &SweepReport) -> Result<()> {
    let pending = report.failed + report.deferred;
    if pending > 0 {
        return Err(Error::SweepIncomplete { remaining: pending });
    }
    Ok(())
}

#[cfg(test)]
#[path = "flush_tests.rs"]
mod tests;
