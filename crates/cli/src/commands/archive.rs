// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{self, Write};

use chrono::SecondsFormat;
use rp_core::{ArchiveStore, ArchivedPing, SessionId};

use crate::cli::{ArchiveCommand, OutputFormat};
use crate::error::Result;

use super::App;

/// Execute an archive subcommand.
pub fn run(app: &App, cmd: ArchiveCommand) -> Result<()> {
    match cmd {
        ArchiveCommand::List { session, output } => {
            let archive = app.archive()?;
            list(archive.as_ref(), session.as_deref(), output, &mut io::stdout().lock())
        }
    }
}

/// List outstanding entries in replay order.
///
/// The session filter is not validated, so entries with malformed
/// identifiers can still be inspected.
pub(crate) fn list(
    archive: &dyn ArchiveStore,
    session: Option<&str>,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let entries = match session {
        Some(session) => archive.entries_for(&SessionId::from_raw(session))?,
        None => archive.all_entries()?,
    };

    match output {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        }
        OutputFormat::Text => {
            if entries.is_empty() {
                writeln!(out, "No archived pings.")?;
                return Ok(());
            }
            for entry in &entries {
                writeln!(out, "{}", format_entry(entry))?;
            }
        }
    }
    Ok(())
}

fn format_entry(entry: &ArchivedPing) -> String {
    let mut line = format!(
        "#{} {} reading {} {:.1}% {}s at {}",
        entry.entry_id,
        entry.session_identifier,
        entry.reading_id,
        entry.payload.progress * 100.0,
        entry.payload.duration,
        entry.last_session_date.to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    if let Some((lat, lng)) = entry.payload.location() {
        line.push_str(&format!(" ({lat}, {lng})"));
    }
    if !entry.session_identifier.is_well_formed() {
        line.push_str(" [invalid session]");
    }
    line
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
