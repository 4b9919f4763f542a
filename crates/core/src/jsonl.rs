// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL (JSON Lines) file utilities.
//!
//! Provides durable append-only storage for JSON-serializable records.
//! Each record is stored as a single JSON line with fsync for durability.
//!
//! A crash mid-append can leave a torn final line. Readers set such lines
//! aside instead of failing, and the next append starts on a fresh line.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

/// Appends a record to a JSONL file with fsync for durability.
pub fn append<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let json = serde_json::to_string(record)?;
    append_lines(path, &[json])
}

/// Appends raw lines to a file with fsync for durability.
///
/// If the file ends mid-line, a newline is written first so the new lines
/// never merge with a torn one.
pub fn append_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut file = OpenOptions::new().create(true).read(true).append(true).open(path)?;

    if ends_mid_line(&mut file)? {
        writeln!(file)?;
    }
    for line in lines {
        writeln!(file, "{line}")?;
    }
    file.sync_all()?;

    Ok(())
}

fn ends_mid_line(file: &mut File) -> Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Records read from a JSONL file, plus the lines that failed to parse.
#[derive(Debug)]
pub struct Recovered<T> {
    pub records: Vec<T>,
    /// Unparseable lines, verbatim and in file order.
    pub rejected: Vec<String>,
}

/// Reads all records from a JSONL file.
///
/// Skips empty lines and returns nothing if the file doesn't exist.
/// A line that fails to parse is logged with its 1-based line number and
/// returned in [`Recovered::rejected`].
pub fn read_all<T: DeserializeOwned>(path: &Path) -> Result<Recovered<T>> {
    let mut recovered = Recovered { records: Vec::new(), rejected: Vec::new() };
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(recovered),
        Err(e) => return Err(e.into()),
    };

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;
        // Torn writes may split a multi-byte character
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(record) => recovered.records.push(record),
            Err(e) => {
                tracing::warn!("{} line {line_no}: skipping unreadable record: {e}", path.display());
                recovered.rejected.push(line.to_string());
            }
        }
    }

    Ok(recovered)
}

/// Writes all records to a JSONL file, replacing existing content.
///
/// The records go to a sibling temp file which is then renamed over `path`,
/// so readers see either the old or the new content, never a partial file.
pub fn write_all<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let tmp_path = path.with_extension("jsonl.tmp");
    let mut file = File::create(&tmp_path)?;

    for record in records {
        let json = serde_json::to_string(record)?;
        writeln!(file, "{json}")?;
    }
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;
