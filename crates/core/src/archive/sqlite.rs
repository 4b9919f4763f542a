// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed ping archive.
//!
//! Entry ids come from `AUTOINCREMENT`, so they are never reused even after
//! the table has been emptied. Every mutation is a single statement.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use super::ArchiveStore;
use crate::error::{Error, Result};
use crate::ping::{ArchivedPing, EntryId, Ping, PingPayload, ReadingId};
use crate::session_id::SessionId;

/// SQL schema for the ping archive.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS archived_pings (
    entry_id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_identifier TEXT NOT NULL,
    reading_id INTEGER NOT NULL,
    last_session_date TEXT NOT NULL,
    progress REAL NOT NULL,
    duration INTEGER NOT NULL,
    latitude REAL,
    longitude REAL
);

CREATE INDEX IF NOT EXISTS idx_archived_pings_session ON archived_pings(session_identifier);
"#;

const SELECT_COLUMNS: &str = "SELECT entry_id, session_identifier, reading_id, last_session_date, \
     progress, duration, latitude, longitude FROM archived_pings";

/// Ping archive stored in a SQLite database.
pub struct SqliteArchive {
    conn: Mutex<Connection>,
}

impl SqliteArchive {
    /// Opens or creates the archive database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        tracing::debug!("opening archive database {}", path.display());
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Self::with_connection(conn)
    }

    /// Creates an archive in memory.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteArchive { conn: Mutex::new(conn) })
    }

    fn query(&self, filter: Option<&SessionId>) -> Result<Vec<ArchivedPing>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let entries = match filter {
            Some(session) => {
                let sql = format!("{SELECT_COLUMNS} WHERE session_identifier = ?1 ORDER BY entry_id");
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([session.as_str()], row_to_entry)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!("{SELECT_COLUMNS} ORDER BY entry_id");
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], row_to_entry)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
        };
        Ok(entries)
    }
}

/// Build a conversion error for a column holding an unusable value.
fn corrupted(column: &str, value: impl std::fmt::Display) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(Error::CorruptedData(format!(
            "invalid value '{value}' in column '{column}'"
        ))),
    )
}

fn row_to_entry(row: &Row<'_>) -> std::result::Result<ArchivedPing, rusqlite::Error> {
    let entry_id: i64 = row.get(0)?;
    let reading_id: i64 = row.get(2)?;
    let last_session_date: String = row.get(3)?;
    let duration: i64 = row.get(5)?;

    Ok(ArchivedPing {
        entry_id: EntryId(u64::try_from(entry_id).map_err(|_| corrupted("entry_id", entry_id))?),
        session_identifier: SessionId::from_raw(row.get::<_, String>(1)?),
        reading_id: ReadingId(
            u64::try_from(reading_id).map_err(|_| corrupted("reading_id", reading_id))?,
        ),
        last_session_date: DateTime::parse_from_rfc3339(&last_session_date)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| corrupted("last_session_date", &last_session_date))?,
        payload: PingPayload {
            progress: row.get(4)?,
            duration: u32::try_from(duration).map_err(|_| corrupted("duration", duration))?,
            latitude: row.get(6)?,
            longitude: row.get(7)?,
        },
    })
}

impl ArchiveStore for SqliteArchive {
    fn append(&self, ping: &Ping) -> Result<ArchivedPing> {
        let reading_id = i64::try_from(ping.reading_id.0)
            .map_err(|_| Error::InvalidPing(format!("reading id {} too large", ping.reading_id)))?;

        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute(
            "INSERT INTO archived_pings
                (session_identifier, reading_id, last_session_date, progress, duration, latitude, longitude)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                ping.session_identifier.as_str(),
                reading_id,
                ping.occurred_at.to_rfc3339(),
                ping.payload.progress,
                ping.payload.duration,
                ping.payload.latitude,
                ping.payload.longitude,
            ],
        )?;

        let entry_id = u64::try_from(conn.last_insert_rowid())
            .map_err(|_| Error::CorruptedData("negative entry id".to_string()))?;
        Ok(ArchivedPing::from_ping(EntryId(entry_id), ping))
    }

    fn all_entries(&self) -> Result<Vec<ArchivedPing>> {
        self.query(None)
    }

    fn entries_for(&self, session: &SessionId) -> Result<Vec<ArchivedPing>> {
        self.query(Some(session))
    }

    fn remove(&self, entry: &ArchivedPing) -> Result<bool> {
        let entry_id = i64::try_from(entry.entry_id.0)
            .map_err(|_| Error::CorruptedData(format!("entry id {} too large", entry.entry_id)))?;

        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let removed = conn.execute("DELETE FROM archived_pings WHERE entry_id = ?1", [entry_id])?;
        if removed > 0 {
            tracing::debug!("removed entry {}", entry.entry_id);
        }
        Ok(removed > 0)
    }

    fn len(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM archived_pings", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
