// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reading pings and their archived form.
//!
//! A ping reports how far through a book the reader is, how long they read
//! since the previous ping, and optionally where they are.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::session_id::SessionId;

/// Opaque identifier of the reading (user + book) being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadingId(pub u64);

impl fmt::Display for ReadingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ReadingId {
    fn from(id: u64) -> Self {
        ReadingId(id)
    }
}

/// Identity of one entry in a ping archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The measured part of a ping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PingPayload {
    /// Fraction of the book read, `0.0..=1.0`.
    pub progress: f64,
    /// Seconds spent reading since the previous ping.
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl PingPayload {
    /// Creates a payload without a location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPing`] if progress is outside `0.0..=1.0`.
    pub fn new(progress: f64, duration: u32) -> Result<Self> {
        let payload = PingPayload { progress, duration, latitude: None, longitude: None };
        payload.validate()?;
        Ok(payload)
    }

    /// Creates a payload carrying the reader's location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPing`] if progress or either coordinate is out of range.
    pub fn with_location(progress: f64, duration: u32, latitude: f64, longitude: f64) -> Result<Self> {
        let payload = PingPayload {
            progress,
            duration,
            latitude: Some(latitude),
            longitude: Some(longitude),
        };
        payload.validate()?;
        Ok(payload)
    }

    /// Returns `(latitude, longitude)` when both are present.
    pub fn location(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Checks the ranges of every field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.progress) {
            return Err(Error::InvalidPing(format!(
                "progress {} out of range 0.0..=1.0",
                self.progress
            )));
        }

        match (self.latitude, self.longitude) {
            (None, None) => Ok(()),
            (Some(lat), Some(lng)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(Error::InvalidPing(format!("latitude {lat} out of range")));
                }
                if !(-180.0..=180.0).contains(&lng) {
                    return Err(Error::InvalidPing(format!("longitude {lng} out of range")));
                }
                Ok(())
            }
            _ => Err(Error::InvalidPing(
                "latitude and longitude must be given together".to_string(),
            )),
        }
    }
}

/// One delivery attempt for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Ping {
    pub session_identifier: SessionId,
    pub reading_id: ReadingId,
    pub occurred_at: DateTime<Utc>,
    pub payload: PingPayload,
}

/// A ping that could not be delivered, as stored in an archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedPing {
    pub entry_id: EntryId,
    pub session_identifier: SessionId,
    pub reading_id: ReadingId,
    /// When the session was last active, i.e. when this ping was taken.
    pub last_session_date: DateTime<Utc>,
    pub payload: PingPayload,
}

impl ArchivedPing {
    /// Builds the archive entry for a ping.
    pub fn from_ping(entry_id: EntryId, ping: &Ping) -> Self {
        ArchivedPing {
            entry_id,
            session_identifier: ping.session_identifier.clone(),
            reading_id: ping.reading_id,
            last_session_date: ping.occurred_at,
            payload: ping.payload,
        }
    }

    /// Rebuilds the ping to replay.
    pub fn to_ping(&self) -> Ping {
        Ping {
            session_identifier: self.session_identifier.clone(),
            reading_id: self.reading_id,
            occurred_at: self.last_session_date,
            payload: self.payload,
        }
    }
}

#[cfg(test)]
#[path = "ping_tests.rs"]
mod tests;
