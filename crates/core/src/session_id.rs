// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reading session identifiers.
//!
//! Format: `{wall_ms}-{counter}-{device}` as fixed-width lowercase hex
//! (12, 8 and 8 digits).
//!
//! Every generator in the process shares one monotonic `(wall_ms, counter)`
//! pair per device tag: when the wall clock has not moved past the last
//! identifier, the counter is bumped instead, so no two identifiers
//! generated in one process are equal.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::clock::{ClockSource, SystemClock};
use crate::device::{device_name, device_tag};
use crate::error::{Error, Result};

const WALL_DIGITS: usize = 12;
const COUNTER_DIGITS: usize = 8;
const DEVICE_DIGITS: usize = 8;

/// Largest wall clock value representable in the identifier.
const MAX_WALL_MS: u64 = (1 << (WALL_DIGITS * 4)) - 1;

/// Last `(wall_ms, counter)` handed out, per device tag.
static LAST_ISSUED: Mutex<BTreeMap<String, (u64, u32)>> = Mutex::new(BTreeMap::new());

/// Identifier of one reading session.
///
/// Deserialization does not validate, so identifiers read back from an
/// archive may be foreign or corrupted. Check with [`SessionId::is_valid`]
/// before trusting one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Parses and validates an identifier.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    /// Returns true if `candidate` has the shape of a generated identifier.
    pub fn is_valid(candidate: &str) -> bool {
        let mut parts = candidate.split('-');
        let (Some(wall), Some(counter), Some(device), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };

        is_hex_field(wall, WALL_DIGITS)
            && is_hex_field(counter, COUNTER_DIGITS)
            && is_hex_field(device, DEVICE_DIGITS)
    }

    /// Returns true if this identifier has the shape of a generated one.
    pub fn is_well_formed(&self) -> bool {
        Self::is_valid(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wraps a string without validating it.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        SessionId(raw.into())
    }
}

fn is_hex_field(field: &str, digits: usize) -> bool {
    field.len() == digits && field.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if Self::is_valid(s) {
            Ok(SessionId(s.to_string()))
        } else {
            Err(Error::InvalidSessionId(s.to_string()))
        }
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Produces process-unique session identifiers.
///
/// The monotonic state is shared by every generator in the process.
pub struct SessionIdGenerator<C: ClockSource = SystemClock> {
    clock: C,
    device: String,
}

impl SessionIdGenerator<SystemClock> {
    /// Creates a generator for this device using the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock, &device_name())
    }
}

impl Default for SessionIdGenerator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ClockSource> SessionIdGenerator<C> {
    /// Creates a generator with a custom clock source and device name.
    pub fn with_clock(clock: C, device_name: &str) -> Self {
        SessionIdGenerator {
            clock,
            device: device_tag(device_name),
        }
    }

    /// Returns the device tag embedded in every identifier.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Generates a new identifier, distinct from every earlier one.
    pub fn generate(&self) -> SessionId {
        let physical = self.clock.now_ms().min(MAX_WALL_MS);
        let mut issued = LAST_ISSUED.lock().unwrap_or_else(|e| e.into_inner());
        let last = issued.entry(self.device.clone()).or_insert((0, 0));

        let (wall_ms, counter) = if physical > last.0 {
            (physical, 0)
        } else if last.1 == u32::MAX {
            // Counter exhausted: borrow the next millisecond
            (last.0 + 1, 0)
        } else {
            (last.0, last.1 + 1)
        };
        *last = (wall_ms, counter);

        SessionId(format!(
            "{wall_ms:0w$x}-{counter:0c$x}-{}",
            self.device,
            w = WALL_DIGITS,
            c = COUNTER_DIGITS
        ))
    }
}

#[cfg(test)]
#[path = "session_id_tests.rs"]
mod tests;
