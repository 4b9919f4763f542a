// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Device naming for session identifiers.
//!
//! Every session identifier ends in a short tag derived from the device
//! name, so identifiers minted on two devices in the same millisecond
//! still differ.

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;

use sha2::{Digest, Sha256};

/// Environment variable that overrides the detected device name.
pub const DEVICE_ENV: &str = "READPING_DEVICE";

/// Returns the name of the current device.
///
/// Resolution order:
/// 1. `READPING_DEVICE` env var
/// 2. `HOSTNAME` env var
/// 3. `/etc/hostname`
/// 4. Unix username from USER or LOGNAME
/// 5. Fallback to "device"
pub fn device_name() -> String {
    if let Some(name) = env_value(DEVICE_ENV) {
        return name;
    }

    if let Some(name) = env_value("HOSTNAME") {
        return name;
    }

    if let Some(name) = read_hostname_file() {
        return name;
    }

    if let Some(name) = env_value("USER").or_else(|| env_value("LOGNAME")) {
        return name;
    }

    "device".to_string()
}

/// Returns the 8 hex character tag for a device name.
///
/// The tag is the first 4 bytes of SHA256(name).
pub fn device_tag(name: &str) -> String {
    let hash = Sha256::digest(name.as_bytes());
    hex::encode(&hash[..4])
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn read_hostname_file() -> Option<String> {
    std::fs::read_to_string("/etc/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
