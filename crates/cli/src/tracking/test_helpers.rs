// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for tracking module tests.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rp_core::clock::datetime_from_ms;
use rp_core::{ArchiveStore, ManualClock, MemoryArchive, Ping, PingPayload, ReadingId, SessionId};

use super::api_tests::MockApi;
use super::session::SessionContext;

pub const SESSION_A: &str = "0192f3a8c1e0-00000000-1a2b3c4d";
pub const SESSION_B: &str = "0192f3a8c1e0-00000001-1a2b3c4d";

/// 2024-01-10T12:00:00Z
pub const START_MS: u64 = 1_704_888_000_000;

pub const READING: ReadingId = ReadingId(42);

/// Create a ping for the given session with the given progress.
pub fn make_ping(session: &str, progress: f64) -> Ping {
    Ping {
        session_identifier: SessionId::from_raw(session),
        reading_id: READING,
        occurred_at: datetime_from_ms(START_MS),
        payload: PingPayload::new(progress, 120).unwrap(),
    }
}

pub fn payload(progress: f64) -> PingPayload {
    PingPayload::new(progress, 120).unwrap()
}

/// Everything a session test needs, with handles kept for assertions.
pub struct Harness {
    pub api: Arc<MockApi>,
    pub archive: Arc<MemoryArchive>,
    pub clock: Arc<ManualClock>,
    pub ctx: SessionContext,
}

pub fn harness(api: MockApi) -> Harness {
    let api = Arc::new(api);
    let archive = Arc::new(MemoryArchive::new());
    let clock = Arc::new(ManualClock::new(START_MS));
    let ctx = SessionContext::with_clock(
        api.clone(),
        archive.clone(),
        clock.clone(),
        "test-device",
    );
    Harness { api, archive, clock, ctx }
}

impl Harness {
    pub fn archived(&self) -> usize {
        self.archive.len().unwrap()
    }
}
