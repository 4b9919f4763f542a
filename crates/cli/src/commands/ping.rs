// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rp_core::{PingPayload, ReadingId, SessionId};

use crate::error::Result;
use crate::tracking::{ReadingSession, SessionContext};

use super::{block_on, App};

/// Open (or resume) a session for the reading, sweep the archive, and
/// send one ping.
pub fn run(
    app: &App,
    reading_id: u64,
    progress: f64,
    duration: u32,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<()> {
    let payload = build_payload(progress, duration, lat, lng)?;
    let ctx = app.session_context()?;
    let session = block_on(deliver(&ctx, ReadingId(reading_id), payload))??;
    println!("delivered (session {})", session);
    Ok(())
}

pub(crate) fn build_payload(
    progress: f64,
    duration: u32,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<PingPayload> {
    let payload = match (lat, lng) {
        (Some(lat), Some(lng)) => PingPayload::with_location(progress, duration, lat, lng)?,
        _ => PingPayload::new(progress, duration)?,
    };
    Ok(payload)
}

pub(crate) async fn deliver(
    ctx: &SessionContext,
    reading_id: ReadingId,
    payload: PingPayload,
) -> Result<SessionId> {
    let session = ReadingSession::create(ctx, reading_id).await;
    session.ping(payload).await?;
    Ok(session.session_identifier().clone())
}

#[cfg(test)]
#[path = "ping_tests.rs"]
mod tests;
