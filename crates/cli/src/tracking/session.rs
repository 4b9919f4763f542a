// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reading sessions.
//!
//! A [`ReadingSession`] stands for one continuous stretch of reading of one
//! book. It delivers pings through the [`ApiWrapper`] and archives the ones
//! that fail, so no progress is lost while offline.
//!
//! Per-ping lifecycle:
//!
//! ```text
//! Pending ──► Delivered
//!    │
//!    └──────► Archived ──► Delivered   (on a later sweep)
//!                 ▲  │
//!                 └──┘                 (sweep failed again)
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use rp_core::device::device_name;
use rp_core::ledger::DEFAULT_RESUME_WINDOW;
use rp_core::{
    ArchiveStore, ClockSource, EntryId, Ping, PingPayload, ReadingId, SessionId,
    SessionIdGenerator, SessionLedger, SessionRecord, SystemClock,
};

use super::api::{ApiError, ApiWrapper};
use super::sweep::{self, SweepReport};

/// Why a ping did not reach the service.
#[derive(Debug, thiserror::Error)]
pub enum PingError {
    /// The payload failed validation; nothing was sent or archived.
    #[error(transparent)]
    Invalid(rp_core::Error),

    /// Delivery failed; the ping is safe in the archive.
    #[error("ping not delivered ({source}); archived as entry {entry}")]
    Archived {
        entry: EntryId,
        #[source]
        source: ApiError,
    },

    /// Delivery failed and so did archiving: the ping is gone.
    #[error("ping lost: delivery failed ({delivery}) and archiving failed ({store})")]
    Lost {
        delivery: ApiError,
        #[source]
        store: rp_core::Error,
    },
}

/// Coarse classification of a [`PingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingErrorKind {
    InvalidPing,
    NetworkUnavailable,
    ServerRejected,
    MalformedResponse,
    StoreIoFailure,
}

impl PingError {
    pub fn kind(&self) -> PingErrorKind {
        match self {
            PingError::Invalid(_) => PingErrorKind::InvalidPing,
            PingError::Lost { .. } => PingErrorKind::StoreIoFailure,
            PingError::Archived { source, .. } => match source {
                ApiError::NetworkUnavailable(_) => PingErrorKind::NetworkUnavailable,
                ApiError::ServerRejected { .. } => PingErrorKind::ServerRejected,
                ApiError::MalformedResponse(_) => PingErrorKind::MalformedResponse,
            },
        }
    }

    /// The archive entry holding the ping, if it was archived.
    pub fn archived_entry(&self) -> Option<EntryId> {
        match self {
            PingError::Archived { entry, .. } => Some(*entry),
            _ => None,
        }
    }

    /// The delivery failure, if delivery was attempted.
    pub fn delivery_error(&self) -> Option<&ApiError> {
        match self {
            PingError::Archived { source, .. } => Some(source),
            PingError::Lost { delivery, .. } => Some(delivery),
            PingError::Invalid(_) => None,
        }
    }
}

/// Shared collaborators for creating sessions.
///
/// Whoever owns the application lifecycle builds one of these and hands it
/// to every session; there is no process-wide archive or wrapper.
#[derive(Clone)]
pub struct SessionContext {
    pub api: Arc<dyn ApiWrapper>,
    pub archive: Arc<dyn ArchiveStore>,
    pub clock: Arc<dyn ClockSource>,
    ids: Arc<SessionIdGenerator<Arc<dyn ClockSource>>>,
    ledger: Option<SessionLedger>,
    resume_window: Duration,
}

impl SessionContext {
    /// Creates a context using the system clock and this device's name.
    pub fn new(api: Arc<dyn ApiWrapper>, archive: Arc<dyn ArchiveStore>) -> Self {
        Self::with_clock(api, archive, Arc::new(SystemClock), &device_name())
    }

    /// Creates a context with a custom clock and device name.
    pub fn with_clock(
        api: Arc<dyn ApiWrapper>,
        archive: Arc<dyn ArchiveStore>,
        clock: Arc<dyn ClockSource>,
        device: &str,
    ) -> Self {
        let ids = Arc::new(SessionIdGenerator::with_clock(Arc::clone(&clock), device));
        SessionContext {
            api,
            archive,
            clock,
            ids,
            ledger: None,
            resume_window: DEFAULT_RESUME_WINDOW,
        }
    }

    /// Remember the last session so it can be resumed.
    pub fn with_ledger(mut self, ledger: SessionLedger) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// How long after its last ping a session may be resumed. Zero disables resuming.
    pub fn with_resume_window(mut self, window: Duration) -> Self {
        self.resume_window = window;
        self
    }

    pub fn ids(&self) -> &SessionIdGenerator<Arc<dyn ClockSource>> {
        &self.ids
    }

    /// Sweep every session's archived pings.
    pub async fn flush_all_archived(&self) -> rp_core::Result<SweepReport> {
        sweep::flush_all_archived(self.api.as_ref(), self.archive.as_ref()).await
    }

    fn resumable_session(&self, reading_id: ReadingId, now: DateTime<Utc>) -> Option<SessionId> {
        if self.resume_window.is_zero() {
            return None;
        }
        let ledger = self.ledger.as_ref()?;

        match ledger.load() {
            Ok(Some(record)) if record.is_resumable(reading_id, now, self.resume_window) => {
                Some(record.session_identifier)
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("ignoring unreadable session ledger {}: {}", ledger.path().display(), e);
                None
            }
        }
    }
}

/// One active reading of one book.
pub struct ReadingSession {
    session_identifier: SessionId,
    reading_id: ReadingId,
    resumed: bool,
    api: Arc<dyn ApiWrapper>,
    archive: Arc<dyn ArchiveStore>,
    clock: Arc<dyn ClockSource>,
    ledger: Option<SessionLedger>,
    /// Held for the duration of every delivery attempt.
    in_flight: Mutex<()>,
}

impl ReadingSession {
    /// Starts a session and sweeps every archived ping.
    ///
    /// Sweep failures are logged; the session is created regardless.
    pub async fn create(ctx: &SessionContext, reading_id: ReadingId) -> Self {
        let session = Self::open(ctx, reading_id);

        match ctx.flush_all_archived().await {
            Ok(report) if report.is_empty() => {}
            Ok(report) => tracing::info!("sweep on session start: {}", report),
            Err(e) => tracing::warn!("sweep on session start failed: {}", e),
        }

        session
    }

    /// Starts a session without sweeping.
    pub fn open(ctx: &SessionContext, reading_id: ReadingId) -> Self {
        let now = ctx.clock.now_utc();
        let (session_identifier, resumed) = match ctx.resumable_session(reading_id, now) {
            Some(id) => (id, true),
            None => (ctx.ids.generate(), false),
        };

        if resumed {
            tracing::debug!("resuming session {} for reading {}", session_identifier, reading_id);
        } else {
            tracing::debug!("new session {} for reading {}", session_identifier, reading_id);
        }

        ReadingSession {
            session_identifier,
            reading_id,
            resumed,
            api: Arc::clone(&ctx.api),
            archive: Arc::clone(&ctx.archive),
            clock: Arc::clone(&ctx.clock),
            ledger: ctx.ledger.clone(),
            in_flight: Mutex::new(()),
        }
    }

    pub fn session_identifier(&self) -> &SessionId {
        &self.session_identifier
    }

    pub fn reading_id(&self) -> ReadingId {
        self.reading_id
    }

    /// True if this session continues one recorded in the ledger.
    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    pub fn is_session_identifier_valid(&self) -> bool {
        self.session_identifier.is_well_formed()
    }

    /// Report progress to the service.
    ///
    /// Calls on one session are delivered one at a time, in call order.
    /// On failure the ping is archived before the error is returned.
    pub async fn ping(&self, payload: PingPayload) -> Result<(), PingError> {
        payload.validate().map_err(PingError::Invalid)?;

        let _flight = self.in_flight.lock().await;
        let ping = Ping {
            session_identifier: self.session_identifier.clone(),
            reading_id: self.reading_id,
            occurred_at: self.clock.now_utc(),
            payload,
        };
        self.touch_ledger(ping.occurred_at);

        let delivery = match self.api.send_ping(&ping).await {
            Ok(()) => {
                tracing::debug!(
                    "delivered ping for reading {} (session {}, progress {})",
                    self.reading_id,
                    self.session_identifier,
                    ping.payload.progress
                );
                return Ok(());
            }
            Err(e) => e,
        };

        match self.archive.append(&ping) {
            Ok(entry) => {
                tracing::warn!(
                    "ping for session {} not delivered, archived as entry {}: {}",
                    self.session_identifier,
                    entry.entry_id,
                    delivery
                );
                Err(PingError::Archived { entry: entry.entry_id, source: delivery })
            }
            Err(store) => {
                tracing::error!(
                    "ping for session {} lost: delivery failed ({}) and archiving failed ({})",
                    self.session_identifier,
                    delivery,
                    store
                );
                Err(PingError::Lost { delivery, store })
            }
        }
    }

    /// Replay this session's archived pings.
    pub async fn flush_archived(&self) -> rp_core::Result<SweepReport> {
        let _flight = self.in_flight.lock().await;
        sweep::flush_session_archived(
            self.api.as_ref(),
            self.archive.as_ref(),
            &self.session_identifier,
        )
        .await
    }

    fn touch_ledger(&self, at: DateTime<Utc>) {
        let Some(ledger) = &self.ledger else {
            return;
        };
        let record = SessionRecord {
            session_identifier: self.session_identifier.clone(),
            reading_id: self.reading_id,
            last_session_date: at,
        };
        if let Err(e) = ledger.touch(&record) {
            tracing::warn!("failed to update session ledger {}: {}", ledger.path().display(), e);
        }
    }
}
