// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use rp_core::{ArchiveStore, MemoryArchive, SessionId};
use yare::parameterized;

use super::api::ApiError;
use super::api_tests::MockApi;
use super::sweep::{flush_all_archived, flush_session_archived, SweepReport};
use super::test_helpers::*;

fn archive_with(pings: &[(&str, f64)]) -> MemoryArchive {
    let archive = MemoryArchive::new();
    for (session, progress) in pings {
        archive.append(&make_ping(session, *progress)).unwrap();
    }
    archive
}

fn rejected() -> ApiError {
    ApiError::ServerRejected { status: 503, message: "maintenance".into() }
}

#[test]
fn report_display() {
    let report = SweepReport { delivered: 3, failed: 1, deferred: 2, skipped: 0, last_error: None };
    assert_eq!(report.to_string(), "delivered: 3, failed: 1, deferred: 2, skipped: 0");
    assert_eq!(report.remaining(), 3);
    assert!(!report.is_empty());
    assert!(SweepReport::default().is_empty());
}

#[tokio::test]
async fn empty_archive_is_a_no_op() {
    let api = MockApi::online();
    let archive = MemoryArchive::new();

    let report = flush_all_archived(&api, &archive).await.unwrap();

    assert!(report.is_empty());
    assert!(api.attempts().is_empty());
}

#[parameterized(one = { 1 }, three = { 3 }, ten = { 10 })]
#[test_macro(tokio::test)]
async fn all_successes_leave_nothing(n: usize) {
    let pings: Vec<(&str, f64)> = (0..n).map(|i| (SESSION_A, i as f64 / 10.0)).collect();
    let archive = archive_with(&pings);
    let api = MockApi::online();

    let report = flush_session_archived(&api, &archive, &SessionId::from_raw(SESSION_A))
        .await
        .unwrap();

    assert_eq!(report.delivered, n);
    assert_eq!(report.remaining(), 0);
    assert!(archive.entries_for(&SessionId::from_raw(SESSION_A)).unwrap().is_empty());
}

#[parameterized(first = { 0 }, middle = { 2 }, last = { 4 })]
#[test_macro(tokio::test)]
async fn failure_at_k_keeps_k_and_later(k: usize) {
    let pings: Vec<(&str, f64)> = (0..5).map(|i| (SESSION_A, i as f64 / 10.0)).collect();
    let archive = archive_with(&pings);
    let api = MockApi::online();
    api.script((0..k).map(|_| Ok(())).chain([Err(rejected())]));

    let report = flush_session_archived(&api, &archive, &SessionId::from_raw(SESSION_A))
        .await
        .unwrap();

    assert_eq!(report.delivered, k);
    assert_eq!(report.failed, 1);
    assert_eq!(report.deferred, 4 - k);
    assert_eq!(report.last_error, Some(rejected()));
    // Deferred entries were never sent
    assert_eq!(api.attempts().len(), k + 1);

    let left: Vec<f64> = archive.all_entries().unwrap().iter().map(|e| e.payload.progress).collect();
    let expected: Vec<f64> = (k..5).map(|i| i as f64 / 10.0).collect();
    assert_eq!(left, expected);
}

#[tokio::test]
async fn replays_in_insertion_order() {
    let archive = archive_with(&[(SESSION_A, 0.1), (SESSION_B, 0.2), (SESSION_A, 0.3)]);
    let api = MockApi::online();

    flush_all_archived(&api, &archive).await.unwrap();

    let order: Vec<f64> = api.delivered().iter().map(|p| p.payload.progress).collect();
    assert_eq!(order, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn global_sweep_keeps_only_failed_session() {
    let archive = archive_with(&[(SESSION_A, 0.4), (SESSION_B, 0.6)]);
    let api = MockApi::online();
    api.fail_session(&SessionId::from_raw(SESSION_B));

    let report = flush_all_archived(&api, &archive).await.unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(report.failed, 1);
    let left = archive.all_entries().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].session_identifier, SessionId::from_raw(SESSION_B));
    assert_eq!(left[0].payload.progress, 0.6);
}

#[tokio::test]
async fn failure_in_one_session_does_not_block_another() {
    let archive = archive_with(&[(SESSION_A, 0.1), (SESSION_B, 0.2), (SESSION_A, 0.3), (SESSION_B, 0.4)]);
    let api = MockApi::online();
    api.fail_session(&SessionId::from_raw(SESSION_A));

    let report = flush_all_archived(&api, &archive).await.unwrap();

    assert_eq!(report.delivered, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.deferred, 1);
    let left: Vec<f64> = archive.all_entries().unwrap().iter().map(|e| e.payload.progress).collect();
    assert_eq!(left, vec![0.1, 0.3]);
}

#[tokio::test]
async fn invalid_identifiers_are_skipped_and_kept() {
    let archive = archive_with(&[("not-a-real-id", 0.1), (SESSION_A, 0.2)]);
    let api = MockApi::online();

    let report = flush_all_archived(&api, &archive).await.unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.delivered, 1);
    let left = archive.all_entries().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].session_identifier.as_str(), "not-a-real-id");
    assert!(api.attempts().iter().all(|p| p.session_identifier.is_well_formed()));
}

#[tokio::test]
async fn failed_entries_are_retried_on_next_sweep() {
    let archive = archive_with(&[(SESSION_A, 0.5)]);
    let api = MockApi::offline();

    let first = flush_all_archived(&api, &archive).await.unwrap();
    assert_eq!(first.failed, 1);
    assert!(matches!(first.last_error, Some(ApiError::NetworkUnavailable(_))));

    api.set_online(true);
    let second = flush_all_archived(&api, &archive).await.unwrap();
    assert_eq!(second.delivered, 1);
    assert!(archive.is_empty().unwrap());
}

