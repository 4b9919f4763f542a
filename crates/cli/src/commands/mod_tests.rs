// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Test infrastructure for command testing.
//!
//! [`TestContext`] wraps an [`App`] whose config file and state directory
//! live in a temporary directory, so commands can open real archives
//! without touching the user's files.

use std::sync::Arc;

use rp_core::archive::ArchiveBackend;
use rp_core::{ArchiveStore, ManualClock};
use tempfile::TempDir;

use super::{block_on, App};
use crate::config::Config;
use crate::tracking::api_tests::MockApi;
use crate::tracking::test_helpers::START_MS;
use crate::tracking::SessionContext;

/// Test context with a private state directory and default config.
pub struct TestContext {
    pub app: App,
    _temp_dir: TempDir, // Keep alive for duration of test
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let app = App {
            config,
            config_path: temp_dir.path().join("config.toml"),
            state_dir: temp_dir.path().join("state"),
        };
        TestContext { app, _temp_dir: temp_dir }
    }

    /// A session context using the app's archive and ledger but a mock API.
    pub fn session_context(&self, api: Arc<MockApi>) -> SessionContext {
        let real = self.app.session_context().unwrap();
        SessionContext::with_clock(api, real.archive, Arc::new(ManualClock::new(START_MS)), "test-device")
    }
}

#[test]
fn test_archive_created_in_state_dir() {
    let ctx = TestContext::new();
    let archive = ctx.app.archive().unwrap();
    assert!(archive.is_empty().unwrap());
    assert!(ctx.app.state_dir.join("pings.jsonl").exists());
}

#[test]
fn test_sqlite_archive_from_config() {
    let mut config = Config::default();
    config.archive.backend = ArchiveBackend::Sqlite;
    let ctx = TestContext::with_config(config);

    ctx.app.archive().unwrap();
    assert!(ctx.app.state_dir.join("pings.db").exists());
}

#[test]
fn test_archive_is_shared_between_opens() {
    let ctx = TestContext::new();
    let first = ctx.app.archive().unwrap();
    first
        .append(&crate::tracking::test_helpers::make_ping(
            crate::tracking::test_helpers::SESSION_A,
            0.5,
        ))
        .unwrap();

    let second = ctx.app.archive().unwrap();
    assert_eq!(second.len().unwrap(), 1);
}

#[test]
fn test_block_on_runs_future() {
    assert_eq!(block_on(async { 41 + 1 }).unwrap(), 42);
}

#[test]
fn test_load_applies_base_url_override() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "[api]\nbase_url = \"http://from-file\"\ntimeout_secs = 9\n").unwrap();

    let app = App::load(Some(&path), Some("http://from-flag".to_string())).unwrap();
    assert_eq!(app.config.api.base_url, "http://from-flag");
    assert_eq!(app.config.api.timeout_secs, 9);
    assert_eq!(app.config_path, path);
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let temp = TempDir::new().unwrap();
    let app = App::load(Some(&temp.path().join("absent.toml")), None).unwrap();
    assert_eq!(app.config, Config::default());
}
