// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod archive;
pub mod config;
pub mod flush;
pub mod ping;
pub mod session;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rp_core::{ArchiveStore, SessionLedger};

use crate::config::{config_path, ledger_path, state_dir, Config};
use crate::error::Result;
use crate::tracking::{ApiWrapper, HttpApiWrapper, SessionContext};

/// Resolved configuration and locations for one invocation.
#[derive(Debug, Clone)]
pub struct App {
    pub config: Config,
    pub config_path: PathBuf,
    pub state_dir: PathBuf,
}

impl App {
    /// Load the config file (or defaults) and apply command-line overrides.
    pub fn load(config_flag: Option<&Path>, base_url: Option<String>) -> Result<Self> {
        let config_path = config_path(config_flag)?;
        let mut config = Config::load_or_default(&config_path)?;
        if let Some(base_url) = base_url {
            config.api.base_url = base_url;
        }
        Ok(App { config, config_path, state_dir: state_dir()? })
    }

    /// Open the configured archive, creating it if needed.
    pub fn archive(&self) -> Result<Arc<dyn ArchiveStore>> {
        let path = self.config.archive_path(&self.state_dir);
        tracing::debug!("opening {} archive at {}", self.config.archive.backend, path.display());
        Ok(self.config.archive.backend.open(&path)?)
    }

    pub fn api(&self) -> Result<Arc<dyn ApiWrapper>> {
        Ok(Arc::new(HttpApiWrapper::new(self.config.http_config())?))
    }

    /// Everything a reading session needs, wired from configuration.
    pub fn session_context(&self) -> Result<SessionContext> {
        let ledger = SessionLedger::open(&ledger_path(&self.state_dir));
        Ok(SessionContext::new(self.api()?, self.archive()?)
            .with_ledger(ledger)
            .with_resume_window(self.config.resume_window()))
    }
}

/// Run a future to completion on a fresh current-thread runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
