// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User configuration management.
//!
//! Configuration is stored in `config.toml` (see [`config_path`]) and includes:
//! - `[api]`: where the reading service lives and how to authenticate
//! - `[archive]`: which archive backend holds undelivered pings, and where
//! - `[session]`: how long a session stays resumable
//! - `[log]`: optional log file
//!
//! A missing file means defaults everywhere.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rp_core::archive::ArchiveBackend;

use crate::env;
use crate::error::{Error, Result};
use crate::tracking::HttpApiConfig;

const APP_DIR_NAME: &str = "readping";
const CONFIG_FILE_NAME: &str = "config.toml";
const LEDGER_FILE_NAME: &str = "session.json";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7890";

/// User configuration stored in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub archive: ArchiveConfig,
    pub session: SessionConfig,
    pub log: LogConfig,
}

/// Reading service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Service root; pings go to `{base_url}/readings/{id}/pings`.
    pub base_url: String,
    /// Sent as the `client_id` query parameter when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Bearer token. `READPING_ACCESS_TOKEN` takes precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Per-request timeout in seconds (default: 30, must be positive).
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: None,
            access_token: None,
            timeout_secs: 30,
        }
    }
}

/// Archive settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub backend: ArchiveBackend,
    /// Archive file. Relative paths are resolved against the state directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds after the last ping during which a session is resumed. 0 = never.
    pub resume_window_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            resume_window_secs: rp_core::ledger::DEFAULT_RESUME_WINDOW.as_secs(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Append logs here instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    /// Loads configuration from `path`, or defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Self::load(path)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api.timeout_secs == 0 {
            return Err(Error::Config("api.timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }

    /// The access token, with `READPING_ACCESS_TOKEN` taking precedence.
    pub fn access_token(&self) -> Option<String> {
        env::access_token().or_else(|| self.api.access_token.clone())
    }

    /// Settings for the HTTP API wrapper.
    pub fn http_config(&self) -> HttpApiConfig {
        HttpApiConfig {
            base_url: self.api.base_url.clone(),
            client_id: self.api.client_id.clone(),
            access_token: self.access_token(),
            timeout: Duration::from_secs(self.api.timeout_secs),
        }
    }

    pub fn resume_window(&self) -> Duration {
        Duration::from_secs(self.session.resume_window_secs)
    }

    /// Location of the archive file inside `state_dir`.
    pub fn archive_path(&self, state_dir: &Path) -> PathBuf {
        match &self.archive.path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => state_dir.join(path),
            None => state_dir.join(self.archive.backend.file_name()),
        }
    }
}

/// Location of the session ledger inside `state_dir`.
pub fn ledger_path(state_dir: &Path) -> PathBuf {
    state_dir.join(LEDGER_FILE_NAME)
}

/// Resolve the config file: `--config`, then `READPING_CONFIG`, then the
/// platform config directory.
pub fn config_path(flag: Option<&Path>) -> Result<PathBuf> {
    let fallback = dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
    first_path(flag, env::config_file(), fallback)
        .ok_or(Error::NoDirectory("config", env::vars::READPING_CONFIG))
}

/// Resolve the state directory: `READPING_STATE_DIR`, then the platform
/// local data directory.
pub fn state_dir() -> Result<PathBuf> {
    let fallback = dirs::data_local_dir().map(|dir| dir.join(APP_DIR_NAME));
    first_path(None, env::state_dir(), fallback)
        .ok_or(Error::NoDirectory("state", env::vars::READPING_STATE_DIR))
}

fn first_path(
    flag: Option<&Path>,
    from_env: Option<PathBuf>,
    fallback: Option<PathBuf>,
) -> Option<PathBuf> {
    flag.map(Path::to_path_buf).or(from_env).or(fallback)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
