// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! readping - report reading progress without losing it.
//!
//! This crate provides the reading session layer and the `readping` CLI.
//! Pings go to the reading service through an [`ApiWrapper`](tracking::ApiWrapper);
//! the ones that cannot be delivered are archived and replayed by sweeps.
//!
//! # Main Components
//!
//! - [`tracking`] - Reading sessions, the API wrapper, and archive sweeps
//! - [`Config`] - User configuration (service URL, archive backend, logging)
//! - [`Error`] - Error types for all operations
//!
//! # Embedding
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use readping::tracking::{HttpApiWrapper, ReadingSession, SessionContext};
//! use rp_core::{JsonlArchive, PingPayload, ReadingId};
//!
//! let api = HttpApiWrapper::new(config.http_config())?;
//! let archive = JsonlArchive::open(&path)?;
//! let ctx = SessionContext::new(Arc::new(api), Arc::new(archive));
//!
//! let session = ReadingSession::create(&ctx, ReadingId(42)).await;
//! session.ping(PingPayload::new(0.5, 120)?).await?;
//! ```

mod cli;
pub mod colors;
mod commands;
pub mod help;
pub mod logging;

pub mod config;
pub mod env;
pub mod error;
pub mod tracking;

pub use cli::{ArchiveCommand, Cli, Command, ConfigCommand, OutputFormat, SessionCommand};
pub use commands::App;
pub use config::Config;
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;

/// Execute a parsed command line. This is the main entry point for library
/// users and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let Cli { config, base_url, command } = cli;

    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "readping", &mut std::io::stdout());
            Ok(())
        }
        Command::Session(cmd) => commands::session::run(cmd),
        command => {
            let app = App::load(config.as_deref(), base_url)?;
            logging::init(app.config.log.file.as_deref());
            dispatch(&app, command)
        }
    }
}

fn dispatch(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Ping { reading_id, progress, duration, lat, lng } => {
            commands::ping::run(app, reading_id, progress, duration, lat, lng)
        }
        Command::Flush { session } => commands::flush::run(app, session),
        Command::Archive(cmd) => commands::archive::run(app, cmd),
        Command::Config(cmd) => commands::config::run(app, cmd),
        Command::Session(cmd) => commands::session::run(cmd),
        Command::Completion { .. } => Ok(()),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
