// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use crate::colors;
use crate::help;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "readping")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Report reading progress, keeping what cannot be delivered until it can")]
#[command(
    long_about = "Report reading progress to the reading service.\n\n\
    Pings that cannot be delivered are archived locally and replayed by later sweeps."
)]
#[command(styles = help::styles())]
pub struct Cli {
    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Override the reading service base URL
    #[arg(long, global = true, value_name = "url", value_parser = non_empty_string)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report progress for a reading
    #[command(after_help = colors::examples("\
Examples:
  readping ping 42 -p 0.5 -d 120                  Half way, two minutes read
  readping ping 42 -p 0.6 -d 60 --lat 52.5 --lng 13.4    With location"))]
    Ping {
        /// Reading (book) id
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        reading_id: u64,

        /// Fraction of the book read, 0.0 to 1.0
        #[arg(long, short)]
        progress: f64,

        /// Seconds spent reading since the previous ping
        #[arg(long, short)]
        duration: u32,

        /// Latitude of the reader
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of the reader
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },

    /// Replay archived pings
    #[command(after_help = colors::examples("\
Examples:
  readping flush                                   Replay every session
  readping flush --session <id>                    Replay one session"))]
    Flush {
        /// Only replay this session's pings
        #[arg(long, value_name = "id")]
        session: Option<String>,
    },

    /// Inspect the archive of undelivered pings
    #[command(subcommand)]
    Archive(ArchiveCommand),

    /// Work with session identifiers
    #[command(subcommand)]
    Session(SessionCommand),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ArchiveCommand {
    /// List outstanding entries in replay order
    List {
        /// Only list this session's entries
        #[arg(long, value_name = "id")]
        session: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Generate a new session identifier
    New,

    /// Check whether a string is a well-formed session identifier
    Validate {
        /// Identifier to check
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration (token masked)
    Show,

    /// Print the config file location
    Path,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
