// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup for the binary.

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::env;

/// Filter used when `READPING_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the log filter from `READPING_LOG`, falling back to [`DEFAULT_FILTER`].
///
/// When the directive is rejected, the reason comes back alongside the
/// fallback filter.
pub fn filter_from(directive: Option<&str>) -> (EnvFilter, Option<String>) {
    match directive.map(EnvFilter::try_new) {
        None => (EnvFilter::new(DEFAULT_FILTER), None),
        Some(Ok(filter)) => (filter, None),
        Some(Err(e)) => (
            EnvFilter::new(DEFAULT_FILTER),
            Some(format!(
                "ignoring {}={:?}: {e}; using \"{DEFAULT_FILTER}\"",
                env::vars::READPING_LOG,
                directive.unwrap_or_default()
            )),
        ),
    }
}

fn open_log_file(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber.
///
/// Logs go to `log_file` when it can be opened for append, else stderr.
/// Calling this twice is harmless; the first subscriber wins. Any fallback
/// taken is logged as a warning once a subscriber is in place.
pub fn init(log_file: Option<&Path>) {
    let (filter, problem) = filter_from(env::log_filter().as_deref());
    let mut problems: Vec<String> = problem.into_iter().collect();

    let file = log_file.and_then(|path| match open_log_file(path) {
        Ok(file) => Some(file),
        Err(e) => {
            problems.push(format!("cannot open log file {}: {e}; logging to stderr", path.display()));
            None
        }
    });

    let _ = match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .try_init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    report(&problems);
}

fn report(problems: &[String]) {
    for problem in problems {
        tracing::warn!("{problem}");
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
