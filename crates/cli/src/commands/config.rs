// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{self, Write};

use crate::cli::ConfigCommand;
use crate::config::Config;
use crate::error::{Error, Result};

use super::App;

/// Execute a config subcommand.
pub fn run(app: &App, cmd: ConfigCommand) -> Result<()> {
    let mut out = io::stdout().lock();
    match cmd {
        ConfigCommand::Show => show(&app.config, &mut out),
        ConfigCommand::Path => {
            writeln!(out, "{}", app.config_path.display())?;
            Ok(())
        }
    }
}

/// Print the effective configuration as TOML, with the token masked.
pub(crate) fn show(config: &Config, out: &mut impl Write) -> Result<()> {
    let mut shown = config.clone();
    shown.api.access_token = config.access_token().map(|token| mask(&token));
    let text = toml::to_string_pretty(&shown)
        .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
    write!(out, "{}", text)?;
    Ok(())
}

/// Keep the last four characters of a secret.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
