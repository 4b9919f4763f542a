// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{self, Write};

use rp_core::{SessionId, SessionIdGenerator};

use crate::cli::SessionCommand;
use crate::error::{Error, Result};

/// Execute a session subcommand.
pub fn run(cmd: SessionCommand) -> Result<()> {
    match cmd {
        SessionCommand::New => {
            println!("{}", SessionIdGenerator::new().generate());
            Ok(())
        }
        SessionCommand::Validate { id } => validate(&id, &mut io::stdout().lock()),
    }
}

pub(crate) fn validate(id: &str, out: &mut impl Write) -> Result<()> {
    if SessionId::is_valid(id) {
        writeln!(out, "valid")?;
        Ok(())
    } else {
        writeln!(out, "invalid")?;
        Err(Error::SessionIdRejected(id.to_string()))
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
