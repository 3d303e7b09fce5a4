// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 wifi-password Contributors

// Running the OS networking tools

use std::io::ErrorKind;
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

/// Captured result of one tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// stdout and stderr joined, for matching tool messages that may land on either
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Seam between the backends and the processes they spawn
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Runs tools with `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        debug!("Running {} {:?}", program, args);

        // Messages are matched in English, so pin the tools' locale
        let output = Command::new(program)
            .args(args)
            .env("LC_ALL", "C")
            .output()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    Error::UnsupportedPlatform(format!(
                        "required tool `{}` is not available",
                        program
                    ))
                } else {
                    Error::Io(e)
                }
            })?;

        let output = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!("{} exited with {:?}", program, output.status);

        Ok(output)
    }
}
