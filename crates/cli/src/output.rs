// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 wifi-password Contributors

// Rendering credentials for stdout

use anyhow::{Context, Result};
use colored::Colorize;

use wifi_password_common::NetworkCredential;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `SSID: ...` and `Password: ...` lines
    Plain,
    /// The password alone
    Quiet,
    Json,
}

/// Text to print on stdout for `credential`, without a trailing newline
///
/// A missing password renders as nothing in plain/quiet mode; the caller
/// reports it on stderr.
pub fn render(credential: &NetworkCredential, format: Format, color: bool) -> Result<String> {
    let text = match format {
        Format::Plain => {
            let mut lines = vec![format!("{} {}", label("SSID:", color), credential.ssid)];
            if let Some(password) = &credential.password {
                lines.push(format!("{} {}", label("Password:", color), password.expose()));
            }
            lines.join("\n")
        }
        Format::Quiet => credential
            .password
            .as_ref()
            .map(|p| p.expose().to_string())
            .unwrap_or_default(),
        Format::Json => serde_json::to_string_pretty(credential)
            .context("Failed to serialize credential")?,
    };
    Ok(text)
}

/// `error: ...` line for stderr
pub fn error_line(message: &str, color: bool) -> String {
    let prefix = if color {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    };
    format!("{} {}", prefix, message)
}

fn label(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}
