// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 wifi-password Contributors

// wifi-password - CLI Config Module
// Merges the optional config file with command-line flags

use anyhow::{Context, Result};

pub use wifi_password_common::Config;

/// Effective settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub interface: Option<String>,
    pub color: bool,
}

impl Settings {
    /// Load the config file and apply command-line overrides
    pub fn load(interface: Option<String>) -> Result<Self> {
        let file = Config::load().context("Failed to load wifi-password configuration")?;
        Ok(Self::merge(file, interface))
    }

    /// Whether to colorize a stream that is (or is not) a terminal
    pub fn use_color(&self, is_terminal: bool) -> bool {
        self.color && is_terminal
    }

    /// Flags win over file values
    pub fn merge(file: Config, interface: Option<String>) -> Self {
        Self {
            interface: interface.or(file.interface),
            color: file.color,
        }
    }
}
