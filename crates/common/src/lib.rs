// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 wifi-password Contributors

// wifi-password - Common Library
// Finds the current Wi-Fi network and reads its saved key from the OS

pub mod command;
pub mod config;
pub mod error;
pub mod lookup;
pub mod platform;
pub mod types;

pub use command::{CommandOutput, CommandRunner, SystemRunner};
pub use config::Config;
pub use error::{Error, Result};
pub use lookup::WifiPassword;
pub use platform::{backend_for, LinuxBackend, MacOsBackend, WifiBackend, WindowsBackend};
pub use types::{NetworkCredential, Password, Platform};
