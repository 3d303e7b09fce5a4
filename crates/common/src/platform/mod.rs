// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 wifi-password Contributors

// Platform backends
//
// Each backend shells out to the tools the OS ships for Wi-Fi status and
// saved network profiles. Output parsing is kept in free functions so it
// can be tested on any host.

pub mod linux;
pub mod macos;
pub mod windows;

use crate::command::CommandRunner;
use crate::error::Result;
use crate::types::{Password, Platform};

pub use linux::LinuxBackend;
pub use macos::MacOsBackend;
pub use windows::WindowsBackend;

/// Access to the OS Wi-Fi status and its saved network secrets
pub trait WifiBackend {
    fn platform(&self) -> Platform;

    /// SSID of the network the wireless interface is associated with
    ///
    /// Fails with `Error::NotConnected` when no interface is associated.
    fn current_ssid(&self) -> Result<String>;

    /// Stored pre-shared key for `ssid`
    ///
    /// Fails with `Error::NotFound` when there is no saved profile or the
    /// profile has no key, and with `Error::PermissionDenied` when the OS
    /// refuses access. May block on an OS authorization prompt.
    fn password(&self, ssid: &str) -> Result<Password>;
}

/// Build the backend for `platform`
pub fn backend_for<R>(
    platform: Platform,
    runner: R,
    interface: Option<String>,
) -> Box<dyn WifiBackend>
where
    R: CommandRunner + 'static,
{
    match platform {
        Platform::MacOs => Box::new(MacOsBackend::new(runner, interface)),
        Platform::Linux => Box::new(LinuxBackend::new(runner, interface)),
        Platform::Windows => Box::new(WindowsBackend::new(runner, interface)),
    }
}

/// Split `key <sep> value` on the first separator
///
/// The key is trimmed of its column padding. The value is kept byte for
/// byte apart from a trailing `\r`, since SSIDs and keys may start or end
/// with spaces.
pub(crate) fn key_value<'a>(line: &'a str, sep: &str) -> Option<(&'a str, &'a str)> {
    line.split_once(sep).map(|(key, value)| {
        (key.trim(), value.strip_suffix('\r').unwrap_or(value))
    })
}

/// Drop the line terminator a tool printed after a single value
pub(crate) fn strip_line_ending(value: &str) -> &str {
    value
        .strip_suffix('\n')
        .map(|v| v.strip_suffix('\r').unwrap_or(v))
        .unwrap_or(value)
}
