// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 wifi-password Contributors

// Common types for wifi-password

use std::fmt;

use serde::{Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// Pre-shared key read from the OS credential store
///
/// The buffer is wiped on drop and never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Plain-text view of the secret, for printing
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

impl Serialize for Password {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A Wi-Fi network and its stored secret, if any
///
/// `password: None` means the network has no stored secret or the store
/// would not hand it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkCredential {
    pub ssid: String,
    pub password: Option<Password>,
}

impl NetworkCredential {
    pub fn new(ssid: impl Into<String>, password: Option<Password>) -> Self {
        Self {
            ssid: ssid.into(),
            password,
        }
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }
}

/// Operating systems with a Wi-Fi backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
}

impl Platform {
    /// Platform this binary was built for
    pub fn current() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value to a platform
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "macos" => Ok(Platform::MacOs),
            "linux" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Windows),
            other => Err(Error::UnsupportedPlatform(format!(
                "no Wi-Fi backend for `{}`",
                other
            ))),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
            Platform::Windows => "Windows",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_debug_is_redacted() {
        let cred = NetworkCredential::new("Home", Some(Password::new("hunter22")));
        let debug = format!("{:?}", cred);
        assert!(debug.contains("Home"));
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn test_credential_serializes_plain_password() {
        let cred = NetworkCredential::new("Home", Some(Password::new("hunter22")));
        let json = serde_json::to_value(&cred).unwrap();
        assert_eq!(json["ssid"], "Home");
        assert_eq!(json["password"], "hunter22");

        let open = NetworkCredential::new("Lobby", None);
        let json = serde_json::to_value(&open).unwrap();
        assert!(json["password"].is_null());
        assert!(!open.has_password());
    }

    #[test]
    fn test_platform_from_os() {
        assert_eq!(Platform::from_os("macos").unwrap(), Platform::MacOs);
        assert_eq!(Platform::from_os("linux").unwrap(), Platform::Linux);
        assert_eq!(Platform::from_os("windows").unwrap(), Platform::Windows);

        match Platform::from_os("freebsd") {
            Err(Error::UnsupportedPlatform(msg)) => assert!(msg.contains("freebsd")),
            other => panic!("expected UnsupportedPlatform, got {:?}", other),
        }
    }
}
