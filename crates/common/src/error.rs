// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 wifi-password Contributors

// Error types for wifi-password

use thiserror::Error;

/// Process exit status for a successful run (also used for --help / --version)
pub const EXIT_SUCCESS: i32 = 0;
/// Any failure without a dedicated status
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_NOT_CONNECTED: i32 = 3;
pub const EXIT_NOT_FOUND: i32 = 4;
pub const EXIT_PERMISSION_DENIED: i32 = 5;
pub const EXIT_UNSUPPORTED_PLATFORM: i32 = 6;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Wi-Fi is not connected to any network")]
    NotConnected,

    #[error("no password found for network \"{0}\"")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("`{program}` failed: {message}")]
    CommandFailed { program: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Exit status the CLI reports for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::NotConnected => EXIT_NOT_CONNECTED,
            Error::NotFound(_) => EXIT_NOT_FOUND,
            Error::PermissionDenied(_) => EXIT_PERMISSION_DENIED,
            Error::UnsupportedPlatform(_) => EXIT_UNSUPPORTED_PLATFORM,
            Error::CommandFailed { .. } | Error::Config(_) | Error::Io(_) | Error::Toml(_) => {
                EXIT_FAILURE
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
