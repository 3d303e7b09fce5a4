// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 wifi-password Contributors

// Windows backend: WLAN AutoConfig through netsh

use tracing::{debug, info, warn};

use super::{key_value, WifiBackend};
use crate::command::{CommandOutput, CommandRunner};
use crate::error::{Error, Result};
use crate::types::{Password, Platform};

/// One interface block of `netsh wlan show interfaces`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceStatus {
    pub name: String,
    pub state: String,
    pub ssid: Option<String>,
}

impl InterfaceStatus {
    pub fn is_connected(&self) -> bool {
        self.state.eq_ignore_ascii_case("connected") && self.ssid.is_some()
    }
}

pub struct WindowsBackend<R> {
    runner: R,
    interface: Option<String>,
}

impl<R: CommandRunner> WindowsBackend<R> {
    pub fn new(runner: R, interface: Option<String>) -> Self {
        Self { runner, interface }
    }
}

impl<R: CommandRunner> WifiBackend for WindowsBackend<R> {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn current_ssid(&self) -> Result<String> {
        let output = self.runner.run("netsh", &["wlan", "show", "interfaces"])?;
        if !output.success() {
            return Err(netsh_failure(&output));
        }

        let interfaces = parse_interfaces(&output.stdout);
        debug!("netsh listed {} wireless interface(s)", interfaces.len());

        let selected = match &self.interface {
            Some(wanted) => interfaces
                .iter()
                .find(|i| i.name.eq_ignore_ascii_case(wanted)),
            None => interfaces.iter().find(|i| i.is_connected()),
        };

        match selected {
            Some(status) if status.is_connected() => {
                info!("Interface {:?} is connected", status.name);
                Ok(status.ssid.clone().unwrap_or_default())
            }
            _ => Err(Error::NotConnected),
        }
    }

    fn password(&self, ssid: &str) -> Result<Password> {
        let name = format!("name={}", ssid);
        let output = self
            .runner
            .run("netsh", &["wlan", "show", "profile", &name, "key=clear"])?;
        classify_profile_output(ssid, &output)
    }
}

/// Parse `netsh wlan show interfaces` into one entry per interface
pub fn parse_interfaces(output: &str) -> Vec<InterfaceStatus> {
    let mut interfaces: Vec<InterfaceStatus> = Vec::new();

    for line in output.lines() {
        let Some((key, value)) = key_value(line, ": ") else {
            continue;
        };
        match key {
            "Name" => interfaces.push(InterfaceStatus {
                name: value.trim().to_string(),
                ..Default::default()
            }),
            "State" => {
                if let Some(current) = interfaces.last_mut() {
                    current.state = value.trim().to_string();
                }
            }
            "SSID" if !value.is_empty() => {
                if let Some(current) = interfaces.last_mut() {
                    current.ssid = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    interfaces
}

/// Turn `netsh wlan show profile name=<ssid> key=clear` output into a key or an error
pub fn classify_profile_output(ssid: &str, output: &CommandOutput) -> Result<Password> {
    let text = output.combined();
    let lowered = text.to_lowercase();

    if lowered.contains("is not found on the system") {
        return Err(Error::NotFound(ssid.to_string()));
    }
    if lowered.contains("requires elevation") || lowered.contains("access is denied") {
        return Err(Error::PermissionDenied(
            "netsh needs an elevated prompt to show the key".to_string(),
        ));
    }
    if !output.success() {
        return Err(netsh_failure(output));
    }

    let key = text.lines().find_map(|line| match key_value(line, ": ") {
        Some(("Key Content", value)) if !value.is_empty() => Some(value),
        _ => None,
    });

    match key {
        Some(secret) => Ok(Password::new(secret)),
        None => {
            debug!("Profile {:?} carries no key material", ssid);
            Err(Error::NotFound(ssid.to_string()))
        }
    }
}

fn netsh_failure(output: &CommandOutput) -> Error {
    let message = output.combined().trim().to_string();
    warn!("netsh exited with {:?}", output.status);
    Error::CommandFailed {
        program: "netsh".to_string(),
        message,
    }
}
