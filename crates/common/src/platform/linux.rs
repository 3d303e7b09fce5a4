// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 wifi-password Contributors

// Linux backend: NetworkManager through nmcli

use tracing::{debug, info, warn};

use super::{strip_line_ending, WifiBackend};
use crate::command::{CommandOutput, CommandRunner};
use crate::error::{Error, Result};
use crate::types::{Password, Platform};

/// Setting that holds a WPA/WPA2/WPA3-Personal key
pub const PSK_SETTING: &str = "802-11-wireless-security.psk";

/// Setting that holds the network name of a Wi-Fi profile
pub const SSID_SETTING: &str = "802-11-wireless.ssid";

/// nmcli: "Connection, device, or access point does not exist"
const NMCLI_EXIT_NOT_FOUND: i32 = 10;

pub struct LinuxBackend<R> {
    runner: R,
    interface: Option<String>,
}

impl<R: CommandRunner> LinuxBackend<R> {
    pub fn new(runner: R, interface: Option<String>) -> Self {
        Self { runner, interface }
    }

    /// Names of the active Wi-Fi connection profiles, limited to the configured interface
    fn active_wifi_profiles(&self) -> Result<Vec<String>> {
        let output = self.runner.run(
            "nmcli",
            &["-t", "-f", "NAME,TYPE,DEVICE", "connection", "show", "--active"],
        )?;
        if !output.success() {
            return Err(nmcli_failure(&output));
        }
        Ok(wifi_profiles(&output.stdout, self.interface.as_deref()))
    }

    /// SSID stored in connection profile `profile`
    fn profile_ssid(&self, profile: &str) -> Result<Option<String>> {
        let output = self.runner.run(
            "nmcli",
            &["-e", "no", "-g", SSID_SETTING, "connection", "show", "id", profile],
        )?;
        if !output.success() {
            debug!("Could not read SSID of profile {:?}", profile);
            return Ok(None);
        }
        let ssid = strip_line_ending(&output.stdout);
        Ok((!ssid.is_empty()).then(|| ssid.to_string()))
    }

    /// Active profile connected to `ssid`; profiles may be renamed or suffixed (`Home 1`)
    fn profile_for(&self, ssid: &str) -> Result<Option<String>> {
        for profile in self.active_wifi_profiles()? {
            if self.profile_ssid(&profile)?.as_deref() == Some(ssid) {
                return Ok(Some(profile));
            }
        }
        Ok(None)
    }
}

impl<R: CommandRunner> WifiBackend for LinuxBackend<R> {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn current_ssid(&self) -> Result<String> {
        let mut args = vec!["-t", "-f", "ACTIVE,SSID", "device", "wifi", "list"];
        if let Some(interface) = &self.interface {
            args.extend(["ifname", interface.as_str()]);
        }
        args.extend(["--rescan", "no"]);

        let output = self.runner.run("nmcli", &args)?;
        if !output.success() {
            return Err(nmcli_failure(&output));
        }

        match active_ssid(&output.stdout) {
            Some(ssid) if !ssid.is_empty() => {
                info!("NetworkManager reports an active Wi-Fi network");
                Ok(ssid)
            }
            Some(_) => {
                // Hidden network: the access point does not broadcast its name
                debug!("Active access point has no SSID, reading it from the profile");
                for profile in self.active_wifi_profiles()? {
                    if let Some(ssid) = self.profile_ssid(&profile)? {
                        return Ok(ssid);
                    }
                }
                Err(Error::NotConnected)
            }
            None => {
                debug!("No active access point in nmcli output");
                Err(Error::NotConnected)
            }
        }
    }

    fn password(&self, ssid: &str) -> Result<Password> {
        let profile = match self.profile_for(ssid) {
            Ok(Some(profile)) => {
                debug!("SSID {:?} is active as profile {:?}", ssid, profile);
                profile
            }
            Ok(None) => ssid.to_string(),
            Err(e) => {
                debug!("Could not resolve active profile: {}", e);
                ssid.to_string()
            }
        };

        let output = self.runner.run(
            "nmcli",
            &[
                "-s", "-e", "no", "-g", PSK_SETTING, "connection", "show", "id", &profile,
            ],
        )?;
        classify_psk_output(ssid, &output)
    }
}

/// SSID field of the `yes` row of `nmcli -t -f ACTIVE,SSID device wifi list`
///
/// An empty string means the active access point hides its name.
pub fn active_ssid(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let fields = split_terse(line);
        match fields.as_slice() {
            [active, ssid] if active == "yes" => Some(ssid.clone()),
            _ => None,
        }
    })
}

/// Wi-Fi profile names from `nmcli -t -f NAME,TYPE,DEVICE connection show --active`
pub fn wifi_profiles(output: &str, interface: Option<&str>) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| match split_terse(line).as_slice() {
            [name, kind, device]
                if (kind == "802-11-wireless" || kind == "wifi")
                    && interface.map_or(true, |i| device == i) =>
            {
                Some(name.clone())
            }
            _ => None,
        })
        .collect()
}

/// Split one line of nmcli terse output, undoing `\:` and `\\` escapes
pub fn split_terse(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            ':' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Turn `nmcli -g 802-11-wireless-security.psk connection show` output into a key or an error
pub fn classify_psk_output(ssid: &str, output: &CommandOutput) -> Result<Password> {
    if output.success() {
        let secret = strip_line_ending(&output.stdout);
        if secret.is_empty() {
            // Open network, or the key is owned by a secret agent
            debug!("Profile {:?} has no stored PSK", ssid);
            return Err(Error::NotFound(ssid.to_string()));
        }
        return Ok(Password::new(secret));
    }

    let stderr = output.stderr.to_lowercase();
    if output.status == Some(NMCLI_EXIT_NOT_FOUND) || stderr.contains("no such connection profile") {
        return Err(Error::NotFound(ssid.to_string()));
    }
    Err(nmcli_failure(output))
}

fn nmcli_failure(output: &CommandOutput) -> Error {
    let stderr = output.stderr.trim();
    let lowered = stderr.to_lowercase();
    if lowered.contains("not authorized") || lowered.contains("insufficient privileges") {
        return Error::PermissionDenied(stderr.to_string());
    }

    warn!("nmcli exited with {:?}", output.status);
    Error::CommandFailed {
        program: "nmcli".to_string(),
        message: stderr.to_string(),
    }
}
