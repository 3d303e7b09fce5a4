// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 wifi-password Contributors

// macOS backend: networksetup / ipconfig / airport for the SSID, the
// `security` tool for the keychain item

use tracing::{debug, info, warn};

use super::{key_value, strip_line_ending, WifiBackend};
use crate::command::{CommandOutput, CommandRunner};
use crate::error::{Error, Result};
use crate::types::{Password, Platform};

/// Wireless interface on every Mac with built-in Wi-Fi
pub const DEFAULT_INTERFACE: &str = "en0";

/// Legacy status tool, removed in macOS 14.4
pub const AIRPORT_PATH: &str =
    "/System/Library/PrivateFrameworks/Apple80211.framework/Versions/Current/Resources/airport";

/// Keychain item kind under which macOS saves joined networks
pub const KEYCHAIN_ITEM_KIND: &str = "AirPort network password";

/// `errSecItemNotFound` as reported by `security`
const SECURITY_EXIT_NOT_FOUND: i32 = 44;
/// `errSecAuthFailed`
const SECURITY_EXIT_AUTH_FAILED: i32 = 51;
/// User pressed "Deny" / "Cancel" on the keychain prompt
const SECURITY_EXIT_USER_CANCELED: i32 = 128;

/// What a status tool said about the interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Association {
    Connected(String),
    Disconnected,
    /// Connected, but the OS hid the name (location privacy)
    Redacted,
    /// The output did not say either way
    Unknown,
}

pub struct MacOsBackend<R> {
    runner: R,
    interface: String,
}

impl<R: CommandRunner> MacOsBackend<R> {
    pub fn new(runner: R, interface: Option<String>) -> Self {
        Self {
            runner,
            interface: interface.unwrap_or_else(|| DEFAULT_INTERFACE.to_string()),
        }
    }

    fn query_networksetup(&self) -> Result<Association> {
        let output = self
            .runner
            .run("networksetup", &["-getairportnetwork", &self.interface])?;
        Ok(parse_networksetup(&output.combined()))
    }

    fn query_ipconfig(&self) -> Result<Association> {
        let output = self
            .runner
            .run("ipconfig", &["getsummary", &self.interface])?;
        Ok(parse_ipconfig_summary(&output.stdout))
    }

    fn query_airport(&self) -> Result<Association> {
        let output = self.runner.run(AIRPORT_PATH, &["-I"])?;
        Ok(parse_airport(&output.stdout))
    }
}

impl<R: CommandRunner> WifiBackend for MacOsBackend<R> {
    fn platform(&self) -> Platform {
        Platform::MacOs
    }

    fn current_ssid(&self) -> Result<String> {
        let queries: [(&str, fn(&Self) -> Result<Association>); 3] = [
            ("networksetup", Self::query_networksetup),
            ("ipconfig", Self::query_ipconfig),
            ("airport", Self::query_airport),
        ];

        let mut disconnected = false;
        for (name, query) in queries {
            match query(self) {
                Ok(Association::Connected(ssid)) => {
                    info!("{} reports SSID for {}", name, self.interface);
                    return Ok(ssid);
                }
                Ok(Association::Disconnected) => {
                    debug!("{} reports {} as not associated", name, self.interface);
                    disconnected = true;
                }
                Ok(Association::Redacted) => {
                    return Err(Error::PermissionDenied(
                        "macOS hides the network name from this process; grant Location Services access to the terminal".to_string(),
                    ));
                }
                Ok(Association::Unknown) => {
                    debug!("{} gave no answer for {}", name, self.interface);
                }
                // Tool is missing on this macOS release
                Err(Error::UnsupportedPlatform(msg)) => debug!("{}", msg),
                Err(e) => return Err(e),
            }
        }

        if disconnected {
            Err(Error::NotConnected)
        } else {
            Err(Error::CommandFailed {
                program: "networksetup".to_string(),
                message: format!(
                    "could not determine the Wi-Fi network on {}",
                    self.interface
                ),
            })
        }
    }

    fn password(&self, ssid: &str) -> Result<Password> {
        info!("Reading keychain item for {:?}; macOS may ask for confirmation", ssid);
        let output = self.runner.run(
            "security",
            &["find-generic-password", "-D", KEYCHAIN_ITEM_KIND, "-a", ssid, "-w"],
        )?;
        classify_security_output(ssid, &output)
    }
}

/// Parse `networksetup -getairportnetwork <iface>`
pub fn parse_networksetup(output: &str) -> Association {
    for line in output.lines() {
        if line.contains("not associated") {
            return Association::Disconnected;
        }
        for prefix in ["Current Wi-Fi Network: ", "Current AirPort Network: "] {
            if let Some(ssid) = line.trim_start().strip_prefix(prefix) {
                let ssid = ssid.strip_suffix('\r').unwrap_or(ssid);
                if !ssid.is_empty() {
                    return Association::Connected(ssid.to_string());
                }
            }
        }
    }
    Association::Unknown
}

/// Parse `ipconfig getsummary <iface>`
pub fn parse_ipconfig_summary(output: &str) -> Association {
    for line in output.lines() {
        if let Some(("SSID", ssid)) = key_value(line, " : ") {
            if ssid == "<redacted>" {
                return Association::Redacted;
            }
            if !ssid.is_empty() {
                return Association::Connected(ssid.to_string());
            }
        }
    }
    Association::Unknown
}

/// Parse `airport -I`
pub fn parse_airport(output: &str) -> Association {
    for line in output.lines() {
        match key_value(line, ": ") {
            Some(("AirPort", "Off")) => return Association::Disconnected,
            Some(("state", "init")) => return Association::Disconnected,
            Some(("SSID", ssid)) if !ssid.is_empty() => {
                return Association::Connected(ssid.to_string())
            }
            _ => {}
        }
    }
    Association::Unknown
}

/// Turn `security find-generic-password -w` output into a key or an error
pub fn classify_security_output(ssid: &str, output: &CommandOutput) -> Result<Password> {
    if output.success() {
        let secret = strip_line_ending(&output.stdout);
        if secret.is_empty() {
            return Err(Error::NotFound(ssid.to_string()));
        }
        return Ok(Password::new(secret));
    }

    let stderr = output.stderr.to_lowercase();
    if output.status == Some(SECURITY_EXIT_NOT_FOUND) || stderr.contains("could not be found") {
        return Err(Error::NotFound(ssid.to_string()));
    }
    if matches!(
        output.status,
        Some(SECURITY_EXIT_USER_CANCELED) | Some(SECURITY_EXIT_AUTH_FAILED)
    ) || stderr.contains("user canceled")
        || stderr.contains("interaction is not allowed")
    {
        return Err(Error::PermissionDenied(
            "keychain access was denied".to_string(),
        ));
    }

    warn!("security exited with {:?}", output.status);
    Err(Error::CommandFailed {
        program: "security".to_string(),
        message: output.stderr.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::ScriptedRunner;

    #[test]
    fn test_parse_networksetup() {
        assert_eq!(
            parse_networksetup("Current Wi-Fi Network: Home Net\n"),
            Association::Connected("Home Net".to_string())
        );
        assert_eq!(
            parse_networksetup("Current AirPort Network: Office\n"),
            Association::Connected("Office".to_string())
        );
        assert_eq!(
            parse_networksetup("You are not associated with an AirPort network.\n"),
            Association::Disconnected
        );
        assert_eq!(
            parse_networksetup("en7 is not a Wi-Fi interface.\n** Error: Error obtaining wireless information.\n"),
            Association::Unknown
        );
    }

    #[test]
    fn test_ssid_padding_is_preserved() {
        assert_eq!(
            parse_networksetup("Current Wi-Fi Network:  Lobby \n"),
            Association::Connected(" Lobby ".to_string())
        );
        assert_eq!(
            parse_ipconfig_summary("  SSID : Lobby \n"),
            Association::Connected("Lobby ".to_string())
        );
        assert_eq!(
            parse_airport("           SSID:  Lobby\n"),
            Association::Connected(" Lobby".to_string())
        );
    }

    #[test]
    fn test_parse_ipconfig_summary() {
        let summary = "<dictionary> {\n  BSSID : 9c:3d:cf:00:11:22\n  InterfaceType : WiFi\n  SSID : Cafe: Guest\n}\n";
        assert_eq!(
            parse_ipconfig_summary(summary),
            Association::Connected("Cafe: Guest".to_string())
        );
        assert_eq!(
            parse_ipconfig_summary("  SSID : <redacted>\n"),
            Association::Redacted
        );
        assert_eq!(
            parse_ipconfig_summary("<dictionary> {\n  InterfaceType : WiFi\n}\n"),
            Association::Unknown
        );
    }

    #[test]
    fn test_parse_airport() {
        let info = "     agrCtlRSSI: -52\n          state: running\n          BSSID: 9c:3d:cf:0:11:22\n           SSID: Home Net\n";
        assert_eq!(
            parse_airport(info),
            Association::Connected("Home Net".to_string())
        );
        assert_eq!(parse_airport("AirPort: Off\n"), Association::Disconnected);
    }

    #[test]
    fn test_current_ssid_from_networksetup() {
        let runner = ScriptedRunner::new().ok(0, "Current Wi-Fi Network: Home Net\n", "");
        let backend = MacOsBackend::new(runner, None);

        assert_eq!(backend.current_ssid().unwrap(), "Home Net");
        let (program, args) = backend.runner.call(0);
        assert_eq!(program, "networksetup");
        assert_eq!(args, vec!["-getairportnetwork", "en0"]);
    }

    #[test]
    fn test_current_ssid_falls_back_to_ipconfig() {
        // networksetup under-reports on recent releases; ipconfig still knows
        let runner = ScriptedRunner::new()
            .ok(0, "You are not associated with an AirPort network.\n", "")
            .ok(0, "  SSID : Home Net\n", "");
        let backend = MacOsBackend::new(runner, Some("en1".to_string()));

        assert_eq!(backend.current_ssid().unwrap(), "Home Net");
        assert_eq!(backend.runner.call(1).1, vec!["getsummary", "en1"]);
    }

    #[test]
    fn test_not_connected_when_airport_missing() {
        let runner = ScriptedRunner::new()
            .ok(0, "You are not associated with an AirPort network.\n", "")
            .ok(0, "<dictionary> {\n}\n", "")
            .err(Error::UnsupportedPlatform("required tool `airport` is not available".to_string()));
        let backend = MacOsBackend::new(runner, None);

        assert!(matches!(backend.current_ssid(), Err(Error::NotConnected)));
    }

    #[test]
    fn test_redacted_ssid_is_permission_error() {
        let runner = ScriptedRunner::new()
            .ok(0, "You are not associated with an AirPort network.\n", "")
            .ok(0, "  SSID : <redacted>\n", "");
        let backend = MacOsBackend::new(runner, None);

        assert!(matches!(
            backend.current_ssid(),
            Err(Error::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_password_lookup() {
        let runner = ScriptedRunner::new().ok(0, "correct horse battery\n", "");
        let backend = MacOsBackend::new(runner, None);

        let password = backend.password("Home Net").unwrap();
        assert_eq!(password.expose(), "correct horse battery");

        let (program, args) = backend.runner.call(0);
        assert_eq!(program, "security");
        assert_eq!(
            args,
            vec![
                "find-generic-password",
                "-D",
                "AirPort network password",
                "-a",
                "Home Net",
                "-w"
            ]
        );
    }

    #[test]
    fn test_classify_security_errors() {
        let not_found = CommandOutput {
            status: Some(44),
            stdout: String::new(),
            stderr: "security: SecKeychainSearchCopyNext: The specified item could not be found in the keychain.\n".to_string(),
        };
        assert!(matches!(
            classify_security_output("Cafe", &not_found),
            Err(Error::NotFound(ssid)) if ssid == "Cafe"
        ));

        let canceled = CommandOutput {
            status: Some(128),
            stdout: String::new(),
            stderr: "security: SecKeychainItemCopyAttributesAndData: User canceled the operation.\n".to_string(),
        };
        assert!(matches!(
            classify_security_output("Cafe", &canceled),
            Err(Error::PermissionDenied(_))
        ));

        let other = CommandOutput {
            status: Some(1),
            stdout: String::new(),
            stderr: "security: unknown failure\n".to_string(),
        };
        assert!(matches!(
            classify_security_output("Cafe", &other),
            Err(Error::CommandFailed { .. })
        ));
    }
}
