// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 wifi-password Contributors

// Lookup service: resolve the SSID, then fetch its stored key

use tracing::{debug, info};

use crate::command::SystemRunner;
use crate::error::{Error, Result};
use crate::platform::{backend_for, WifiBackend};
use crate::types::{NetworkCredential, Platform};

pub struct WifiPassword {
    backend: Box<dyn WifiBackend>,
}

impl WifiPassword {
    pub fn new(backend: Box<dyn WifiBackend>) -> Self {
        Self { backend }
    }

    /// Service for the platform this binary runs on, using the real OS tools
    pub fn for_current_platform(interface: Option<String>) -> Result<Self> {
        let platform = Platform::current()?;
        debug!("Using {} backend", platform);
        Ok(Self::new(backend_for(platform, SystemRunner, interface)))
    }

    pub fn platform(&self) -> Platform {
        self.backend.platform()
    }

    /// SSID of the network the machine is associated with
    pub fn current_ssid(&self) -> Result<String> {
        self.backend.current_ssid()
    }

    /// Credential for `ssid`
    ///
    /// A network without a stored key comes back with `password: None`.
    /// Permission and platform errors are returned as-is.
    pub fn credential_for(&self, ssid: &str) -> Result<NetworkCredential> {
        match self.backend.password(ssid) {
            Ok(password) => Ok(NetworkCredential::new(ssid, Some(password))),
            Err(Error::NotFound(_)) => {
                info!("No stored key for {:?}", ssid);
                Ok(NetworkCredential::new(ssid, None))
            }
            Err(e) => Err(e),
        }
    }

    /// Credential for `ssid`, or for the current network when `None`
    pub fn lookup(&self, ssid: Option<&str>) -> Result<NetworkCredential> {
        match ssid {
            Some(ssid) => self.credential_for(ssid),
            None => {
                let ssid = self.current_ssid()?;
                self.credential_for(&ssid)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Password;

    /// Backend with fixed answers
    struct FixedBackend {
        ssid: Option<&'static str>,
        password: fn(&str) -> Result<Password>,
    }

    impl WifiBackend for FixedBackend {
        fn platform(&self) -> Platform {
            Platform::Linux
        }

        fn current_ssid(&self) -> Result<String> {
            self.ssid.map(str::to_string).ok_or(Error::NotConnected)
        }

        fn password(&self, ssid: &str) -> Result<Password> {
            (self.password)(ssid)
        }
    }

    fn service(ssid: Option<&'static str>, password: fn(&str) -> Result<Password>) -> WifiPassword {
        WifiPassword::new(Box::new(FixedBackend { ssid, password }))
    }

    #[test]
    fn test_lookup_current_network() {
        let svc = service(Some("Home Net"), |_| Ok(Password::new("hunter22")));
        let cred = svc.lookup(None).unwrap();
        assert_eq!(cred.ssid, "Home Net");
        assert_eq!(cred.password.as_ref().map(Password::expose), Some("hunter22"));
    }

    #[test]
    fn test_lookup_is_repeatable() {
        let svc = service(Some("Home Net"), |_| Ok(Password::new("hunter22")));
        assert_eq!(svc.lookup(None).unwrap(), svc.lookup(None).unwrap());
    }

    #[test]
    fn test_lookup_named_network_skips_resolver() {
        let svc = service(None, |ssid| {
            assert_eq!(ssid, "Office");
            Ok(Password::new("office-key"))
        });
        let cred = svc.lookup(Some("Office")).unwrap();
        assert_eq!(cred.ssid, "Office");
        assert!(cred.has_password());
    }

    #[test]
    fn test_not_connected() {
        let svc = service(None, |_| panic!("fetcher must not run"));
        assert!(matches!(svc.lookup(None), Err(Error::NotConnected)));
    }

    #[test]
    fn test_missing_key_keeps_ssid() {
        let svc = service(Some("Lobby"), |ssid| Err(Error::NotFound(ssid.to_string())));
        let cred = svc.lookup(None).unwrap();
        assert_eq!(cred.ssid, "Lobby");
        assert!(cred.password.is_none());
    }

    #[test]
    fn test_permission_denied_propagates() {
        let svc = service(Some("Home Net"), |_| {
            Err(Error::PermissionDenied("keychain access was denied".to_string()))
        });
        assert!(matches!(svc.lookup(None), Err(Error::PermissionDenied(_))));
    }
}
