//! Management server configuration.
//!
//! A [`ManagementConfig`] is built once per provider configuration and is
//! read-only afterwards.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;
use validator::Validate;

/// Environment variable backing `management_server`.
pub const ENV_SERVER: &str = "FWGROUPS_SERVER";
/// Environment variable backing `domain`.
pub const ENV_DOMAIN: &str = "FWGROUPS_DOMAIN";
/// Environment variable backing `authentication_key_path`.
pub const ENV_AUTH_KEY_PATH: &str = "FWGROUPS_AUTH_KEY_PATH";
/// Environment variable backing `username`.
pub const ENV_USERNAME: &str = "FWGROUPS_USERNAME";
/// Environment variable backing `port`.
pub const ENV_PORT: &str = "FWGROUPS_PORT";

/// Fixed timeout for dialing the management server (seconds).
pub const DIAL_TIMEOUT_SECS: u64 = 5;
/// Default SSH port.
pub const DEFAULT_SSH_PORT: u16 = 22;
/// Default SSH login user.
pub const DEFAULT_USERNAME: &str = "admin";

/// Connection settings for the management server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ManagementConfig {
    /// Management server host name or address
    #[validate(length(min = 1))]
    pub server: String,

    /// Domain used to qualify a bare server host name
    #[validate(length(min = 1))]
    pub domain: String,

    /// Path to the SSH private key
    #[validate(length(min = 1))]
    pub authentication_key_path: String,

    /// SSH login user
    #[validate(length(min = 1))]
    #[serde(default = "default_username")]
    pub username: String,

    /// SSH port
    #[validate(range(min = 1))]
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

const fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

impl ManagementConfig {
    /// Create a configuration from the three required settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if any setting is empty.
    pub fn new(
        server: impl Into<String>,
        domain: impl Into<String>,
        authentication_key_path: impl Into<String>,
    ) -> Result<Self, Error> {
        let config = Self {
            server: server.into(),
            domain: domain.into(),
            authentication_key_path: authentication_key_path.into(),
            username: default_username(),
            port: default_port(),
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set the SSH login user.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Set the SSH port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Host to dial.
    ///
    /// A bare host name (no dots, not an IP address) is qualified with
    /// [`domain`](Self::domain); anything else is used unchanged.
    #[must_use]
    pub fn ssh_host(&self) -> String {
        let bare = !self.server.contains('.') && self.server.parse::<IpAddr>().is_err();
        if bare && !self.domain.is_empty() {
            format!("{}.{}", self.server, self.domain.trim_start_matches('.'))
        } else {
            self.server.clone()
        }
    }

    /// Private key location.
    #[must_use]
    pub fn key_path(&self) -> &Path {
        Path::new(&self.authentication_key_path)
    }

    /// Dial timeout as a Duration.
    #[must_use]
    pub const fn dial_timeout(&self) -> Duration {
        Duration::from_secs(DIAL_TIMEOUT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_management_config_new() {
        let config = ManagementConfig::new("fw01", "corp.example", "/keys/id_ed25519").unwrap();
        assert_eq!(config.server, "fw01");
        assert_eq!(config.username, DEFAULT_USERNAME);
        assert_eq!(config.port, DEFAULT_SSH_PORT);
        assert_eq!(config.key_path(), Path::new("/keys/id_ed25519"));
    }

    #[test]
    fn test_management_config_rejects_empty() {
        let result = ManagementConfig::new("", "corp.example", "/keys/id");
        assert!(matches!(result, Err(Error::ConfigError(_))));

        let result = ManagementConfig::new("fw01", "corp.example", "");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_management_config_builder() {
        let config = ManagementConfig::new("fw01", "corp.example", "/keys/id")
            .unwrap()
            .with_username("netops")
            .with_port(2222);
        assert_eq!(config.username, "netops");
        assert_eq!(config.port, 2222);
    }

    #[test]
    fn test_ssh_host_qualifies_bare_name() {
        let config = ManagementConfig::new("fw01", "corp.example", "/keys/id").unwrap();
        assert_eq!(config.ssh_host(), "fw01.corp.example");
    }

    #[test]
    fn test_ssh_host_keeps_fqdn_and_addresses() {
        let config =
            ManagementConfig::new("fw01.corp.example", "other.example", "/keys/id").unwrap();
        assert_eq!(config.ssh_host(), "fw01.corp.example");

        let config = ManagementConfig::new("10.1.1.1", "corp.example", "/keys/id").unwrap();
        assert_eq!(config.ssh_host(), "10.1.1.1");

        let config = ManagementConfig::new("::1", "corp.example", "/keys/id").unwrap();
        assert_eq!(config.ssh_host(), "::1");
    }

    #[test]
    fn test_dial_timeout_is_fixed() {
        let config = ManagementConfig::new("fw01", "corp.example", "/keys/id").unwrap();
        assert_eq!(config.dial_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_config_deserialization_defaults() {
        let json = r#"{
            "server": "fw01",
            "domain": "corp.example",
            "authentication_key_path": "/keys/id"
        }"#;
        let config: ManagementConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.username, DEFAULT_USERNAME);
        assert_eq!(config.port, DEFAULT_SSH_PORT);
    }

    #[test]
    fn test_config_validation_port_range() {
        let mut config = ManagementConfig::new("fw01", "corp.example", "/keys/id").unwrap();
        config.port = 0;
        assert!(config.validate().is_err());
    }
}
