//! Connection settings for the SSH transport.

use fwautomation_core::config::{DEFAULT_SSH_PORT, DIAL_TIMEOUT_SECS};
use fwautomation_core::ManagementConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for reaching the management server over SSH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshConfig {
    host: String,
    port: u16,
    username: String,
    key_path: PathBuf,
    dial_timeout: Duration,
}

impl SshConfig {
    /// Creates a configuration with the default port and dial timeout.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        key_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SSH_PORT,
            username: username.into(),
            key_path: key_path.into(),
            dial_timeout: Duration::from_secs(DIAL_TIMEOUT_SECS),
        }
    }

    /// Derives the transport settings from a provider configuration.
    #[must_use]
    pub fn from_management(config: &ManagementConfig) -> Self {
        Self::new(config.ssh_host(), &config.username, config.key_path())
            .with_port(config.port)
            .with_dial_timeout(config.dial_timeout())
    }

    /// Overrides the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Overrides the dial timeout.
    #[must_use]
    pub const fn with_dial_timeout(mut self, timeout: Duration) -> Self {
        self.dial_timeout = timeout;
        self
    }

    /// Host to dial.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port to dial.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Login user.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Private key location.
    #[must_use]
    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    /// Upper bound on connecting and completing the handshake.
    #[must_use]
    pub const fn dial_timeout(&self) -> Duration {
        self.dial_timeout
    }

    /// `user@host:port`, for log and error messages.
    #[must_use]
    pub fn target(&self) -> String {
        format!("{}@{}:{}", self.username, self.host, self.port)
    }
}
