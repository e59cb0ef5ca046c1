//! SSH command runner backed by `russh`.

use crate::{config::SshConfig, Result};
use async_trait::async_trait;
use fwautomation_core::error::Error;
use fwautomation_core::types::{FirewallResponse, GroupCommand};
use russh::client;
use russh::{ChannelMsg, Disconnect};
use russh_keys::key::{KeyPair, PublicKey};
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// SSH extended-data stream carrying stderr.
const EXTENDED_DATA_STDERR: u32 = 1;

/// Captured result of a remote command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Remote exit status.
    pub exit_status: u32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Turns a non-zero exit status into [`Error::CommandFailed`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandFailed`] carrying both output streams when the
    /// command did not exit cleanly.
    pub fn into_result(self) -> Result<Self> {
        if self.exit_status == 0 {
            Ok(self)
        } else {
            Err(Error::CommandFailed {
                exit_status: self.exit_status,
                stdout: self.stdout,
                stderr: self.stderr,
            })
        }
    }
}

/// Runs a single command on the management server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `command` and waits for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails or the command exits non-zero.
    async fn run(&self, command: &str) -> Result<CommandOutput>;
}

/// Runs `command` and parses the appliance's JSON answer.
///
/// # Errors
///
/// Propagates runner errors and returns [`Error::ResponseParse`] (with the
/// captured stderr) if stdout is not a response document.
pub async fn run_task(
    runner: &dyn CommandRunner,
    command: &GroupCommand,
) -> Result<FirewallResponse> {
    let output = runner.run(&command.to_string()).await?;
    FirewallResponse::parse(&output.stdout).map_err(|err| match err {
        Error::ResponseParse(message) => {
            Error::ResponseParse(format!("{message}, stderr: {}", output.stderr))
        }
        other => other,
    })
}

/// Command runner that opens a fresh SSH connection per command.
#[derive(Debug, Clone)]
pub struct SshCommandRunner {
    config: Arc<SshConfig>,
}

impl SshCommandRunner {
    /// Creates a runner for the given connection settings.
    #[must_use]
    pub fn new(config: SshConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    async fn connect(&self) -> Result<client::Handle<AcceptAnyHostKey>> {
        let key = load_key(self.config.key_path()).await?;
        let target = self.config.target();

        let client_config = Arc::new(client::Config::default());
        let handler = AcceptAnyHostKey {
            target: target.clone(),
        };

        let mut handle = timeout(
            self.config.dial_timeout(),
            client::connect(
                client_config,
                (self.config.host().to_string(), self.config.port()),
                handler,
            ),
        )
        .await
        .map_err(|_| Error::Timeout(target.clone()))?
        .map_err(|e| Error::ConnectionFailed(format!("{target}: {e}")))?;

        let accepted = handle
            .authenticate_publickey(self.config.username(), Arc::new(key))
            .await
            .map_err(|e| Error::AuthenticationFailed(format!("{target}: {e}")))?;
        if !accepted {
            return Err(Error::AuthenticationFailed(format!(
                "public key rejected for {target}"
            )));
        }

        Ok(handle)
    }
}

#[async_trait]
impl CommandRunner for SshCommandRunner {
    async fn run(&self, command: &str) -> Result<CommandOutput> {
        debug!(remote = %self.config.target(), command = %command, "Running appliance command");

        let handle = self.connect().await?;
        let result = exec(&handle, command).await;

        if let Err(e) = handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
        {
            debug!(error = %e, "SSH disconnect failed");
        }

        let output = result?;
        info!(
            remote = %self.config.target(),
            exit_status = output.exit_status,
            stdout_len = output.stdout.len(),
            stderr_len = output.stderr.len(),
            "Appliance command finished"
        );
        output.into_result()
    }
}

async fn exec(handle: &client::Handle<AcceptAnyHostKey>, command: &str) -> Result<CommandOutput> {
    let mut channel = handle
        .channel_open_session()
        .await
        .map_err(|e| Error::SessionError(format!("opening session: {e}")))?;

    channel
        .exec(true, command)
        .await
        .map_err(|e| Error::SessionError(e.to_string()))?;

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut exit_status = None;

    while let Some(msg) = channel.wait().await {
        match msg {
            ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
            ChannelMsg::ExtendedData { ref data, ext } if ext == EXTENDED_DATA_STDERR => {
                stderr.extend_from_slice(data);
            }
            ChannelMsg::ExitStatus { exit_status: status } => exit_status = Some(status),
            _ => {}
        }
    }

    let stdout = String::from_utf8_lossy(&stdout).into_owned();
    let stderr = String::from_utf8_lossy(&stderr).into_owned();

    let exit_status = exit_status.ok_or_else(|| {
        Error::SessionError(format!(
            "remote command ended without an exit status, stderr: {stderr}, stdout: {stdout}"
        ))
    })?;

    Ok(CommandOutput {
        exit_status,
        stdout,
        stderr,
    })
}

async fn load_key(path: &Path) -> Result<KeyPair> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::KeyRead(format!("{}: {e}", path.display())))?;
    let secret = SecretString::from(contents);

    russh_keys::decode_secret_key(secret.expose_secret(), None)
        .map_err(|e| Error::KeyParse(format!("{}: {e}", path.display())))
}

/// Host-key policy: every server key is accepted.
struct AcceptAnyHostKey {
    target: String,
}

#[async_trait]
impl client::Handler for AcceptAnyHostKey {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        warn!(
            remote = %self.target,
            fingerprint = %server_public_key.fingerprint(),
            "Host key verification disabled, accepting server key"
        );
        Ok(true)
    }
}
