//! Error types for firewall-group operations.
//!
//! Every failure is fatal to the operation that produced it; variants only
//! exist so callers can report which stage failed.

use thiserror::Error;

/// Main error type for firewall-group operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Field validation failed
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Command method is not one of the supported variants
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Invalid resource identifier
    #[error("Invalid resource id: {0}")]
    InvalidId(String),

    /// Private key file could not be read
    #[error("Error reading private key: {0}")]
    KeyRead(String),

    /// Private key could not be decoded
    #[error("Error parsing private key: {0}")]
    KeyParse(String),

    /// Dialing the management server failed
    #[error("Error dialing management server: {0}")]
    ConnectionFailed(String),

    /// Dial timed out
    #[error("Timeout dialing management server: {0}")]
    Timeout(String),

    /// Public-key authentication was rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Opening or starting the remote session failed
    #[error("Error running start command: {0}")]
    SessionError(String),

    /// Remote command exited with a non-zero status
    #[error("Error running wait command: exit status {exit_status}, stderr: {stderr}, stdout: {stdout}")]
    CommandFailed {
        /// Remote exit status
        exit_status: u32,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// Appliance output was not the expected JSON document
    #[error("Error parsing JSON response: {0}")]
    ResponseParse(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Specialized result type for firewall-group operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::UnsupportedMethod(_) => "UNSUPPORTED_METHOD",
            Self::InvalidId(_) => "INVALID_ID",
            Self::KeyRead(_) => "KEY_READ",
            Self::KeyParse(_) => "KEY_PARSE",
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::Timeout(_) => "TIMEOUT",
            Self::AuthenticationFailed(_) => "AUTHENTICATION_FAILED",
            Self::SessionError(_) => "SESSION_ERROR",
            Self::CommandFailed { .. } => "COMMAND_FAILED",
            Self::ResponseParse(_) => "RESPONSE_PARSE",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if this error came from the transport rather than from
    /// local validation.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::Timeout(_)
                | Self::AuthenticationFailed(_)
                | Self::SessionError(_)
                | Self::CommandFailed { .. }
        )
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::InternalError(_)
                | Self::ConfigError(_)
                | Self::KeyRead(_)
                | Self::KeyParse(_)
                | Self::AuthenticationFailed(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ResponseParse(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Self::InvalidId(err.to_string())
    }
}
