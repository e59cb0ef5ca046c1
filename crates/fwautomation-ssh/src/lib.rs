//! SSH command transport for firewall-group management.
//!
//! Each operation dials the management server, runs one command and closes
//! the connection again. Nothing is pooled or retried.

#![deny(missing_docs)]

mod client;
mod config;

pub use client::{run_task, CommandOutput, CommandRunner, SshCommandRunner};
pub use config::SshConfig;

/// Convenient result alias that reuses the core error type.
pub type Result<T> = fwautomation_core::Result<T>;
