//! # fwautomation-core
//!
//! Core types and validation for managing firewall groups on a remote
//! appliance.
//!
//! The appliance owns all firewall-group state; this crate only describes
//! what is sent to it and what comes back.
//!
//! ## Modules
//!
//! - [`error`] - Error type and error codes
//! - [`config`] - Management server configuration
//! - [`types`] - Firewall group model, command builder and appliance responses
//! - [`validation`] - Field format validators
//! - [`id`] - Opaque resource identifiers

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod id;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::ManagementConfig;
pub use error::{Error, Result};
pub use id::GroupId;
pub use types::{FirewallGroup, FirewallResponse, GroupCommand, GroupMethod};
