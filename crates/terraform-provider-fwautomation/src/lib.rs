//! Provider managing firewall groups on a remote appliance.
//!
//! The provider exposes one resource, `fwautomation_fwgroup`, whose
//! lifecycle operations each run a single command over SSH.

#![deny(missing_docs)]

pub mod diag;
pub mod fwgroup;
pub mod provider;
pub mod resource;
pub mod resource_data;
pub mod schema;

pub use diag::{Diagnostic, Diagnostics, Severity};
pub use fwgroup::FirewallGroupResource;
pub use provider::{Provider, RESOURCE_FWGROUP};
pub use resource::{ProviderMeta, Resource};
pub use resource_data::ResourceData;
pub use schema::{Attribute, Schema, ValueType};

/// Convenient result alias that reuses the core error type.
pub type Result<T> = fwautomation_core::Result<T>;
