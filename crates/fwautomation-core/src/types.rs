//! Firewall group model, command builder and appliance responses.
//!
//! The appliance speaks a small line-oriented protocol:
//!
//! ```text
//! modify group group=<NAME> hostname=<HOST> ip=<IP> method=add|remove
//! show group group=<NAME>
//! ```
//!
//! and answers with a JSON document carrying `status` and `reason`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::{Error, Result};
use crate::validation::{self, GROUP_NAME_PATTERN, HOSTNAME_PATTERN, IP_ADDRESS_PATTERN};

/// Status string the appliance reports for a successful operation.
pub const STATUS_SUCCESS: &str = "success";

/// A firewall group membership entry on the appliance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
pub struct FirewallGroup {
    /// Group name (upper-case letters and underscores).
    #[validate(regex(path = *GROUP_NAME_PATTERN))]
    pub group_name: String,

    /// Member hostname (lower-case letters, periods, hyphens).
    #[validate(regex(path = *HOSTNAME_PATTERN))]
    pub hostname: String,

    /// Member IPv4 address in dotted-quad form.
    #[validate(regex(path = *IP_ADDRESS_PATTERN))]
    pub ip_address: String,
}

impl FirewallGroup {
    /// Creates a validated firewall group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if any field has an invalid format.
    pub fn new(
        group_name: impl Into<String>,
        hostname: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Result<Self> {
        let group = Self {
            group_name: group_name.into(),
            hostname: hostname.into(),
            ip_address: ip_address.into(),
        };
        group.check()?;
        Ok(group)
    }

    /// Checks every field format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] describing the first failing field set.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if !validation::is_ip_address(&self.ip_address) {
            return Err(Error::ValidationError(format!(
                "ip_address: octet out of range in {}",
                self.ip_address
            )));
        }
        Ok(())
    }

    /// Builds the command for `method` against this group.
    #[must_use]
    pub fn command(&self, method: GroupMethod) -> GroupCommand {
        match method {
            GroupMethod::Show => GroupCommand::Show {
                group_name: self.group_name.clone(),
            },
            GroupMethod::Add | GroupMethod::Remove => GroupCommand::Modify {
                method,
                group: self.clone(),
            },
        }
    }
}

/// Operation requested from the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupMethod {
    /// Add the host to the group.
    Add,
    /// Remove the host from the group.
    Remove,
    /// Look the group up.
    Show,
}

impl GroupMethod {
    /// Returns the method as it appears on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Show => "show",
        }
    }
}

impl FromStr for GroupMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "show" | "read" => Ok(Self::Show),
            other => Err(Error::UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for GroupMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single appliance command, rendered through [`fmt::Display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupCommand {
    /// Add or remove a member.
    Modify {
        /// Either [`GroupMethod::Add`] or [`GroupMethod::Remove`].
        method: GroupMethod,
        /// Membership entry being changed.
        group: FirewallGroup,
    },
    /// Look a group up by name.
    Show {
        /// Group name.
        group_name: String,
    },
}

impl GroupCommand {
    /// Builds a lookup command, which only needs the group name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if the group name is malformed.
    pub fn show(group_name: impl Into<String>) -> Result<Self> {
        let group_name = group_name.into();
        let problems = validation::validate_group_name(&group_name, "group_name");
        if !problems.is_empty() {
            return Err(Error::ValidationError(problems.join("; ")));
        }
        Ok(Self::Show { group_name })
    }

    /// Returns the requested method.
    #[must_use]
    pub const fn method(&self) -> GroupMethod {
        match self {
            Self::Modify { method, .. } => *method,
            Self::Show { .. } => GroupMethod::Show,
        }
    }

    /// Returns the name of the targeted group.
    #[must_use]
    pub fn group_name(&self) -> &str {
        match self {
            Self::Modify { group, .. } => &group.group_name,
            Self::Show { group_name } => group_name,
        }
    }
}

impl fmt::Display for GroupCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Modify { method, group } => write!(
                f,
                "modify group group={} hostname={} ip={} method={}",
                group.group_name, group.hostname, group.ip_address, method
            ),
            Self::Show { group_name } => write!(f, "show group group={group_name}"),
        }
    }
}

/// Response document printed by the appliance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallResponse {
    /// Outcome, `success` when the operation went through.
    #[serde(default)]
    pub status: String,
    /// Human-readable explanation.
    #[serde(default)]
    pub reason: String,
}

impl FirewallResponse {
    /// Parses the appliance output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResponseParse`] if `output` is not a JSON response.
    pub fn parse(output: &str) -> Result<Self> {
        serde_json::from_str(output.trim()).map_err(Error::from)
    }

    /// Returns true if the appliance reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}
