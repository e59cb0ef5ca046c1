//! The `fwautomation_fwgroup` resource.
//!
//! Every field is force-new, so there is no in-place update: an update only
//! re-reads the group.

use crate::diag::{Diagnostic, Diagnostics};
use crate::resource::{ProviderMeta, Resource};
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use fwautomation_core::types::{FirewallGroup, FirewallResponse, GroupCommand, GroupMethod};
use fwautomation_core::{validation, Error, GroupId};
use fwautomation_ssh::run_task;
use tracing::{debug, info, warn};

/// Group name attribute.
pub const GROUP_NAME: &str = "group_name";
/// Hostname attribute.
pub const HOSTNAME: &str = "hostname";
/// IP address attribute.
pub const IP_ADDRESS: &str = "ip_address";

const SCHEMA_VERSION: u32 = 1;

/// Firewall group membership managed over SSH.
#[derive(Debug, Clone)]
pub struct FirewallGroupResource {
    schema: Schema,
}

impl FirewallGroupResource {
    /// Creates the resource definition.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: Schema::new(SCHEMA_VERSION)
                .attribute(
                    GROUP_NAME,
                    Attribute::string("Firewall group name (upper-case letters, underscores)")
                        .required()
                        .force_new()
                        .validate_with(validation::validate_group_name),
                )
                .attribute(
                    HOSTNAME,
                    Attribute::string("Fully qualified host name of the member")
                        .required()
                        .force_new()
                        .validate_with(validation::validate_hostname),
                )
                .attribute(
                    IP_ADDRESS,
                    Attribute::string("IPv4 address of the member")
                        .required()
                        .force_new()
                        .validate_with(validation::validate_ip_address),
                ),
        }
    }
}

impl Default for FirewallGroupResource {
    fn default() -> Self {
        Self::new()
    }
}

/// Value of `key` for `method`. A removal targets what exists remotely, so a
/// pending change resolves to the prior value.
fn get_value<'a>(data: &'a ResourceData, key: &str, method: GroupMethod) -> Option<&'a str> {
    if method == GroupMethod::Remove && data.has_change(key) {
        let (old, new) = data.get_change(key);
        old.or(new)
    } else {
        data.get(key)
    }
}

/// Builds the appliance command for `method` from the instance data. A
/// lookup only needs the group name.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] if a field is missing or malformed.
pub fn generate_command(data: &ResourceData, method: GroupMethod) -> Result<GroupCommand> {
    let field = |key: &str| {
        get_value(data, key, method)
            .map(str::to_string)
            .ok_or_else(|| Error::ValidationError(format!("{key}: value is not set")))
    };

    if method == GroupMethod::Show {
        return GroupCommand::show(field(GROUP_NAME)?);
    }

    let group = FirewallGroup::new(field(GROUP_NAME)?, field(HOSTNAME)?, field(IP_ADDRESS)?)?;
    Ok(group.command(method))
}

async fn run_firewall_group_task(
    meta: &ProviderMeta,
    data: &ResourceData,
    method: GroupMethod,
) -> Result<FirewallResponse> {
    let command = generate_command(data, method)?;
    let response = run_task(meta.runner(), &command).await?;
    debug!(
        method = %method,
        group = command.group_name(),
        status = %response.status,
        reason = %response.reason,
        "Firewall group task completed"
    );
    Ok(response)
}

fn report(err: &Error, operation: &str) -> Diagnostics {
    if err.should_log() {
        warn!(operation, code = err.error_code(), error = %err, "Firewall group operation failed");
    } else if err.is_transport() {
        info!(
            operation,
            code = err.error_code(),
            error = %err,
            "Firewall group command did not complete"
        );
    } else {
        debug!(operation, code = err.error_code(), error = %err, "Firewall group operation failed");
    }
    Diagnostics::from_err(err)
}

#[async_trait]
impl Resource for FirewallGroupResource {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn create(&self, data: &mut ResourceData, meta: &ProviderMeta) -> Diagnostics {
        let diags = self.validate(data);
        if diags.has_error() {
            return diags;
        }

        let response = match run_firewall_group_task(meta, data, GroupMethod::Add).await {
            Ok(response) => response,
            Err(err) => return report(&err, "create"),
        };

        if !response.is_success() {
            return Diagnostics::error(format!(
                "Failed to create firewall group {}: {}",
                data.get(GROUP_NAME).unwrap_or_default(),
                response.reason
            ));
        }

        data.set_id(GroupId::new_v4().to_string());
        diags
    }

    async fn read(&self, data: &mut ResourceData, meta: &ProviderMeta) -> Diagnostics {
        let response = match run_firewall_group_task(meta, data, GroupMethod::Show).await {
            Ok(response) => response,
            Err(err) => return report(&err, "read"),
        };

        if !response.is_success() {
            return Diagnostics::error(format!(
                "Failed to read firewall group {}: {}",
                data.id().unwrap_or_default(),
                response.reason
            ));
        }

        Diagnostics::new()
    }

    async fn update(&self, data: &mut ResourceData, meta: &ProviderMeta) -> Diagnostics {
        self.read(data, meta).await
    }

    async fn delete(&self, data: &mut ResourceData, meta: &ProviderMeta) -> Diagnostics {
        let response = match run_firewall_group_task(meta, data, GroupMethod::Remove).await {
            Ok(response) => response,
            Err(err) => return report(&err, "delete"),
        };

        let mut diags = Diagnostics::new();
        if !response.is_success() {
            diags.push(
                Diagnostic::warning(format!(
                    "Firewall group {} removal reported {:?}",
                    data.id().unwrap_or_default(),
                    response.status
                ))
                .with_detail(response.reason),
            );
        }

        data.clear_id();
        diags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn values(group: &str, host: &str, ip: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            (GROUP_NAME.to_string(), group.to_string()),
            (HOSTNAME.to_string(), host.to_string()),
            (IP_ADDRESS.to_string(), ip.to_string()),
        ])
    }

    #[test]
    fn schema_has_three_required_force_new_fields() {
        let resource = FirewallGroupResource::new();
        let schema = resource.schema();
        assert_eq!(schema.version, 1);
        for name in [GROUP_NAME, HOSTNAME, IP_ADDRESS] {
            let attribute = schema.get(name).unwrap();
            assert!(attribute.required, "{name} should be required");
            assert!(attribute.force_new, "{name} should be force-new");
        }
    }

    #[test]
    fn validate_flags_each_bad_field() {
        let resource = FirewallGroupResource::new();
        let data = ResourceData::new(values("web", "WEB01", "10.0.0.x"));
        let diags = resource.validate(&data);
        let attributes: Vec<_> = diags
            .iter()
            .filter_map(|d| d.attribute.as_deref())
            .collect();
        assert_eq!(attributes, vec![GROUP_NAME, HOSTNAME, IP_ADDRESS]);
    }

    #[test]
    fn generate_command_for_add() {
        let data = ResourceData::new(values("WEB", "web.example.com", "10.0.0.1"));
        let command = generate_command(&data, GroupMethod::Add).unwrap();
        assert_eq!(
            command.to_string(),
            "modify group group=WEB hostname=web.example.com ip=10.0.0.1 method=add"
        );
    }

    #[test]
    fn generate_command_for_remove_uses_prior_values() {
        let data = ResourceData::from_state("abc", values("WEB", "old.example.com", "10.0.0.1"))
            .with_planned(values("WEB", "new.example.com", "10.0.0.2"));
        let command = generate_command(&data, GroupMethod::Remove).unwrap();
        assert_eq!(
            command.to_string(),
            "modify group group=WEB hostname=old.example.com ip=10.0.0.1 method=remove"
        );

        let command = generate_command(&data, GroupMethod::Add).unwrap();
        assert!(command.to_string().contains("hostname=new.example.com"));
    }

    #[test]
    fn generate_command_for_show_needs_only_group_name() {
        let mut data = ResourceData::default();
        data.set(GROUP_NAME, "WEB");
        let command = generate_command(&data, GroupMethod::Show).unwrap();
        assert_eq!(command.to_string(), "show group group=WEB");

        data.set(GROUP_NAME, "web");
        assert!(matches!(
            generate_command(&data, GroupMethod::Show),
            Err(Error::ValidationError(_))
        ));
    }

    #[test]
    fn generate_command_requires_every_field() {
        let mut data = ResourceData::default();
        data.set(GROUP_NAME, "WEB");
        let err = generate_command(&data, GroupMethod::Add).unwrap_err();
        assert_eq!(
            err,
            Error::ValidationError("hostname: value is not set".to_string())
        );
    }
}
