//! Provider definition: configuration schema, configuration, resource map.

use crate::diag::{Diagnostic, Diagnostics};
use crate::fwgroup::FirewallGroupResource;
use crate::resource::Resource;
use crate::schema::{Attribute, Schema};
use fwautomation_core::config::{
    ENV_AUTH_KEY_PATH, ENV_DOMAIN, ENV_PORT, ENV_SERVER, ENV_USERNAME, DEFAULT_USERNAME,
};
use fwautomation_core::ManagementConfig;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// Name of the firewall group resource type.
pub const RESOURCE_FWGROUP: &str = "fwautomation_fwgroup";

/// Management server attribute.
pub const MANAGEMENT_SERVER: &str = "management_server";
/// Domain attribute.
pub const DOMAIN: &str = "domain";
/// Private key path attribute.
pub const AUTHENTICATION_KEY_PATH: &str = "authentication_key_path";
/// SSH user attribute.
pub const USERNAME: &str = "username";
/// SSH port attribute.
pub const PORT: &str = "port";

/// The fwautomation provider.
pub struct Provider {
    schema: Schema,
    resources: BTreeMap<&'static str, Arc<dyn Resource>>,
}

impl Provider {
    /// Creates the provider with its resource types registered.
    #[must_use]
    pub fn new() -> Self {
        let schema = Schema::new(0)
            .attribute(
                MANAGEMENT_SERVER,
                Attribute::string("Management server reachable over SSH")
                    .required()
                    .env_default(ENV_SERVER),
            )
            .attribute(
                DOMAIN,
                Attribute::string("Domain qualifying a bare management server name")
                    .required()
                    .env_default(ENV_DOMAIN),
            )
            .attribute(
                AUTHENTICATION_KEY_PATH,
                Attribute::string("Path to the SSH private key")
                    .required()
                    .env_default(ENV_AUTH_KEY_PATH),
            )
            .attribute(
                USERNAME,
                Attribute::string("SSH login user")
                    .env_default(ENV_USERNAME)
                    .default_value(DEFAULT_USERNAME),
            )
            .attribute(
                PORT,
                Attribute::number("SSH port")
                    .env_default(ENV_PORT)
                    .default_value("22"),
            );

        let mut resources: BTreeMap<&'static str, Arc<dyn Resource>> = BTreeMap::new();
        resources.insert(RESOURCE_FWGROUP, Arc::new(FirewallGroupResource::new()));

        Self { schema, resources }
    }

    /// Provider configuration schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Looks a resource type up by name.
    #[must_use]
    pub fn resource(&self, name: &str) -> Option<Arc<dyn Resource>> {
        self.resources.get(name).cloned()
    }

    /// Registered resource type names.
    pub fn resource_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    /// Configures the provider, falling back to the process environment.
    ///
    /// # Errors
    ///
    /// Returns the diagnostics describing every invalid or missing setting.
    pub fn configure(
        &self,
        raw: &BTreeMap<String, String>,
    ) -> Result<ManagementConfig, Diagnostics> {
        self.configure_with_env(raw, |var| std::env::var(var).ok())
    }

    /// Configures the provider with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// Returns the diagnostics describing every invalid or missing setting.
    pub fn configure_with_env<F>(
        &self,
        raw: &BTreeMap<String, String>,
        env: F,
    ) -> Result<ManagementConfig, Diagnostics>
    where
        F: Fn(&str) -> Option<String>,
    {
        let values = self.schema.resolve(raw, env);
        let diags = self.schema.validate(&values);
        if diags.has_error() {
            return Err(diags);
        }

        let value = |key: &str| values.get(key).cloned().unwrap_or_default();

        let port = value(PORT).parse::<u16>().map_err(|e| {
            Diagnostics::from_iter([Diagnostic::error(format!("Invalid SSH port: {e}"))
                .with_attribute(PORT)])
        })?;

        let config = ManagementConfig::new(
            value(MANAGEMENT_SERVER),
            value(DOMAIN),
            value(AUTHENTICATION_KEY_PATH),
        )
        .map_err(|e| Diagnostics::from_err(&e))?
        .with_username(value(USERNAME))
        .with_port(port);

        config.validate().map_err(|errors| {
            errors
                .field_errors()
                .keys()
                .map(|field| {
                    let field = field.to_string();
                    Diagnostic::error(format!("Invalid value for {field:?}"))
                        .with_detail(errors.to_string())
                        .with_attribute(field)
                })
                .collect::<Diagnostics>()
        })?;

        info!(
            server = %config.ssh_host(),
            port = config.port,
            username = %config.username,
            "Provider configured"
        );

        Ok(config)
    }

    /// Provider and resource schemas as one JSON document.
    #[must_use]
    pub fn schema_document(&self) -> Value {
        let resources: Map<String, Value> = self
            .resources
            .iter()
            .map(|(name, resource)| {
                (
                    (*name).to_string(),
                    serde_json::to_value(resource.schema()).unwrap_or(Value::Null),
                )
            })
            .collect();

        json!({
            "provider": serde_json::to_value(&self.schema).unwrap_or(Value::Null),
            "resource_schemas": resources,
        })
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn registers_firewall_group_resource() {
        let provider = Provider::new();
        assert_eq!(
            provider.resource_names().collect::<Vec<_>>(),
            vec![RESOURCE_FWGROUP]
        );
        assert!(provider.resource(RESOURCE_FWGROUP).is_some());
        assert!(provider.resource("fwautomation_rule").is_none());
    }

    #[test]
    fn configure_from_explicit_values() {
        let provider = Provider::new();
        let config = provider
            .configure_with_env(
                &raw(&[
                    (MANAGEMENT_SERVER, "fw01"),
                    (DOMAIN, "corp.example"),
                    (AUTHENTICATION_KEY_PATH, "/keys/id_ed25519"),
                ]),
                no_env,
            )
            .unwrap();

        assert_eq!(config.server, "fw01");
        assert_eq!(config.domain, "corp.example");
        assert_eq!(config.authentication_key_path, "/keys/id_ed25519");
        assert_eq!(config.username, DEFAULT_USERNAME);
        assert_eq!(config.port, 22);
    }

    #[test]
    fn configure_falls_back_to_environment() {
        let provider = Provider::new();
        let env = |var: &str| match var {
            "FWGROUPS_SERVER" => Some("fw02.corp.example".to_string()),
            "FWGROUPS_DOMAIN" => Some("corp.example".to_string()),
            "FWGROUPS_AUTH_KEY_PATH" => Some("/keys/ci".to_string()),
            "FWGROUPS_PORT" => Some("2222".to_string()),
            _ => None,
        };

        let config = provider
            .configure_with_env(&raw(&[(USERNAME, "netops")]), env)
            .unwrap();
        assert_eq!(config.server, "fw02.corp.example");
        assert_eq!(config.authentication_key_path, "/keys/ci");
        assert_eq!(config.username, "netops");
        assert_eq!(config.port, 2222);
    }

    #[test]
    fn configure_reports_every_missing_setting() {
        let provider = Provider::new();
        let diags = provider.configure_with_env(&raw(&[]), no_env).unwrap_err();
        let attributes: Vec<_> = diags
            .iter()
            .filter_map(|d| d.attribute.as_deref())
            .collect();
        assert_eq!(
            attributes,
            vec![AUTHENTICATION_KEY_PATH, DOMAIN, MANAGEMENT_SERVER]
        );
    }

    #[test]
    fn configure_rejects_out_of_range_port() {
        let provider = Provider::new();
        let diags = provider
            .configure_with_env(
                &raw(&[
                    (MANAGEMENT_SERVER, "fw01"),
                    (DOMAIN, "corp.example"),
                    (AUTHENTICATION_KEY_PATH, "/keys/id"),
                    (PORT, "70000"),
                ]),
                no_env,
            )
            .unwrap_err();
        assert_eq!(
            diags.iter().next().unwrap().attribute.as_deref(),
            Some(PORT)
        );
    }

    #[test]
    fn configure_rejects_port_zero() {
        let provider = Provider::new();
        let diags = provider
            .configure_with_env(
                &raw(&[
                    (MANAGEMENT_SERVER, "fw01"),
                    (DOMAIN, "corp.example"),
                    (AUTHENTICATION_KEY_PATH, "/keys/id"),
                    (PORT, "0"),
                ]),
                no_env,
            )
            .unwrap_err();
        assert!(diags.has_error());
        assert_eq!(
            diags.iter().next().unwrap().attribute.as_deref(),
            Some(PORT)
        );
    }

    #[test]
    fn schema_document_lists_resources() {
        let document = Provider::new().schema_document();
        assert_eq!(
            document["provider"]["attributes"][MANAGEMENT_SERVER]["env_default"],
            "FWGROUPS_SERVER"
        );
        assert_eq!(
            document["resource_schemas"][RESOURCE_FWGROUP]["version"],
            1
        );
    }
}
