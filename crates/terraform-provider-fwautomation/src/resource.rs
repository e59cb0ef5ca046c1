//! Resource lifecycle trait and the configured provider state it receives.

use crate::diag::Diagnostics;
use crate::resource_data::ResourceData;
use crate::schema::Schema;
use async_trait::async_trait;
use fwautomation_core::ManagementConfig;
use fwautomation_ssh::{CommandRunner, SshCommandRunner, SshConfig};
use std::sync::Arc;

/// State produced by configuring the provider, shared by every operation.
#[derive(Clone)]
pub struct ProviderMeta {
    config: Arc<ManagementConfig>,
    runner: Arc<dyn CommandRunner>,
}

impl ProviderMeta {
    /// Uses an explicit command runner.
    #[must_use]
    pub fn new(config: ManagementConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            config: Arc::new(config),
            runner,
        }
    }

    /// Runs commands over SSH against the configured management server.
    #[must_use]
    pub fn ssh(config: ManagementConfig) -> Self {
        let runner = SshCommandRunner::new(SshConfig::from_management(&config));
        Self::new(config, Arc::new(runner))
    }

    /// Management server configuration.
    #[must_use]
    pub fn config(&self) -> &ManagementConfig {
        &self.config
    }

    /// Command runner.
    #[must_use]
    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }
}

/// Lifecycle of a managed resource type.
///
/// Operations never return `Err`; every failure is reported through the
/// returned [`Diagnostics`].
#[async_trait]
pub trait Resource: Send + Sync {
    /// Attribute schema.
    fn schema(&self) -> &Schema;

    /// Checks attribute values without touching the remote side.
    fn validate(&self, data: &ResourceData) -> Diagnostics {
        self.schema().validate(data.values())
    }

    /// Creates the remote object and assigns an id on success.
    async fn create(&self, data: &mut ResourceData, meta: &ProviderMeta) -> Diagnostics;

    /// Refreshes the instance from the remote side.
    async fn read(&self, data: &mut ResourceData, meta: &ProviderMeta) -> Diagnostics;

    /// Applies in-place changes.
    async fn update(&self, data: &mut ResourceData, meta: &ProviderMeta) -> Diagnostics;

    /// Removes the remote object and clears the id on success.
    async fn delete(&self, data: &mut ResourceData, meta: &ProviderMeta) -> Diagnostics;
}
