use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::collections::BTreeMap;
use std::process::ExitCode;
use terraform_provider_fwautomation::fwgroup::{GROUP_NAME, HOSTNAME, IP_ADDRESS};
use terraform_provider_fwautomation::provider::{
    AUTHENTICATION_KEY_PATH, DOMAIN, MANAGEMENT_SERVER, PORT, USERNAME,
};
use terraform_provider_fwautomation::{
    Diagnostics, Provider, ProviderMeta, Resource, ResourceData, RESOURCE_FWGROUP,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Firewall group provider.
///
/// Drives the `fwautomation_fwgroup` lifecycle against a management server
/// reachable over SSH and prints the resulting state and diagnostics as JSON.
#[derive(Parser, Debug)]
#[command(name = "terraform-provider-fwautomation", version, about)]
struct Cli {
    /// Management server host name or address
    #[arg(long, global = true, env = "FWGROUPS_SERVER")]
    management_server: Option<String>,

    /// Domain qualifying a bare management server name
    #[arg(long, global = true, env = "FWGROUPS_DOMAIN")]
    domain: Option<String>,

    /// Path to the SSH private key
    #[arg(long, global = true, env = "FWGROUPS_AUTH_KEY_PATH")]
    authentication_key_path: Option<String>,

    /// SSH login user
    #[arg(long, global = true, env = "FWGROUPS_USERNAME")]
    username: Option<String>,

    /// SSH port
    #[arg(long, global = true, env = "FWGROUPS_PORT")]
    port: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the provider and resource schemas
    Schema,
    /// Check firewall group fields without contacting the server
    Validate(GroupArgs),
    /// Add a host to a firewall group
    Create(GroupArgs),
    /// Check that a firewall group exists
    Read(StateArgs),
    /// Remove a host from a firewall group
    Delete(StateArgs),
}

#[derive(Args, Debug)]
struct GroupArgs {
    /// Firewall group name
    #[arg(long)]
    group_name: String,

    /// Host name of the member
    #[arg(long)]
    hostname: String,

    /// IPv4 address of the member
    #[arg(long)]
    ip_address: String,
}

impl GroupArgs {
    fn values(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (GROUP_NAME.to_string(), self.group_name.clone()),
            (HOSTNAME.to_string(), self.hostname.clone()),
            (IP_ADDRESS.to_string(), self.ip_address.clone()),
        ])
    }
}

#[derive(Args, Debug)]
struct StateArgs {
    /// Id recorded when the instance was created
    #[arg(long)]
    id: String,

    #[command(flatten)]
    group: GroupArgs,
}

impl Cli {
    fn provider_values(&self) -> BTreeMap<String, String> {
        [
            (MANAGEMENT_SERVER, &self.management_server),
            (DOMAIN, &self.domain),
            (AUTHENTICATION_KEY_PATH, &self.authentication_key_path),
            (USERNAME, &self.username),
            (PORT, &self.port),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|value| (key.to_string(), value)))
        .collect()
    }
}

fn print_outcome(state: Option<&ResourceData>, diagnostics: &Diagnostics) -> Result<ExitCode> {
    let output = json!({
        "state": state,
        "diagnostics": diagnostics,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("failed to encode output")?
    );

    if diagnostics.has_error() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Create,
    Read,
    Delete,
}

async fn apply(
    resource: &dyn Resource,
    meta: &ProviderMeta,
    operation: Operation,
    mut data: ResourceData,
) -> Result<ExitCode> {
    let diagnostics = match operation {
        Operation::Create => resource.create(&mut data, meta).await,
        Operation::Read => resource.read(&mut data, meta).await,
        Operation::Delete => resource.delete(&mut data, meta).await,
    };
    debug!(?operation, id = ?data.id(), errors = diagnostics.has_error(), "Operation finished");

    // No id means no instance left behind.
    let state = data.id().is_some().then_some(&data);
    print_outcome(state, &diagnostics)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let provider_values = cli.provider_values();
    let provider = Provider::new();
    let resource = provider
        .resource(RESOURCE_FWGROUP)
        .context("firewall group resource is not registered")?;

    let (operation, data) = match cli.command {
        Commands::Schema => {
            let document = serde_json::to_string_pretty(&provider.schema_document())
                .context("failed to encode schema")?;
            println!("{document}");
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Validate(args) => {
            let diagnostics = resource.validate(&ResourceData::new(args.values()));
            return print_outcome(None, &diagnostics);
        }
        Commands::Create(args) => (Operation::Create, ResourceData::new(args.values())),
        Commands::Read(args) => (
            Operation::Read,
            ResourceData::from_state(args.id, args.group.values()),
        ),
        Commands::Delete(args) => (
            Operation::Delete,
            ResourceData::from_state(args.id, args.group.values()),
        ),
    };

    let config = match provider.configure(&provider_values) {
        Ok(config) => config,
        Err(diagnostics) => return print_outcome(None, &diagnostics),
    };
    debug!(server = %config.ssh_host(), port = config.port, "Using management server");
    let meta = ProviderMeta::ssh(config);

    apply(resource.as_ref(), &meta, operation, data).await
}
