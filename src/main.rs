// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use crdform::constants::{ENV_CONTEXT, ENV_CRD_DIRS, ENV_FIELD_MANAGER, ENV_KUBECONFIG};
use crdform::diagnostics::Diagnostics;
use crdform::framework::{
    CreateRequest, DataSource, DataSourceReadRequest, DeleteRequest, ImportStateRequest, Provider,
    ReadRequest, Resource, UpdateRequest,
};
use crdform::provider::{CrdProvider, ProviderConfig};
use crdform::registry::Registry;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Manage Kubernetes custom resources from declarative documents.
#[derive(Parser, Debug)]
#[command(name = "crdform", version, about)]
struct Cli {
    #[command(flatten)]
    provider: ProviderArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct ProviderArgs {
    /// Provider configuration document (YAML or JSON)
    #[arg(long, global = true)]
    provider_config: Option<PathBuf>,

    /// Path to the kubeconfig file
    #[arg(long, global = true, env = ENV_KUBECONFIG)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context
    #[arg(long, global = true, env = ENV_CONTEXT)]
    context: Option<String>,

    /// Default field manager for server-side apply
    #[arg(long, global = true, env = ENV_FIELD_MANAGER)]
    field_manager: Option<String>,

    /// Directories of CRD YAML files to expose
    #[arg(long = "crd-dir", global = true, env = ENV_CRD_DIRS, value_delimiter = ':')]
    crd_dirs: Vec<PathBuf>,

    /// Seconds to wait for `wait_for` conditions
    #[arg(long, global = true)]
    wait_timeout: Option<u64>,

    /// Seconds to wait for deleted objects to disappear
    #[arg(long, global = true)]
    delete_timeout: Option<u64>,

    /// Seconds between GET polls while waiting
    #[arg(long, global = true)]
    poll_interval: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List resource and data source types
    Types,
    /// Print the schema of a resource or data source type as JSON
    Schema {
        type_name: String,
    },
    /// Render a manifest data source config as YAML
    Manifest {
        type_name: String,
        /// Config document
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Create or update an object from a config document
    Apply {
        type_name: String,
        #[arg(short, long)]
        file: PathBuf,
        /// State file, read when present and rewritten afterwards
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Refresh a state file from the cluster
    Read {
        type_name: String,
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Delete the object recorded in a state file
    Destroy {
        type_name: String,
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Import an existing object (`namespace/name` or `name`) into a state file
    Import {
        type_name: String,
        id: String,
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Read an existing object through the lookup data source
    Get {
        type_name: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("crdform")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

fn init_logging() {
    // RUST_LOG selects the level (default info), RUST_LOG_FORMAT=json|text the format.
    // Logs go to stderr; stdout carries documents.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(cli: Cli) -> Result<()> {
    init_logging();
    debug!("Logging initialized");

    match cli.command {
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "crdform", &mut std::io::stdout());
            Ok(())
        }
        Command::Types => {
            let provider = offline_provider(&cli.provider)?;
            for resource in provider.resources() {
                println!("resource     {}", resource.type_name());
            }
            for data_source in provider.data_sources() {
                println!("data source  {}", data_source.type_name());
            }
            Ok(())
        }
        Command::Schema { type_name } => {
            let provider = offline_provider(&cli.provider)?;
            let schema = match provider.resource(&type_name) {
                Some(resource) => resource.schema(),
                None => data_source(&provider, &type_name)?.schema(),
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        Command::Manifest { type_name, file } => {
            let provider = offline_provider(&cli.provider)?;
            let manifest = data_source(&provider, &type_name)?;
            let response = manifest
                .read(DataSourceReadRequest {
                    config: read_document(&file)?,
                })
                .await;
            report(&response.diagnostics)?;
            if let Some(yaml) = response
                .state
                .as_ref()
                .and_then(|s| s.get("yaml"))
                .and_then(Value::as_str)
            {
                print!("{yaml}");
            }
            Ok(())
        }
        Command::Get { type_name, file } => {
            let provider = connected_provider(&cli.provider).await?;
            let lookup = data_source(&provider, &type_name)?;
            let response = lookup
                .read(DataSourceReadRequest {
                    config: read_document(&file)?,
                })
                .await;
            report(&response.diagnostics)?;
            if let Some(state) = response.state {
                println!("{}", serde_json::to_string_pretty(&state)?);
            }
            Ok(())
        }
        Command::Apply {
            type_name,
            file,
            state,
        } => {
            let provider = connected_provider(&cli.provider).await?;
            let resource = resource(&provider, &type_name)?;
            apply(resource, &file, &state).await
        }
        Command::Read { type_name, state } => {
            let provider = connected_provider(&cli.provider).await?;
            let resource = resource(&provider, &type_name)?;
            let response = resource
                .read(ReadRequest {
                    state: read_document(&state)?,
                })
                .await;
            write_state(&state, response.state.as_ref())?;
            report(&response.diagnostics)
        }
        Command::Destroy { type_name, state } => {
            let provider = connected_provider(&cli.provider).await?;
            let resource = resource(&provider, &type_name)?;
            let diagnostics = resource
                .delete(DeleteRequest {
                    state: read_document(&state)?,
                })
                .await;
            report(&diagnostics)?;
            write_state(&state, None)
        }
        Command::Import {
            type_name,
            id,
            state,
        } => {
            if state.exists() {
                bail!(
                    "State file {} already exists; refusing to overwrite it",
                    state.display()
                );
            }
            let provider = connected_provider(&cli.provider).await?;
            let resource = resource(&provider, &type_name)?;
            let response = resource.import_state(ImportStateRequest { id }).await;
            report(&response.diagnostics)?;
            write_state(&state, response.state.as_ref())
        }
    }
}

/// Create, update, or replace depending on the state file.
async fn apply(resource: Arc<dyn Resource>, file: &Path, state_path: &Path) -> Result<()> {
    let plan = read_document(file)?;
    report(&resource.validate_config(&plan))?;

    let prior = if state_path.exists() {
        Some(read_document(state_path)?)
    } else {
        None
    };

    let response = match prior {
        None => resource.create(CreateRequest { plan }).await,
        Some(state) => {
            let replace = resource.requires_replace(&plan, &state);
            if replace.is_empty() {
                resource.update(UpdateRequest { plan, state }).await
            } else {
                let paths: Vec<String> = replace.iter().map(ToString::to_string).collect();
                info!("Replacing {} ({} changed)", resource.type_name(), paths.join(", "));
                report(&resource.delete(DeleteRequest { state }).await)?;
                write_state(state_path, None)?;
                resource.create(CreateRequest { plan }).await
            }
        }
    };

    if response.state.is_some() {
        write_state(state_path, response.state.as_ref())?;
    }
    report(&response.diagnostics)
}

fn provider_config(args: &ProviderArgs) -> Result<ProviderConfig> {
    let mut config = match &args.provider_config {
        Some(path) => ProviderConfig::from_document(&read_document(path)?)?,
        None => ProviderConfig::default(),
    };
    if args.kubeconfig.is_some() {
        config.kubeconfig.clone_from(&args.kubeconfig);
    }
    if args.context.is_some() {
        config.context.clone_from(&args.context);
    }
    if args.field_manager.is_some() {
        config.field_manager.clone_from(&args.field_manager);
    }
    if args.wait_timeout.is_some() {
        config.wait_timeout = args.wait_timeout;
    }
    if args.delete_timeout.is_some() {
        config.delete_timeout = args.delete_timeout;
    }
    if args.poll_interval.is_some() {
        config.poll_interval = args.poll_interval;
    }
    config.crd_dirs.extend(args.crd_dirs.iter().cloned());
    Ok(config)
}

/// Provider for commands that never reach the cluster.
fn offline_provider(args: &ProviderArgs) -> Result<CrdProvider> {
    let config = provider_config(args)?.with_env_fallbacks();
    let mut registry = Registry::builtin()?;
    for dir in &config.crd_dirs {
        registry = registry.with_crd_dir(dir)?;
    }
    Ok(CrdProvider::new(registry))
}

async fn connected_provider(args: &ProviderArgs) -> Result<CrdProvider> {
    let config = provider_config(args)?;
    let mut provider = CrdProvider::new(Registry::builtin()?);
    report(&provider.configure(&serde_json::to_value(&config)?).await)?;
    Ok(provider)
}

fn resource(provider: &CrdProvider, type_name: &str) -> Result<Arc<dyn Resource>> {
    provider
        .resource(type_name)
        .with_context(|| format!("Unknown resource type '{type_name}' (see `crdform types`)"))
}

fn data_source(provider: &CrdProvider, type_name: &str) -> Result<Arc<dyn DataSource>> {
    provider
        .data_source(type_name)
        .with_context(|| format!("Unknown data source type '{type_name}' (see `crdform types`)"))
}

/// Read a YAML or JSON document.
fn read_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write state as JSON, or remove the file when the object is gone.
fn write_state(path: &Path, state: Option<&Value>) -> Result<()> {
    match state {
        Some(state) => {
            std::fs::write(path, serde_json::to_string_pretty(state)? + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            debug!("Wrote state to {}", path.display());
        }
        None if path.exists() => {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            warn!("Removed state file {}", path.display());
        }
        None => {}
    }
    Ok(())
}

/// Print diagnostics to stderr and fail when any is an error.
fn report(diagnostics: &Diagnostics) -> Result<()> {
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
    let errors = diagnostics.errors().count();
    if errors > 0 {
        bail!("{errors} error(s) reported");
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod main_tests;
