//! contractloader CLI — fetch and validate contract definitions from the terminal.
//!
//! # Commands
//! ```text
//! contractloader load    --endpoint <template> --name <Contract> [--contract-version <v>] [--json]
//! contractloader resolve --endpoint <template> --name <Contract> [--address <addr>]
//! contractloader parsers
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use contractloader_core::{builtin_parsers, resolve_endpoint_resource, LoadOptions, LoaderSettings};
use contractloader_http::{http_loader, HttpFetcherConfig};

mod logging;

use logging::{init_tracing, parse_component, LogConfig};

#[derive(Parser)]
#[command(
    name = "contractloader",
    about = "Fetch, parse and validate smart-contract definitions",
    version
)]
struct Cli {
    /// Log level: trace | debug | info | warn | error
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Per-crate log level, e.g. `contractloader-core=debug` (repeatable)
    #[arg(long = "log-component", global = true, value_parser = parse_component)]
    log_components: Vec<(String, String)>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a contract definition and print it
    Load {
        #[command(flatten)]
        target: Target,

        /// JSON settings file ({ "endpoint", "parser", "network", "unique_network" })
        #[arg(long)]
        config: Option<PathBuf>,

        /// Endpoint template (overrides the config file)
        #[arg(long)]
        endpoint: Option<String>,

        /// Parser name (overrides the config file)
        #[arg(long)]
        parser: Option<String>,

        /// Network ID to take the deployed address from
        #[arg(long)]
        network: Option<String>,

        /// Fail if the definition is deployed on more than one network
        #[arg(long)]
        unique_network: bool,

        /// Request timeout in milliseconds (default: none)
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the resource a load would fetch, without fetching it
    Resolve {
        #[command(flatten)]
        target: Target,

        /// Endpoint template
        #[arg(long)]
        endpoint: String,
    },

    /// List built-in parsers
    Parsers,
}

#[derive(Args)]
struct Target {
    /// Contract name
    #[arg(long)]
    name: String,

    /// Contract version
    #[arg(long = "contract-version")]
    version: Option<String>,

    /// Deployed contract address
    #[arg(long)]
    address: Option<String>,
}

impl Target {
    fn options(&self) -> LoadOptions {
        LoadOptions {
            version: self.version.clone(),
            address: self.address.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&LogConfig {
        level: cli.log_level.clone(),
        components: cli.log_components.iter().cloned().collect(),
        json: cli.log_json,
    });

    match cli.command {
        Commands::Load {
            target,
            config,
            endpoint,
            parser,
            network,
            unique_network,
            timeout_ms,
            json,
        } => {
            let mut settings = match config {
                Some(path) => read_settings(&path)?,
                None => LoaderSettings::new(String::new()),
            };
            if let Some(endpoint) = endpoint {
                settings.endpoint = endpoint;
            }
            if let Some(parser) = parser {
                settings.parser = serde_json::Value::String(parser);
            }
            if network.is_some() {
                settings.network = network;
            }
            settings.unique_network |= unique_network;
            anyhow::ensure!(
                !settings.endpoint.is_empty(),
                "--endpoint is required (or an \"endpoint\" in --config)"
            );

            cmd_load(settings, &target, timeout_ms.map(Duration::from_millis), json).await
        }
        Commands::Resolve { target, endpoint } => {
            println!(
                "{}",
                resolve_endpoint_resource(&endpoint, &target.name, &target.options())
            );
            Ok(())
        }
        Commands::Parsers => {
            println!("Built-in parsers:\n");
            for (name, description) in builtin_parsers() {
                println!("  {name:<10}{description}");
            }
            Ok(())
        }
    }
}

fn read_settings(path: &Path) -> Result<LoaderSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    LoaderSettings::from_json(&content)
        .with_context(|| format!("invalid config {}", path.display()))
}

async fn cmd_load(
    settings: LoaderSettings,
    target: &Target,
    request_timeout: Option<Duration>,
    as_json: bool,
) -> Result<()> {
    let http = HttpFetcherConfig {
        request_timeout,
        ..HttpFetcherConfig::default()
    };
    let loader = http_loader(settings.into_config()?, http)?;
    let definition = loader.load(&target.name, &target.options()).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&definition)?);
        return Ok(());
    }

    let address = if definition.has_address() {
        definition.address()
    } else {
        "(none)"
    };
    println!("Contract:  {}", target.name);
    println!("  Address:   {address}");
    println!("  ABI items: {}", definition.abi().len());
    match definition.bytecode_bytes() {
        Ok(code) => println!("  Bytecode:  {} bytes", code.len()),
        Err(_) => println!("  Bytecode:  {} hex chars (not valid hex)", definition.bytecode().len()),
    }
    if let Ok(abi) = definition.json_abi() {
        let mut functions: Vec<_> = abi.functions().map(|f| f.signature()).collect();
        functions.sort();
        for signature in functions {
            println!("    fn {signature}");
        }
    }
    Ok(())
}
