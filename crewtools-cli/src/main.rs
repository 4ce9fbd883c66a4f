// ABOUTME: The `crewtools` command - lists, describes, and invokes tool adapters.
// ABOUTME: Loads `.env`, snapshots the environment once, then dispatches a subcommand.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use crewtools::catalog;
use crewtools::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Agent tool adapters from the command line.
#[derive(Parser)]
#[command(name = "crewtools", version, about = "List, describe, and invoke agent tool adapters")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tools that can be built from the current environment.
    List {
        /// Only show tools whose name matches this glob.
        #[arg(long)]
        filter: Option<String>,
    },

    /// Print a tool's descriptor as JSON.
    Describe { name: String },

    /// Invoke a tool and print its result string.
    Invoke {
        name: String,

        /// Arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,

        /// Use the blocking entry point instead of the async one.
        #[arg(long)]
        blocking: bool,
    },

    /// Export the specs of every buildable tool.
    Specs {
        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show every known adapter and whether this build includes it.
    Integrations,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_tracing("warn");
    let config = ToolConfig::from_env();

    match cli.command {
        Commands::List { filter } => cmd_list(&config, filter.as_deref()).await,
        Commands::Describe { name } => cmd_describe(&config, &name),
        Commands::Invoke {
            name,
            args,
            blocking,
        } => cmd_invoke(&config, &name, &args, blocking).await,
        Commands::Specs { output } => cmd_specs(&config, output).await,
        Commands::Integrations => cmd_integrations(),
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn registry_for(config: &ToolConfig) -> Registry {
    let registry = Registry::new();
    for (name, err) in catalog::register_all(&registry, config).await {
        info!(tool = %name, reason = %err, "tool unavailable");
    }
    registry
}

async fn cmd_list(config: &ToolConfig, filter: Option<&str>) -> Result<()> {
    let registry = registry_for(config).await;
    let names = match filter {
        Some(pattern) => registry.matching(pattern).await?,
        None => registry.list().await,
    };
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn cmd_describe(config: &ToolConfig, name: &str) -> Result<()> {
    let tool = catalog::build(name, config)?;
    println!("{}", serde_json::to_string_pretty(&tool.describe())?);
    Ok(())
}

async fn cmd_invoke(config: &ToolConfig, name: &str, args: &str, blocking: bool) -> Result<()> {
    let params: serde_json::Value =
        serde_json::from_str(args).context("--args must be valid JSON")?;
    if !params.is_object() {
        bail!("--args must be a JSON object");
    }

    let tool = catalog::build(name, config)?;
    let output = if blocking {
        tool.invoke_blocking(params)
    } else {
        tool.invoke(params).await
    };
    println!("{}", output);

    tool.close().await?;
    Ok(())
}

async fn cmd_specs(config: &ToolConfig, output: Option<PathBuf>) -> Result<()> {
    let specs = serde_json::to_string_pretty(&registry_for(config).await.specs().await)?;
    match output {
        Some(path) => {
            std::fs::write(&path, specs)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote tool specs to {}", path.display());
        }
        None => println!("{}", specs),
    }
    Ok(())
}

fn cmd_integrations() -> Result<()> {
    for integration in integrations() {
        let status = if integration.enabled { "enabled" } else { "disabled" };
        println!(
            "{:<20} feature={:<10} {}",
            integration.name, integration.feature, status
        );
    }
    Ok(())
}
