//! lode - runtime manager for pluggable stream-mining algorithms.
//!
//! This is the main entry point for the lode daemon. It provides commands
//! for:
//!
//! - Running the HTTP control plane (`lode serve`)
//! - Inspecting the registered miner catalog (`lode miners`)
//!
//! See `lode --help` for full usage information.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use lode::config::ServerConfig;
use lode::logging::init_logging;
use lode::miner::builtin;
use lode::server;

#[derive(Parser)]
#[command(name = "lode")]
#[command(version)]
#[command(about = "lode - manage live miner instances over an HTTP control plane")]
#[command(
    long_about = "Runtime manager for pluggable stream-mining algorithms.\n\nA miner attaches to an event stream and continuously maintains an analysis\nresult; lode creates, starts, stops, and deletes miner instances and serves\ntheir computed views."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP control plane
    ///
    /// Serves the instance lifecycle API. All instance state is in-memory
    /// and lost on restart.
    ///
    /// Examples:
    ///   lode serve                      # Defaults from ./lode.toml if present
    ///   lode serve --port 9090          # Override the configured port
    ///   lode serve --config /etc/lode.toml
    Serve {
        /// Port for the HTTP API (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
        /// Path to the configuration file (default: ./lode.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List registered miner types
    ///
    /// Prints every type in the built-in catalog with its declared
    /// parameters.
    Miners,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, config } => {
            let mut config = ServerConfig::load(config.as_deref())?;
            if let Some(port) = port {
                config.server.port = port;
            }

            init_logging(&config.log_config()?);

            server::serve(&config, builtin::catalog()).await?;
        },
        Commands::Miners => {
            for descriptor in builtin::catalog().list() {
                println!("{:<12} {}", descriptor.id, descriptor.description);
                for param in &descriptor.parameters {
                    let requirement = if param.required { "required" } else { "optional" };
                    println!("    {:<20} {} ({requirement})", param.name, param.kind.as_str());
                }
            }
        },
    }

    Ok(())
}
