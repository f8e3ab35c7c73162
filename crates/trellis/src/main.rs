//! Trellis MCP server
//!
//! Main entry point. Lets an MCP host (e.g. a desktop assistant) build
//! one Trellis workflow through six tools, speaking MCP over stdio.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use trellis_config::TrellisConfig;

mod commands;
mod logging;

use commands::{check, serve, tools};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Trellis MCP server - build Trellis workflows from an MCP host
#[derive(Parser)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory for server.log (default: ~/.trellis_mcp)
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, global = true, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve MCP over stdin/stdout (default)
    Serve(serve::ServeArgs),

    /// Validate configuration and print the resolved scope
    Check(check::CheckArgs),

    /// Print the tool definitions as JSON
    Tools(tools::ToolsArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to load env file {}", path.display()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    let _guard = logging::init(cli.verbose, cli.log_dir.as_deref())?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Trellis MCP server starting");

    let config = TrellisConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "configuration error");
    })?;

    let ctx = commands::Context { config };

    match cli.command {
        None => serve::run(serve::ServeArgs::default(), &ctx).await,
        Some(Commands::Serve(args)) => serve::run(args, &ctx).await,
        Some(Commands::Check(args)) => check::run(args, &ctx),
        Some(Commands::Tools(args)) => tools::run(args, &ctx),
    }
}
