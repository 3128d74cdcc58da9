//! Developer CLI for toolbox tools.
//!
//! Usage:
//! ```bash
//! toolbox list                                  # List registered tools
//! toolbox describe dropbox.download             # Show tool details and schemas
//! toolbox call dropbox.list_folder '{"path":""}' # Invoke a tool directly
//! toolbox call dropbox.download @input.json     # Read input from a file
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod tools;

#[derive(Debug, Parser)]
#[command(name = "toolbox", author, version, about)]
struct Cli {
    /// Path to `toolbox.toml` (defaults to the usual search path).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory downloaded files are written to, overriding the config file.
    #[arg(long, global = true)]
    staging_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List registered tools
    List(commands::list::ListArgs),

    /// Describe a specific tool
    Describe(commands::describe::DescribeArgs),

    /// Call a tool directly for testing
    Call(commands::call::CallArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new("info").context("failed to parse log directive")?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = tools::build_registry(cli.config.as_deref(), cli.staging_dir.as_deref())?;

    match &cli.command {
        Command::List(args) => commands::list::run(&registry, args),
        Command::Describe(args) => commands::describe::run(&registry, args),
        Command::Call(args) => commands::call::run(&registry, args).await,
    }
}
