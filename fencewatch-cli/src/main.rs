//! Fencewatch CLI - fence proximity monitoring from the terminal.
//!
//! Wires the monitoring engine to file-based stand-ins for its external
//! collaborators: fences come from JSON descriptions, fixes from NDJSON
//! streams, and sampling/notification activity is written to the terminal.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use error::CliError;

#[derive(Debug, Parser)]
#[command(
    name = "fencewatch",
    version,
    about = "Fence proximity monitoring with adaptive location sampling"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify a single point against a fence
    Check(commands::check::CheckArgs),
    /// Replay an ordered fix stream through a fence monitor
    Replay(commands::replay::ReplayArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Command::Check(args) => commands::check::run(args),
        Command::Replay(args) => commands::replay::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
