//! locnav CLI - locale-aware documentation navigation resolver.
//!
//! Provides commands for:
//! - `check`: Resolve the site document and report per-locale navigation
//! - `resolve`: Print the resolved navigation model or canonical document

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, ResolveArgs};
use output::Output;

/// locnav - Locale-aware documentation navigation resolver.
#[derive(Parser)]
#[command(name = "locnav", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the site document and summarize its navigation.
    Check(CheckArgs),
    /// Print the resolved navigation model.
    Resolve(ResolveArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Check if verbose flag is set for check command
    let verbose = matches!(&cli.command, Commands::Check(args) if args.verbose);

    // Initialize tracing with appropriate log level
    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(),
        Commands::Resolve(args) => args.execute(),
    };

    if let Err(err) = result {
        output.failure(&err);
        std::process::exit(1);
    }
}
