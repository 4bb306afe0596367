//! safpack CLI - Simple Archive Format package builder.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "safpack CLI starting");

    let result = match cli.command {
        Commands::Verify {
            table,
            source,
            options,
        } => commands::verify::run(table, source, options, cli.verbose),

        Commands::Process {
            table,
            source,
            output,
            zip,
            options,
        } => commands::process::run(table, source, output, zip, options, cli.verbose),

        Commands::Manifest { source, output } => commands::manifest::run(source, output, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
