//! Schemer
//!
//! Turns designer schemas into ordered migration archives.

use anyhow::Result;
use clap::Parser;
use schemer_cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so preview output stays clean
    let default_level = if cli.global.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    schemer_cli::execute(&cli)
}
