//! # Schemer CLI
//!
//! Command-line interface for Schemer.
//!
//! ## Commands
//!
//! - `generate` - Generate a migration archive (or directory) from a schema
//! - `validate` - Check a schema without generating anything
//! - `preview` - Print the generated migrations
//! - `inspect` - List the contents of a generated archive
//!

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, GlobalArgs};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the selected command
pub fn execute(cli: &Cli) -> anyhow::Result<()> {
    tracing::debug!(command = ?cli.command, "executing");

    match &cli.command {
        Commands::Generate(args) => commands::generate::execute(args, &cli.global),
        Commands::Validate(args) => commands::validate::execute(args, &cli.global),
        Commands::Preview(args) => commands::preview::execute(args, &cli.global),
        Commands::Inspect(args) => commands::inspect::execute(args, &cli.global),
    }
}
