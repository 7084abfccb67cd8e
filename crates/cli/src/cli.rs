//! CLI argument definitions using clap derive API

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Schemer - turns designer schemas into ordered migration archives
#[derive(Parser, Debug)]
#[command(name = "schemer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments available to all commands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./schemer.toml when present)
    #[arg(short, long, global = true, env = "SCHEMER_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate migrations from a schema file
    Generate(GenerateArgs),

    /// Check a schema file without generating anything
    Validate(ValidateArgs),

    /// Print the generated migrations without writing them
    Preview(PreviewArgs),

    /// List the contents of a generated archive
    Inspect(InspectArgs),
}

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Schema JSON file
    pub schema: PathBuf,

    /// Archive to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write migration files into this directory instead of an archive
    #[arg(long, conflicts_with = "output")]
    pub dir: Option<PathBuf>,

    /// First timestamp key, e.g. 2024-01-01T09:00:00
    #[arg(long)]
    pub base_time: Option<NaiveDateTime>,

    /// Seconds between consecutive timestamp keys
    #[arg(long)]
    pub step_seconds: Option<i64>,

    /// Warn about unresolved foreign keys instead of failing
    #[arg(long)]
    pub lenient_fks: bool,

    /// Replace existing migrations in the target directory
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema JSON file
    pub schema: PathBuf,

    /// Warn about unresolved foreign keys instead of failing
    #[arg(long)]
    pub lenient_fks: bool,
}

/// Arguments for the preview command
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Schema JSON file
    pub schema: PathBuf,

    /// First timestamp key, e.g. 2024-01-01T09:00:00
    #[arg(long)]
    pub base_time: Option<NaiveDateTime>,

    /// Print only the file whose name contains this text
    #[arg(short, long)]
    pub file: Option<String>,

    /// Warn about unresolved foreign keys instead of failing
    #[arg(long)]
    pub lenient_fks: bool,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Archive produced by `generate`
    pub archive: PathBuf,

    /// Print the embedded schema snapshot
    #[arg(long)]
    pub schema: bool,
}

// ============================================================================
// Tests
// ============================================================================
