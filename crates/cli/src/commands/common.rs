//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use colored::Colorize;
use schemer_codegen::config::CONFIG_FILE_NAME;
use schemer_codegen::{ConfigFile, GeneratorConfig};
use schemer_ir::Schema;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Build the generator configuration from defaults and the config file.
///
/// An explicit `--config` must exist; the default `schemer.toml` is optional.
pub(crate) fn resolve_config(global: &GlobalArgs) -> Result<GeneratorConfig> {
    let file = match &global.config {
        Some(path) => Some(
            ConfigFile::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
        ),
        None => ConfigFile::load_optional(CONFIG_FILE_NAME)
            .with_context(|| format!("failed to load {}", CONFIG_FILE_NAME))?,
    };

    let config = match file {
        Some(file) => file.apply(GeneratorConfig::default()),
        None => GeneratorConfig::default(),
    };

    tracing::debug!(?config, "resolved generator config");
    Ok(config)
}

/// Read and parse a schema file
pub(crate) fn load_schema_file(path: &Path) -> Result<Schema> {
    schemer_ir::load_schema(path)
        .with_context(|| format!("failed to load schema from {}", path.display()))
}

/// Print warnings to stderr
pub(crate) fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
}

/// Format a byte count for display
pub(crate) fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}
