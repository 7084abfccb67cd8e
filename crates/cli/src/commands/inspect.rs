//! Inspect command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs::File;

use crate::cli::{GlobalArgs, InspectArgs};
use crate::commands::common::format_size;

/// Execute the inspect command
pub fn execute(args: &InspectArgs, _global: &GlobalArgs) -> Result<()> {
    let path = &args.archive;
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("{} is not a zip archive", path.display()))?;

    println!("{}", path.display().to_string().bold());
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        println!("  {:<60} {:>10}", entry.name(), format_size(entry.size()));
    }

    let schema = schemer_ir::load_schema_from_archive(path)
        .with_context(|| format!("failed to read schema snapshot from {}", path.display()))?;

    println!();
    println!(
        "{} entries, {} tables, {} foreign keys",
        archive.len(),
        schema.table_count(),
        schema.relation_count()
    );

    if args.schema {
        println!();
        println!("{}", schemer_ir::schema_snapshot(&schema)?);
    }

    Ok(())
}
