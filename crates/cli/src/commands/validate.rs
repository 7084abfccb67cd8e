//! Validate command implementation

use anyhow::Result;
use colored::Colorize;
use schemer_codegen::Generator;

use crate::cli::{GlobalArgs, ValidateArgs};
use crate::commands::common::{load_schema_file, print_warnings, resolve_config};

/// Execute the validate command
pub fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let mut config = resolve_config(global)?;
    if args.lenient_fks {
        config.strict_foreign_keys = false;
    }

    let schema = load_schema_file(&args.schema)?;
    let warnings = Generator::new(config).check(&schema)?;
    print_warnings(&warnings);

    println!(
        "{} {} is valid ({} tables, {} foreign keys)",
        "✓".green().bold(),
        args.schema.display(),
        schema.table_count(),
        schema.relation_count()
    );

    Ok(())
}
