//! Preview command implementation

use anyhow::{Result, bail};
use colored::Colorize;
use schemer_codegen::{GeneratedFile, Generator, summarize};

use crate::cli::{GlobalArgs, PreviewArgs};
use crate::commands::common::{load_schema_file, print_warnings, resolve_config};

/// Execute the preview command
pub fn execute(args: &PreviewArgs, global: &GlobalArgs) -> Result<()> {
    let mut config = resolve_config(global)?;
    if let Some(base_time) = args.base_time {
        config.base_time = Some(base_time);
    }
    if args.lenient_fks {
        config.strict_foreign_keys = false;
    }

    let schema = load_schema_file(&args.schema)?;
    let output = Generator::new(config).generate(&schema)?;
    print_warnings(&output.warnings);

    if let Some(pattern) = &args.file {
        let Some(file) = find_file(&output.files, pattern) else {
            bail!("no generated file matches '{}'", pattern);
        };
        print!("{}", file.content);
        return Ok(());
    }

    for file in &output.files {
        println!("{}", format!("==> {} <==", file.path).cyan().bold());
        println!("{}", file.content);
    }
    print!("{}", summarize(&output));

    Ok(())
}

fn find_file<'a>(files: &'a [GeneratedFile], pattern: &str) -> Option<&'a GeneratedFile> {
    files.iter().find(|f| f.path.contains(pattern))
}
