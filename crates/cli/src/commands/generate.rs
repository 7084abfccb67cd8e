//! Generate command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use schemer_codegen::{Generator, GeneratorConfig, summarize};

use crate::cli::{GenerateArgs, GlobalArgs};
use crate::commands::common::{load_schema_file, print_warnings, resolve_config};

/// Execute the generate command
pub fn execute(args: &GenerateArgs, global: &GlobalArgs) -> Result<()> {
    let config = apply_flags(resolve_config(global)?, args);
    let schema = load_schema_file(&args.schema)?;
    let generator = Generator::new(config);

    match &args.dir {
        Some(dir) => {
            let output = generator.generate(&schema)?;
            print_warnings(&output.warnings);

            let written = output
                .write_to_disk(dir, generator.config().overwrite)
                .with_context(|| format!("failed to write migrations to {}", dir.display()))?;

            for path in &written {
                println!("  {} {}", "+".green(), path.display());
            }
            println!();
            print!("{}", summarize(&output));
            println!(
                "{} Wrote {} migrations to {}",
                "✓".green().bold(),
                written.len(),
                dir.display().to_string().bold()
            );
        }
        None => {
            let archive = generator.generate_archive(&schema).with_context(|| {
                format!(
                    "failed to generate {}",
                    generator.config().output_path.display()
                )
            })?;
            print_warnings(&archive.warnings);

            println!(
                "{} Generated {} table migrations into {} ({} entries)",
                "✓".green().bold(),
                schema.table_count(),
                archive.path.display().to_string().bold(),
                archive.entries.len()
            );
        }
    }

    Ok(())
}

/// Command-line flags take precedence over the config file
fn apply_flags(mut config: GeneratorConfig, args: &GenerateArgs) -> GeneratorConfig {
    if let Some(output) = &args.output {
        config.output_path = output.clone();
    }
    if let Some(base_time) = args.base_time {
        config.base_time = Some(base_time);
    }
    if let Some(step) = args.step_seconds {
        config.step_seconds = step;
    }
    if args.lenient_fks {
        config.strict_foreign_keys = false;
    }
    if args.overwrite {
        config.overwrite = true;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> GenerateArgs {
        GenerateArgs {
            schema: PathBuf::from("schema.json"),
            output: None,
            dir: None,
            base_time: None,
            step_seconds: None,
            lenient_fks: false,
            overwrite: false,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let config = GeneratorConfig::default().with_step_seconds(30);
        let mut args = args();
        args.output = Some(PathBuf::from("build/out.zip"));
        args.step_seconds = Some(1);
        args.lenient_fks = true;

        let config = apply_flags(config, &args);
        assert_eq!(config.output_path, PathBuf::from("build/out.zip"));
        assert_eq!(config.step_seconds, 1);
        assert!(!config.strict_foreign_keys);
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let config = GeneratorConfig::default()
            .with_step_seconds(30)
            .lenient_foreign_keys();

        let config = apply_flags(config, &args());
        assert_eq!(config.step_seconds, 30);
        assert!(!config.strict_foreign_keys);
        assert_eq!(config.output_path, PathBuf::from("./migrations.zip"));
    }
}
