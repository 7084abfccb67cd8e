//! # Generator
//!
//! The `Generator` is the top-level entry point. It takes a [`Schema`] and a
//! [`GeneratorConfig`] and runs one single pass over it.
//!
//! ## Pipeline
//!
//! ```text
//! Schema + GeneratorConfig
//!         │
//!         ▼
//!   validate (schema + artifact names)        Idle
//!         │
//!         ├──► per table: column statements   Processing
//!         │      + relation discovery
//!         │      + timestamps / soft deletes
//!         │      → table migration
//!         │
//!         ├──► foreign key migration          AggregatingRelations
//!         │      (only when relations exist)
//!         │
//!         ├──► schema.json snapshot           Finalizing
//!         ▼
//!   archive closed                            Closed
//! ```
//!
//! Every run gets its own timestamp sequencer and, for archive output, its
//! own archive writer. Validation happens before the first artifact is
//! produced, so rejected schemas never touch the disk.

use std::collections::HashMap;
use std::path::PathBuf;

use schemer_core::{EngineError, EngineResult};
use schemer_ir::{Schema, ValidationOptions, schema_snapshot, validate_schema};

use crate::archive::ArchiveWriter;
use crate::migrations::{
    MigrationAssembler, RelationSet, SOFT_DELETES_STATEMENT, TIMESTAMPS_STATEMENT,
    build_column_statement, build_relation_blocks, class_name, indent_statements,
};
use crate::sequencer::TimestampSequencer;
use crate::{ArtifactKind, ArtifactSink, GeneratedFile, GeneratedMigrations, GeneratorConfig};

// ============================================================================
// Run stages
// ============================================================================

/// Stages of one generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    Processing,
    AggregatingRelations,
    Finalizing,
    Closed,
}

impl Stage {
    fn can_advance_to(self, next: Stage) -> bool {
        matches!(
            (self, next),
            (Stage::Idle, Stage::Processing)
                | (Stage::Processing, Stage::AggregatingRelations)
                | (Stage::AggregatingRelations, Stage::Finalizing)
                | (Stage::Finalizing, Stage::Closed)
        )
    }
}

/// State of one run: its stage, stubs and key sequence
struct Run<'a> {
    stage: Stage,
    schema: &'a Schema,
    config: &'a GeneratorConfig,
    assembler: MigrationAssembler,
    sequencer: TimestampSequencer,
}

impl<'a> Run<'a> {
    fn new(schema: &'a Schema, config: &'a GeneratorConfig) -> EngineResult<Self> {
        let sequencer = match config.base_time {
            Some(base) => TimestampSequencer::new(base, config.step_seconds)?,
            None => TimestampSequencer::starting_now(config.step_seconds)?,
        };

        Ok(Self {
            stage: Stage::Idle,
            schema,
            config,
            assembler: MigrationAssembler::new(&config.extension)?,
            sequencer,
        })
    }

    fn advance(&mut self, next: Stage) -> EngineResult<()> {
        if !self.stage.can_advance_to(next) {
            return Err(EngineError::internal(format!(
                "illegal stage transition {:?} -> {:?}",
                self.stage, next
            )));
        }
        tracing::debug!(from = ?self.stage, to = ?next, "generation stage");
        self.stage = next;
        Ok(())
    }

    /// Emit one migration per table, returning the relations discovered
    fn process_tables(&mut self, sink: &mut dyn ArtifactSink) -> EngineResult<RelationSet> {
        self.advance(Stage::Processing)?;

        let schema = self.schema;
        let mut relations = RelationSet::new();

        for table in &schema.tables {
            let columns = schema.columns_for(table)?;

            let mut statements: Vec<String> = columns.iter().map(build_column_statement).collect();
            relations = relations.collect_table(table, columns);

            if table.time_stamp {
                statements.push(TIMESTAMPS_STATEMENT.to_string());
            }
            if table.soft_delete {
                statements.push(SOFT_DELETES_STATEMENT.to_string());
            }

            let key = self.sequencer.next_key()?;
            let file =
                self.assembler
                    .assemble_table(&key, &table.name, &indent_statements(&statements))?;
            sink.accept(&file)?;
        }

        Ok(relations)
    }

    /// Emit the foreign key migration, if any relation was found
    fn process_relations(
        &mut self,
        relations: &RelationSet,
        sink: &mut dyn ArtifactSink,
    ) -> EngineResult<()> {
        self.advance(Stage::AggregatingRelations)?;

        let Some(blocks) = build_relation_blocks(relations) else {
            tracing::debug!("no foreign keys discovered, skipping relations migration");
            return Ok(());
        };

        let key = self.sequencer.next_key()?;
        let file = self
            .assembler
            .assemble_relations(&key, &self.config.relations_name, &blocks)?;
        sink.accept(&file)
    }

    /// Emit the schema snapshot
    fn finalize(&mut self, sink: &mut dyn ArtifactSink) -> EngineResult<()> {
        self.advance(Stage::Finalizing)?;
        let snapshot = schema_snapshot(self.schema)?;
        sink.accept(&GeneratedFile::schema_snapshot(snapshot))
    }

    fn close(&mut self) -> EngineResult<()> {
        self.advance(Stage::Closed)
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Top-level migration generator.
///
/// The generator itself only holds configuration; all per-run state lives
/// inside [`generate`](Generator::generate) and
/// [`generate_archive`](Generator::generate_archive), so one generator can
/// serve any number of runs.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a new generator with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Create a generator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(GeneratorConfig::default())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Check a schema without generating anything.
    ///
    /// Returns the validation warnings (unresolved foreign keys in lenient
    /// mode).
    pub fn check(&self, schema: &Schema) -> EngineResult<Vec<String>> {
        self.config.validate()?;

        let report = validate_schema(
            schema,
            ValidationOptions {
                strict_foreign_keys: self.config.strict_foreign_keys,
            },
        )?;

        check_artifact_names(schema, &self.config)?;

        Ok(report.warnings)
    }

    /// Run the pipeline and keep every artifact in memory.
    pub fn generate(&self, schema: &Schema) -> EngineResult<GeneratedMigrations> {
        let warnings = self.check(schema)?;

        let mut output = GeneratedMigrations::new();
        for warning in warnings {
            output.add_warning(warning);
        }

        self.run(schema, &mut output)?;

        tracing::info!(
            tables = schema.table_count(),
            files = output.file_count(),
            warnings = output.warnings.len(),
            "migration generation complete",
        );

        Ok(output)
    }

    /// Run the pipeline into a fresh archive at the configured output path
    /// and close it.
    ///
    /// On error nothing is left at the output path.
    pub fn generate_archive(&self, schema: &Schema) -> EngineResult<GeneratedArchive> {
        let warnings = self.check(schema)?;

        let mut archive = ArchiveWriter::new(&self.config.output_path);
        self.run(schema, &mut archive)?;
        let path = archive.close()?;

        tracing::info!(
            tables = schema.table_count(),
            entries = archive.entries().len(),
            archive = %path.display(),
            "migration archive complete",
        );

        Ok(GeneratedArchive {
            path,
            entries: archive.entries().to_vec(),
            warnings,
        })
    }

    fn run(&self, schema: &Schema, sink: &mut dyn ArtifactSink) -> EngineResult<()> {
        let mut run = Run::new(schema, &self.config)?;

        let relations = run.process_tables(sink)?;
        run.process_relations(&relations, sink)?;
        run.finalize(sink)?;
        run.close()
    }
}

/// Reject schemas whose tables would produce the same migration class.
///
/// Runs before generation, so a conflict aborts with nothing written.
fn check_artifact_names(schema: &Schema, config: &GeneratorConfig) -> EngineResult<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();

    let mut names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
    if schema.relation_count() > 0 {
        names.push(&config.relations_name);
    }

    for name in names {
        let class = class_name(name);
        if let Some(previous) = seen.insert(class.clone(), name) {
            return Err(EngineError::duplicate(
                class,
                format!("'{}' and '{}' generate the same migration", previous, name),
            ));
        }
    }

    Ok(())
}

/// A closed archive produced by [`Generator::generate_archive`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArchive {
    /// Where the archive was written
    pub path: PathBuf,

    /// Entry names in write order
    pub entries: Vec<String>,

    /// Validation warnings (unresolved foreign keys in lenient mode)
    pub warnings: Vec<String>,
}

// ============================================================================
// Standalone convenience functions
// ============================================================================

/// Generate in memory using default configuration.
pub fn generate(schema: &Schema) -> EngineResult<GeneratedMigrations> {
    Generator::with_defaults().generate(schema)
}

/// Generate an archive at `output_path` using otherwise default configuration.
pub fn generate_archive(
    schema: &Schema,
    output_path: impl Into<PathBuf>,
) -> EngineResult<GeneratedArchive> {
    let config = GeneratorConfig::new().with_output_path(output_path);
    Generator::new(config).generate_archive(schema)
}

// ============================================================================
// GenerationSummary
// ============================================================================

/// A human-readable summary of a completed in-memory run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Number of table migrations
    pub table_migrations: usize,
    /// Whether a foreign key migration was produced
    pub has_relations: bool,
    /// Total number of artifacts, snapshot included
    pub total_files: usize,
    /// Number of warnings
    pub warning_count: usize,
    /// Total bytes of generated content
    pub total_bytes: usize,
}

impl GenerationSummary {
    /// Build a summary from generated migrations.
    pub fn from_output(output: &GeneratedMigrations) -> Self {
        Self {
            table_migrations: output.files_by_kind(ArtifactKind::TableMigration).len(),
            has_relations: output.relations().is_some(),
            total_files: output.file_count(),
            warning_count: output.warnings.len(),
            total_bytes: output.files.iter().map(|f| f.content.len()).sum(),
        }
    }

    /// Format the summary as a human-readable string.
    pub fn display(&self) -> String {
        let mut out = String::with_capacity(256);

        out.push_str(&format!("Table migrations: {}\n", self.table_migrations));
        out.push_str(&format!(
            "Foreign keys:     {}\n",
            if self.has_relations { "yes" } else { "none" }
        ));
        out.push_str(&format!("Total files:      {}\n", self.total_files));
        out.push_str(&format!("Warnings:         {}\n", self.warning_count));

        let size_str = if self.total_bytes < 1024 {
            format!("{} B", self.total_bytes)
        } else {
            format!("{:.1} KB", self.total_bytes as f64 / 1024.0)
        };
        out.push_str(&format!("Total size:       {}\n", size_str));

        out
    }
}

impl std::fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Produce a [`GenerationSummary`] from [`GeneratedMigrations`].
pub fn summarize(output: &GeneratedMigrations) -> GenerationSummary {
    GenerationSummary::from_output(output)
}

// ============================================================================
// Tests
// ============================================================================
