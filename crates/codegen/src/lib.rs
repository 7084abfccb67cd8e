//! # Schemer Codegen
//!
//! Migration generation engine for Schemer.
//!
//! This crate turns a designer [`Schema`](schemer_ir::Schema) into ordered
//! migration files and packs them, together with a snapshot of the schema,
//! into one zip archive.
//!
//! ## Features
//!
//! - **Column statements**: one schema-builder call per column, modifiers in
//!   a fixed order
//! - **Foreign keys**: collected across tables and emitted last, with a
//!   mirrored revert block
//! - **Ordering**: collision-free timestamp keys for every file
//! - **Stubs**: migration templates with validated named slots
//! - **Archive**: lazily opened, atomically finalized zip output
//!

// ============================================================================
// Modules
// ============================================================================

pub mod archive;
pub mod config;
pub mod generator;
pub mod migrations;
pub mod sequencer;

// ============================================================================
// Re-exports
// ============================================================================

pub use archive::ArchiveWriter;
pub use config::ConfigFile;
pub use generator::{
    GeneratedArchive, GenerationSummary, Generator, generate, generate_archive, summarize,
};
pub use sequencer::TimestampSequencer;

use chrono::NaiveDateTime;
use schemer_core::{EngineError, EngineResult};
use std::path::{Path, PathBuf};

// ============================================================================
// GeneratorConfig
// ============================================================================

/// Configuration for the migration generator
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Archive written by [`Generator::generate_archive`]
    pub output_path: PathBuf,

    /// First timestamp key; the current UTC time when unset
    pub base_time: Option<NaiveDateTime>,

    /// Seconds between consecutive timestamp keys
    pub step_seconds: i64,

    /// Reject foreign keys that point at missing tables or columns
    pub strict_foreign_keys: bool,

    /// Extension of generated migration files
    pub extension: String,

    /// Descriptive name of the foreign key migration
    pub relations_name: String,

    /// Whether to overwrite existing files when writing to a directory
    pub overwrite: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("./migrations.zip"),
            base_time: None,
            step_seconds: sequencer::DEFAULT_STEP_SECONDS,
            strict_foreign_keys: true,
            extension: "php".to_string(),
            relations_name: "foreign_keys".to_string(),
            overwrite: false,
        }
    }
}

impl GeneratorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the archive path
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Pin the first timestamp key
    pub fn with_base_time(mut self, base: NaiveDateTime) -> Self {
        self.base_time = Some(base);
        self
    }

    /// Set the distance between timestamp keys
    pub fn with_step_seconds(mut self, seconds: i64) -> Self {
        self.step_seconds = seconds;
        self
    }

    /// Pass unresolved foreign keys through with a warning
    pub fn lenient_foreign_keys(mut self) -> Self {
        self.strict_foreign_keys = false;
        self
    }

    /// Allow overwriting existing files
    pub fn allow_overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    /// Check the configuration before a run
    pub fn validate(&self) -> EngineResult<()> {
        if self.extension.is_empty() || self.extension.contains(['.', '/', '\\']) {
            return Err(EngineError::InvalidConfig(format!(
                "invalid file extension '{}'",
                self.extension
            )));
        }

        if !schemer_core::is_identifier(&self.relations_name) {
            return Err(EngineError::InvalidConfig(format!(
                "relations name '{}' is not a valid identifier",
                self.relations_name
            )));
        }

        if self.step_seconds < 1 {
            return Err(EngineError::InvalidConfig(format!(
                "step_seconds must be at least 1, got {}",
                self.step_seconds
            )));
        }

        Ok(())
    }
}

// ============================================================================
// GeneratedFile
// ============================================================================

/// A single generated artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Entry name inside the archive
    pub path: String,

    /// File content
    pub content: String,

    /// What the file holds
    pub kind: ArtifactKind,
}

impl GeneratedFile {
    /// Create a new generated file
    pub fn new(path: impl Into<String>, content: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            kind,
        }
    }

    /// Create a table migration
    pub fn table_migration(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(path, content, ArtifactKind::TableMigration)
    }

    /// Create the foreign key migration
    pub fn relations(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(path, content, ArtifactKind::Relations)
    }

    /// Create the schema snapshot entry
    pub fn schema_snapshot(content: impl Into<String>) -> Self {
        Self::new(
            schemer_ir::SCHEMA_ENTRY,
            content,
            ArtifactKind::SchemaSnapshot,
        )
    }

    /// Timestamp key prefix of a migration file name
    pub fn key(&self) -> Option<&str> {
        self.path.find("_create_").map(|i| &self.path[..i])
    }

    /// File name without its timestamp key, e.g. `_create_users_table.php`
    pub fn descriptive_suffix(&self) -> Option<&str> {
        self.path.find("_create_").map(|i| &self.path[i..])
    }
}

/// Kind of generated artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    TableMigration,
    Relations,
    SchemaSnapshot,
}

// ============================================================================
// ArtifactSink
// ============================================================================

/// Destination for artifacts as the generator produces them
pub trait ArtifactSink {
    /// Take one artifact
    fn accept(&mut self, file: &GeneratedFile) -> EngineResult<()>;
}

// ============================================================================
// GeneratedMigrations
// ============================================================================

/// All artifacts of one run, kept in memory
#[derive(Debug, Clone, Default)]
pub struct GeneratedMigrations {
    /// Files in generation order
    pub files: Vec<GeneratedFile>,

    /// Warnings raised during generation
    pub warnings: Vec<String>,
}

impl GeneratedMigrations {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file
    pub fn add_file(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Get the number of files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get files by kind
    pub fn files_by_kind(&self, kind: ArtifactKind) -> Vec<&GeneratedFile> {
        self.files.iter().filter(|f| f.kind == kind).collect()
    }

    /// The foreign key migration, if one was generated
    pub fn relations(&self) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.kind == ArtifactKind::Relations)
    }

    /// The schema snapshot
    pub fn snapshot(&self) -> Option<&GeneratedFile> {
        self.files
            .iter()
            .find(|f| f.kind == ArtifactKind::SchemaSnapshot)
    }

    /// Write the migration files into a migrations directory.
    ///
    /// The schema snapshot only belongs in the archive and is not written.
    /// Unless `overwrite` is set, a migration whose name (ignoring its
    /// timestamp key) already exists in the directory is refused before
    /// anything is written.
    pub fn write_to_disk(&self, dir: impl AsRef<Path>, overwrite: bool) -> EngineResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let migrations: Vec<&GeneratedFile> = self
            .files
            .iter()
            .filter(|f| f.kind != ArtifactKind::SchemaSnapshot)
            .collect();

        if !overwrite && dir.exists() {
            for existing in walkdir::WalkDir::new(dir).max_depth(1) {
                let existing = existing.map_err(|e| EngineError::FileRead {
                    path: dir.to_path_buf(),
                    message: e.to_string(),
                })?;
                let name = existing.file_name().to_string_lossy();

                if let Some(clash) = migrations
                    .iter()
                    .find(|f| f.descriptive_suffix().is_some_and(|s| name.ends_with(s)))
                {
                    return Err(EngineError::duplicate(
                        &clash.path,
                        format!("migration '{}' already exists in {}", name, dir.display()),
                    ));
                }
            }
        }

        std::fs::create_dir_all(dir).map_err(|e| EngineError::FileWrite {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut written = Vec::with_capacity(migrations.len());
        for file in migrations {
            let full_path = dir.join(&file.path);
            std::fs::write(&full_path, &file.content).map_err(|e| EngineError::FileWrite {
                path: full_path.clone(),
                message: e.to_string(),
            })?;
            written.push(full_path);
        }

        tracing::info!(dir = %dir.display(), files = written.len(), "migrations written to disk");

        Ok(written)
    }
}

impl ArtifactSink for GeneratedMigrations {
    fn accept(&mut self, file: &GeneratedFile) -> EngineResult<()> {
        if self.files.iter().any(|f| f.path == file.path) {
            return Err(EngineError::duplicate(
                &file.path,
                "a file with this name was already generated",
            ));
        }
        self.add_file(file.clone());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
