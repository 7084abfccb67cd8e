//! Error types for Schemer
//!
//! This module provides unified error handling across the generator:
//! malformed schema input, artifact naming conflicts, foreign keys that point
//! nowhere, archive IO failures, and template problems.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Schemer
#[derive(Debug, Error)]
pub enum EngineError {
    // ========================================================================
    // Schema Errors
    // ========================================================================
    /// The schema document is missing required data or has the wrong shape
    #[error("Malformed schema: {0}")]
    MalformedSchema(String),

    /// Two artifacts resolve to the same generated class or file name
    #[error("Duplicate artifact '{name}': {message}")]
    DuplicateArtifact { name: String, message: String },

    /// A foreign key targets a table or column that is not in the schema
    #[error("Unresolved foreign key on '{table}.{column}': {message}")]
    UnresolvedForeignKey {
        table: String,
        column: String,
        message: String,
    },

    // ========================================================================
    // Archive Errors
    // ========================================================================
    /// The archive target could not be created, written or finalized
    #[error("Archive IO error for '{path}': {message}")]
    ArchiveIo { path: PathBuf, message: String },

    /// A write was attempted after the archive was closed
    #[error("Archive already closed: {0}")]
    ArchiveClosed(PathBuf),

    /// Low-level zip container error
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ========================================================================
    // Code Generation Errors
    // ========================================================================
    /// Template rendering failed
    #[error("Template rendering failed for '{template}': {message}")]
    TemplateRender { template: String, message: String },

    /// Failed to write a generated file to a directory
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    // ========================================================================
    // IO / Serialization Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Create a malformed schema error
    pub fn malformed(msg: impl Into<String>) -> Self {
        EngineError::MalformedSchema(msg.into())
    }

    /// Create a duplicate artifact error
    pub fn duplicate(name: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::DuplicateArtifact {
            name: name.into(),
            message: msg.into(),
        }
    }

    /// Create an unresolved foreign key error
    pub fn unresolved_foreign_key(
        table: impl Into<String>,
        column: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        EngineError::UnresolvedForeignKey {
            table: table.into(),
            column: column.into(),
            message: msg.into(),
        }
    }

    /// Create an archive IO error
    pub fn archive_io(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        EngineError::ArchiveIo {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a template rendering error
    pub fn template(template: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::TemplateRender {
            template: template.into(),
            message: msg.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::Internal(msg.into())
    }

    /// Check if this error rejects the input schema itself
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            EngineError::MalformedSchema(_)
                | EngineError::DuplicateArtifact { .. }
                | EngineError::UnresolvedForeignKey { .. }
        )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            EngineError::Io(_)
                | EngineError::ArchiveIo { .. }
                | EngineError::Zip(_)
                | EngineError::FileRead { .. }
                | EngineError::FileWrite { .. }
        )
    }
}

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

// ============================================================================
// Tests
// ============================================================================
