//! # Schemer IR
//!
//! The schema model submitted by the designer: tables, their columns, and
//! the foreign keys linking them.
//!
//! ## Core Concepts
//!
//! - **Schema**: Root container, an ordered table list plus column groups
//!   keyed by table id
//! - **Table**: Name, timestamp and soft-delete switches
//! - **Column**: Type, length and the modifier flags
//! - **ForeignKey**: Reference from a column to `table.column`
//!

pub mod schema;
pub mod serialization;
pub mod validation;

pub use schema::{Column, ForeignKey, ForeignKeyTarget, Schema, Table};
pub use serialization::{
    SCHEMA_ENTRY, load_schema, load_schema_from_archive, load_schema_from_bytes,
    load_schema_from_string, save_schema, save_schema_to_compact_string, save_schema_to_string,
    schema_snapshot,
};
pub use validation::{ValidationOptions, ValidationReport, validate_schema};

// Re-export core types that are commonly used with IR
pub use schemer_core::{
    ColumnType, DefaultValue, EngineError, EngineResult, Identifier, Validatable,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
