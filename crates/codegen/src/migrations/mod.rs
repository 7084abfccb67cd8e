//! # Migration Generation
//!
//! This module turns schema tables into schema-builder migration files.
//!
//! ## Generated Files
//!
//! Each table produces a migration file named:
//! ```text
//! {key}_create_{table}_table.php
//! ```
//!
//! Foreign keys are not part of the table files. They are gathered while the
//! tables are processed and written to one extra migration whose key sorts
//! after every table file:
//! ```text
//! {key}_create_foreign_keys_table.php
//! ```
//!
//! ## Pieces
//!
//! - `column` - one column to one statement
//! - `foreign_keys` - relation discovery and the apply/revert blocks
//! - `template` - stubs with named slots
//! - `assembler` - filled stubs plus file names

pub mod assembler;
pub mod column;
pub mod foreign_keys;
pub mod template;

pub use assembler::{MigrationAssembler, class_name, file_name, indent_statements};
pub use column::{build_column_statement, default_literal, php_string};
pub use foreign_keys::{
    ForeignKeyRelation, RelationBlocks, RelationSet, RelationTarget, build_relation_blocks,
    foreign_key_name,
};
pub use template::{Template, TemplateKind};

/// Statement appended for tables with timestamps
pub const TIMESTAMPS_STATEMENT: &str = "$table->timestamps();";

/// Statement appended for tables with soft deletes
pub const SOFT_DELETES_STATEMENT: &str = "$table->softDeletes();";
