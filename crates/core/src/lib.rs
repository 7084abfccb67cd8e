//! # Schemer Core
//!
//! Core types, traits, and error handling for Schemer.
//!
//! This crate provides the foundational building blocks used by the schema
//! model and the migration generators:
//!
//! - **Types**: Column type vocabulary, default values, designer identifiers
//! - **Traits**: `Validatable`
//! - **Errors**: Unified error handling with `EngineError` and `EngineResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EngineError, EngineResult};
pub use traits::Validatable;
pub use types::{ColumnType, DefaultValue, Identifier, is_identifier, is_integer_literal};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
