//! Schema validation
//!
//! Structural checks run before any artifact is produced. A schema that
//! fails here never reaches the archive writer.

use std::collections::HashSet;

use schemer_core::{EngineError, EngineResult, Validatable, is_identifier};

use crate::schema::{Column, Schema, Table};

// ============================================================================
// Options & Report
// ============================================================================

/// How strictly foreign keys are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Reject foreign keys whose target table or column is missing.
    /// When false they are reported as warnings and passed through.
    pub strict_foreign_keys: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            strict_foreign_keys: true,
        }
    }
}

/// Outcome of a successful validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that did not stop validation
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Validate a schema, returning the first hard error.
pub fn validate_schema(schema: &Schema, options: ValidationOptions) -> EngineResult<ValidationReport> {
    let mut report = ValidationReport::default();

    for table in &schema.tables {
        validate_table(table)?;
        let columns = schema.columns_for(table)?;
        validate_columns(table, columns)?;
    }

    for table in &schema.tables {
        for column in schema.columns_for(table)? {
            if let Err(err) = check_foreign_key(schema, table, column) {
                if options.strict_foreign_keys {
                    return Err(err);
                }
                tracing::warn!(table = %table.name, column = %column.name, "{}", err);
                report.warnings.push(err.to_string());
            }
        }
    }

    Ok(report)
}

fn validate_table(table: &Table) -> EngineResult<()> {
    if table.name.is_empty() {
        return Err(EngineError::malformed(format!(
            "table with id {} has an empty name",
            table.id
        )));
    }

    if !is_identifier(&table.name) {
        return Err(EngineError::malformed(format!(
            "table name '{}' is not a valid identifier",
            table.name
        )));
    }

    Ok(())
}

fn validate_columns(table: &Table, columns: &[Column]) -> EngineResult<()> {
    let mut seen = HashSet::new();

    for column in columns {
        if column.name.is_empty() {
            return Err(EngineError::malformed(format!(
                "table '{}' has a column without a name",
                table.name
            )));
        }

        if !seen.insert(column.name.as_str()) {
            return Err(EngineError::malformed(format!(
                "column '{}' is declared twice in table '{}'",
                column.name, table.name
            )));
        }
    }

    Ok(())
}

fn check_foreign_key(schema: &Schema, table: &Table, column: &Column) -> EngineResult<()> {
    let Some(fk) = column.relation() else {
        return Ok(());
    };

    let unresolved =
        |msg: String| EngineError::unresolved_foreign_key(&table.name, &column.name, msg);

    let target = schema
        .table_by_name(fk.target_table())
        .ok_or_else(|| unresolved(format!("no table named '{}'", fk.target_table())))?;

    let target_columns = schema.columns_for(target)?;
    if !target_columns.iter().any(|c| c.name == fk.target_column()) {
        return Err(unresolved(format!(
            "table '{}' has no column '{}'",
            target.name,
            fk.target_column()
        )));
    }

    Ok(())
}

impl Validatable for Schema {
    fn validate(&self) -> EngineResult<()> {
        validate_schema(self, ValidationOptions::default()).map(|_| ())
    }
}

// ============================================================================
// Tests
// ============================================================================
