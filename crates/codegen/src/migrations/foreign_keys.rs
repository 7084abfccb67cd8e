//! # Foreign Keys
//!
//! Foreign keys are collected while tables are processed and emitted last,
//! in a separate migration, so every referenced table already exists when the
//! constraints are added.
//!
//! [`RelationSet`] is a plain value: each table's columns are folded into it
//! and the grown set is handed back to the caller. Groups keep the order in
//! which their tables were first seen, and columns keep declaration order.
//!
//! The revert side drops constraints by the conventional
//! `{table}_{column}_foreign` name, which is the name the apply side's
//! `foreign()` call produces. Nothing else links the two.

use indexmap::IndexMap;
use schemer_ir::{Column, Table};

use super::column::php_string;

/// Indentation of the `Schema::table` wrapper inside `up()`/`down()`
const WRAPPER_INDENT: &str = "        ";

/// Indentation of statements inside the wrapper
const STATEMENT_INDENT: &str = "            ";

// ============================================================================
// Relations
// ============================================================================

/// A discovered foreign key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRelation {
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
}

/// Referenced side of a relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationTarget {
    pub table: String,
    pub column: String,
}

/// Relations grouped by source table, then source column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationSet {
    groups: IndexMap<String, IndexMap<String, RelationTarget>>,
}

impl RelationSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one relation, returning the grown set.
    ///
    /// Relations on other columns of the same table join the existing group.
    pub fn with(mut self, relation: ForeignKeyRelation) -> Self {
        self.groups
            .entry(relation.source_table)
            .or_default()
            .insert(
                relation.source_column,
                RelationTarget {
                    table: relation.target_table,
                    column: relation.target_column,
                },
            );
        self
    }

    /// Fold every foreign key among a table's columns into the set
    pub fn collect_table(self, table: &Table, columns: &[Column]) -> Self {
        columns
            .iter()
            .filter_map(|column| {
                column.relation().map(|fk| ForeignKeyRelation {
                    source_table: table.name.clone(),
                    source_column: column.name.clone(),
                    target_table: fk.target_table().to_string(),
                    target_column: fk.target_column().to_string(),
                })
            })
            .fold(self, RelationSet::with)
    }

    /// Check if no relation was discovered
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of source tables with relations
    pub fn table_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of relations
    pub fn len(&self) -> usize {
        self.groups.values().map(IndexMap::len).sum()
    }

    /// Groups in discovery order
    pub fn groups(&self) -> impl Iterator<Item = (&str, &IndexMap<String, RelationTarget>)> {
        self.groups.iter().map(|(table, columns)| (table.as_str(), columns))
    }

    /// Flattened relations in discovery order
    pub fn relations(&self) -> Vec<ForeignKeyRelation> {
        self.groups()
            .flat_map(|(table, columns)| {
                columns.iter().map(move |(column, target)| ForeignKeyRelation {
                    source_table: table.to_string(),
                    source_column: column.clone(),
                    target_table: target.table.clone(),
                    target_column: target.column.clone(),
                })
            })
            .collect()
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Mirrored apply/revert statement lines, already indented
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationBlocks {
    pub apply: Vec<String>,
    pub revert: Vec<String>,
}

/// Conventional constraint name for `table.column`
pub fn foreign_key_name(table: &str, column: &str) -> String {
    format!("{}_{}_foreign", table, column)
}

/// Build the apply and revert blocks, or `None` when there is nothing to emit.
pub fn build_relation_blocks(relations: &RelationSet) -> Option<RelationBlocks> {
    if relations.is_empty() {
        return None;
    }

    let mut blocks = RelationBlocks::default();

    for (table, columns) in relations.groups() {
        let open = format!(
            "{}Schema::table({}, function (Blueprint $table) {{",
            WRAPPER_INDENT,
            php_string(table)
        );
        let close = format!("{}}});", WRAPPER_INDENT);

        blocks.apply.push(open.clone());
        blocks.revert.push(open);

        for (column, target) in columns {
            blocks.apply.push(format!(
                "{}$table->foreign({})->references({})->on({});",
                STATEMENT_INDENT,
                php_string(column),
                php_string(&target.column),
                php_string(&target.table)
            ));
            blocks.revert.push(format!(
                "{}$table->dropForeign({});",
                STATEMENT_INDENT,
                php_string(&foreign_key_name(table, column))
            ));
        }

        blocks.apply.push(close.clone());
        blocks.revert.push(close);
    }

    Some(blocks)
}

// ============================================================================
// Tests
// ============================================================================
