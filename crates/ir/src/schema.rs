//! Schema model
//!
//! The in-memory form of the document submitted by the designer: an ordered
//! list of tables plus, per table id, the ordered list of its columns. Field
//! names follow the designer's JSON (`timeStamp`, `autoInc`, `defValue`, ...).
//!
//! A schema loaded from text keeps that text. The `schema.json` snapshot is
//! the submitted document byte for byte, including keys the model does not
//! know about; only schemas built in code are serialized from the model.

use indexmap::IndexMap;
use schemer_core::{ColumnType, DefaultValue, EngineError, EngineResult, Identifier};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Schema
// ============================================================================

/// Root of a designer document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Tables in the order they were designed
    pub tables: Vec<Table>,

    /// Column groups keyed by table id
    pub columns: IndexMap<String, Vec<Column>>,

    /// Document text this schema was parsed from
    #[serde(skip)]
    source: Option<String>,
}

/// Equality compares the model only, not the text it came from.
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.tables == other.tables && self.columns == other.columns
    }
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the document text this schema was parsed from
    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source = Some(text.into());
        self
    }

    /// The submitted document text, if the schema was loaded from one
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Add a table together with its columns
    pub fn add_table(&mut self, table: Table, columns: Vec<Column>) {
        self.columns.insert(table.id.key(), columns);
        self.tables.push(table);
    }

    /// Columns belonging to a table.
    ///
    /// A table without a column group is a malformed document.
    pub fn columns_for(&self, table: &Table) -> EngineResult<&[Column]> {
        self.columns
            .get(&table.id.key())
            .map(Vec::as_slice)
            .ok_or_else(|| {
                EngineError::malformed(format!(
                    "table '{}' (id {}) has no entry in 'columns'",
                    table.name, table.id
                ))
            })
    }

    /// Find a table by its name
    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Get the number of tables
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Count columns that carry a foreign key
    pub fn relation_count(&self) -> usize {
        self.columns
            .values()
            .flatten()
            .filter(|c| c.relation().is_some())
            .count()
    }

    /// Check if the schema has no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

// ============================================================================
// Table
// ============================================================================

/// A table drawn in the designer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Designer id, also the key of the table's column group
    pub id: Identifier,

    /// SQL table name and class-name seed
    pub name: String,

    /// Add `created_at`/`updated_at` columns
    #[serde(default)]
    pub time_stamp: bool,

    /// Add a `deleted_at` column
    #[serde(default)]
    pub soft_delete: bool,
}

impl Table {
    /// Create a table without timestamps or soft deletes
    pub fn new(id: impl Into<Identifier>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            time_stamp: false,
            soft_delete: false,
        }
    }

    /// Enable timestamp columns
    pub fn with_timestamps(mut self) -> Self {
        self.time_stamp = true;
        self
    }

    /// Enable the soft-delete column
    pub fn with_soft_delete(mut self) -> Self {
        self.soft_delete = true;
        self
    }
}

// ============================================================================
// Column
// ============================================================================

/// A column of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Length for `char`/`string` columns
    #[serde(
        default,
        deserialize_with = "deserialize_length",
        skip_serializing_if = "Option::is_none"
    )]
    pub length: Option<u32>,

    #[serde(default)]
    pub nullable: bool,

    #[serde(default)]
    pub unique: bool,

    #[serde(default)]
    pub index: bool,

    #[serde(default)]
    pub unsigned: bool,

    /// Auto-increment primary key
    #[serde(default)]
    pub auto_inc: bool,

    /// Literal default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub def_value: Option<DefaultValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Relation to a column of another table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKey>,
}

impl Column {
    /// Create a column with no modifiers
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            length: None,
            nullable: false,
            unique: false,
            index: false,
            unsigned: false,
            auto_inc: false,
            def_value: None,
            comment: None,
            foreign_key: None,
        }
    }

    /// Create an auto-increment integer key
    pub fn increments(name: impl Into<String>) -> Self {
        let mut column = Self::new(name, ColumnType::Integer);
        column.auto_inc = true;
        column
    }

    /// Create an unsigned integer column referencing `table.column`
    pub fn foreign(
        name: impl Into<String>,
        target_table: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        let mut column = Self::new(name, ColumnType::Integer);
        column.unsigned = true;
        column.foreign_key = Some(ForeignKey::new(target_table, target_column));
        column
    }

    /// Set the length
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Set a default value
    pub fn with_default(mut self, value: DefaultValue) -> Self {
        self.def_value = Some(value);
        self
    }

    /// Set a comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The foreign key, if the column really declares one.
    ///
    /// The designer always sends the `foreignKey` object; only a truthy
    /// `references.id` marks an actual relation.
    pub fn relation(&self) -> Option<&ForeignKey> {
        self.foreign_key.as_ref().filter(|fk| fk.is_present())
    }

    /// Length to emit: positive and only for length-bearing types
    pub fn effective_length(&self) -> Option<u32> {
        self.length
            .filter(|len| *len > 0 && self.column_type.takes_length())
    }

    /// Default to emit, ignoring empty strings
    pub fn effective_default(&self) -> Option<&DefaultValue> {
        self.def_value.as_ref().filter(|v| !v.is_empty())
    }

    /// Comment to emit, ignoring empty strings
    pub fn effective_comment(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.is_empty())
    }
}

// ============================================================================
// Foreign Keys
// ============================================================================

/// Relation from a column to a column of another table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Target table
    #[serde(default)]
    pub on: ForeignKeyTarget,

    /// Target column
    #[serde(default)]
    pub references: ForeignKeyTarget,
}

impl ForeignKey {
    /// Create a foreign key pointing at `table.column`
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        let column = column.into();
        Self {
            on: ForeignKeyTarget {
                id: None,
                name: table.into(),
            },
            references: ForeignKeyTarget {
                id: Some(Identifier::Text(column.clone())),
                name: column,
            },
        }
    }

    /// Whether this key describes an actual relation
    pub fn is_present(&self) -> bool {
        self.references
            .id
            .as_ref()
            .is_some_and(Identifier::is_truthy)
    }

    /// Name of the referenced table
    pub fn target_table(&self) -> &str {
        &self.on.name
    }

    /// Name of the referenced column
    pub fn target_column(&self) -> &str {
        &self.references.name
    }
}

/// One side of a foreign key reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identifier>,

    #[serde(default)]
    pub name: String,
}

// ============================================================================
// Serde helpers
// ============================================================================

/// Lengths arrive as numbers, numeric strings, empty strings or null.
fn deserialize_length<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawLength {
        Number(u32),
        Text(String),
    }

    match Option::<RawLength>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawLength::Number(n)) => Ok(Some(n)),
        Some(RawLength::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<u32>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid column length '{}'", s)))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
