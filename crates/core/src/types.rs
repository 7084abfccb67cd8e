//! Core types used throughout Schemer
//!
//! This module contains the value types shared by the schema model and the
//! code generators: the column type vocabulary, explicit default values and
//! designer identifiers.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{EngineError, EngineResult};

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier pattern"));

static INTEGER_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(0|[1-9][0-9]*)$").expect("valid integer pattern"));

/// Check whether a name is safe to use as a table name and class-name seed
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Check whether a string is a plain integer literal (no leading zeros,
/// no fraction, optional minus sign)
pub fn is_integer_literal(value: &str) -> bool {
    INTEGER_LITERAL.is_match(value)
}

// ============================================================================
// Identifier
// ============================================================================

/// Identifier assigned by the designer to tables and columns.
///
/// The designer emits either numbers or strings; both are kept as-is so the
/// schema snapshot serializes back to the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(i64),
    Text(String),
}

impl Identifier {
    /// Whether the identifier carries a value (non-zero, non-empty)
    pub fn is_truthy(&self) -> bool {
        match self {
            Identifier::Number(n) => *n != 0,
            Identifier::Text(s) => !s.is_empty() && s != "0",
        }
    }

    /// Key used to look the identifier up in the column map
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{}", n),
            Identifier::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Number(value)
    }
}

impl From<i32> for Identifier {
    fn from(value: i32) -> Self {
        Identifier::Number(i64::from(value))
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Text(value.to_string())
    }
}

// ============================================================================
// Column Types
// ============================================================================

/// Column types the designer can assign, named after the schema builder
/// methods they map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    BigInteger,
    Binary,
    Boolean,
    Char,
    Date,
    DateTime,
    DateTimeTz,
    Decimal,
    Double,
    Float,
    Integer,
    IpAddress,
    Json,
    Jsonb,
    LongText,
    MacAddress,
    MediumInteger,
    MediumText,
    SmallInteger,
    String,
    Text,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    TinyInteger,
    Uuid,
    Year,
}

impl ColumnType {
    /// Every supported column type
    pub const ALL: [ColumnType; 28] = [
        ColumnType::BigInteger,
        ColumnType::Binary,
        ColumnType::Boolean,
        ColumnType::Char,
        ColumnType::Date,
        ColumnType::DateTime,
        ColumnType::DateTimeTz,
        ColumnType::Decimal,
        ColumnType::Double,
        ColumnType::Float,
        ColumnType::Integer,
        ColumnType::IpAddress,
        ColumnType::Json,
        ColumnType::Jsonb,
        ColumnType::LongText,
        ColumnType::MacAddress,
        ColumnType::MediumInteger,
        ColumnType::MediumText,
        ColumnType::SmallInteger,
        ColumnType::String,
        ColumnType::Text,
        ColumnType::Time,
        ColumnType::TimeTz,
        ColumnType::Timestamp,
        ColumnType::TimestampTz,
        ColumnType::TinyInteger,
        ColumnType::Uuid,
        ColumnType::Year,
    ];

    /// Builder method name for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::BigInteger => "bigInteger",
            ColumnType::Binary => "binary",
            ColumnType::Boolean => "boolean",
            ColumnType::Char => "char",
            ColumnType::Date => "date",
            ColumnType::DateTime => "dateTime",
            ColumnType::DateTimeTz => "dateTimeTz",
            ColumnType::Decimal => "decimal",
            ColumnType::Double => "double",
            ColumnType::Float => "float",
            ColumnType::Integer => "integer",
            ColumnType::IpAddress => "ipAddress",
            ColumnType::Json => "json",
            ColumnType::Jsonb => "jsonb",
            ColumnType::LongText => "longText",
            ColumnType::MacAddress => "macAddress",
            ColumnType::MediumInteger => "mediumInteger",
            ColumnType::MediumText => "mediumText",
            ColumnType::SmallInteger => "smallInteger",
            ColumnType::String => "string",
            ColumnType::Text => "text",
            ColumnType::Time => "time",
            ColumnType::TimeTz => "timeTz",
            ColumnType::Timestamp => "timestamp",
            ColumnType::TimestampTz => "timestampTz",
            ColumnType::TinyInteger => "tinyInteger",
            ColumnType::Uuid => "uuid",
            ColumnType::Year => "year",
        }
    }

    /// Whether the builder method accepts a length argument
    pub fn takes_length(&self) -> bool {
        matches!(self, ColumnType::Char | ColumnType::String)
    }

    /// Auto-increment counterpart of an integer type
    pub fn increment_synonym(&self) -> Option<&'static str> {
        match self {
            ColumnType::Integer => Some("increments"),
            ColumnType::BigInteger => Some("bigIncrements"),
            ColumnType::MediumInteger => Some("mediumIncrements"),
            ColumnType::SmallInteger => Some("smallIncrements"),
            ColumnType::TinyInteger => Some("tinyIncrements"),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        ColumnType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| EngineError::malformed(format!("unknown column type '{}'", s)))
    }
}

// ============================================================================
// Default Values
// ============================================================================

/// Default value attached to a column.
///
/// The kind comes from the JSON value itself. Strings are text unless they
/// are a plain integer literal, see [`DefaultValue::as_integer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl DefaultValue {
    /// An empty string carries no default
    pub fn is_empty(&self) -> bool {
        matches!(self, DefaultValue::Text(s) if s.is_empty())
    }

    /// Text defaults that spell a plain integer, like `"42"` or `"-7"`.
    /// `"007"` and `"1.5"` stay text.
    pub fn as_integer(&self) -> Option<&str> {
        match self {
            DefaultValue::Text(s) if is_integer_literal(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
