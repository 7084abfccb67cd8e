//! Serialization and deserialization of designer schemas
//!
//! Schemas travel as JSON: in from the designer, and out again as the
//! `schema.json` snapshot stored next to the generated migrations. A
//! produced archive can be re-imported with [`load_schema_from_archive`].

use crate::Schema;
use schemer_core::{EngineError, EngineResult};
use std::io::Read;
use std::path::Path;

// ============================================================================
// Constants
// ============================================================================

/// Archive entry holding the schema snapshot
pub const SCHEMA_ENTRY: &str = "schema.json";

// ============================================================================
// Save Functions
// ============================================================================

/// Save a schema to a pretty-printed JSON string
pub fn save_schema_to_string(schema: &Schema) -> EngineResult<String> {
    Ok(serde_json::to_string_pretty(schema)?)
}

/// Save a schema to a compact JSON string (no pretty printing)
pub fn save_schema_to_compact_string(schema: &Schema) -> EngineResult<String> {
    Ok(serde_json::to_string(schema)?)
}

/// Text of the `schema.json` snapshot.
///
/// The submitted document verbatim when there is one, otherwise the
/// pretty-printed model.
pub fn schema_snapshot(schema: &Schema) -> EngineResult<String> {
    match schema.source() {
        Some(text) => Ok(text.to_string()),
        None => save_schema_to_string(schema),
    }
}

/// Save a schema to a file
pub fn save_schema(schema: &Schema, path: impl AsRef<Path>) -> EngineResult<()> {
    let path = path.as_ref();
    let json = save_schema_to_string(schema)?;

    std::fs::write(path, json).map_err(|e| EngineError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

// ============================================================================
// Load Functions
// ============================================================================

/// Load a schema from a JSON string.
///
/// Shape errors (missing `tables`/`columns`, a column without `name` or
/// `type`, unknown column types) are reported as malformed schemas.
pub fn load_schema_from_string(json: &str) -> EngineResult<Schema> {
    let schema: Schema =
        serde_json::from_str(json).map_err(|e| EngineError::malformed(e.to_string()))?;
    Ok(schema.with_source(json))
}

/// Load a schema from bytes
pub fn load_schema_from_bytes(bytes: &[u8]) -> EngineResult<Schema> {
    let json = std::str::from_utf8(bytes)
        .map_err(|e| EngineError::malformed(format!("Invalid UTF-8: {}", e)))?;
    load_schema_from_string(json)
}

/// Load a schema from a file
pub fn load_schema(path: impl AsRef<Path>) -> EngineResult<Schema> {
    let path = path.as_ref();

    let bytes = std::fs::read(path).map_err(|e| EngineError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    load_schema_from_bytes(&bytes)
}

/// Read the schema snapshot back out of a generated archive
pub fn load_schema_from_archive(path: impl AsRef<Path>) -> EngineResult<Schema> {
    let path = path.as_ref();

    let file = std::fs::File::open(path).map_err(|e| EngineError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut archive = zip::ZipArchive::new(file)?;
    let mut entry = archive.by_name(SCHEMA_ENTRY)?;

    let mut json = String::new();
    entry.read_to_string(&mut json)?;

    tracing::debug!(archive = %path.display(), bytes = json.len(), "schema snapshot re-imported");

    load_schema_from_string(&json)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Column, Table};
    use pretty_assertions::assert_eq;
    use schemer_core::{ColumnType, DefaultValue};
    use std::io::Write;
    use tempfile::TempDir;

    fn sample() -> Schema {
        let mut schema = Schema::new();
        schema.add_table(
            Table::new(1, "users").with_timestamps(),
            vec![
                Column::increments("id"),
                Column::new("email", ColumnType::String).with_length(255),
                Column::new("age", ColumnType::Integer).with_default(DefaultValue::Integer(18)),
            ],
        );
        schema
    }

    #[test]
    fn test_string_round_trip() {
        let schema = sample();
        let json = save_schema_to_string(&schema).unwrap();
        assert!(json.contains("\"timeStamp\": true"));
        assert!(json.contains("\"autoInc\": true"));

        let loaded = load_schema_from_string(&json).unwrap();
        assert_eq!(loaded, schema);
    }

    #[test]
    fn test_compact_is_shorter() {
        let schema = sample();
        let pretty = save_schema_to_string(&schema).unwrap();
        let compact = save_schema_to_compact_string(&schema).unwrap();
        assert!(compact.len() < pretty.len());
        assert_eq!(load_schema_from_string(&compact).unwrap(), schema);
    }

    #[test]
    fn test_missing_tables_is_malformed() {
        let err = load_schema_from_string(r#"{"columns": {}}"#).unwrap_err();
        assert!(matches!(err, EngineError::MalformedSchema(_)));
        assert!(err.to_string().contains("tables"));
    }

    #[test]
    fn test_missing_columns_is_malformed() {
        let err = load_schema_from_string(r#"{"tables": []}"#).unwrap_err();
        assert!(matches!(err, EngineError::MalformedSchema(_)));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = load_schema_from_bytes(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, EngineError::MalformedSchema(_)));
    }

    #[test]
    fn test_save_and_load_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("schema.json");

        save_schema(&sample(), &path).unwrap();
        assert_eq!(load_schema(&path).unwrap(), sample());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_schema("/nonexistent/schema.json").unwrap_err();
        assert!(matches!(err, EngineError::FileRead { .. }));
    }

    #[test]
    fn test_load_from_archive() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("migrations.zip");

        let file = std::fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file(SCHEMA_ENTRY, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer
            .write_all(save_schema_to_string(&sample()).unwrap().as_bytes())
            .unwrap();
        writer.finish().unwrap();

        assert_eq!(load_schema_from_archive(&path).unwrap(), sample());
    }

    /// Designer document with keys the model ignores, a string length and
    /// omitted flags
    const DESIGNER_DOCUMENT: &str = r#"{"tables":[{"id":1,"name":"users","timeStamp":true,"softDelete":false,"color":"red","position":{"x":40,"y":120}}],"columns":{"1":[{"name":"email","type":"string","length":"191","unique":true}]}}"#;

    #[test]
    fn test_snapshot_keeps_submitted_document() {
        let schema = load_schema_from_string(DESIGNER_DOCUMENT).unwrap();
        assert_eq!(schema.columns["1"][0].length, Some(191));

        let snapshot = schema_snapshot(&schema).unwrap();
        assert_eq!(snapshot, DESIGNER_DOCUMENT);

        let expected: serde_json::Value = serde_json::from_str(DESIGNER_DOCUMENT).unwrap();
        let actual: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_snapshot_of_built_schema_uses_model() {
        let schema = sample();
        assert!(schema.source().is_none());
        assert_eq!(
            schema_snapshot(&schema).unwrap(),
            save_schema_to_string(&schema).unwrap()
        );
    }

    #[test]
    fn test_archive_reimport_keeps_snapshot_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("migrations.zip");

        let file = std::fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file(SCHEMA_ENTRY, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(DESIGNER_DOCUMENT.as_bytes()).unwrap();
        writer.finish().unwrap();

        let schema = load_schema_from_archive(&path).unwrap();
        assert_eq!(schema.source(), Some(DESIGNER_DOCUMENT));
    }
}
