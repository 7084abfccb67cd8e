//! Configuration file for the generator
//!
//! An optional `schemer.toml` supplies generator settings:
//!
//! ```toml
//! output = "build/migrations.zip"
//! base_time = "2024-01-01T09:00:00"
//! step_seconds = 60
//! strict_foreign_keys = true
//! extension = "php"
//! relations_name = "foreign_keys"
//! overwrite = false
//! ```
//!
//! Every key is optional. Values from the file replace the defaults and are
//! in turn replaced by command-line flags.

use chrono::NaiveDateTime;
use schemer_core::{EngineError, EngineResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::GeneratorConfig;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "schemer.toml";

/// Contents of `schemer.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub output: Option<PathBuf>,

    #[serde(default)]
    pub base_time: Option<NaiveDateTime>,

    #[serde(default)]
    pub step_seconds: Option<i64>,

    #[serde(default)]
    pub strict_foreign_keys: Option<bool>,

    #[serde(default)]
    pub extension: Option<String>,

    #[serde(default)]
    pub relations_name: Option<String>,

    #[serde(default)]
    pub overwrite: Option<bool>,
}

impl ConfigFile {
    /// Parse configuration text
    pub fn from_toml(text: &str) -> EngineResult<Self> {
        toml::from_str(text).map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    /// Load a configuration file if it exists
    pub fn load_optional(path: impl AsRef<Path>) -> EngineResult<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Overlay the values present in the file onto `config`
    pub fn apply(self, mut config: GeneratorConfig) -> GeneratorConfig {
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(base_time) = self.base_time {
            config.base_time = Some(base_time);
        }
        if let Some(step) = self.step_seconds {
            config.step_seconds = step;
        }
        if let Some(strict) = self.strict_foreign_keys {
            config.strict_foreign_keys = strict;
        }
        if let Some(extension) = self.extension {
            config.extension = extension;
        }
        if let Some(name) = self.relations_name {
            config.relations_name = name;
        }
        if let Some(overwrite) = self.overwrite {
            config.overwrite = overwrite;
        }
        config
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_keeps_defaults() {
        let file = ConfigFile::from_toml("").unwrap();
        assert_eq!(file.apply(GeneratorConfig::default()), GeneratorConfig::default());
    }

    #[test]
    fn test_values_override_defaults() {
        let file = ConfigFile::from_toml(
            r#"
            output = "build/out.zip"
            base_time = "2024-01-01T09:00:00"
            step_seconds = 1
            strict_foreign_keys = false
            relations_name = "relations"
            "#,
        )
        .unwrap();

        let config = file.apply(GeneratorConfig::default());
        assert_eq!(config.output_path, PathBuf::from("build/out.zip"));
        assert_eq!(
            config.base_time,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
        );
        assert_eq!(config.step_seconds, 1);
        assert!(!config.strict_foreign_keys);
        assert_eq!(config.relations_name, "relations");
        assert_eq!(config.extension, "php");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = ConfigFile::from_toml("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_load_optional() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(ConfigFile::load_optional(&path).unwrap().is_none());

        std::fs::write(&path, "overwrite = true").unwrap();
        let file = ConfigFile::load_optional(&path).unwrap().unwrap();
        assert_eq!(file.overwrite, Some(true));
    }
}
