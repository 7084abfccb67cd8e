//! # Migration Assembler
//!
//! Fills the bundled stubs and names the result:
//!
//! ```text
//! {key}_create_{table}_table.{ext}   class Create{Table}Table
//! ```

use heck::ToPascalCase;
use schemer_core::EngineResult;

use super::foreign_keys::RelationBlocks;
use super::template::{Template, TemplateKind};
use crate::GeneratedFile;

/// Indentation of column statements inside `Schema::create`
pub const COLUMN_INDENT: &str = "            ";

/// Class name for a table's migration
pub fn class_name(table: &str) -> String {
    format!("Create{}Table", table.to_pascal_case())
}

/// File name for a migration
pub fn file_name(key: &str, table: &str, extension: &str) -> String {
    format!("{}_create_{}_table.{}", key, table, extension)
}

/// Indent raw statements for the create stub
pub fn indent_statements<I, S>(statements: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    statements
        .into_iter()
        .map(|s| format!("{}{}", COLUMN_INDENT, s.as_ref()))
        .collect()
}

#[derive(Debug, Clone)]
pub struct MigrationAssembler {
    create: Template,
    relations: Template,
    extension: String,
}

impl MigrationAssembler {
    /// Load the bundled stubs
    pub fn new(extension: impl Into<String>) -> EngineResult<Self> {
        Ok(Self {
            create: Template::bundled(TemplateKind::CreateTable)?,
            relations: Template::bundled(TemplateKind::Relations)?,
            extension: extension.into(),
        })
    }

    /// Assemble the create migration for one table.
    ///
    /// `lines` must already be indented, see [`indent_statements`].
    pub fn assemble_table(
        &self,
        key: &str,
        table: &str,
        lines: &[String],
    ) -> EngineResult<GeneratedFile> {
        let class = class_name(table);
        let body = lines.join("\n");

        let content = self.create.render(&[
            ("class", class.as_str()),
            ("table", table),
            ("columns", body.as_str()),
        ])?;

        tracing::debug!(%table, %class, %key, "assembled table migration");

        Ok(GeneratedFile::table_migration(
            file_name(key, table, &self.extension),
            content,
        ))
    }

    /// Assemble the foreign key migration under the descriptive `name`
    pub fn assemble_relations(
        &self,
        key: &str,
        name: &str,
        blocks: &RelationBlocks,
    ) -> EngineResult<GeneratedFile> {
        let class = class_name(name);
        let apply = blocks.apply.join("\n");
        let revert = blocks.revert.join("\n");

        let content = self.relations.render(&[
            ("class", class.as_str()),
            ("apply", apply.as_str()),
            ("revert", revert.as_str()),
        ])?;

        tracing::debug!(%class, %key, "assembled relations migration");

        Ok(GeneratedFile::relations(
            file_name(key, name, &self.extension),
            content,
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArtifactKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_class_names() {
        assert_eq!(class_name("users"), "CreateUsersTable");
        assert_eq!(class_name("user_roles"), "CreateUserRolesTable");
        assert_eq!(class_name("foreign_keys"), "CreateForeignKeysTable");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            file_name("2024_01_01_000000", "users", "php"),
            "2024_01_01_000000_create_users_table.php"
        );
    }

    #[test]
    fn test_assemble_table() {
        let assembler = MigrationAssembler::new("php").unwrap();
        let lines = indent_statements(["$table->increments('id');", "$table->timestamps();"]);

        let file = assembler
            .assemble_table("2024_01_01_000000", "users", &lines)
            .unwrap();

        assert_eq!(file.path, "2024_01_01_000000_create_users_table.php");
        assert_eq!(file.kind, ArtifactKind::TableMigration);
        assert!(file.content.contains("class CreateUsersTable extends Migration"));
        assert!(file.content.contains(
            "        Schema::create('users', function (Blueprint $table) {\n            $table->increments('id');\n            $table->timestamps();\n        });"
        ));
        assert!(file.content.contains("Schema::dropIfExists('users');"));
        assert!(!file.content.contains("{{"));
    }

    #[test]
    fn test_assemble_empty_table() {
        let assembler = MigrationAssembler::new("php").unwrap();
        let file = assembler
            .assemble_table("2024_01_01_000000", "audit", &[])
            .unwrap();
        assert!(file.content.contains("Schema::create('audit'"));
    }

    #[test]
    fn test_assemble_relations() {
        let assembler = MigrationAssembler::new("php").unwrap();
        let blocks = RelationBlocks {
            apply: vec!["        // apply".to_string()],
            revert: vec!["        // revert".to_string()],
        };

        let file = assembler
            .assemble_relations("2024_01_01_000100", "foreign_keys", &blocks)
            .unwrap();

        assert_eq!(file.path, "2024_01_01_000100_create_foreign_keys_table.php");
        assert_eq!(file.kind, ArtifactKind::Relations);
        assert!(file.content.contains("class CreateForeignKeysTable"));

        let up = file.content.find("// apply").unwrap();
        let down = file.content.find("// revert").unwrap();
        assert!(up < down);
    }
}
