//! End-to-end tests for the `schemer` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

const BLOG_SCHEMA: &str = r#"{
  "tables": [
    { "id": 1, "name": "users", "timeStamp": true, "softDelete": false },
    { "id": 2, "name": "posts", "timeStamp": true, "softDelete": true }
  ],
  "columns": {
    "1": [
      { "name": "id", "type": "integer", "autoInc": true },
      { "name": "email", "type": "string", "length": 120, "unique": true }
    ],
    "2": [
      { "name": "id", "type": "integer", "autoInc": true },
      {
        "name": "user_id",
        "type": "integer",
        "unsigned": true,
        "foreignKey": {
          "on": { "id": 1, "name": "users" },
          "references": { "id": "id", "name": "id" }
        }
      },
      { "name": "title", "type": "string", "defValue": "Untitled" }
    ]
  }
}"#;

const DANGLING_SCHEMA: &str = r#"{
  "tables": [{ "id": 1, "name": "posts" }],
  "columns": {
    "1": [
      {
        "name": "author_id",
        "type": "integer",
        "foreignKey": {
          "on": { "name": "authors" },
          "references": { "id": "id", "name": "id" }
        }
      }
    ]
  }
}"#;

fn schemer(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("schemer").unwrap();
    cmd.current_dir(dir).env_remove("SCHEMER_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn write_schema(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("schema.json");
    std::fs::write(&path, contents).unwrap();
    path
}

fn archive_entries(path: &Path) -> Vec<(String, String)> {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            (entry.name().to_string(), content)
        })
        .collect()
}

// ============================================================================
// generate
// ============================================================================

#[test]
fn test_generate_archive() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), BLOG_SCHEMA);
    let output = dir.path().join("out.zip");

    schemer(dir.path())
        .arg("generate")
        .arg(&schema)
        .arg("-o")
        .arg(&output)
        .args(["--base-time", "2024-01-01T09:00:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 2 table migrations"));

    let entries = archive_entries(&output);
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "2024_01_01_090000_create_users_table.php",
            "2024_01_01_090100_create_posts_table.php",
            "2024_01_01_090200_create_foreign_keys_table.php",
            "schema.json",
        ]
    );

    let users = &entries[0].1;
    assert!(users.contains("$table->increments('id');"));
    assert!(users.contains("$table->string('email', 120)->unique();"));
    assert!(users.contains("$table->timestamps();"));

    let posts = &entries[1].1;
    assert!(posts.contains("$table->string('title')->default('Untitled');"));
    assert!(posts.contains("$table->softDeletes();"));

    let relations = &entries[2].1;
    assert!(relations.contains("$table->foreign('user_id')->references('id')->on('users');"));
    assert!(relations.contains("$table->dropForeign('posts_user_id_foreign');"));

    assert_eq!(entries[3].1, BLOG_SCHEMA);
}

#[test]
fn test_generate_uses_config_file() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), BLOG_SCHEMA);
    std::fs::write(
        dir.path().join("schemer.toml"),
        "output = \"build/migrations.zip\"\nbase_time = \"2024-01-01T00:00:00\"\nstep_seconds = 1\n",
    )
    .unwrap();

    schemer(dir.path())
        .arg("generate")
        .arg(&schema)
        .assert()
        .success();

    let entries = archive_entries(&dir.path().join("build/migrations.zip"));
    assert_eq!(entries[1].0, "2024_01_01_000001_create_posts_table.php");
}

#[test]
fn test_generate_into_directory() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), BLOG_SCHEMA);
    let migrations = dir.path().join("database/migrations");

    schemer(dir.path())
        .arg("generate")
        .arg(&schema)
        .arg("--dir")
        .arg(&migrations)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 migrations"));

    let count = std::fs::read_dir(&migrations).unwrap().count();
    assert_eq!(count, 3);
    assert!(!migrations.join("schema.json").exists());

    // A second run would duplicate the migrations
    schemer(dir.path())
        .arg("generate")
        .arg(&schema)
        .arg("--dir")
        .arg(&migrations)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    schemer(dir.path())
        .arg("generate")
        .arg(&schema)
        .arg("--dir")
        .arg(&migrations)
        .arg("--overwrite")
        .assert()
        .success();
}

#[test]
fn test_generate_malformed_schema_leaves_no_archive() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(
        dir.path(),
        r#"{"tables": [{"id": 9, "name": "ghosts"}], "columns": {}}"#,
    );
    let output = dir.path().join("out.zip");

    schemer(dir.path())
        .arg("generate")
        .arg(&schema)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghosts"));

    assert!(!output.exists());
}

#[test]
fn test_generate_unresolved_foreign_key() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), DANGLING_SCHEMA);
    let output = dir.path().join("out.zip");

    schemer(dir.path())
        .arg("generate")
        .arg(&schema)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("authors"));
    assert!(!output.exists());

    schemer(dir.path())
        .arg("generate")
        .arg(&schema)
        .arg("-o")
        .arg(&output)
        .arg("--lenient-fks")
        .assert()
        .success()
        .stderr(predicate::str::contains("warning:").count(1));
    assert_eq!(archive_entries(&output).len(), 3);
}

#[test]
fn test_generate_missing_schema_file() {
    let dir = TempDir::new().unwrap();

    schemer(dir.path())
        .args(["generate", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load schema"));
}

// ============================================================================
// validate / preview / inspect
// ============================================================================

#[test]
fn test_validate() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), BLOG_SCHEMA);

    schemer(dir.path())
        .arg("validate")
        .arg(&schema)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 tables, 1 foreign keys"));
}

#[test]
fn test_preview_single_file() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), BLOG_SCHEMA);

    schemer(dir.path())
        .arg("preview")
        .arg(&schema)
        .args(["--file", "create_users_table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("class CreateUsersTable extends Migration"))
        .stdout(predicate::str::contains("posts").not());
}

#[test]
fn test_preview_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), BLOG_SCHEMA);

    schemer(dir.path())
        .arg("preview")
        .arg(&schema)
        .assert()
        .success()
        .stdout(predicate::str::contains("Table migrations: 2"));

    assert!(!dir.path().join("migrations.zip").exists());
}

#[test]
fn test_inspect_archive() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), BLOG_SCHEMA);
    let output = dir.path().join("out.zip");

    schemer(dir.path())
        .arg("generate")
        .arg(&schema)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    schemer(dir.path())
        .arg("inspect")
        .arg(&output)
        .arg("--schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("4 entries, 2 tables, 1 foreign keys"))
        .stdout(predicate::str::contains("\"softDelete\": true"));
}
