use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use rusqlite::Connection;

/// Runs the `ocean` binary with colors disabled.
fn ocean(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ocean"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run ocean binary")
}

/// Runs the `ocean` binary with `input` written to its stdin.
fn ocean_with_input(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_ocean"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run ocean binary");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Fixture with `memories` (5 rows) and `models` (4 rows).
fn sample_db(dir: &Path) -> PathBuf {
    let path = dir.join("universe.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE memories (
             id INTEGER PRIMARY KEY,
             content TEXT NOT NULL,
             importance REAL DEFAULT 0.5
         );
         CREATE TABLE models (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
         INSERT INTO memories (content) VALUES ('one'), ('two'), ('three'), ('four'), ('five');
         INSERT INTO models (name) VALUES ('a'), ('b'), ('c'), ('d');",
    )
    .unwrap();
    path
}

fn count(path: &Path, table: &str) -> i64 {
    let conn = Connection::open(path).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

/// Registers a virtual table whose module this build does not ship.
fn plant_unloadable_table(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "PRAGMA writable_schema = ON;
         INSERT INTO sqlite_master (type, name, tbl_name, rootpage, sql)
         VALUES ('table', 'ghost', 'ghost', 0, 'CREATE VIRTUAL TABLE ghost USING vec0(embedding)');
         PRAGMA writable_schema = OFF;",
    )
    .unwrap();
}

#[test]
fn test_schema_prints_tree() {
    let dir = tempfile::tempdir().unwrap();
    let db = sample_db(dir.path());

    let output = ocean(&["schema", db.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("├── memories (5 rows)"));
    assert!(text.contains("└── models (4 rows)"));
    assert!(text.contains("importance REAL DEFAULT 0.5"));
    assert!(text.contains("id INTEGER [PK]"));
}

#[test]
fn test_schema_on_missing_file_fails_without_creating_it() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.db");

    let output = ocean(&["schema", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error: cannot open database"));
    assert!(!missing.exists());
}

#[test]
fn test_tables_lists_counts() {
    let dir = tempfile::tempdir().unwrap();
    let db = sample_db(dir.path());

    let output = ocean(&["tables", db.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Database Tables"));
    assert!(text.contains("│ memories   │         5 │"));
    assert!(text.contains("│ models     │         4 │"));
}

#[test]
fn test_query_select_with_limit() {
    let dir = tempfile::tempdir().unwrap();
    let db = sample_db(dir.path());

    let output = ocean(&[
        "query",
        db.to_str().unwrap(),
        "SELECT content FROM memories ORDER BY id",
        "--limit",
        "2",
    ]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("│ one     │"));
    assert!(!text.contains("three"));
    assert!(text.contains("Showing first 2 of 5 rows"));
}

#[test]
fn test_query_is_not_read_only() {
    let dir = tempfile::tempdir().unwrap();
    let db = sample_db(dir.path());

    let output = ocean(&[
        "query",
        db.to_str().unwrap(),
        "INSERT INTO models (name) VALUES ('e')",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Query executed successfully. Rows affected: 1"));
    assert_eq!(count(&db, "models"), 5);

    let output = ocean(&["query", db.to_str().unwrap(), "DELETE FROM memories"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Rows affected: 5"));
    assert_eq!(count(&db, "memories"), 0);
}

#[test]
fn test_query_error_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let db = sample_db(dir.path());

    let output = ocean(&["query", db.to_str().unwrap(), "SELEC oops"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("syntax error"));
}

#[test]
fn test_create_new_and_forced_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let fresh = dir.path().join("fresh.db");

    let output = ocean(&["create", fresh.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(fresh.is_file());
    assert!(stdout(&output).contains("Created database"));

    let db = sample_db(dir.path());
    let output = ocean(&["create", db.to_str().unwrap(), "--force"]);
    assert!(output.status.success());

    let output = ocean(&["tables", db.to_str().unwrap()]);
    assert!(stdout(&output).contains("No tables found in database"));
}

#[test]
fn test_create_existing_declined_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let db = sample_db(dir.path());

    let output = ocean_with_input(&["create", db.to_str().unwrap()], "n\n");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Aborted."));
    assert!(!stdout(&output).contains("Created database"));
    assert!(db.is_file());
    assert_eq!(count(&db, "memories"), 5);
    assert_eq!(count(&db, "models"), 4);
}

#[test]
fn test_create_existing_confirmed_replaces_file() {
    let dir = tempfile::tempdir().unwrap();
    let db = sample_db(dir.path());

    let output = ocean_with_input(&["create", db.to_str().unwrap()], "y\n");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Created database"));

    let output = ocean(&["tables", db.to_str().unwrap()]);
    assert!(stdout(&output).contains("No tables found in database"));
}

#[test]
fn test_schema_lists_table_with_missing_module() {
    let dir = tempfile::tempdir().unwrap();
    let db = sample_db(dir.path());
    plant_unloadable_table(&db);

    let output = ocean(&["schema", db.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("ghost (0 rows)"));
    assert!(text.contains("memories (5 rows)"));
}

#[test]
fn test_catalog_json_lists_oceans() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("oceans");
    let ocean_dir = root.join("t").join("tide");
    fs::create_dir_all(&ocean_dir).unwrap();
    let conn = Connection::open(ocean_dir.join("ocean.db")).unwrap();
    conn.execute_batch(
        "CREATE TABLE memories (id INTEGER PRIMARY KEY, payload TEXT);
         INSERT INTO memories (payload) VALUES ('{\"ocean_name\": \"Tide Pool\"}'), ('later');",
    )
    .unwrap();
    drop(conn);

    let config = dir.path().join("ocean.yaml");
    fs::write(
        &config,
        format!("known_roots: []\nocean_root: {}\n", root.display()),
    )
    .unwrap();

    let output = ocean(&["catalog", "--json", "--config", config.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let doc: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let oceans = doc["oceans"].as_array().unwrap();
    assert_eq!(oceans.len(), 1);
    assert_eq!(oceans[0]["identifier"], "tide");
    assert_eq!(oceans[0]["metadata"]["memory_count"], 2);
    assert_eq!(oceans[0]["metadata"]["display_name"], "Tide Pool");
    assert_eq!(doc["known_roots"].as_array().unwrap().len(), 0);
}

#[test]
fn test_catalog_text_with_empty_root() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("ocean.yaml");
    fs::write(
        &config,
        format!("known_roots: []\nocean_root: {}\n", dir.path().join("none").display()),
    )
    .unwrap();

    let output = ocean(&["--config", config.to_str().unwrap(), "catalog"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No oceans found under"));
}
