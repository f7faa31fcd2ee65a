//! CLI integration tests
//!
//! Run the `mirg` binary against a temporary database and migrations directory.

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn setup_migrations(temp_dir: &TempDir) -> PathBuf {
    let dir = temp_dir.path().join("migrations");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("0001_merchants.up.sql"),
        "CREATE TABLE merchants (external_id BIGINT PRIMARY KEY, name VARCHAR NOT NULL);",
    )
    .unwrap();
    fs::write(dir.join("0001_merchants.down.sql"), "DROP TABLE merchants;").unwrap();
    fs::write(dir.join("0002_a.up.sql"), "CREATE TABLE a (name VARCHAR(30));").unwrap();
    dir
}

fn run(args: &[&str], db: &Path, dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mirg"))
        .args(args)
        .arg("--db")
        .arg(db)
        .arg("--dir")
        .arg(dir)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI")
}

fn stored_version(db: &Path) -> i64 {
    let conn = Connection::open(db).unwrap();
    conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn test_cli_up_applies_and_reports() {
    let temp_dir = TempDir::new().unwrap();
    let dir = setup_migrations(&temp_dir);
    let db = temp_dir.path().join("store.db");

    let output = run(&["up"], &db, &dir);
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Created schema_version table"));
    assert!(stdout.contains("Migrated 0 -> 2 (applied: 1, 2)"));
    assert_eq!(stored_version(&db), 2);

    // Second run is a no-op
    let output = run(&["up"], &db, &dir);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Schema version 2 is up to date"));
}

#[test]
fn test_cli_status_is_read_only() {
    let temp_dir = TempDir::new().unwrap();
    let dir = setup_migrations(&temp_dir);
    let db = temp_dir.path().join("store.db");

    // Missing database file is an error, and status does not create it
    let output = run(&["status"], &db, &dir);
    assert!(!output.status.success());
    assert!(!db.exists());

    Connection::open(&db)
        .unwrap()
        .execute_batch("CREATE TABLE unrelated (id INTEGER);")
        .unwrap();
    let output = run(&["status"], &db, &dir);
    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Schema version: none"));
    assert!(stdout.contains("Pending: 1, 2"));

    run(&["up"], &db, &dir);
    let output = run(&["status", "--log-format", "json"], &db, &dir);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Schema version: 2"));
    assert!(stdout.contains("Pending: none"));
}

#[test]
fn test_cli_failing_migration_exits_nonzero() {
    let temp_dir = TempDir::new().unwrap();
    let dir = setup_migrations(&temp_dir);
    let db = temp_dir.path().join("store.db");
    run(&["up"], &db, &dir);

    fs::write(
        dir.join("0003_bad.up.sql"),
        "CREATE TABLE b (id INTEGER); CREATE INDEX b_idx ON b (missing_column);",
    )
    .unwrap();

    let output = run(&["up"], &db, &dir);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_MIGRATION_FAILED"), "{}", stderr);
    assert_eq!(stored_version(&db), 2);
}
