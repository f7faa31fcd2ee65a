// Integration tests for loading migrations from a directory of SQL files

#![allow(clippy::unwrap_used, clippy::expect_used)]

use mirg_core::MgErrorKind;
use mirg_store::sql_dir::load_dir;
use mirg_store::{Registry, Runner};
use rusqlite::Connection;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, file: &str, sql: &str) {
    fs::write(dir.path().join(file), sql).unwrap();
}

#[test]
fn test_load_dir_registers_sorted_migrations() {
    let dir = TempDir::new().unwrap();
    write(&dir, "0010_add_a.up.sql", "CREATE TABLE a (name TEXT);");
    write(&dir, "0002_users.up.sql", "CREATE TABLE users (id INTEGER);");
    write(&dir, "0002_users.down.sql", "DROP TABLE users;");
    write(&dir, "notes.txt", "not a migration");

    let mut registry = Registry::new();
    let loaded = load_dir(dir.path(), &mut registry).unwrap();

    assert_eq!(loaded, vec![2, 10]);
    assert_eq!(registry.sorted_keys(), vec![2, 10]);
    let users = registry.get(2).unwrap();
    assert_eq!(users.name(), Some("users"));
    assert!(users.has_down());
    assert!(!registry.get(10).unwrap().has_down());
}

#[test]
fn test_loaded_migrations_run() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "1_merchants.up.sql",
        "CREATE TABLE merchants (external_id BIGINT PRIMARY KEY, name VARCHAR NOT NULL);",
    );
    write(&dir, "2_a.up.sql", "CREATE TABLE a (name VARCHAR(30));");

    let mut registry = Registry::new();
    load_dir(dir.path(), &mut registry).unwrap();

    let mut conn = Connection::open_in_memory().unwrap();
    let report = Runner::new(&mut conn, &registry).up().unwrap();

    assert_eq!(report.applied, vec![1, 2]);
    let version: i64 = conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, 2);
}

#[test]
fn test_down_without_up_is_rejected() {
    let dir = TempDir::new().unwrap();
    write(&dir, "3_orphan.down.sql", "DROP TABLE x;");

    let mut registry = Registry::new();
    let err = load_dir(dir.path(), &mut registry).unwrap_err();

    assert_eq!(err.kind(), MgErrorKind::InvalidInput);
    assert_eq!(err.key(), Some(3));
    assert!(registry.is_empty());
}

#[test]
fn test_duplicate_up_for_same_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    write(&dir, "4_first.up.sql", "SELECT 1;");
    write(&dir, "0004_second.up.sql", "SELECT 2;");

    let mut registry = Registry::new();
    let err = load_dir(dir.path(), &mut registry).unwrap_err();

    assert_eq!(err.kind(), MgErrorKind::InvalidInput);
    assert_eq!(err.key(), Some(4));
    assert!(err.message().contains("duplicate up migration"));
}

#[test]
fn test_bad_file_name_leaves_registry_untouched() {
    let dir = TempDir::new().unwrap();
    write(&dir, "1_ok.up.sql", "SELECT 1;");
    write(&dir, "first.up.sql", "SELECT 2;");

    let mut registry = Registry::new();
    let err = load_dir(dir.path(), &mut registry).unwrap_err();

    assert_eq!(err.kind(), MgErrorKind::InvalidInput);
    assert!(registry.is_empty());
}

#[test]
fn test_missing_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let mut registry = Registry::new();

    let err = load_dir(&dir.path().join("absent"), &mut registry).unwrap_err();

    assert_eq!(err.kind(), MgErrorKind::Io);
}
