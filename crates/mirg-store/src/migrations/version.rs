//! The `schema_version` table: bootstrap, read and write of the single row

use crate::errors::{bootstrap_error, version_read_error, version_update_error, Result};
use rusqlite::{params, Connection, TransactionBehavior};

pub const SCHEMA_VERSION_TABLE: &str = "schema_version";

const TABLE_EXISTS_SQL: &str = "SELECT EXISTS (
    SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'
)";
const CREATE_TABLE_SQL: &str = "CREATE TABLE schema_version (version INTEGER NOT NULL)";
const INSERT_ZERO_SQL: &str = "INSERT INTO schema_version (version) VALUES (0)";
const SELECT_VERSION_SQL: &str = "SELECT version FROM schema_version LIMIT 1";
const UPDATE_VERSION_SQL: &str = "UPDATE schema_version SET version = ?1";

/// Whether the version table exists in the main schema
pub fn table_exists(conn: &Connection) -> Result<bool> {
    conn.query_row(TABLE_EXISTS_SQL, [], |row| row.get(0))
        .map_err(|e| bootstrap_error("can't check for schema version table", e))
}

/// Create the version table holding 0 if it is missing.
///
/// Creation and the initial row share one transaction, so an interrupted
/// bootstrap never leaves an empty table behind. Returns `true` when the
/// table was created by this call.
pub fn ensure_table(conn: &mut Connection) -> Result<bool> {
    if table_exists(conn)? {
        return Ok(false);
    }

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| bootstrap_error("can't begin bootstrap transaction", e))?;

    // Another connection may have bootstrapped while we waited for the lock
    if table_exists(&tx)? {
        return Ok(false);
    }

    tx.execute(CREATE_TABLE_SQL, [])
        .map_err(|e| bootstrap_error("can't create schema version table", e))?;
    tx.execute(INSERT_ZERO_SQL, [])
        .map_err(|e| bootstrap_error("can't add zero schema version", e))?;
    tx.commit()
        .map_err(|e| bootstrap_error("can't commit schema version table", e))?;

    Ok(true)
}

/// Read the stored version
pub fn read(conn: &Connection) -> Result<i64> {
    conn.query_row(SELECT_VERSION_SQL, [], |row| row.get(0))
        .map_err(version_read_error)
}

/// Overwrite the stored version
pub fn write(conn: &Connection, version: i64) -> Result<()> {
    conn.execute(UPDATE_VERSION_SQL, params![version])
        .map_err(|e| version_update_error(version, e))?;
    Ok(())
}
