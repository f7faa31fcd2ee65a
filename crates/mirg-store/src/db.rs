//! Database connection management

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Duration;

/// Connection settings applied by [`configure`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbOptions {
    /// How long a statement waits on another connection's lock
    pub busy_timeout: Duration,
    /// Enforce foreign keys (off by default in SQLite)
    pub foreign_keys: bool,
}

impl Default for DbOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
            foreign_keys: true,
        }
    }
}

/// Open a SQLite database at the given path, creating it if needed
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an existing SQLite database; fails if the file is missing
pub fn open_existing<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Apply connection settings
pub fn configure(conn: &Connection, options: &DbOptions) -> Result<()> {
    conn.busy_timeout(options.busy_timeout)
        .map_err(from_rusqlite)?;
    conn.pragma_update(None, "foreign_keys", options.foreign_keys)
        .map_err(from_rusqlite)?;

    Ok(())
}
