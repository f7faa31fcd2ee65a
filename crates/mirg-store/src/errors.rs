//! Error handling for mirg-store
//!
//! Maps rusqlite failures onto `MgError` kinds, one helper per run phase.

use mirg_core::errors::{MgError, MgErrorKind};

/// Result type alias using MgError
pub type Result<T> = std::result::Result<T, MgError>;

/// Table-existence check or table creation failed
pub fn bootstrap_error(reason: &str, err: rusqlite::Error) -> MgError {
    MgError::new(MgErrorKind::Bootstrap)
        .with_op("bootstrap")
        .with_message(format!("{}: {}", reason, err))
        .with_cause(err)
}

/// Stored version could not be read
pub fn version_read_error(err: rusqlite::Error) -> MgError {
    let message = match err {
        rusqlite::Error::QueryReturnedNoRows => "schema_version table has no rows".to_string(),
        ref other => format!("can't get schema version: {}", other),
    };
    MgError::new(MgErrorKind::VersionRead)
        .with_op("read_version")
        .with_message(message)
        .with_cause(err)
}

/// Run transaction could not be opened
pub fn transaction_error(err: rusqlite::Error) -> MgError {
    MgError::new(MgErrorKind::Transaction)
        .with_op("begin")
        .with_message(format!("can't begin transaction: {}", err))
        .with_cause(err)
}

/// A registered up step failed
pub fn migration_error(key: i64, err: rusqlite::Error) -> MgError {
    MgError::new(MgErrorKind::MigrationFailed)
        .with_op("apply_migration")
        .with_key(key)
        .with_message(err.to_string())
        .with_cause(err)
}

/// Writing the new version failed
pub fn version_update_error(version: i64, err: rusqlite::Error) -> MgError {
    MgError::new(MgErrorKind::VersionUpdate)
        .with_op("write_version")
        .with_key(version)
        .with_message(format!("can't update schema version: {}", err))
        .with_cause(err)
}

/// Commit of the run transaction failed
pub fn commit_error(err: rusqlite::Error) -> MgError {
    MgError::new(MgErrorKind::Commit)
        .with_op("commit")
        .with_message(format!("can't commit migrations: {}", err))
        .with_cause(err)
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> MgError {
    MgError::new(MgErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
        .with_cause(err)
}
