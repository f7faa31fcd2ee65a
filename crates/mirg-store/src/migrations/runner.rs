//! Migration runner
//!
//! Applies every registered migration above the stored version, in key
//! order, inside a single transaction together with the version bump.

use crate::errors::{commit_error, migration_error, transaction_error, Result};
use crate::migrations::registry::Registry;
use crate::migrations::version;
use mirg_core::{log_op_end, log_op_error, log_op_start, MgError};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Instant;

const OP_UP: &str = "up";

/// Outcome of a successful [`Runner::up`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpReport {
    /// The version table was created by this run
    pub bootstrapped: bool,
    pub previous_version: i64,
    pub new_version: i64,
    /// Keys applied, in application order
    pub applied: Vec<i64>,
}

impl UpReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Brings a database up to the highest registered migration
pub struct Runner<'a> {
    conn: &'a mut Connection,
    registry: &'a Registry,
}

impl<'a> Runner<'a> {
    pub fn new(conn: &'a mut Connection, registry: &'a Registry) -> Self {
        Self { conn, registry }
    }

    /// Apply all pending migrations.
    ///
    /// Bootstraps `schema_version` when missing, then runs every migration
    /// whose key exceeds the stored version and stores the highest applied
    /// key, all in one IMMEDIATE transaction. Any failure after the
    /// transaction begins rolls back every migration of this call.
    ///
    /// # Errors
    ///
    /// `Bootstrap`, `Transaction`, `VersionRead`, `MigrationFailed`,
    /// `VersionUpdate` or `Commit`, after the phase that failed.
    pub fn up(&mut self) -> Result<UpReport> {
        let start = Instant::now();
        log_op_start!(OP_UP, registered = self.registry.len());

        let result = self.run_up();
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(report) => {
                log_op_end!(
                    OP_UP,
                    duration_ms = duration_ms,
                    schema_version = report.new_version,
                    applied = report.applied.len(),
                    bootstrapped = report.bootstrapped
                );
            }
            Err(err) => log_op_error!(OP_UP, err, duration_ms = duration_ms),
        }

        result
    }

    fn run_up(&mut self) -> Result<UpReport> {
        let bootstrapped = version::ensure_table(self.conn)?;
        if bootstrapped {
            tracing::info!("created schema_version table");
        }

        // IMMEDIATE takes the write lock before the version is read, so a
        // concurrent runner waits instead of applying the same keys.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(transaction_error)?;

        let previous_version = match version::read(&tx) {
            Ok(v) => v,
            Err(err) => return Err(rollback(tx, err)),
        };
        tracing::info!(
            schema_version = previous_version,
            pending_count = self.registry.pending(previous_version).count(),
            "current schema version"
        );

        let mut new_version = previous_version;
        let mut applied = Vec::new();

        for (key, migration) in self.registry.pending(previous_version) {
            tracing::debug!(
                migration_key = key,
                name = migration.name().unwrap_or(""),
                "applying migration"
            );
            if let Err(err) = migration.up().run(&tx) {
                return Err(rollback(tx, migration_error(key, err)));
            }
            new_version = key;
            applied.push(key);
        }

        if let Err(err) = version::write(&tx, new_version) {
            return Err(rollback(tx, err));
        }

        tx.commit().map_err(commit_error)?;

        Ok(UpReport {
            bootstrapped,
            previous_version,
            new_version,
            applied,
        })
    }

    /// Stored version, or `None` if the version table does not exist yet.
    /// Never bootstraps.
    pub fn current_version(&self) -> Result<Option<i64>> {
        let conn: &Connection = &*self.conn;
        if !version::table_exists(conn)? {
            return Ok(None);
        }
        version::read(conn).map(Some)
    }

    /// Keys the next [`up`](Self::up) would apply, without touching the database
    pub fn pending(&self) -> Result<Vec<i64>> {
        let current = self.current_version()?.unwrap_or(0);
        Ok(self.registry.pending_keys(current))
    }
}

/// Roll back the run transaction and hand back the error that caused it
fn rollback(tx: Transaction<'_>, err: MgError) -> MgError {
    tracing::warn!(
        err.code = err.code(),
        err.key = err.key(),
        "rolling back migration transaction: {}",
        err
    );
    if let Err(rollback_err) = tx.rollback() {
        tracing::error!(error = %rollback_err, "rollback failed");
    }
    err
}
