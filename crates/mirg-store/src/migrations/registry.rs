//! Registry of numbered migrations
//!
//! The host application builds a `Registry` before running migrations and
//! lends it to a [`Runner`](super::Runner). Keys order application; any `i64`
//! is accepted and re-registering a key replaces the earlier entry.

use rusqlite::Transaction;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;

type StepFn = dyn Fn(&Transaction<'_>) -> rusqlite::Result<()> + Send + Sync;

/// Step type to name when a migration has no down step: `None::<NoDown>`
pub type NoDown = fn(&Transaction<'_>) -> rusqlite::Result<()>;

/// One transformation step, run against the open migration transaction
pub struct Step(Box<StepFn>);

impl Step {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Transaction<'_>) -> rusqlite::Result<()> + Send + Sync + 'static,
    {
        Self(Box::new(f))
    }

    /// Step executing a batch of SQL statements
    pub fn sql(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        Self::new(move |tx| tx.execute_batch(&sql))
    }

    pub fn run(&self, tx: &Transaction<'_>) -> rusqlite::Result<()> {
        (self.0)(tx)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Step(..)")
    }
}

/// A registered migration
#[derive(Debug)]
pub struct Migration {
    name: Option<String>,
    up: Step,
    down: Option<Step>,
}

impl Migration {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn up(&self) -> &Step {
        &self.up
    }

    /// Reverse step, stored for the host; the runner never executes it
    pub fn down(&self) -> Option<&Step> {
        self.down.as_ref()
    }

    pub fn has_down(&self) -> bool {
        self.down.is_some()
    }
}

/// Mapping from key to migration
#[derive(Debug, Default)]
pub struct Registry {
    migrations: BTreeMap<i64, Migration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the migration at `key`
    pub fn add_migration<U, D>(&mut self, key: i64, up: U, down: Option<D>)
    where
        U: Fn(&Transaction<'_>) -> rusqlite::Result<()> + Send + Sync + 'static,
        D: Fn(&Transaction<'_>) -> rusqlite::Result<()> + Send + Sync + 'static,
    {
        self.insert(key, None, Step::new(up), down.map(Step::new));
    }

    /// Insert or replace a migration made of SQL batches
    pub fn add_sql_migration(
        &mut self,
        key: i64,
        name: impl Into<String>,
        up_sql: impl Into<String>,
        down_sql: Option<String>,
    ) {
        let name = name.into();
        let name = (!name.is_empty()).then_some(name);
        self.insert(key, name, Step::sql(up_sql), down_sql.map(Step::sql));
    }

    fn insert(&mut self, key: i64, name: Option<String>, up: Step, down: Option<Step>) {
        if self
            .migrations
            .insert(key, Migration { name, up, down })
            .is_some()
        {
            tracing::debug!(migration_key = key, "replaced registered migration");
        }
    }

    /// Registered keys in ascending order
    pub fn sorted_keys(&self) -> Vec<i64> {
        self.migrations.keys().copied().collect()
    }

    /// Keys strictly greater than `version`, ascending
    pub fn pending_keys(&self, version: i64) -> Vec<i64> {
        self.pending(version).map(|(key, _)| key).collect()
    }

    /// Migrations strictly above `version`, ascending by key
    pub fn pending(&self, version: i64) -> impl Iterator<Item = (i64, &Migration)> + '_ {
        self.migrations
            .range((Bound::Excluded(version), Bound::Unbounded))
            .map(|(key, migration)| (*key, migration))
    }

    pub fn get(&self, key: i64) -> Option<&Migration> {
        self.migrations.get(&key)
    }

    pub fn contains(&self, key: i64) -> bool {
        self.migrations.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}
