//! mirg Store - SQLite schema migrations tracked by a single version row
//!
//! Provides:
//! - `Registry` of numbered migrations built by the host application
//! - `Runner` applying pending migrations atomically and bumping `schema_version`
//! - Loader for directories of `<key>_<name>.up.sql` files
//! - Connection helpers

pub mod db;
pub mod errors;
pub mod migrations;
pub mod sql_dir;

// Re-export key types
pub use errors::Result;
pub use migrations::{Migration, NoDown, Registry, Runner, Step, UpReport};
