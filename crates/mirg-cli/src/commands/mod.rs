pub mod status;
pub mod up;

use clap::Args;
use mirg_core::Result;
use mirg_store::db::{self, DbOptions};
use mirg_store::sql_dir;
use mirg_store::Registry;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Database and migration source shared by every command
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Path to the SQLite database file
    #[arg(long)]
    pub db: PathBuf,

    /// Directory of `<key>_<name>.up.sql` migration files
    #[arg(long)]
    pub dir: PathBuf,

    /// Milliseconds to wait for another connection's lock
    #[arg(long, default_value_t = 5000)]
    pub busy_timeout_ms: u64,
}

impl TargetArgs {
    fn db_options(&self) -> DbOptions {
        DbOptions {
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
            ..DbOptions::default()
        }
    }
}

fn load_registry(dir: &Path) -> Result<Registry> {
    let mut registry = Registry::new();
    sql_dir::load_dir(dir, &mut registry)?;
    Ok(registry)
}

fn connect(args: &TargetArgs, create: bool) -> Result<Connection> {
    let conn = if create {
        db::open(&args.db)?
    } else {
        db::open_existing(&args.db)?
    };
    db::configure(&conn, &args.db_options())?;
    Ok(conn)
}
