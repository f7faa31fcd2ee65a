//! Usage: mirg status --db <PATH> --dir <DIR>
//!
//! Read-only: never creates the database or the version table.

use super::{connect, load_registry, TargetArgs};
use mirg_store::Runner;

/// Execute status command
pub fn execute(args: TargetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = load_registry(&args.dir)?;
    let mut conn = connect(&args, false)?;

    let runner = Runner::new(&mut conn, &registry);
    match runner.current_version()? {
        Some(version) => println!("Schema version: {}", version),
        None => println!("Schema version: none (schema_version table missing)"),
    }

    let pending = runner.pending()?;
    if pending.is_empty() {
        println!("Pending: none");
    } else {
        let keys: Vec<String> = pending.iter().map(i64::to_string).collect();
        println!("Pending: {}", keys.join(", "));
    }

    Ok(())
}
