//! Usage: mirg up --db <PATH> --dir <DIR>

use super::{connect, load_registry, TargetArgs};
use mirg_store::Runner;

/// Execute up command
pub fn execute(args: TargetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = load_registry(&args.dir)?;
    let mut conn = connect(&args, true)?;

    let report = Runner::new(&mut conn, &registry).up()?;

    if report.bootstrapped {
        println!("Created schema_version table");
    }
    if report.is_noop() {
        println!("Schema version {} is up to date", report.new_version);
    } else {
        let applied: Vec<String> = report.applied.iter().map(i64::to_string).collect();
        println!(
            "Migrated {} -> {} (applied: {})",
            report.previous_version,
            report.new_version,
            applied.join(", ")
        );
    }

    Ok(())
}
