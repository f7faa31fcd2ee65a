//! mirg CLI
//!
//! Command-line interface for running SQL-file migrations against SQLite

use clap::{Parser, Subcommand, ValueEnum};
use mirg_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human-readable logs on stderr
    Pretty,
    /// JSON logs on stderr
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "mirg")]
#[command(about = "mirg - Minimal schema migration runner", long_about = None)]
struct Cli {
    /// Log output format (RUST_LOG overrides the level filter)
    #[arg(long, value_enum, global = true, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply all pending migrations
    Up(commands::TargetArgs),
    /// Show the stored schema version and pending migrations
    Status(commands::TargetArgs),
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Up(args) => commands::up::execute(args),
        Commands::Status(args) => commands::status::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
