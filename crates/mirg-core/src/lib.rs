//! mirg Core - error and logging facilities shared by the migration crates
//!
//! Provides:
//! - `MgError`, the structured error returned at every public boundary
//! - The logging facility (`init`, `log_op_*` macros, test capture)
//! - Canonical field keys and event names for structured logs

pub mod errors;
pub mod logging_facility;
pub mod schema;

// Re-export commonly used types
pub use errors::{MgError, MgErrorKind, Result};
