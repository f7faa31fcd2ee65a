//! Migration framework
//!
//! Provides:
//! - An explicit registry of numbered up/down steps
//! - A runner that applies pending steps in key order inside one transaction
//! - Bootstrap and read/write of the single-row `schema_version` table

mod registry;
mod runner;
pub mod version;

pub use registry::{Migration, NoDown, Registry, Step};
pub use runner::{Runner, UpReport};
