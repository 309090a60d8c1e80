//! DocHarvest - dependency documentation harvester and parity gate
//!
//! This library scans a multi-language source tree for external dependency
//! references, keeps a versioned documentation index in step with them, and
//! verifies that removed duplicate configuration files have not reappeared.

pub mod cli;
pub mod docs;
pub mod error;
pub mod harvest;
pub mod index;
pub mod parity;
pub mod qa;
pub mod repo;
pub mod scan;

/// Re-export commonly used types
pub use error::{HarvestError, Result};
pub use harvest::{run_harvest, HarvestMode, HarvestRun, Summary};
pub use index::{DependencyIndex, IndexEntry};
pub use parity::{ParityReport, ParityStatus, ParityVerifier};
pub use repo::{HarvestConfig, Workspace};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "docharvest";

/// Result of a gate that ran to completion.
///
/// Internal failures are reported as errors instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to fix
    Clean,
    /// The tree needs fixing: stale index, missing docs or a parity violation
    Drift,
}
