//! CLI command handlers.
//!
//! Testable handlers invoked by main.rs. Each handler implements the
//! business logic for one subcommand and returns the desired exit code.

mod check;
mod diff;
mod list;

pub use check::run_check;
pub use diff::run_diff;
pub use list::{render_checks, run_list_checks};

use std::path::PathBuf;

/// The two documents being compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPaths {
    /// Path to the base document
    pub base: PathBuf,
    /// Path to the revision document
    pub revision: PathBuf,
}

impl DiffPaths {
    #[must_use]
    pub fn new(base: impl Into<PathBuf>, revision: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            revision: revision.into(),
        }
    }

    pub(crate) fn metadata(&self) -> crate::reports::ReportMetadata {
        crate::reports::ReportMetadata::new(
            self.base.display().to_string(),
            self.revision.display().to_string(),
        )
    }
}
