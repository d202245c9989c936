//! Output handling for reports.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => Self::File(p),
            None => Self::Stdout,
        }
    }
}

/// Write output to the target (stdout or file)
pub fn write_output(content: &str, target: &OutputTarget, quiet: bool) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            print!("{content}");
            Ok(())
        }
        OutputTarget::File(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !quiet {
                tracing::info!("Report written to {}", path.display());
            }
            Ok(())
        }
    }
}
