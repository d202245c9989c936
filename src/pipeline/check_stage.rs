//! Diff and classification stage.
//!
//! Builds the diff engine from the matching configuration, runs the diff,
//! then classifies the result with the configured checks.

use super::PipelineError;
use crate::changes::{Change, Level};
use crate::checker::Checker;
use crate::config::{AppConfig, Validatable};
use crate::diff::{DiffEngine, DocumentDiff};
use crate::loader::LoadedDocument;
use crate::model::SourceLocations;
use anyhow::Result;
use chrono::NaiveDate;

/// Reject a configuration with problems; the first one is reported.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.validate().into_iter().next() {
        Some(error) => Err(PipelineError::ConfigFailed {
            source: error.into(),
        }
        .into()),
        None => Ok(()),
    }
}

/// Compute the structural diff between two loaded documents.
pub fn compute_diff<'a>(
    config: &AppConfig,
    base: &'a LoadedDocument,
    revision: &'a LoadedDocument,
) -> DocumentDiff<'a> {
    if !config.behavior.quiet {
        tracing::info!("Computing structural diff...");
    }
    let diff = DiffEngine::new()
        .with_options(config.matching.diff_options())
        .diff(&base.document, &revision.document);
    if !config.behavior.quiet {
        tracing::info!(
            "Diff: {} operations modified",
            diff.modified_operations().count()
        );
    }
    diff
}

/// Operation positions for both documents.
#[must_use]
pub fn source_locations(base: &LoadedDocument, revision: &LoadedDocument) -> SourceLocations {
    SourceLocations::new(base.locations.clone(), revision.locations.clone())
}

/// Classify a diff into changes at or above `min`, in canonical order.
///
/// `now` pins the date used by deprecation checks; `None` means today.
pub fn classify_changes(
    config: &AppConfig,
    diff: &DocumentDiff<'_>,
    sources: &SourceLocations,
    min: Level,
    now: Option<NaiveDate>,
) -> Result<Vec<Change>> {
    let check_config = config
        .check_config(now)
        .map_err(|e| PipelineError::ConfigFailed { source: e.into() })?;
    let checker = Checker::new(check_config);
    if !config.behavior.quiet {
        tracing::info!(
            "Running {} checks",
            checker.enabled_checks().count()
        );
    }
    Ok(checker.run_filtered(diff, sources, min))
}
