//! Report output stage.

use super::{exit_codes, write_output, OutputTarget, PipelineError};
use crate::changes::{Change, Level};
use crate::config::AppConfig;
use crate::diff::DocumentDiff;
use crate::reports::{create_reporter, ReportMetadata};
use anyhow::Result;

/// Render classified changes and write them to the configured destination.
pub fn output_changes_report(
    config: &AppConfig,
    changes: &[Change],
    metadata: &ReportMetadata,
) -> Result<()> {
    let reporter = create_reporter(config.output.format);
    let report = reporter
        .generate_changes_report(changes, metadata)
        .map_err(|e| PipelineError::ReportFailed { source: e.into() })?;
    let target = OutputTarget::from_option(config.output.file.clone());
    write_output(&report, &target, config.behavior.quiet)
}

/// Render the structural diff tree and write it to the configured destination.
pub fn output_diff_report(
    config: &AppConfig,
    diff: &DocumentDiff<'_>,
    metadata: &ReportMetadata,
) -> Result<()> {
    let reporter = create_reporter(config.output.format);
    let report = reporter
        .generate_diff_report(diff, metadata)
        .map_err(|e| PipelineError::ReportFailed { source: e.into() })?;
    let target = OutputTarget::from_option(config.output.file.clone());
    write_output(&report, &target, config.behavior.quiet)
}

/// Exit code for a run: [`exit_codes::CHANGES_DETECTED`] when any change
/// reaches `fail_on`.
#[must_use]
pub fn exit_code_for(changes: &[Change], fail_on: Option<Level>) -> i32 {
    match fail_on {
        Some(threshold) if changes.iter().any(|c| c.level >= threshold) => {
            exit_codes::CHANGES_DETECTED
        }
        _ => exit_codes::SUCCESS,
    }
}
