//! Report generation for diffs and classified changes.
//!
//! Three output formats:
//! - Text: one line per change, uncolored, for terminals and CI logs
//! - JSON: structured data for programmatic integration
//! - YAML: the same structure, easier to read by eye
//!
//! Reporters render either the ordered change list produced by the
//! [`Checker`](crate::checker::Checker) or the raw structural diff tree.

mod json;
mod text;
mod types;
mod yaml;

pub use json::JsonReporter;
pub use text::TextReporter;
pub use types::{ChangeSummary, ReportFormat, ReportMetadata};
pub use yaml::YamlReporter;

use crate::changes::Change;
use crate::diff::DocumentDiff;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// Serialized form of a change report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangeReport<'a> {
    tool: ToolInfo,
    #[serde(flatten)]
    metadata: &'a ReportMetadata,
    summary: ChangeSummary,
    changes: &'a [Change],
}

/// Serialized form of a diff-tree report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DiffReport<'a, 'd> {
    tool: ToolInfo,
    #[serde(flatten)]
    metadata: &'a ReportMetadata,
    diff: &'a DocumentDiff<'d>,
}

#[derive(Debug, Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

const TOOL: ToolInfo = ToolInfo {
    name: "api-diff",
    version: env!("CARGO_PKG_VERSION"),
};

impl<'a> ChangeReport<'a> {
    pub(crate) fn new(changes: &'a [Change], metadata: &'a ReportMetadata) -> Self {
        Self {
            tool: TOOL,
            metadata,
            summary: ChangeSummary::from_changes(changes),
            changes,
        }
    }
}

impl<'a, 'd> DiffReport<'a, 'd> {
    pub(crate) const fn new(diff: &'a DocumentDiff<'d>, metadata: &'a ReportMetadata) -> Self {
        Self {
            tool: TOOL,
            metadata,
            diff,
        }
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render classified changes
    fn generate_changes_report(
        &self,
        changes: &[Change],
        metadata: &ReportMetadata,
    ) -> Result<String>;

    /// Render the structural diff tree
    fn generate_diff_report(
        &self,
        diff: &DocumentDiff<'_>,
        metadata: &ReportMetadata,
    ) -> Result<String>;

    /// Write a change report to a writer
    fn write_changes_report(
        &self,
        changes: &[Change],
        metadata: &ReportMetadata,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let report = self.generate_changes_report(changes, metadata)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Text => Box::new(TextReporter::new()),
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Yaml => Box::new(YamlReporter::new()),
    }
}
