//! JSON report generator.

use super::{ChangeReport, DiffReport, ReportFormat, ReportGenerator, ReportMetadata};
use crate::changes::Change;
use crate::diff::DocumentDiff;
use crate::error::{ApiDiffError, ReportErrorKind, Result};
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn render<T: Serialize>(&self, report: &T) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        let mut json = rendered.map_err(|e| {
            ApiDiffError::report(
                "rendering JSON report",
                ReportErrorKind::JsonSerializationError(e.to_string()),
            )
        })?;
        json.push('\n');
        Ok(json)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate_changes_report(
        &self,
        changes: &[Change],
        metadata: &ReportMetadata,
    ) -> Result<String> {
        self.render(&ChangeReport::new(changes, metadata))
    }

    fn generate_diff_report(
        &self,
        diff: &DocumentDiff<'_>,
        metadata: &ReportMetadata,
    ) -> Result<String> {
        self.render(&DiffReport::new(diff, metadata))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}
