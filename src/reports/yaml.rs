//! YAML report generator.

use super::{ChangeReport, DiffReport, ReportFormat, ReportGenerator, ReportMetadata};
use crate::changes::Change;
use crate::diff::DocumentDiff;
use crate::error::{ApiDiffError, ReportErrorKind, Result};
use serde::Serialize;

/// YAML report generator
#[derive(Default)]
pub struct YamlReporter;

impl YamlReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn render<T: Serialize>(report: &T) -> Result<String> {
    serde_yaml::to_string(report).map_err(|e| {
        ApiDiffError::report(
            "rendering YAML report",
            ReportErrorKind::YamlSerializationError(e.to_string()),
        )
    })
}

impl ReportGenerator for YamlReporter {
    fn generate_changes_report(
        &self,
        changes: &[Change],
        metadata: &ReportMetadata,
    ) -> Result<String> {
        render(&ChangeReport::new(changes, metadata))
    }

    fn generate_diff_report(
        &self,
        diff: &DocumentDiff<'_>,
        metadata: &ReportMetadata,
    ) -> Result<String> {
        render(&DiffReport::new(diff, metadata))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Yaml
    }
}
