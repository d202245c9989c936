//! Plain-text report generator.

use super::{ChangeSummary, ReportFormat, ReportGenerator, ReportMetadata, YamlReporter};
use crate::changes::{Change, ChangeContext};
use crate::diff::DocumentDiff;
use crate::error::Result;
use std::fmt::Write as _;

/// Plain-text reporter: one line per change plus where it happened.
pub struct TextReporter {
    /// Print the per-level summary line
    show_summary: bool,
}

impl TextReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { show_summary: true }
    }

    /// Omit the trailing summary line.
    #[must_use]
    pub const fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn location(change: &Change) -> String {
    let mut line = match &change.context {
        ChangeContext::Api {
            path,
            method,
            operation_id,
        } => {
            let mut api = format!("in API {method} {path}");
            if let Some(id) = operation_id {
                let _ = write!(api, " ({id})");
            }
            api
        }
        ChangeContext::Component { name } => format!("in component {name}"),
        ChangeContext::Security => "in global security".to_string(),
    };
    if let Some(source) = &change.source {
        let _ = write!(line, " at {source}");
    }
    line
}

impl ReportGenerator for TextReporter {
    fn generate_changes_report(
        &self,
        changes: &[Change],
        metadata: &ReportMetadata,
    ) -> Result<String> {
        let mut out = String::new();
        if let (Some(base), Some(revision)) = (&metadata.base_path, &metadata.revision_path) {
            let _ = writeln!(out, "Comparing {base} -> {revision}");
            out.push('\n');
        }
        if changes.is_empty() {
            out.push_str("No changes\n");
            return Ok(out);
        }
        for change in changes {
            let _ = writeln!(out, "{}", change.summary());
            let _ = writeln!(out, "    {}", location(change));
        }
        if self.show_summary {
            let _ = writeln!(out, "\n{}", ChangeSummary::from_changes(changes));
        }
        Ok(out)
    }

    fn generate_diff_report(
        &self,
        diff: &DocumentDiff<'_>,
        metadata: &ReportMetadata,
    ) -> Result<String> {
        if diff.is_empty() {
            return Ok("No changes\n".to_string());
        }
        // The diff tree reads best as YAML.
        YamlReporter::new().generate_diff_report(diff, metadata)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }
}
