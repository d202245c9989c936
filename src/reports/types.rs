//! Report type definitions.

use crate::changes::{Change, Level};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One line per change, for terminals and CI logs
    #[default]
    Text,
    /// Structured JSON output
    Json,
    /// Structured YAML output
    Yaml,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Where the compared documents came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_path: Option<String>,
}

impl ReportMetadata {
    #[must_use]
    pub fn new(base_path: impl Into<String>, revision_path: impl Into<String>) -> Self {
        Self {
            base_path: Some(base_path.into()),
            revision_path: Some(revision_path.into()),
        }
    }
}

/// Change counts per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub err: usize,
    pub warn: usize,
    pub info: usize,
}

impl ChangeSummary {
    #[must_use]
    pub fn from_changes(changes: &[Change]) -> Self {
        let mut summary = Self::default();
        for change in changes {
            match change.level {
                Level::Err => summary.err += 1,
                Level::Warn => summary.warn += 1,
                Level::Info => summary.info += 1,
            }
        }
        summary
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.err + self.warn + self.info
    }
}

impl std::fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} changes: {} error, {} warning, {} info",
            self.total(),
            self.err,
            self.warn,
            self.info
        )
    }
}
