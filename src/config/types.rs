//! Configuration types for api-diff runs.

use crate::changes::Level;
use crate::diff::DiffOptions;
use crate::policy::DeprecationPolicy;
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments are layered over file settings with [`AppConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Which checks run and at what severity
    pub checks: ChecksConfig,
    /// Minimum sunset notice per stability tier
    pub deprecation: DeprecationPolicy,
    /// Path matching between the two documents
    pub matching: MatchingConfig,
    /// Output configuration (format, file)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Restrict the run to the named checks.
    pub fn checks<I, S>(mut self, checks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.checks.enabled = checks.into_iter().map(Into::into).collect();
        self
    }

    /// Override one rule's severity (`ERR`, `WARN`, `INFO` or `NONE`).
    pub fn severity(mut self, rule_id: impl Into<String>, level: impl Into<String>) -> Self {
        self.config
            .checks
            .overrides
            .insert(rule_id.into(), level.into());
        self
    }

    /// Read severity overrides from a file.
    pub fn severity_levels_file(mut self, path: Option<PathBuf>) -> Self {
        self.config.checks.severity_levels = path;
        self
    }

    /// Extension keys copied from operations and schemas onto changes.
    pub fn attributes(mut self, attributes: Vec<String>) -> Self {
        self.config.checks.attributes = attributes;
        self
    }

    /// Set the sunset notice policy.
    pub const fn deprecation_days(mut self, beta_days: u32, stable_days: u32) -> Self {
        self.config.deprecation = DeprecationPolicy::new(beta_days, stable_days);
        self
    }

    /// Match paths that differ only in parameter names.
    pub const fn match_path_params(mut self, enabled: bool) -> Self {
        self.config.matching.match_path_params = enabled;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Fail when a change at or above this level is reported.
    pub const fn fail_on(mut self, level: Option<Level>) -> Self {
        self.config.behavior.fail_on = level;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Section Configurations
// ============================================================================

/// Check selection and severity configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ChecksConfig {
    /// Check names to run; empty runs every check
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enabled: Vec<String>,
    /// File of `rule-id LEVEL` lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity_levels: Option<PathBuf>,
    /// Inline severity overrides, applied after the file
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, String>,
    /// Extension keys to copy onto changes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
}

/// Path matching configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchingConfig {
    /// Match `/users/{id}` against `/users/{userId}`
    pub match_path_params: bool,
    /// Prefix stripped from base paths before matching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_prefix_base: Option<String>,
    /// Prefix stripped from revision paths before matching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_prefix_revision: Option<String>,
}

impl MatchingConfig {
    #[must_use]
    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            match_path_params: self.match_path_params,
            strip_prefix_base: self.strip_prefix_base.clone(),
            strip_prefix_revision: self.strip_prefix_revision.clone(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Behavior flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 1 when a change at or above this level is reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<Level>,
    /// Minimum level to report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    /// Suppress non-essential output
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .checks(["request-parameters"])
            .severity("api-tag-removed", "WARN")
            .deprecation_days(30, 90)
            .fail_on(Some(Level::Err))
            .build();
        assert_eq!(config.checks.enabled, vec!["request-parameters"]);
        assert_eq!(config.checks.overrides["api-tag-removed"], "WARN");
        assert_eq!(config.deprecation.stable_days, 90);
        assert_eq!(config.behavior.fail_on, Some(Level::Err));
    }

    #[test]
    fn test_yaml_defaults_fill_missing_sections() {
        let config: AppConfig = serde_yaml::from_str("deprecation:\n  beta_days: 7\n").unwrap();
        assert_eq!(config.deprecation.beta_days, 7);
        assert_eq!(config.deprecation.stable_days, 0);
        assert_eq!(config.output.format, ReportFormat::Text);
    }
}
