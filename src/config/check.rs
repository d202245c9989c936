//! Resolved configuration handed to the checks.

use super::overrides::{load_overrides, parse_level_token, SeverityOverride};
use super::types::AppConfig;
use super::validation::{unknown_check, unknown_rule, ConfigError};
use crate::changes::Level;
use crate::checks::registry;
use crate::policy::DeprecationPolicy;
use chrono::{NaiveDate, Utc};
use std::collections::{HashMap, HashSet};

/// Everything a check needs besides the diff itself.
///
/// Built once per run and shared read-only across checks. Construct it with
/// [`CheckConfig::builder`]; unknown check names and rule ids are rejected.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    checks: Vec<String>,
    overrides: HashMap<String, Level>,
    disabled: HashSet<String>,
    attributes: Vec<String>,
    deprecation: DeprecationPolicy,
    now: NaiveDate,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            checks: Vec::new(),
            overrides: HashMap::new(),
            disabled: HashSet::new(),
            attributes: Vec::new(),
            deprecation: DeprecationPolicy::default(),
            now: Utc::now().date_naive(),
        }
    }
}

impl CheckConfig {
    pub fn builder() -> CheckConfigBuilder {
        CheckConfigBuilder::default()
    }

    /// Effective level of a rule, or `None` when it is disabled.
    #[must_use]
    pub fn level(&self, rule_id: &str) -> Option<Level> {
        if self.disabled.contains(rule_id) {
            return None;
        }
        if let Some(level) = self.overrides.get(rule_id) {
            return Some(*level);
        }
        registry::rule(rule_id).map(|rule| rule.level)
    }

    /// Whether a check runs; an empty selection runs all of them.
    #[must_use]
    pub fn is_check_enabled(&self, name: &str) -> bool {
        self.checks.is_empty() || self.checks.iter().any(|c| c == name)
    }

    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    #[must_use]
    pub const fn deprecation(&self) -> &DeprecationPolicy {
        &self.deprecation
    }

    /// Reference date for sunset comparisons.
    #[must_use]
    pub const fn now(&self) -> NaiveDate {
        self.now
    }
}

/// Builder for [`CheckConfig`].
#[derive(Debug, Default)]
#[must_use]
pub struct CheckConfigBuilder {
    checks: Vec<String>,
    overrides: Vec<SeverityOverride>,
    attributes: Vec<String>,
    deprecation: DeprecationPolicy,
    now: Option<NaiveDate>,
}

impl CheckConfigBuilder {
    /// Restrict the run to the named checks.
    pub fn checks<I, S>(mut self, checks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.checks = checks.into_iter().map(Into::into).collect();
        self
    }

    /// Override a rule's level; `None` disables it. Later overrides win.
    pub fn severity(mut self, rule_id: impl Into<String>, level: Option<Level>) -> Self {
        self.overrides.push((rule_id.into(), level));
        self
    }

    /// Apply a batch of overrides, e.g. from a severity levels file.
    pub fn severities(mut self, overrides: impl IntoIterator<Item = SeverityOverride>) -> Self {
        self.overrides.extend(overrides);
        self
    }

    pub fn attributes(mut self, attributes: Vec<String>) -> Self {
        self.attributes = attributes;
        self
    }

    pub const fn deprecation(mut self, policy: DeprecationPolicy) -> Self {
        self.deprecation = policy;
        self
    }

    /// Fix the reference date; defaults to today (UTC).
    pub const fn now(mut self, now: NaiveDate) -> Self {
        self.now = Some(now);
        self
    }

    /// Validate names against the registry and build the config.
    pub fn build(self) -> Result<CheckConfig, ConfigError> {
        for name in &self.checks {
            if !registry::is_check(name) {
                return Err(unknown_check("checks", name));
            }
        }

        let mut overrides = HashMap::new();
        let mut disabled = HashSet::new();
        for (id, level) in self.overrides {
            if registry::rule(&id).is_none() {
                return Err(unknown_rule("severity", &id));
            }
            match level {
                Some(level) => {
                    disabled.remove(&id);
                    overrides.insert(id, level);
                }
                None => {
                    overrides.remove(&id);
                    disabled.insert(id);
                }
            }
        }

        Ok(CheckConfig {
            checks: self.checks,
            overrides,
            disabled,
            attributes: self.attributes,
            deprecation: self.deprecation,
            now: self.now.unwrap_or_else(|| Utc::now().date_naive()),
        })
    }
}

impl AppConfig {
    /// Resolve the check configuration: severity file first, then inline
    /// overrides.
    pub fn check_config(&self, now: Option<NaiveDate>) -> Result<CheckConfig, ConfigError> {
        let mut builder = CheckConfig::builder()
            .checks(self.checks.enabled.iter().cloned())
            .attributes(self.checks.attributes.clone())
            .deprecation(self.deprecation);
        if let Some(path) = &self.checks.severity_levels {
            builder = builder.severities(load_overrides(path)?);
        }
        for (id, token) in &self.checks.overrides {
            let level = parse_level_token(token)
                .map_err(|message| ConfigError::new(format!("checks.overrides.{id}"), message))?;
            builder = builder.severity(id.clone(), level);
        }
        if let Some(now) = now {
            builder = builder.now(now);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_levels_come_from_registry() {
        let config = CheckConfig::default();
        assert_eq!(config.level("api-path-added"), Some(Level::Info));
        assert_eq!(
            config.level("api-removed-without-deprecation"),
            Some(Level::Err)
        );
        assert!(config.is_check_enabled("endpoints"));
    }

    #[test]
    fn test_overrides_and_disabling() {
        let config = CheckConfig::builder()
            .severity("api-path-added", Some(Level::Warn))
            .severity("api-tag-removed", None)
            .build()
            .unwrap();
        assert_eq!(config.level("api-path-added"), Some(Level::Warn));
        assert_eq!(config.level("api-tag-removed"), None);
    }

    #[test]
    fn test_later_override_wins() {
        let config = CheckConfig::builder()
            .severity("api-tag-removed", None)
            .severity("api-tag-removed", Some(Level::Err))
            .build()
            .unwrap();
        assert_eq!(config.level("api-tag-removed"), Some(Level::Err));
    }

    #[test]
    fn test_unknown_names_rejected() {
        assert!(CheckConfig::builder().checks(["nope"]).build().is_err());
        assert!(CheckConfig::builder()
            .severity("api-vanished", Some(Level::Err))
            .build()
            .is_err());
    }

    #[test]
    fn test_from_app_config() {
        let tmp = tempfile::TempDir::new().unwrap();
        let levels = tmp.path().join("levels.txt");
        std::fs::write(&levels, "api-tag-added ERR\napi-tag-removed NONE\n").unwrap();
        let app = AppConfig::builder()
            .severity_levels_file(Some(levels))
            .severity("api-tag-added", "warn")
            .deprecation_days(0, 30)
            .build();
        let now = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let config = app.check_config(Some(now)).unwrap();
        assert_eq!(config.level("api-tag-added"), Some(Level::Warn));
        assert_eq!(config.level("api-tag-removed"), None);
        assert_eq!(config.deprecation().stable_days, 30);
        assert_eq!(config.now(), now);
    }

    #[test]
    fn test_check_selection() {
        let config = CheckConfig::builder()
            .checks(["request-parameters"])
            .build()
            .unwrap();
        assert!(config.is_check_enabled("request-parameters"));
        assert!(!config.is_check_enabled("endpoints"));
    }
}
