//! Configuration validation.
//!
//! Rule ids and check names are checked against the registry, so a typo in
//! a config file is reported instead of silently ignored.

use super::types::{AppConfig, ChecksConfig, OutputConfig};
use crate::checks::registry;
use crate::config::overrides::parse_level_token;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// Error for a check name the registry does not know.
pub(crate) fn unknown_check(field: &str, name: &str) -> ConfigError {
    ConfigError::new(
        field,
        format!(
            "Unknown check '{name}'. Valid options: {}",
            registry::check_names().join(", ")
        ),
    )
}

/// Error for a rule id the registry does not know.
pub(crate) fn unknown_rule(field: &str, id: &str) -> ConfigError {
    ConfigError::new(field, format!("Unknown rule id '{id}'"))
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.checks.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for ChecksConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for name in &self.enabled {
            if !registry::is_check(name) {
                errors.push(unknown_check("checks.enabled", name));
            }
        }
        for (id, level) in &self.overrides {
            let field = format!("checks.overrides.{id}");
            if registry::rule(id).is_none() {
                errors.push(unknown_rule(&field, id));
            }
            if let Err(message) = parse_level_token(level) {
                errors.push(ConfigError::new(field, message));
            }
        }
        if let Some(path) = &self.severity_levels {
            if !path.exists() {
                errors.push(ConfigError::new(
                    "checks.severity_levels",
                    format!("File does not exist: {}", path.display()),
                ));
            }
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // Validate output file path if specified
        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        errors
    }
}
