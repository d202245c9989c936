//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[".api-diff.yaml", ".api-diff.yml", "api-diff.yaml"];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/api-diff/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    // 1. Use explicit path if provided
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    // 2. Search current directory
    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    // 3. Search git root (if in a repo)
    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    // 4. Search user config directory
    if let Some(path) = dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("api-diff")))
    {
        return Some(path);
    }

    // 5. Search home directory
    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Failure to read or parse a configuration file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigFileError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// This is useful for layering CLI args over file config.
    pub fn merge(&mut self, other: &Self) {
        // Checks config
        if !other.checks.enabled.is_empty() {
            self.checks.enabled.clone_from(&other.checks.enabled);
        }
        if other.checks.severity_levels.is_some() {
            self.checks
                .severity_levels
                .clone_from(&other.checks.severity_levels);
        }
        for (id, level) in &other.checks.overrides {
            self.checks.overrides.insert(id.clone(), level.clone());
        }
        if !other.checks.attributes.is_empty() {
            self.checks.attributes.clone_from(&other.checks.attributes);
        }

        // Deprecation policy, per tier
        if other.deprecation.beta_days != 0 {
            self.deprecation.beta_days = other.deprecation.beta_days;
        }
        if other.deprecation.stable_days != 0 {
            self.deprecation.stable_days = other.deprecation.stable_days;
        }

        // Matching config
        if other.matching.match_path_params {
            self.matching.match_path_params = true;
        }
        if other.matching.strip_prefix_base.is_some() {
            self.matching
                .strip_prefix_base
                .clone_from(&other.matching.strip_prefix_base);
        }
        if other.matching.strip_prefix_revision.is_some() {
            self.matching
                .strip_prefix_revision
                .clone_from(&other.matching.strip_prefix_revision);
        }

        // Output config - only override if explicitly set
        if other.output.format != crate::reports::ReportFormat::default() {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }

        // Behavior config
        if other.behavior.fail_on.is_some() {
            self.behavior.fail_on = other.behavior.fail_on;
        }
        if other.behavior.level.is_some() {
            self.behavior.level = other.behavior.level;
        }
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    r"# api-diff configuration
# Place this file at .api-diff.yaml in your project root or ~/.config/api-diff/
#
# CLI arguments always override file settings.

checks:
  # Checks to run; omit to run all (see `api-diff checks`)
  # enabled: [endpoints, request-parameters, responses]
  # File of `rule-id LEVEL` lines (ERR, WARN, INFO or NONE)
  # severity_levels: ./api-levels.txt
  # overrides:
  #   api-tag-removed: WARN
  # Extension keys copied onto each change
  # attributes: [x-team]

# Minimum days between deprecation and sunset (0 disables)
deprecation:
  beta_days: 0
  stable_days: 0

matching:
  match_path_params: false
  # strip_prefix_base: /api/v1
  # strip_prefix_revision: /api/v2

output:
  # Format: text, json, yaml
  format: text
  # file: changes.json

behavior:
  # Exit with code 1 when a change at or above this level is reported
  # fail_on: ERR
  quiet: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
