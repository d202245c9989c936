//! Configuration for api-diff.
//!
//! Two layers:
//! - [`AppConfig`]: what a user writes in `.api-diff.yaml` or passes on the
//!   command line, with validation, discovery and CLI merging
//! - [`CheckConfig`]: the resolved, validated view the checks read
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use api_diff::config::{AppConfig, CheckConfig};
//!
//! let (app, loaded_from) = api_diff::config::load_or_default(None);
//! let checks: CheckConfig = app.check_config(None)?;
//! ```
//!
//! # Configuration File
//!
//! ```yaml
//! checks:
//!   severity_levels: ./api-levels.txt
//! deprecation:
//!   beta_days: 14
//!   stable_days: 90
//! behavior:
//!   fail_on: ERR
//! ```

mod check;
pub mod file;
mod overrides;
mod types;
mod validation;

pub use check::{CheckConfig, CheckConfigBuilder};
pub use overrides::{load_overrides, parse_level_token, parse_overrides, SeverityOverride};
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, ChecksConfig, MatchingConfig, OutputConfig,
};
pub use validation::{ConfigError, Validatable};

// Re-export file utilities
pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.api-diff.yaml` config files. It can be used by editors for
/// validation and autocompletion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
