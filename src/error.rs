//! Unified error types for api-diff.
//!
//! This module provides the error hierarchy for the library, with a context
//! chain that shows where a failure happened.

use crate::config::{ConfigError, ConfigFileError};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for api-diff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiDiffError {
    /// Errors while reading an API document
    #[error("Failed to load API document: {context}")]
    Load {
        context: String,
        #[source]
        source: LoadErrorKind,
    },

    /// Errors during report generation
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific load error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LoadErrorKind {
    #[error("Unknown document format - expected JSON or YAML")]
    UnknownFormat,

    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Invalid YAML structure: {0}")]
    InvalidYaml(String),

    #[error("Not an OpenAPI 3 document: {0}")]
    NotOpenApi(String),
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("JSON serialization failed: {0}")]
    JsonSerializationError(String),

    #[error("YAML serialization failed: {0}")]
    YamlSerializationError(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for api-diff operations
pub type Result<T> = std::result::Result<T, ApiDiffError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl ApiDiffError {
    /// Create a load error with context
    pub fn load(context: impl Into<String>, source: LoadErrorKind) -> Self {
        Self::Load {
            context: context.into(),
            source,
        }
    }

    /// Create a load error for unknown format
    pub fn unknown_format(path: impl Into<String>) -> Self {
        Self::load(format!("at {}", path.into()), LoadErrorKind::UnknownFormat)
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a report error
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for ApiDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ApiDiffError {
    fn from(err: serde_json::Error) -> Self {
        Self::load(
            "JSON deserialization",
            LoadErrorKind::InvalidJson(err.to_string()),
        )
    }
}

impl From<serde_yaml::Error> for ApiDiffError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::load(
            "YAML deserialization",
            LoadErrorKind::InvalidYaml(err.to_string()),
        )
    }
}

impl From<ConfigError> for ApiDiffError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<ConfigFileError> for ApiDiffError {
    fn from(err: ConfigFileError) -> Self {
        Self::Config(err.to_string())
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context is prepended to the error's existing context, creating a chain
/// that shows the path through the code.
///
/// # Example
///
/// ```ignore
/// use api_diff::error::ErrorContext;
///
/// fn load(path: &Path) -> Result<Document> {
///     let content = std::fs::read_to_string(path)
///         .with_context(|| format!("reading {}", path.display()))?;
///
///     parse_document_str(&content, None)
///         .with_context(|| format!("parsing {}", path.display()))
/// }
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<ApiDiffError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: ApiDiffError, new_ctx: &str) -> ApiDiffError {
    match err {
        ApiDiffError::Load {
            context: existing,
            source,
        } => ApiDiffError::Load {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ApiDiffError::Report {
            context: existing,
            source,
        } => ApiDiffError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ApiDiffError::Io {
            path,
            message,
            source,
        } => ApiDiffError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        ApiDiffError::Config(msg) => ApiDiffError::Config(chain_context(new_ctx, &msg)),
        ApiDiffError::Validation(msg) => ApiDiffError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| ApiDiffError::Validation(context.into()))
    }
}
