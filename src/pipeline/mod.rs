//! Pipeline orchestration for api-diff runs.
//!
//! Shared load → diff → classify → report logic used by the CLI command
//! handlers.

mod check_stage;
mod output;
mod parse;
mod report_stage;

pub use check_stage::{classify_changes, compute_diff, source_locations, validate_config};
pub use output::{write_output, OutputTarget};
pub use parse::parse_document_with_context;
pub use report_stage::{exit_code_for, output_changes_report, output_diff_report};

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to read or parse an API document
    #[error("Parse failed for {path}: {source}")]
    ParseFailed {
        path: String,
        source: anyhow::Error,
    },

    /// The check configuration could not be resolved
    #[error("Check configuration failed: {source}")]
    ConfigFailed {
        #[source]
        source: anyhow::Error,
    },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - nothing at or above the fail-on level
    pub const SUCCESS: i32 = 0;
    /// A change at or above the fail-on level was reported
    pub const CHANGES_DETECTED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::CHANGES_DETECTED, 1);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_pipeline_error_display() {
        let err = PipelineError::ParseFailed {
            path: "a.yaml".to_string(),
            source: anyhow::anyhow!("boom"),
        };
        assert_eq!(err.to_string(), "Parse failed for a.yaml: boom");
    }
}
