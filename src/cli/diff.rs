//! Diff command handler.
//!
//! Implements the `diff` subcommand, which prints the structural diff tree.

use super::DiffPaths;
use crate::config::AppConfig;
use crate::pipeline::{
    compute_diff, exit_codes, output_diff_report, parse_document_with_context, validate_config,
};
use anyhow::Result;

/// Run the diff command, returning the desired exit code.
///
/// The diff tree carries no levels, so `fail_on` only distinguishes an
/// empty diff from a non-empty one.
pub fn run_diff(config: &AppConfig, paths: &DiffPaths) -> Result<i32> {
    validate_config(config)?;
    let quiet = config.behavior.quiet;
    let base = parse_document_with_context(&paths.base, quiet)?;
    let revision = parse_document_with_context(&paths.revision, quiet)?;

    let diff = compute_diff(config, &base, &revision);
    output_diff_report(config, &diff, &paths.metadata())?;

    if config.behavior.fail_on.is_some() && !diff.is_empty() {
        Ok(exit_codes::CHANGES_DETECTED)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::Level;
    use std::path::Path;

    fn write(dir: &Path, name: &str, tag: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(
            &path,
            format!(
                "openapi: 3.0.3\ninfo: {{title: t, version: '1'}}\npaths:\n  /a:\n    get:\n      tags: [{tag}]\n      responses: {{}}\n"
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn test_run_diff_writes_tree() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DiffPaths::new(write(dir.path(), "a.yaml", "x"), write(dir.path(), "b.yaml", "y"));
        let out = dir.path().join("diff.yaml");
        let config = AppConfig::builder()
            .quiet(true)
            .output_file(Some(out.clone()))
            .fail_on(Some(Level::Info))
            .build();
        assert_eq!(run_diff(&config, &paths).unwrap(), exit_codes::CHANGES_DETECTED);
        let text = std::fs::read_to_string(out).unwrap();
        assert!(text.contains("tags"), "{text}");
    }

    #[test]
    fn test_identical_documents_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DiffPaths::new(write(dir.path(), "a.yaml", "x"), write(dir.path(), "b.yaml", "x"));
        let out = dir.path().join("diff.txt");
        let config = AppConfig::builder()
            .quiet(true)
            .output_file(Some(out.clone()))
            .fail_on(Some(Level::Info))
            .build();
        assert_eq!(run_diff(&config, &paths).unwrap(), exit_codes::SUCCESS);
        assert_eq!(std::fs::read_to_string(out).unwrap(), "No changes\n");
    }
}
