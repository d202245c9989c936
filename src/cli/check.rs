//! Handler shared by the `breaking` and `changelog` subcommands.

use super::DiffPaths;
use crate::changes::Level;
use crate::config::AppConfig;
use crate::pipeline::{
    classify_changes, compute_diff, exit_code_for, output_changes_report,
    parse_document_with_context, source_locations, validate_config,
};
use anyhow::Result;
use chrono::NaiveDate;

/// Classify the changes between two documents and report those at or above
/// the configured level, falling back to `default_level`.
///
/// Returns [`exit_codes::CHANGES_DETECTED`](crate::pipeline::exit_codes::CHANGES_DETECTED)
/// when a reported change reaches `fail_on`.
pub fn run_check(
    config: &AppConfig,
    paths: &DiffPaths,
    default_level: Level,
    now: Option<NaiveDate>,
) -> Result<i32> {
    validate_config(config)?;
    let quiet = config.behavior.quiet;
    let base = parse_document_with_context(&paths.base, quiet)?;
    let revision = parse_document_with_context(&paths.revision, quiet)?;

    let diff = compute_diff(config, &base, &revision);
    let sources = source_locations(&base, &revision);
    let min = config.behavior.level.unwrap_or(default_level);
    let changes = classify_changes(config, &diff, &sources, min, now)?;

    if !quiet {
        tracing::info!("{} changes at or above {min}", changes.len());
    }
    output_changes_report(config, &changes, &paths.metadata())?;
    Ok(exit_code_for(&changes, config.behavior.fail_on))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::exit_codes;
    use crate::reports::ReportFormat;

    const BASE: &str = "\
openapi: 3.0.3
info: {title: t, version: '1'}
paths:
  /pets:
    get:
      operationId: listPets
      tags: [pets]
      responses: {}
";

    const REVISION: &str = "\
openapi: 3.0.3
info: {title: t, version: '1'}
paths:
  /pets:
    get:
      operationId: listPets
      tags: [animals]
      responses: {}
";

    fn setup(dir: &std::path::Path) -> DiffPaths {
        let base = dir.join("base.yaml");
        let revision = dir.join("revision.yaml");
        std::fs::write(&base, BASE).unwrap();
        std::fs::write(&revision, REVISION).unwrap();
        DiffPaths::new(base, revision)
    }

    fn report(path: &std::path::Path) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_changelog_reports_info() {
        let dir = tempfile::tempdir().unwrap();
        let paths = setup(dir.path());
        let out = dir.path().join("changes.json");
        let config = AppConfig::builder()
            .quiet(true)
            .output_format(ReportFormat::Json)
            .output_file(Some(out.clone()))
            .build();
        assert_eq!(
            run_check(&config, &paths, Level::Info, None).unwrap(),
            exit_codes::SUCCESS
        );
        let ids: Vec<String> = report(&out)["changes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["api-tag-added", "api-tag-removed"]);
    }

    #[test]
    fn test_breaking_filters_and_fails() {
        let dir = tempfile::tempdir().unwrap();
        let paths = setup(dir.path());
        let out = dir.path().join("changes.json");
        let config = AppConfig::builder()
            .quiet(true)
            .output_format(ReportFormat::Json)
            .output_file(Some(out.clone()))
            .severity("api-tag-removed", "ERR")
            .fail_on(Some(Level::Err))
            .build();
        assert_eq!(
            run_check(&config, &paths, Level::Warn, None).unwrap(),
            exit_codes::CHANGES_DETECTED
        );
        let value = report(&out);
        assert_eq!(value["summary"]["err"], 1);
        assert_eq!(value["changes"].as_array().unwrap().len(), 1);
    }
}
