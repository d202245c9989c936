//! Integration tests for api-diff
//!
//! These tests verify end-to-end functionality of document loading, the
//! diff engine, the checks and report generation.

use api_diff::{
    changes::{Change, Level},
    checker::Checker,
    cli::{self, DiffPaths},
    config::{AppConfig, CheckConfig},
    diff::DiffEngine,
    loader::{parse_document, parse_document_str, LoadedDocument},
    model::SourceLocations,
    pipeline::exit_codes,
    policy::DeprecationPolicy,
    reports::{create_reporter, ReportFormat, ReportMetadata},
};
use chrono::NaiveDate;
use serde_json::json;
use std::path::{Path, PathBuf};

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn load(name: &str) -> LoadedDocument {
    parse_document(&fixture_path(name)).expect("Failed to load fixture")
}

fn classify(base: &LoadedDocument, revision: &LoadedDocument, config: CheckConfig) -> Vec<Change> {
    let diff = DiffEngine::new().diff(&base.document, &revision.document);
    let sources = SourceLocations::new(base.locations.clone(), revision.locations.clone());
    Checker::new(config).run(&diff, &sources)
}

fn petstore_changes() -> Vec<Change> {
    classify(
        &load("petstore-base.yaml"),
        &load("petstore-revision.yaml"),
        CheckConfig::default(),
    )
}

fn find<'a>(changes: &'a [Change], id: &str, target: &str) -> &'a Change {
    changes
        .iter()
        .find(|c| c.id == id && c.target.as_deref() == Some(target))
        .unwrap_or_else(|| panic!("no {id} at '{target}' in {changes:#?}"))
}

// ============================================================================
// Classification Tests
// ============================================================================

mod classification_tests {
    use super::*;

    #[test]
    fn test_parameter_max_length_increase_is_info() {
        let changes = petstore_changes();
        let change = find(
            &changes,
            "request-parameter-max-length-increased",
            "query category",
        );
        assert_eq!(change.level, Level::Info);
        assert_eq!(change.args, vec![json!(10), json!(15)]);
        assert_eq!(change.path(), "/pets");
        assert_eq!(change.operation_id(), Some("listPets"));
    }

    #[test]
    fn test_parameter_max_length_decrease_is_err() {
        let changes = classify(
            &load("petstore-revision.yaml"),
            &load("petstore-base.yaml"),
            CheckConfig::default(),
        );
        let change = find(
            &changes,
            "request-parameter-max-length-decreased",
            "query category",
        );
        assert_eq!(change.level, Level::Err);
        assert_eq!(change.args, vec![json!(15), json!(10)]);
    }

    #[test]
    fn test_one_of_member_added_through_reference() {
        let changes = petstore_changes();
        for target in ["breed", "/items/breed"] {
            let change = find(&changes, "response-property-one-of-added", target);
            assert_eq!(change.level, Level::Warn);
            assert!(change.args.contains(&json!("#/components/schemas/Breed3")));
        }
    }

    #[test]
    fn test_combinator_branch_path() {
        let changes = petstore_changes();
        let change = find(
            &changes,
            "response-property-max-length-increased",
            "/oneOf[#/components/schemas/Dog]/breed",
        );
        assert_eq!(change.level, Level::Err);
        assert_eq!(change.path(), "/animals");
        assert_eq!(change.args, vec![json!(20), json!(30)]);
    }

    fn adopt_document(extra_member: bool, breed_max_length: u64) -> LoadedDocument {
        let bird_member = if extra_member {
            "\n                  - $ref: '#/components/schemas/Bird'"
        } else {
            ""
        };
        let content = format!(
            "\
openapi: 3.0.3
info:
  title: Adoption
  version: '1'
paths:
  /adopt:
    post:
      operationId: adopt
      requestBody:
        content:
          application/json:
            schema:
              oneOf:
                  - $ref: '#/components/schemas/Dog'
                  - $ref: '#/components/schemas/Cat'{bird_member}
      responses:
        '204':
          description: adopted
components:
  schemas:
    Dog:
      type: object
      properties:
        breed: {{type: string, maxLength: {breed_max_length}}}
    Cat:
      type: object
      properties:
        indoor: {{type: boolean}}
    Bird:
      type: object
"
        );
        parse_document_str(&content, None).expect("valid document")
    }

    #[test]
    fn test_request_body_combinator_branch() {
        let config = CheckConfig::builder().checks(["request-body"]).build().unwrap();
        let changes = classify(&adopt_document(false, 20), &adopt_document(true, 10), config);

        let body = find(&changes, "request-body-one-of-added", "application/json");
        assert_eq!(body.level, Level::Info);
        assert!(body.args.contains(&json!("#/components/schemas/Bird")));

        let nested = find(
            &changes,
            "request-property-max-length-decreased",
            "/oneOf[#/components/schemas/Dog]/breed",
        );
        assert_eq!(nested.level, Level::Err);
        assert_eq!(nested.path(), "/adopt");
        assert_eq!(nested.args, vec![json!(20), json!(10)]);
        assert_eq!(changes.len(), 2, "{changes:#?}");
    }

    #[test]
    fn test_multi_type_format_change_is_breaking() {
        let document = |format: &str| {
            let content = format!(
                "\
openapi: 3.1.0
info:
  title: Events
  version: '1'
paths:
  /events:
    post:
      requestBody:
        content:
          application/json:
            schema:
              type: [string, 'null']
              format: {format}
      responses:
        '204':
          description: ok
"
            );
            parse_document_str(&content, None).expect("valid document")
        };
        let changes = classify(
            &document("date-time"),
            &document("date"),
            CheckConfig::default(),
        );
        let change = find(&changes, "request-body-type-changed", "application/json");
        assert_eq!(change.level, Level::Err);
        assert_eq!(
            change.args,
            vec![json!("null, string/date-time"), json!("null, string/date")]
        );
    }

    #[test]
    fn test_new_component_reported() {
        let changes = petstore_changes();
        assert!(changes.iter().any(|c| c.id == "api-schema-added"
            && c.level == Level::Info
            && c.summary().contains("api-schema-added")));
    }

    #[test]
    fn test_changes_carry_revision_source() {
        let changes = petstore_changes();
        let change = find(
            &changes,
            "request-parameter-max-length-increased",
            "query category",
        );
        let source = change.source.as_ref().expect("source location");
        assert!(source.file.ends_with("petstore-revision.yaml"), "{source}");
        assert_eq!(source.line, 7);
    }

    #[test]
    fn test_canonical_order_puts_errors_first() {
        let changes = petstore_changes();
        let levels: Vec<Level> = changes.iter().map(|c| c.level).collect();
        let mut sorted = levels.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(levels, sorted);
        assert_eq!(changes[0].level, Level::Err);
    }

    #[test]
    fn test_self_diff_is_empty() {
        for name in ["petstore-base.yaml", "petstore-revision.yaml"] {
            let document = load(name);
            let diff = DiffEngine::new().diff(&document.document, &document.document);
            assert!(diff.is_empty(), "{name} differs from itself");
            assert!(classify(&document, &document, CheckConfig::default()).is_empty());
        }
    }

    #[test]
    fn test_cyclic_schemas_terminate_deterministically() {
        let first = petstore_changes();
        let second = petstore_changes();
        assert_eq!(first, second);
        assert!(!first.iter().any(|c| c
            .target
            .as_deref()
            .is_some_and(|t| t.contains("parent/parent"))));
    }
}

// ============================================================================
// Severity Configuration Tests
// ============================================================================

mod severity_tests {
    use super::*;
    use api_diff::config::load_overrides;

    #[test]
    fn test_severity_file_overrides_and_disables() {
        let overrides = load_overrides(&fixture_path("severity-levels.txt")).unwrap();
        let config = CheckConfig::builder().severities(overrides).build().unwrap();
        let changes = classify(
            &load("petstore-base.yaml"),
            &load("petstore-revision.yaml"),
            config,
        );
        assert_eq!(
            find(&changes, "response-property-one-of-added", "breed").level,
            Level::Err
        );
        assert!(!changes.iter().any(|c| c.id == "api-schema-added"));
    }

    #[test]
    fn test_check_selection() {
        let config = CheckConfig::builder()
            .checks(["request-parameters"])
            .build()
            .unwrap();
        let changes = classify(
            &load("petstore-base.yaml"),
            &load("petstore-revision.yaml"),
            config,
        );
        assert!(!changes.is_empty());
        assert!(changes.iter().all(|c| c.id.starts_with("request-parameter-")));
    }
}

// ============================================================================
// Deprecation Policy Tests
// ============================================================================

mod deprecation_tests {
    use super::*;

    fn deprecation_changes(today: NaiveDate) -> Vec<Change> {
        let config = CheckConfig::builder()
            .deprecation(DeprecationPolicy::new(0, 10))
            .now(today)
            .build()
            .unwrap();
        classify(
            &load("deprecation-base.yaml"),
            &load("deprecation-revision.yaml"),
            config,
        )
    }

    fn ids(changes: &[Change]) -> Vec<&str> {
        changes.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_ten_days_notice_is_enough() {
        let changes = deprecation_changes(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(ids(&changes), vec!["api-deprecated"]);
        assert_eq!(changes[0].level, Level::Info);
    }

    #[test]
    fn test_nine_days_notice_is_too_small() {
        let changes = deprecation_changes(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(ids(&changes), vec!["api-sunset-date-too-small"]);
        assert_eq!(changes[0].level, Level::Err);
        assert_eq!(changes[0].args, vec![json!("2026-03-11"), json!(10)]);
    }
}

// ============================================================================
// Report and CLI Tests
// ============================================================================

mod report_tests {
    use super::*;

    #[test]
    fn test_json_report_is_stable() {
        let changes = petstore_changes();
        let metadata = ReportMetadata::new("petstore-base.yaml", "petstore-revision.yaml");
        let reporter = create_reporter(ReportFormat::Json);
        let first = reporter.generate_changes_report(&changes, &metadata).unwrap();
        let second = reporter
            .generate_changes_report(&petstore_changes(), &metadata)
            .unwrap();
        assert_eq!(first, second);

        let value: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert!(value["summary"]["err"].as_u64().unwrap() > 0);
        assert_eq!(value["changes"].as_array().unwrap().len(), changes.len());
    }

    #[test]
    fn test_breaking_command_text_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("breaking.txt");
        let config = AppConfig::builder()
            .quiet(true)
            .output_file(Some(out.clone()))
            .fail_on(Some(Level::Err))
            .build();
        let paths = DiffPaths::new(
            fixture_path("petstore-base.yaml"),
            fixture_path("petstore-revision.yaml"),
        );
        let code = cli::run_check(&config, &paths, Level::Warn, None).unwrap();
        assert_eq!(code, exit_codes::CHANGES_DETECTED);

        let text = std::fs::read_to_string(out).unwrap();
        assert!(text.starts_with("Comparing "), "{text}");
        assert!(text.contains("ERR response-property-max-length-increased"));
        assert!(text.contains("in API GET /animals (listAnimals)"));
        assert!(!text.contains("INFO "), "{text}");
    }

    #[test]
    fn test_missing_document_is_an_error() {
        let config = AppConfig::builder().quiet(true).build();
        let paths = DiffPaths::new(
            fixture_path("does-not-exist.yaml"),
            fixture_path("petstore-revision.yaml"),
        );
        let err = cli::run_check(&config, &paths, Level::Warn, None).unwrap_err();
        assert!(format!("{err:#}").contains("does-not-exist.yaml"));
    }
}
