//! Paths and operations added or removed.
//!
//! Additions are informational. A removal is judged against the
//! operation's deprecation state in the base document: removing something
//! that was never deprecated, or whose sunset has not yet passed, breaks
//! clients.

use super::emit::{Emitter, OperationScope};
use super::{static_rules, Check};
use crate::changes::{Change, Level};
use crate::config::CheckConfig;
use crate::diff::DocumentDiff;
use crate::model::{Method, Operation, SourceLocations};
use crate::policy::{evaluate_removal, RemovalVerdict};

const PATH_ADDED: &str = "api-path-added";
const OPERATION_ADDED: &str = "api-operation-added";

/// Rule ids for one kind of removal.
struct RemovalRules {
    without_deprecation: &'static str,
    before_sunset: &'static str,
}

const PATH_REMOVED: RemovalRules = RemovalRules {
    without_deprecation: "api-path-removed-without-deprecation",
    before_sunset: "api-path-removed-before-sunset",
};

const OPERATION_REMOVED: RemovalRules = RemovalRules {
    without_deprecation: "api-removed-without-deprecation",
    before_sunset: "api-removed-before-sunset",
};

pub struct EndpointsCheck;

impl Check for EndpointsCheck {
    fn name(&self) -> &'static str {
        "endpoints"
    }

    fn description(&self) -> &'static str {
        "Paths and operations added or removed"
    }

    fn rules(&self) -> Vec<(String, Level)> {
        static_rules(&[
            (PATH_ADDED, Level::Info),
            (OPERATION_ADDED, Level::Info),
            (PATH_REMOVED.without_deprecation, Level::Err),
            (PATH_REMOVED.before_sunset, Level::Err),
            (OPERATION_REMOVED.without_deprecation, Level::Err),
            (OPERATION_REMOVED.before_sunset, Level::Err),
        ])
    }

    fn run(
        &self,
        diff: &DocumentDiff<'_>,
        sources: &SourceLocations,
        config: &CheckConfig,
    ) -> Vec<Change> {
        let mut emitter = Emitter::new(config);
        let Some(paths) = &diff.paths else {
            return Vec::new();
        };

        for (path, item) in &paths.added {
            for (method, operation) in item.operations() {
                let scope = OperationScope::added(path, method, operation, sources, config);
                emitter.api(&scope, PATH_ADDED, |change| change);
            }
        }

        for (path, item) in &paths.deleted {
            for (method, operation) in item.operations() {
                emit_removal(&mut emitter, path, method, operation, sources, &PATH_REMOVED);
            }
        }

        for path in paths.modified.values() {
            for (method, operation) in &path.operations.added {
                let scope =
                    OperationScope::added(&path.revision_path, *method, operation, sources, config);
                emitter.api(&scope, OPERATION_ADDED, |change| change);
            }
            for (method, operation) in &path.operations.deleted {
                emit_removal(
                    &mut emitter,
                    &path.base_path,
                    *method,
                    operation,
                    sources,
                    &OPERATION_REMOVED,
                );
            }
        }

        emitter.into_changes()
    }
}

fn emit_removal(
    emitter: &mut Emitter<'_>,
    path: &str,
    method: Method,
    operation: &Operation,
    sources: &SourceLocations,
    rules: &RemovalRules,
) {
    let config = emitter.config();
    let (verdict, _) = evaluate_removal(operation, config.now());
    let id = match verdict {
        RemovalVerdict::Allowed => return,
        RemovalVerdict::WithoutDeprecation => rules.without_deprecation,
        RemovalVerdict::BeforeSunset => rules.before_sunset,
    };
    let scope = OperationScope::deleted(path, method, operation, sources, config);
    let comment = operation.sunset().map(|sunset| format!("sunset {sunset}"));
    emitter.api(&scope, id, |change| match comment {
        Some(comment) => change.with_comment(comment),
        None => change,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::{ids, run_check};
    use crate::model::SourceLocation;
    use chrono::NaiveDate;

    const BASE: &str = "\
openapi: 3.0.3
info: {title: t, version: '1'}
paths:
  /pets:
    get:
      responses: {'200': {description: ok}}
    delete:
      deprecated: true
      x-sunset: '2026-01-01'
      responses: {'204': {description: gone}}
  /owners:
    get:
      responses: {'200': {description: ok}}
";

    fn config() -> CheckConfig {
        CheckConfig::builder()
            .now(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_path_removed_without_deprecation() {
        let revision = BASE.replace("  /owners:\n    get:\n      responses: {'200': {description: ok}}\n", "");
        let changes = run_check(&EndpointsCheck, BASE, &revision, &config());
        assert_eq!(ids(&changes), vec!["api-path-removed-without-deprecation"]);
        assert_eq!(changes[0].path(), "/owners");
        assert_eq!(
            changes[0].source,
            Some(SourceLocation {
                file: "<input>".to_string(),
                line: 12,
                column: 5,
            })
        );
    }

    #[test]
    fn test_operation_removed_after_sunset_is_silent() {
        let revision = BASE.replace(
            "    delete:\n      deprecated: true\n      x-sunset: '2026-01-01'\n      responses: {'204': {description: gone}}\n",
            "",
        );
        let changes = run_check(&EndpointsCheck, BASE, &revision, &config());
        assert!(changes.is_empty(), "{changes:?}");
    }

    #[test]
    fn test_operation_removed_before_sunset() {
        let base = BASE.replace("2026-01-01", "2026-06-01");
        let revision = base.replace(
            "    delete:\n      deprecated: true\n      x-sunset: '2026-06-01'\n      responses: {'204': {description: gone}}\n",
            "",
        );
        let changes = run_check(&EndpointsCheck, &base, &revision, &config());
        assert_eq!(ids(&changes), vec!["api-removed-before-sunset"]);
        assert_eq!(changes[0].comment.as_deref(), Some("sunset 2026-06-01"));
        assert_eq!(changes[0].method(), Some(Method::Delete));
    }

    #[test]
    fn test_additions() {
        let revision = format!(
            "{BASE}    post:\n      responses: {{'201': {{description: ok}}}}\n  /vets:\n    get:\n      responses: {{'200': {{description: ok}}}}\n"
        );
        let changes = run_check(&EndpointsCheck, BASE, &revision, &config());
        let mut found = ids(&changes);
        found.sort_unstable();
        assert_eq!(found, vec!["api-operation-added", "api-path-added"]);
    }
}
