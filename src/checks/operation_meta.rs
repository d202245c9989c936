//! Operation ids and tags.

use super::emit::{Emitter, OperationScope};
use super::{static_rules, Check};
use crate::changes::{Change, Level};
use crate::config::CheckConfig;
use crate::diff::DocumentDiff;
use crate::model::SourceLocations;
use serde_json::json;

pub struct OperationMetadataCheck;

impl Check for OperationMetadataCheck {
    fn name(&self) -> &'static str {
        "operation-metadata"
    }

    fn description(&self) -> &'static str {
        "Operation ids and tags"
    }

    fn rules(&self) -> Vec<(String, Level)> {
        static_rules(&[
            ("api-operation-id-added", Level::Info),
            ("api-operation-id-removed", Level::Err),
            ("api-operation-id-changed", Level::Err),
            ("api-tag-added", Level::Info),
            ("api-tag-removed", Level::Info),
        ])
    }

    fn run(
        &self,
        diff: &DocumentDiff<'_>,
        sources: &SourceLocations,
        config: &CheckConfig,
    ) -> Vec<Change> {
        let mut emitter = Emitter::new(config);
        for (path, method, operation) in diff.modified_operations() {
            let scope = OperationScope::modified(path, method, operation, sources, config);

            if let Some(ids) = &operation.operation_id {
                let (id, args) = match (&ids.from, &ids.to) {
                    (None, Some(to)) => ("api-operation-id-added", vec![json!(to)]),
                    (Some(from), None) => ("api-operation-id-removed", vec![json!(from)]),
                    (from, to) => ("api-operation-id-changed", vec![json!(from), json!(to)]),
                };
                emitter.api(&scope, id, |change| change.with_args(args));
            }

            if let Some(tags) = &operation.tags {
                for tag in &tags.added {
                    emitter.api(&scope, "api-tag-added", |change| change.with_target(tag));
                }
                for tag in &tags.deleted {
                    emitter.api(&scope, "api-tag-removed", |change| change.with_target(tag));
                }
            }
        }
        emitter.into_changes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::{ids, operation_doc, run_check};

    fn doc(meta: &str) -> String {
        operation_doc(
            "/pets",
            "get",
            &format!("{meta}responses:\n  '200':\n    description: ok\n"),
        )
    }

    #[test]
    fn test_operation_id_changes() {
        let config = CheckConfig::default();
        let changes = run_check(
            &OperationMetadataCheck,
            &doc("operationId: listPets\n"),
            &doc("operationId: getPets\n"),
            &config,
        );
        assert_eq!(ids(&changes), vec!["api-operation-id-changed"]);
        assert_eq!(changes[0].args, vec![json!("listPets"), json!("getPets")]);
        assert_eq!(changes[0].operation_id(), Some("getPets"));

        let changes = run_check(
            &OperationMetadataCheck,
            &doc(""),
            &doc("operationId: listPets\n"),
            &config,
        );
        assert_eq!(ids(&changes), vec!["api-operation-id-added"]);
    }

    #[test]
    fn test_tags() {
        let changes = run_check(
            &OperationMetadataCheck,
            &doc("tags: [pets, store]\n"),
            &doc("tags: [pets, animals]\n"),
            &CheckConfig::default(),
        );
        let found: Vec<(&str, Option<&str>)> = changes
            .iter()
            .map(|c| (c.id.as_str(), c.target.as_deref()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("api-tag-added", Some("animals")),
                ("api-tag-removed", Some("store")),
            ]
        );
    }
}
