//! Response statuses, media types and body schemas.

use super::emit::{Emitter, OperationScope};
use super::rules::Subject;
use super::walk::{emit_schema_changes, SchemaSite};
use super::{static_rules, subject_rules, Check};
use crate::changes::{Change, Level};
use crate::config::CheckConfig;
use crate::diff::DocumentDiff;
use crate::model::SourceLocations;

pub struct ResponsesCheck;

/// `2XX` and the individual `2xx` codes.
fn is_success(status: &str) -> bool {
    status.starts_with('2')
}

impl Check for ResponsesCheck {
    fn name(&self) -> &'static str {
        "responses"
    }

    fn description(&self) -> &'static str {
        "Response statuses, their media types and schemas"
    }

    fn rules(&self) -> Vec<(String, Level)> {
        let mut rules = static_rules(&[
            ("response-success-status-added", Level::Info),
            ("response-success-status-removed", Level::Err),
            ("response-non-success-status-added", Level::Info),
            ("response-non-success-status-removed", Level::Warn),
            ("response-media-type-added", Level::Info),
            ("response-media-type-removed", Level::Err),
        ]);
        rules.extend(subject_rules(&[
            Subject::ResponseBody,
            Subject::ResponseProperty,
            Subject::ResponseWriteOnlyProperty,
        ]));
        rules
    }

    fn run(
        &self,
        diff: &DocumentDiff<'_>,
        sources: &SourceLocations,
        config: &CheckConfig,
    ) -> Vec<Change> {
        let mut emitter = Emitter::new(config);
        for (path, method, operation) in diff.modified_operations() {
            let Some(responses) = &operation.responses else {
                continue;
            };
            let scope = OperationScope::modified(path, method, operation, sources, config);

            for status in responses.added.keys() {
                let id = if is_success(status) {
                    "response-success-status-added"
                } else {
                    "response-non-success-status-added"
                };
                emitter.api(&scope, id, |change| change.with_target(status));
            }
            for status in responses.deleted.keys() {
                let id = if is_success(status) {
                    "response-success-status-removed"
                } else {
                    "response-non-success-status-removed"
                };
                emitter.api(&scope, id, |change| change.with_target(status));
            }

            for (status, response) in &responses.modified {
                let Some(content) = &response.content else {
                    continue;
                };
                for media_type in content.added.keys() {
                    emitter.api(&scope, "response-media-type-added", |change| {
                        change.with_target(format!("{status} {media_type}"))
                    });
                }
                for media_type in content.deleted.keys() {
                    emitter.api(&scope, "response-media-type-removed", |change| {
                        change.with_target(format!("{status} {media_type}"))
                    });
                }
                for (media_type, schema) in &content.modified {
                    let target = format!("{status} {media_type}");
                    let site = SchemaSite {
                        subject: Subject::ResponseBody,
                        target: &target,
                        media_type: Some(media_type.as_str()),
                        base_components: diff.base_components(),
                        revision_components: diff.revision_components(),
                    };
                    emit_schema_changes(&mut emitter, &scope, &site, schema);
                }
            }
        }
        emitter.into_changes()
    }
}
