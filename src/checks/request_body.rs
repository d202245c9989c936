//! Request bodies: presence, requiredness, media types and the schema of
//! each media type.

use super::emit::{Emitter, OperationScope};
use super::rules::Subject;
use super::walk::{emit_schema_changes, SchemaSite};
use super::{static_rules, subject_rules, Check};
use crate::changes::{Change, Level};
use crate::config::CheckConfig;
use crate::diff::DocumentDiff;
use crate::model::SourceLocations;

pub struct RequestBodyCheck;

impl Check for RequestBodyCheck {
    fn name(&self) -> &'static str {
        "request-body"
    }

    fn description(&self) -> &'static str {
        "Request bodies, their media types and schemas"
    }

    fn rules(&self) -> Vec<(String, Level)> {
        let mut rules = static_rules(&[
            ("request-body-added-required", Level::Err),
            ("request-body-added-optional", Level::Info),
            ("request-body-removed", Level::Err),
            ("request-body-became-required", Level::Err),
            ("request-body-became-optional", Level::Info),
            ("request-body-media-type-added", Level::Info),
            ("request-body-media-type-removed", Level::Err),
        ]);
        rules.extend(subject_rules(&[
            Subject::RequestBody,
            Subject::RequestProperty,
            Subject::RequestReadOnlyProperty,
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
            let Some(body) = &operation.request_body else {
                continue;
            };
            let scope = OperationScope::modified(path, method, operation, sources, config);

            if body.added {
                let required = body.revision.is_some_and(|b| b.required);
                let id = if required {
                    "request-body-added-required"
                } else {
                    "request-body-added-optional"
                };
                emitter.api(&scope, id, |change| change);
                continue;
            }
            if body.deleted {
                emitter.api(&scope, "request-body-removed", |change| change);
                continue;
            }

            if let Some(required) = &body.required {
                let id = if required.to {
                    "request-body-became-required"
                } else {
                    "request-body-became-optional"
                };
                emitter.api(&scope, id, |change| change);
            }

            let Some(content) = &body.content else {
                continue;
            };
            for media_type in content.added.keys() {
                emitter.api(&scope, "request-body-media-type-added", |change| {
                    change.with_target(media_type)
                });
            }
            for media_type in content.deleted.keys() {
                emitter.api(&scope, "request-body-media-type-removed", |change| {
                    change.with_target(media_type)
                });
            }
            for (media_type, schema) in &content.modified {
                let site = SchemaSite {
                    subject: Subject::RequestBody,
                    target: media_type,
                    media_type: Some(media_type.as_str()),
                    base_components: diff.base_components(),
                    revision_components: diff.revision_components(),
                };
                emit_schema_changes(&mut emitter, &scope, &site, schema);
            }
        }
        emitter.into_changes()
    }
}
