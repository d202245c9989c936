//! Request parameters: presence, requiredness and schema changes.
//!
//! Parameters are matched by location and name, after path-level
//! parameters have been merged into each operation. Schema changes inside
//! a parameter are reported as `request-parameter-*` at the root and as
//! `request-property-*` below it.

use super::emit::{Emitter, OperationScope};
use super::rules::{Aspect, Subject};
use super::walk::{emit_schema_changes, SchemaSite};
use super::{subject_rules, Check};
use crate::changes::{Change, Level};
use crate::config::CheckConfig;
use crate::diff::DocumentDiff;
use crate::model::SourceLocations;

const SUBJECT: Subject = Subject::RequestParameter;

pub struct RequestParametersCheck;

impl Check for RequestParametersCheck {
    fn name(&self) -> &'static str {
        "request-parameters"
    }

    fn description(&self) -> &'static str {
        "Path, query, header and cookie parameters"
    }

    fn rules(&self) -> Vec<(String, Level)> {
        subject_rules(&[
            SUBJECT,
            Subject::RequestProperty,
            Subject::RequestReadOnlyProperty,
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
            let Some(parameters) = &operation.parameters else {
                continue;
            };
            let scope = OperationScope::modified(path, method, operation, sources, config);

            for (key, parameter) in &parameters.added {
                let aspect = if parameter.is_required() {
                    Aspect::AddedRequired
                } else {
                    Aspect::AddedOptional
                };
                emitter.api(&scope, &SUBJECT.rule_id(aspect), |change| {
                    change.with_target(key.to_string())
                });
            }

            for (key, parameter) in &parameters.deleted {
                let aspect = if parameter.is_required() {
                    Aspect::RemovedRequired
                } else {
                    Aspect::RemovedOptional
                };
                emitter.api(&scope, &SUBJECT.rule_id(aspect), |change| {
                    change.with_target(key.to_string())
                });
            }

            for (key, parameter) in &parameters.modified {
                let target = key.to_string();
                if let Some(required) = &parameter.required {
                    let aspect = if required.to {
                        Aspect::BecameRequired
                    } else {
                        Aspect::BecameOptional
                    };
                    emitter.api(&scope, &SUBJECT.rule_id(aspect), |change| {
                        change.with_target(target.as_str())
                    });
                }
                if let Some(schema) = &parameter.schema {
                    let site = SchemaSite {
                        subject: SUBJECT,
                        target: &target,
                        media_type: None,
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
