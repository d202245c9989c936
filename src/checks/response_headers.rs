//! Response headers appearing, disappearing or changing requiredness.

use super::emit::{Emitter, OperationScope};
use super::rules::{Aspect, Subject};
use super::{subject_rules, Check};
use crate::changes::{Change, Level};
use crate::config::CheckConfig;
use crate::diff::DocumentDiff;
use crate::model::SourceLocations;
use serde_json::json;

const SUBJECT: Subject = Subject::ResponseHeader;

pub struct ResponseHeadersCheck;

impl Check for ResponseHeadersCheck {
    fn name(&self) -> &'static str {
        "response-headers"
    }

    fn description(&self) -> &'static str {
        "Response headers"
    }

    fn rules(&self) -> Vec<(String, Level)> {
        subject_rules(&[SUBJECT])
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
            for (status, response) in &responses.modified {
                let Some(headers) = &response.headers else {
                    continue;
                };
                let mut emit = |aspect: Aspect, name: &str| {
                    emitter.api(&scope, &SUBJECT.rule_id(aspect), |change| {
                        change.with_target(name).with_args(vec![json!(status)])
                    });
                };
                for (name, header) in &headers.added {
                    let aspect = if header.required {
                        Aspect::AddedRequired
                    } else {
                        Aspect::AddedOptional
                    };
                    emit(aspect, name);
                }
                for (name, header) in &headers.deleted {
                    let aspect = if header.required {
                        Aspect::RemovedRequired
                    } else {
                        Aspect::RemovedOptional
                    };
                    emit(aspect, name);
                }
                for (name, header) in &headers.modified {
                    if let Some(required) = &header.required {
                        let aspect = if required.to {
                            Aspect::BecameRequired
                        } else {
                            Aspect::BecameOptional
                        };
                        emit(aspect, name);
                    }
                }
            }
        }
        emitter.into_changes()
    }
}
