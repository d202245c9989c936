//! Stability levels that are invalid or have been lowered.

use super::emit::{Emitter, OperationScope};
use super::{static_rules, Check};
use crate::changes::{Change, Level};
use crate::config::CheckConfig;
use crate::diff::DocumentDiff;
use crate::model::{Method, Operation, SourceLocations};
use crate::policy::{evaluate_removal, evaluate_transition, LifecycleEvent};

pub struct StabilityCheck;

impl Check for StabilityCheck {
    fn name(&self) -> &'static str {
        "stability"
    }

    fn description(&self) -> &'static str {
        "Invalid or decreased x-stability-level values"
    }

    fn rules(&self) -> Vec<(String, Level)> {
        static_rules(&[
            ("api-invalid-stability-level", Level::Err),
            ("api-stability-decreased", Level::Err),
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
            if operation.stability.is_none()
                && operation.deprecated.is_none()
                && operation.sunset.is_none()
            {
                continue;
            }
            let scope = OperationScope::modified(path, method, operation, sources, config);
            let events = evaluate_transition(
                operation.base,
                operation.revision,
                config.deprecation(),
                config.now(),
            );
            for event in events {
                if matches!(
                    event,
                    LifecycleEvent::InvalidStabilityLevel { .. }
                        | LifecycleEvent::StabilityDecreased { .. }
                ) {
                    emitter.api(&scope, event.rule_id(), |change| change.with_args(event.args()));
                }
            }
        }

        // A removed operation's level decides whether the removal is allowed.
        if let Some(paths) = &diff.paths {
            for (path, item) in &paths.deleted {
                for (method, operation) in item.operations() {
                    emit_removed_level(&mut emitter, path, method, operation, sources);
                }
            }
            for path in paths.modified.values() {
                for (method, operation) in &path.operations.deleted {
                    emit_removed_level(&mut emitter, &path.base_path, *method, operation, sources);
                }
            }
        }

        emitter.into_changes()
    }
}

fn emit_removed_level(
    emitter: &mut Emitter<'_>,
    path: &str,
    method: Method,
    operation: &Operation,
    sources: &SourceLocations,
) {
    let config = emitter.config();
    if let (_, Some(event)) = evaluate_removal(operation, config.now()) {
        let scope = OperationScope::deleted(path, method, operation, sources, config);
        emitter.api(&scope, event.rule_id(), |change| change.with_args(event.args()));
    }
}
