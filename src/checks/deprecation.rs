//! Deprecation and sunset transitions of operations present in both
//! documents.

use super::emit::{Emitter, OperationScope};
use super::{static_rules, Check};
use crate::changes::{Change, Level};
use crate::config::CheckConfig;
use crate::diff::DocumentDiff;
use crate::model::SourceLocations;
use crate::policy::{evaluate_transition, LifecycleEvent};

pub struct DeprecationCheck;

impl Check for DeprecationCheck {
    fn name(&self) -> &'static str {
        "deprecation"
    }

    fn description(&self) -> &'static str {
        "Operations deprecated, reactivated, or with an insufficient sunset notice"
    }

    fn rules(&self) -> Vec<(String, Level)> {
        static_rules(&[
            ("api-deprecated", Level::Info),
            ("api-reactivated", Level::Info),
            ("api-sunset-date-too-small", Level::Err),
            ("api-sunset-date-changed-too-small", Level::Err),
            ("api-sunset-deleted", Level::Err),
            ("api-deprecated-sunset-missing", Level::Err),
            ("api-deprecated-sunset-parse", Level::Err),
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
            if operation.deprecated.is_none() && operation.sunset.is_none() {
                continue;
            }
            let events = evaluate_transition(
                operation.base,
                operation.revision,
                config.deprecation(),
                config.now(),
            );
            let scope = OperationScope::modified(path, method, operation, sources, config);
            for event in events {
                // Stability levels are reported by their own check.
                if matches!(
                    event,
                    LifecycleEvent::InvalidStabilityLevel { .. }
                        | LifecycleEvent::StabilityDecreased { .. }
                ) {
                    continue;
                }
                emitter.api(&scope, event.rule_id(), |change| change.with_args(event.args()));
            }
        }
        emitter.into_changes()
    }
}
