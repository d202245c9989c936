//! Global and per-operation security requirements.
//!
//! A requirement is one alternative of the `security` list, identified by
//! the sorted names of the schemes it combines. Scope changes are reported
//! per scheme within an alternative present on both sides.

use super::emit::{Emitter, OperationScope};
use super::{static_rules, Check};
use crate::changes::{Change, Level};
use crate::config::CheckConfig;
use crate::diff::{DocumentDiff, SecurityRequirementsDiff};
use crate::model::SourceLocations;
use serde_json::{json, Value};

/// Rule ids for one security level.
struct SecurityRules {
    added: &'static str,
    removed: &'static str,
    scope_added: &'static str,
    scope_removed: &'static str,
}

const GLOBAL: SecurityRules = SecurityRules {
    added: "api-global-security-added",
    removed: "api-global-security-removed",
    scope_added: "api-global-security-scope-added",
    scope_removed: "api-global-security-scope-removed",
};

const OPERATION: SecurityRules = SecurityRules {
    added: "api-security-added",
    removed: "api-security-removed",
    scope_added: "api-security-scope-added",
    scope_removed: "api-security-scope-removed",
};

/// Flatten a requirements diff into `(rule id, target, args)`.
fn requirement_changes(
    diff: &SecurityRequirementsDiff<'_>,
    rules: &SecurityRules,
) -> Vec<(&'static str, String, Vec<Value>)> {
    let mut out = Vec::new();
    for key in diff.added.keys() {
        out.push((rules.added, key.clone(), Vec::new()));
    }
    for key in diff.deleted.keys() {
        out.push((rules.removed, key.clone(), Vec::new()));
    }
    for (key, schemes) in &diff.modified {
        for (scheme, scopes) in schemes {
            for scope in &scopes.added {
                out.push((rules.scope_added, key.clone(), vec![json!(scheme), json!(scope)]));
            }
            for scope in &scopes.deleted {
                out.push((rules.scope_removed, key.clone(), vec![json!(scheme), json!(scope)]));
            }
        }
    }
    out
}

pub struct SecurityCheck;

impl Check for SecurityCheck {
    fn name(&self) -> &'static str {
        "security"
    }

    fn description(&self) -> &'static str {
        "Security requirements, globally and per operation"
    }

    fn rules(&self) -> Vec<(String, Level)> {
        let mut rules = Vec::new();
        for set in [&GLOBAL, &OPERATION] {
            rules.extend(static_rules(&[
                (set.added, Level::Warn),
                (set.removed, Level::Warn),
                (set.scope_added, Level::Warn),
                (set.scope_removed, Level::Info),
            ]));
        }
        rules
    }

    fn run(
        &self,
        diff: &DocumentDiff<'_>,
        sources: &SourceLocations,
        config: &CheckConfig,
    ) -> Vec<Change> {
        let mut emitter = Emitter::new(config);

        if let Some(global) = &diff.security {
            for (id, target, args) in requirement_changes(global, &GLOBAL) {
                emitter.security(id, &target, args);
            }
        }

        for (path, method, operation) in diff.modified_operations() {
            let Some(security) = &operation.security else {
                continue;
            };
            let scope = OperationScope::modified(path, method, operation, sources, config);
            for (id, target, args) in requirement_changes(security, &OPERATION) {
                emitter.api(&scope, id, |change| change.with_target(target).with_args(args));
            }
        }

        emitter.into_changes()
    }
}
