//! The catalogue of checks and the rule ids they own.

use super::{
    Check, DeprecationCheck, EndpointsCheck, OperationMetadataCheck, RequestBodyCheck,
    RequestParametersCheck, ResponseHeadersCheck, ResponsesCheck, SchemaComponentsCheck,
    SecurityCheck, SecurityComponentsCheck, StabilityCheck,
};
use crate::changes::Level;
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::LazyLock;

/// A rule id with its default level and the checks that emit it.
///
/// Most rules belong to one check. Nested request properties are shared by
/// the parameter and request body checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleInfo {
    pub id: String,
    pub level: Level,
    pub checks: Vec<&'static str>,
}

impl RuleInfo {
    #[must_use]
    pub fn is_emitted_by(&self, check: &str) -> bool {
        self.checks.iter().any(|name| *name == check)
    }
}

static CHECKS: [&dyn Check; 11] = [
    &EndpointsCheck,
    &DeprecationCheck,
    &StabilityCheck,
    &OperationMetadataCheck,
    &RequestParametersCheck,
    &RequestBodyCheck,
    &ResponsesCheck,
    &ResponseHeadersCheck,
    &SecurityCheck,
    &SecurityComponentsCheck,
    &SchemaComponentsCheck,
];

static RULES: LazyLock<IndexMap<String, RuleInfo>> = LazyLock::new(|| {
    let mut rules: IndexMap<String, RuleInfo> = IndexMap::new();
    for check in CHECKS {
        for (id, level) in check.rules() {
            rules
                .entry(id.clone())
                .or_insert_with(|| RuleInfo {
                    id,
                    level,
                    checks: Vec::new(),
                })
                .checks
                .push(check.name());
        }
    }
    rules
});

/// All checks, in reporting order.
#[must_use]
pub fn checks() -> &'static [&'static dyn Check] {
    &CHECKS
}

#[must_use]
pub fn check_names() -> Vec<&'static str> {
    CHECKS.iter().map(|check| check.name()).collect()
}

#[must_use]
pub fn is_check(name: &str) -> bool {
    CHECKS.iter().any(|check| check.name() == name)
}

/// Look up a rule id.
#[must_use]
pub fn rule(id: &str) -> Option<&'static RuleInfo> {
    RULES.get(id)
}

/// Every known rule, grouped by check.
pub fn rules() -> impl Iterator<Item = &'static RuleInfo> {
    RULES.values()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_check_names_unique() {
        let names = check_names();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
        assert!(is_check("request-parameters"));
        assert!(!is_check("licenses"));
    }

    #[test]
    fn test_only_nested_request_properties_are_shared() {
        for rule in rules() {
            if rule.checks.len() > 1 {
                assert_eq!(rule.checks, vec!["request-parameters", "request-body"], "{}", rule.id);
                assert!(rule.id.starts_with("request-property-")
                    || rule.id.starts_with("request-read-only-property-"));
            }
        }
        let shared = rule("request-property-max-length-decreased").unwrap();
        assert!(shared.is_emitted_by("request-parameters"));
        assert!(shared.is_emitted_by("request-body"));
    }

    #[test]
    fn test_shared_rules_agree_on_level() {
        for check in checks() {
            for (id, level) in check.rules() {
                assert_eq!(rule(&id).unwrap().level, level, "{id}");
            }
        }
    }

    #[test]
    fn test_known_rules() {
        let rule = rule("request-parameter-max-length-decreased").unwrap();
        assert_eq!(rule.level, Level::Err);
        assert_eq!(rule.checks, vec!["request-parameters"]);

        let rule = super::rule("response-property-became-nullable").unwrap();
        assert_eq!(rule.level, Level::Err);
        assert_eq!(rule.checks, vec!["responses"]);

        assert!(super::rule("api-path-added").unwrap().is_emitted_by("endpoints"));
        assert!(super::rule("api-sunset-deleted").unwrap().is_emitted_by("deprecation"));
        assert!(super::rule("api-renamed").is_none());
    }
}
