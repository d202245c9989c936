//! Breaking-change checks.
//!
//! Each check walks one area of a [`DocumentDiff`] and turns what it finds
//! into classified [`Change`]s. Checks are independent of each other; the
//! [`Checker`](crate::checker::Checker) runs the enabled ones and merges
//! their output.
//!
//! Rule ids are stable. Schema-level ids are composed from a subject and an
//! aspect (see [`rules`]); the rest are listed by the check that owns them.
//! Every id a check can emit is known to the [`registry`], which is also
//! where default levels come from.

mod deprecation;
mod emit;
mod endpoints;
mod operation_meta;
mod parameters;
pub mod registry;
mod request_body;
mod response_headers;
mod responses;
pub mod rules;
mod schema_components;
mod schema_rules;
mod security;
mod security_components;
mod stability;
mod walk;

pub use deprecation::DeprecationCheck;
pub use endpoints::EndpointsCheck;
pub use operation_meta::OperationMetadataCheck;
pub use parameters::RequestParametersCheck;
pub use registry::{check_names, checks, is_check, rule, rules as all_rules, RuleInfo};
pub use request_body::RequestBodyCheck;
pub use response_headers::ResponseHeadersCheck;
pub use responses::ResponsesCheck;
pub use schema_components::SchemaComponentsCheck;
pub use security::SecurityCheck;
pub use security_components::SecurityComponentsCheck;
pub use stability::StabilityCheck;

use crate::changes::{Change, Level};
use crate::config::CheckConfig;
use crate::diff::DocumentDiff;
use crate::model::SourceLocations;
use rules::Subject;

/// A named group of rules evaluated against a document diff.
pub trait Check: Send + Sync {
    /// Name used to select the check on the command line.
    fn name(&self) -> &'static str;

    /// One-line description for listings.
    fn description(&self) -> &'static str;

    /// Every rule id this check can emit, with its default level.
    fn rules(&self) -> Vec<(String, Level)>;

    /// Produce this check's changes. Rules disabled in `config` emit nothing.
    fn run(
        &self,
        diff: &DocumentDiff<'_>,
        sources: &SourceLocations,
        config: &CheckConfig,
    ) -> Vec<Change>;
}

/// Rule ids composed from `subjects`, with their default levels.
fn subject_rules(subjects: &[Subject]) -> Vec<(String, Level)> {
    subjects
        .iter()
        .flat_map(|subject| {
            subject
                .aspects()
                .into_iter()
                .map(move |aspect| (subject.rule_id(aspect), subject.default_level(aspect)))
        })
        .collect()
}

fn static_rules(rules: &[(&str, Level)]) -> Vec<(String, Level)> {
    rules
        .iter()
        .map(|(id, level)| ((*id).to_string(), *level))
        .collect()
}
