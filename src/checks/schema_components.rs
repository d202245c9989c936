//! Named schemas added to or removed from `components/schemas`.

use super::emit::Emitter;
use super::{static_rules, Check};
use crate::changes::{Change, Level};
use crate::config::CheckConfig;
use crate::diff::DocumentDiff;
use crate::model::SourceLocations;

pub struct SchemaComponentsCheck;

impl Check for SchemaComponentsCheck {
    fn name(&self) -> &'static str {
        "schema-components"
    }

    fn description(&self) -> &'static str {
        "Named schemas in components"
    }

    fn rules(&self) -> Vec<(String, Level)> {
        static_rules(&[("api-schema-added", Level::Info), ("api-schema-removed", Level::Info)])
    }

    fn run(
        &self,
        diff: &DocumentDiff<'_>,
        _sources: &SourceLocations,
        config: &CheckConfig,
    ) -> Vec<Change> {
        let mut emitter = Emitter::new(config);
        if let Some(schemas) = diff.components.as_ref().and_then(|c| c.schemas.as_ref()) {
            for name in &schemas.added {
                emitter.component("api-schema-added", name, Vec::new());
            }
            for name in &schemas.deleted {
                emitter.component("api-schema-removed", name, Vec::new());
            }
        }
        emitter.into_changes()
    }
}
