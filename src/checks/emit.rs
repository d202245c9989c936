//! Change construction shared by all checks.

use crate::changes::Change;
use crate::config::CheckConfig;
use crate::diff::{OperationDiff, PathDiff};
use crate::model::{Method, Operation, Schema, SourceLocation, SourceLocations};
use indexmap::IndexMap;
use serde_json::Value;

/// The operation a change is attributed to.
pub(crate) struct OperationScope<'a> {
    path: &'a str,
    method: Method,
    operation_id: Option<&'a str>,
    source: Option<SourceLocation>,
    attributes: IndexMap<String, Value>,
    keys: &'a [String],
}

impl<'a> OperationScope<'a> {
    fn new(
        path: &'a str,
        method: Method,
        operation: &'a Operation,
        source: Option<SourceLocation>,
        config: &'a CheckConfig,
    ) -> Self {
        let keys = config.attributes();
        let attributes = keys
            .iter()
            .filter_map(|key| Some((key.clone(), operation.extension(key)?.clone())))
            .collect();
        Self {
            path,
            method,
            operation_id: operation.operation_id.as_deref(),
            source,
            attributes,
            keys,
        }
    }

    /// An operation present in both documents.
    pub(crate) fn modified(
        path: &'a PathDiff<'_>,
        method: Method,
        operation: &'a OperationDiff<'_>,
        sources: &SourceLocations,
        config: &'a CheckConfig,
    ) -> Self {
        let source = sources.locate(&path.base_path, &path.revision_path, method);
        Self::new(&path.revision_path, method, operation.revision, source, config)
    }

    /// An operation only in the revision.
    pub(crate) fn added(
        path: &'a str,
        method: Method,
        operation: &'a Operation,
        sources: &SourceLocations,
        config: &'a CheckConfig,
    ) -> Self {
        let source = sources.revision_location(path, method).cloned();
        Self::new(path, method, operation, source, config)
    }

    /// An operation only in the base.
    pub(crate) fn deleted(
        path: &'a str,
        method: Method,
        operation: &'a Operation,
        sources: &SourceLocations,
        config: &'a CheckConfig,
    ) -> Self {
        let source = sources.base_location(path, method).cloned();
        Self::new(path, method, operation, source, config)
    }

    /// Operation attributes, overridden by the ones the schema carries.
    pub(crate) fn attributes_with(&self, schema: &Schema) -> IndexMap<String, Value> {
        let mut attributes = self.attributes.clone();
        for key in self.keys {
            if let Some(value) = schema.extension(key) {
                attributes.insert(key.clone(), value.clone());
            }
        }
        attributes
    }
}

/// Collects changes, resolving each rule's level through the config.
pub(crate) struct Emitter<'c> {
    config: &'c CheckConfig,
    changes: Vec<Change>,
}

impl<'c> Emitter<'c> {
    pub(crate) const fn new(config: &'c CheckConfig) -> Self {
        Self {
            config,
            changes: Vec::new(),
        }
    }

    pub(crate) const fn config(&self) -> &'c CheckConfig {
        self.config
    }

    /// Emit an operation-scoped change; `finish` adds target, args and the
    /// like. Disabled rules produce nothing.
    pub(crate) fn api(
        &mut self,
        scope: &OperationScope<'_>,
        id: &str,
        finish: impl FnOnce(Change) -> Change,
    ) {
        let Some(level) = self.config.level(id) else {
            return;
        };
        let change = Change::api(
            id,
            level,
            scope.path,
            scope.method,
            scope.operation_id.map(str::to_string),
        )
        .with_source(scope.source.clone())
        .with_attributes(scope.attributes.clone());
        self.changes.push(finish(change));
    }

    /// Emit a change to a named component.
    pub(crate) fn component(&mut self, id: &str, name: &str, args: Vec<Value>) {
        if let Some(level) = self.config.level(id) {
            self.changes
                .push(Change::component(id, level, name).with_args(args));
        }
    }

    /// Emit a change to the global security requirements.
    pub(crate) fn security(&mut self, id: &str, target: &str, args: Vec<Value>) {
        if let Some(level) = self.config.level(id) {
            self.changes.push(
                Change::security(id, level)
                    .with_target(target)
                    .with_args(args),
            );
        }
    }

    pub(crate) fn into_changes(self) -> Vec<Change> {
        self.changes
    }
}
