//! Classified change records.
//!
//! A [`Change`] is produced once by a single check and never mutated. It
//! carries a stable rule id, a [`Level`], where it happened, and the
//! arguments an external formatter needs to render a message.

mod level;

pub use level::Level;

use crate::model::{Method, SourceLocation};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt::Write as _;

/// Where a change happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChangeContext {
    /// A change to one operation.
    #[serde(rename_all = "camelCase")]
    Api {
        path: String,
        method: Method,
        #[serde(skip_serializing_if = "Option::is_none")]
        operation_id: Option<String>,
    },
    /// A change to a named component.
    Component { name: String },
    /// A change to the global security requirements.
    Security,
}

/// A single classified change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub id: String,
    pub level: Level,
    #[serde(flatten)]
    pub context: ChangeContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLocation>,
    /// The parameter, media type or property path the change is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub args: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub attributes: IndexMap<String, Value>,
}

impl Change {
    fn new(id: impl Into<String>, level: Level, context: ChangeContext) -> Self {
        Self {
            id: id.into(),
            level,
            context,
            source: None,
            target: None,
            args: Vec::new(),
            comment: None,
            attributes: IndexMap::new(),
        }
    }

    /// A change scoped to one operation.
    pub fn api(
        id: impl Into<String>,
        level: Level,
        path: impl Into<String>,
        method: Method,
        operation_id: Option<String>,
    ) -> Self {
        Self::new(
            id,
            level,
            ChangeContext::Api {
                path: path.into(),
                method,
                operation_id,
            },
        )
    }

    /// A change scoped to a named component.
    pub fn component(id: impl Into<String>, level: Level, name: impl Into<String>) -> Self {
        Self::new(id, level, ChangeContext::Component { name: name.into() })
    }

    /// A change to the global security requirements.
    pub fn security(id: impl Into<String>, level: Level) -> Self {
        Self::new(id, level, ChangeContext::Security)
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: Option<SourceLocation>) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: IndexMap<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Path for API changes, component name for component changes.
    #[must_use]
    pub fn path(&self) -> &str {
        match &self.context {
            ChangeContext::Api { path, .. } => path,
            ChangeContext::Component { name } => name,
            ChangeContext::Security => "",
        }
    }

    #[must_use]
    pub const fn method(&self) -> Option<Method> {
        match &self.context {
            ChangeContext::Api { method, .. } => Some(*method),
            _ => None,
        }
    }

    #[must_use]
    pub fn operation_id(&self) -> Option<&str> {
        match &self.context {
            ChangeContext::Api { operation_id, .. } => operation_id.as_deref(),
            _ => None,
        }
    }

    /// Target followed by the rendered arguments; the tie-breaker between
    /// changes with the same id at the same place.
    #[must_use]
    pub fn message_key(&self) -> String {
        let mut key = self.target.clone().unwrap_or_default();
        for arg in &self.args {
            key.push(' ');
            key.push_str(&render_arg(arg));
        }
        key
    }

    /// Plain one-line description used by the text reporter.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!("{} {}", self.level, self.id);
        if let Some(target) = &self.target {
            let _ = write!(line, " '{target}'");
        }
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(render_arg).collect();
            let _ = write!(line, ": {}", args.join(" -> "));
        }
        if let Some(comment) = &self.comment {
            let _ = write!(line, " ({comment})");
        }
        line
    }

    /// Canonical ordering: level descending, then path, operation, rule id,
    /// message key and comment ascending.
    #[must_use]
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        other
            .level
            .cmp(&self.level)
            .then_with(|| self.path().cmp(other.path()))
            .then_with(|| self.method().cmp(&other.method()))
            .then_with(|| self.id.cmp(&other.id))
            .then_with(|| self.message_key().cmp(&other.message_key()))
            .then_with(|| self.comment.cmp(&other.comment))
    }
}

/// Render an argument for display: strings verbatim, everything else as JSON.
#[must_use]
pub fn render_arg(arg: &Value) -> String {
    match arg {
        Value::String(s) => s.clone(),
        Value::Null => "unset".to_string(),
        other => other.to_string(),
    }
}

/// Sort changes into canonical order.
pub fn sort_changes(changes: &mut [Change]) {
    changes.sort_by(Change::canonical_cmp);
}

/// Keep changes at or above `min`, preserving order.
#[must_use]
pub fn filter_by_level(changes: Vec<Change>, min: Level) -> Vec<Change> {
    changes.into_iter().filter(|c| c.level >= min).collect()
}
