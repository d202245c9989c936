//! Diff-tree walker shared by the parameter, body and response checks.
//!
//! Visits a schema diff root and every changed node beneath it, in a fixed
//! order: the node itself, then its properties, then array items, then the
//! matched members of each combinator. Each node is reported under the
//! subject it belongs to: the root under the caller's subject, nested
//! nodes as properties, switching to the read-only/write-only subjects when
//! the property is never sent in this direction.

use super::emit::{Emitter, OperationScope};
use super::rules::{Aspect, Channel, Subject};
use super::schema_rules::classify;
use crate::diff::{CombinatorKind, SchemaDiff, SchemaPath};
use crate::model::{Components, Schema};
use serde_json::Value;

/// Where a schema diff sits and how to label it.
pub(crate) struct SchemaSite<'s> {
    /// Subject of the root node.
    pub subject: Subject,
    /// Target used for root-level changes (parameter or media type).
    pub target: &'s str,
    /// Media type of a body; `None` for parameters.
    pub media_type: Option<&'s str>,
    pub base_components: &'s Components,
    pub revision_components: &'s Components,
}

impl SchemaSite<'_> {
    /// Parameters and bodies that are neither JSON nor XML.
    fn non_json(&self) -> bool {
        self.media_type
            .map_or(true, |mt| !(mt.contains("json") || mt.contains("xml")))
    }
}

/// Emit every change within `diff`.
pub(crate) fn emit_schema_changes(
    emitter: &mut Emitter<'_>,
    scope: &OperationScope<'_>,
    site: &SchemaSite<'_>,
    diff: &SchemaDiff<'_>,
) {
    let mut walker = Walker {
        emitter,
        scope,
        site,
        channel: site.subject.channel(),
        non_json: site.non_json(),
    };
    walker.visit(diff, &SchemaPath::root(), site.subject);
}

struct Walker<'w, 'e, 's> {
    emitter: &'w mut Emitter<'e>,
    scope: &'w OperationScope<'s>,
    site: &'w SchemaSite<'s>,
    channel: Channel,
    non_json: bool,
}

impl Walker<'_, '_, '_> {
    fn target(&self, path: &SchemaPath) -> String {
        if path.is_root() {
            self.site.target.to_string()
        } else {
            path.to_string()
        }
    }

    fn nested_subject(&self, node: &SchemaDiff<'_>) -> Subject {
        Subject::property(
            self.channel,
            node.base.read_only || node.revision.read_only,
            node.base.write_only || node.revision.write_only,
        )
    }

    fn emit(
        &mut self,
        subject: Subject,
        aspect: Aspect,
        target: &str,
        schema: &Schema,
        args: Vec<Value>,
    ) {
        let attributes = self.scope.attributes_with(schema);
        self.emitter.api(self.scope, &subject.rule_id(aspect), |change| {
            change
                .with_target(target)
                .with_args(args)
                .with_attributes(attributes)
        });
    }

    fn visit(&mut self, node: &SchemaDiff<'_>, path: &SchemaPath, subject: Subject) {
        let target = self.target(path);
        for (aspect, args) in classify(node, self.channel, self.non_json) {
            self.emit(subject, aspect, &target, node.revision, args);
        }

        self.visit_presence(node, path);

        if let Some(properties) = &node.properties {
            for (name, child) in &properties.modified {
                let subject = self.nested_subject(child);
                self.visit(child, &path.property(name), subject);
            }
        }
        if let Some(items) = &node.items {
            let subject = self.nested_subject(items);
            self.visit(items, &path.items(), subject);
        }
        for kind in CombinatorKind::ALL {
            let Some(members) = node.combinator(kind) else {
                continue;
            };
            for (signature, member) in &members.modified {
                let subject = self.nested_subject(member);
                self.visit(member, &path.combinator(kind, signature), subject);
            }
        }
    }

    /// Properties that appeared, disappeared or changed requiredness.
    fn visit_presence(&mut self, node: &SchemaDiff<'_>, path: &SchemaPath) {
        if let Some(properties) = &node.properties {
            for (name, schema) in &properties.added {
                let Some((schema, _)) = self.site.revision_components.resolve_schema(schema) else {
                    continue;
                };
                let aspect = if node.revision.is_required(name) {
                    Aspect::AddedRequired
                } else {
                    Aspect::AddedOptional
                };
                let subject = Subject::property(self.channel, schema.read_only, schema.write_only);
                self.emit(subject, aspect, &path.property(name).to_string(), schema, Vec::new());
            }
            for (name, schema) in &properties.deleted {
                let Some((schema, _)) = self.site.base_components.resolve_schema(schema) else {
                    continue;
                };
                let aspect = if node.base.is_required(name) {
                    Aspect::RemovedRequired
                } else {
                    Aspect::RemovedOptional
                };
                let subject = Subject::property(self.channel, schema.read_only, schema.write_only);
                self.emit(subject, aspect, &path.property(name).to_string(), schema, Vec::new());
            }
        }

        if let Some(required) = &node.required {
            let changes = required
                .added
                .iter()
                .map(|name| (name, Aspect::BecameRequired))
                .chain(required.deleted.iter().map(|name| (name, Aspect::BecameOptional)));
            for (name, aspect) in changes {
                let (Some(from), Some(to)) = (
                    node.base.properties.get(name),
                    node.revision.properties.get(name),
                ) else {
                    continue;
                };
                let Some((from, _)) = self.site.base_components.resolve_schema(from) else {
                    continue;
                };
                let Some((to, _)) = self.site.revision_components.resolve_schema(to) else {
                    continue;
                };
                let subject = Subject::property(
                    self.channel,
                    from.read_only || to.read_only,
                    from.write_only || to.write_only,
                );
                self.emit(subject, aspect, &path.property(name).to_string(), to, Vec::new());
            }
        }
    }
}
