//! Structural comparison of two schema graphs.
//!
//! The walk resolves references on each side against that side's component
//! arena and descends through properties, array items and combinator
//! members in lockstep. Each invocation of [`diff_schema`] keeps the set of
//! schema identity pairs currently being compared; meeting a pair that is
//! already on the stack means the graph has looped back on itself, and that
//! branch contributes nothing further.

use super::combinator::{diff_subschemas, CombinatorKind, SubschemaDiff};
use super::primitives::{
    diff_keyed, diff_string_sets, value_diff, KeyedDiff, StringSetDiff, ValueDiff,
};
use crate::model::{Components, Discriminator, RefOr, Schema};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::trace;

/// Identity used for an inline schema at the root of a comparison.
pub const ROOT_IDENTITY: &str = "#";

/// Changes to an enum restriction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDiff {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<Value>,
    /// The schema was unrestricted and now lists allowed values.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub became_enum: bool,
    /// The restriction was dropped altogether.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub became_unrestricted: bool,
}

/// Changes to a discriminator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscriminatorDiff {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub added: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name: Option<ValueDiff<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<KeyedDiff<String, String, ValueDiff<String>>>,
}

/// Attribute-level differences between two resolved schemas.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDiff<'a> {
    #[serde(skip)]
    pub base: &'a Schema,
    #[serde(skip)]
    pub revision: &'a Schema,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<ValueDiff<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_only: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ValueDiff<Option<Value>>>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<EnumDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<ValueDiff<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<ValueDiff<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<ValueDiff<Option<u64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<ValueDiff<Option<u64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<ValueDiff<Option<u64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<ValueDiff<Option<u64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<StringSetDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<KeyedDiff<String, &'a RefOr<Schema>, SchemaDiff<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaDiff<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<SubschemaDiff<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<SubschemaDiff<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<SubschemaDiff<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<DiscriminatorDiff>,
}

impl<'a> SchemaDiff<'a> {
    fn unchanged(base: &'a Schema, revision: &'a Schema) -> Self {
        Self {
            base,
            revision,
            types: None,
            format: None,
            nullable: None,
            read_only: None,
            write_only: None,
            deprecated: None,
            default: None,
            enum_values: None,
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
            min_items: None,
            max_items: None,
            pattern: None,
            required: None,
            properties: None,
            items: None,
            one_of: None,
            any_of: None,
            all_of: None,
            discriminator: None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_none()
            && self.format.is_none()
            && self.nullable.is_none()
            && self.read_only.is_none()
            && self.write_only.is_none()
            && self.deprecated.is_none()
            && self.default.is_none()
            && self.enum_values.is_none()
            && self.minimum.is_none()
            && self.maximum.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.min_items.is_none()
            && self.max_items.is_none()
            && self.pattern.is_none()
            && self.required.is_none()
            && self.properties.is_none()
            && self.items.is_none()
            && self.one_of.is_none()
            && self.any_of.is_none()
            && self.all_of.is_none()
            && self.discriminator.is_none()
    }

    /// The combinator diff of the given kind.
    #[must_use]
    pub const fn combinator(&self, kind: CombinatorKind) -> Option<&SubschemaDiff<'a>> {
        match kind {
            CombinatorKind::OneOf => self.one_of.as_ref(),
            CombinatorKind::AnyOf => self.any_of.as_ref(),
            CombinatorKind::AllOf => self.all_of.as_ref(),
        }
    }
}

/// Compare two schemas, each resolved against its own component arena.
///
/// Returns `None` when the schemas are equivalent, when either side is an
/// unresolvable reference, or when the comparison immediately loops back on
/// itself.
pub fn diff_schema<'a>(
    base: &'a RefOr<Schema>,
    revision: &'a RefOr<Schema>,
    base_components: &'a Components,
    revision_components: &'a Components,
) -> Option<SchemaDiff<'a>> {
    SchemaDiffer::new(base_components, revision_components).diff(
        base,
        revision,
        ROOT_IDENTITY,
        ROOT_IDENTITY,
    )
}

/// Lockstep walker over two schema graphs.
pub(crate) struct SchemaDiffer<'a> {
    base: &'a Components,
    revision: &'a Components,
    /// Identity pairs currently on the comparison stack.
    active: HashSet<(String, String)>,
    /// Both arenas hold identical schemas, so equal inputs resolve identically.
    same_arena: bool,
}

impl<'a> SchemaDiffer<'a> {
    pub(crate) fn new(base: &'a Components, revision: &'a Components) -> Self {
        Self {
            base,
            revision,
            active: HashSet::new(),
            same_arena: base.schemas == revision.schemas,
        }
    }

    /// Compare two schema slots. `base_parent` and `revision_parent` name the
    /// inline position used as identity when a slot is not a reference.
    pub(crate) fn diff(
        &mut self,
        base: &'a RefOr<Schema>,
        revision: &'a RefOr<Schema>,
        base_parent: &str,
        revision_parent: &str,
    ) -> Option<SchemaDiff<'a>> {
        if self.same_arena && base == revision {
            return None;
        }
        let (base_schema, base_ref) = self.base.resolve_schema(base)?;
        let (revision_schema, revision_ref) = self.revision.resolve_schema(revision)?;

        let key = (
            base_ref.unwrap_or(base_parent).to_string(),
            revision_ref.unwrap_or(revision_parent).to_string(),
        );
        if self.active.contains(&key) {
            trace!(base = %key.0, revision = %key.1, "schema cycle, not descending");
            return None;
        }
        self.active.insert(key.clone());
        let diff = self.diff_resolved(base_schema, revision_schema, &key.0, &key.1);
        self.active.remove(&key);

        if diff.is_empty() {
            None
        } else {
            Some(diff)
        }
    }

    fn diff_resolved(
        &mut self,
        base: &'a Schema,
        revision: &'a Schema,
        base_id: &str,
        revision_id: &str,
    ) -> SchemaDiff<'a> {
        let mut diff = SchemaDiff::unchanged(base, revision);

        diff.types = value_diff(&sorted_types(base), &sorted_types(revision));
        diff.format = value_diff(&base.format, &revision.format);
        diff.nullable = value_diff(&base.nullable, &revision.nullable);
        diff.read_only = value_diff(&base.read_only, &revision.read_only);
        diff.write_only = value_diff(&base.write_only, &revision.write_only);
        diff.deprecated = value_diff(&base.deprecated, &revision.deprecated);
        diff.default = value_diff(&base.default, &revision.default);
        diff.enum_values = diff_enum(base.enum_values.as_deref(), revision.enum_values.as_deref());
        diff.minimum = value_diff(&base.minimum, &revision.minimum);
        diff.maximum = value_diff(&base.maximum, &revision.maximum);
        diff.min_length = value_diff(&base.min_length, &revision.min_length);
        diff.max_length = value_diff(&base.max_length, &revision.max_length);
        diff.min_items = value_diff(&base.min_items, &revision.min_items);
        diff.max_items = value_diff(&base.max_items, &revision.max_items);
        diff.pattern = value_diff(&base.pattern, &revision.pattern);
        diff.required = diff_string_sets(&base.required, &revision.required);
        diff.discriminator =
            diff_discriminator(base.discriminator.as_ref(), revision.discriminator.as_ref());

        diff.properties = diff_keyed(
            base.properties.iter().map(|(k, v)| (k.clone(), v)),
            revision.properties.iter().map(|(k, v)| (k.clone(), v)),
            |name, from, to| {
                self.diff(
                    from,
                    to,
                    &format!("{base_id}/properties/{name}"),
                    &format!("{revision_id}/properties/{name}"),
                )
            },
        );

        if let (Some(from), Some(to)) = (&base.items, &revision.items) {
            diff.items = self
                .diff(
                    from,
                    to,
                    &format!("{base_id}/items"),
                    &format!("{revision_id}/items"),
                )
                .map(Box::new);
        }

        diff.one_of = diff_subschemas(
            self,
            CombinatorKind::OneOf,
            &base.one_of,
            &revision.one_of,
            base_id,
            revision_id,
        );
        diff.any_of = diff_subschemas(
            self,
            CombinatorKind::AnyOf,
            &base.any_of,
            &revision.any_of,
            base_id,
            revision_id,
        );
        diff.all_of = diff_subschemas(
            self,
            CombinatorKind::AllOf,
            &base.all_of,
            &revision.all_of,
            base_id,
            revision_id,
        );

        diff
    }
}

fn sorted_types(schema: &Schema) -> Vec<String> {
    let mut types = schema.types.clone();
    types.sort_unstable();
    types.dedup();
    types
}

fn diff_enum(base: Option<&[Value]>, revision: Option<&[Value]>) -> Option<EnumDiff> {
    let diff = match (base, revision) {
        (None, None) => return None,
        (None, Some(_)) => EnumDiff {
            became_enum: true,
            ..EnumDiff::default()
        },
        (Some(_), None) => EnumDiff {
            became_unrestricted: true,
            ..EnumDiff::default()
        },
        (Some(from), Some(to)) => EnumDiff {
            added: to.iter().filter(|v| !from.contains(v)).cloned().collect(),
            deleted: from.iter().filter(|v| !to.contains(v)).cloned().collect(),
            ..EnumDiff::default()
        },
    };
    if diff == EnumDiff::default() {
        None
    } else {
        Some(diff)
    }
}

fn diff_discriminator(
    base: Option<&Discriminator>,
    revision: Option<&Discriminator>,
) -> Option<DiscriminatorDiff> {
    match (base, revision) {
        (None, None) => None,
        (None, Some(_)) => Some(DiscriminatorDiff {
            added: true,
            ..DiscriminatorDiff::default()
        }),
        (Some(_), None) => Some(DiscriminatorDiff {
            deleted: true,
            ..DiscriminatorDiff::default()
        }),
        (Some(from), Some(to)) => {
            let mapping = diff_keyed(
                from.mapping.iter().map(|(k, v)| (k.clone(), v)),
                to.mapping.iter().map(|(k, v)| (k.clone(), v)),
                |_, a, b| value_diff(a, b),
            )
            .map(|m| KeyedDiff {
                added: m.added.into_iter().map(|(k, v)| (k, v.clone())).collect(),
                deleted: m.deleted.into_iter().map(|(k, v)| (k, v.clone())).collect(),
                modified: m.modified,
            });
            let diff = DiscriminatorDiff {
                property_name: value_diff(&from.property_name, &to.property_name),
                mapping,
                ..DiscriminatorDiff::default()
            };
            if diff == DiscriminatorDiff::default() {
                None
            } else {
                Some(diff)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(components: &mut Components, name: &str, schema: Schema) {
        components.schemas.insert(name.to_string(), schema.into());
    }

    fn string_with_max(max: u64) -> Schema {
        Schema {
            max_length: Some(max),
            ..Schema::of_type("string")
        }
    }

    #[test]
    fn test_identical_schemas_have_no_diff() {
        let schema: RefOr<Schema> = string_with_max(10).into();
        let components = Components::default();
        assert!(diff_schema(&schema, &schema, &components, &components).is_none());
    }

    #[test]
    fn test_scalar_attribute_diff() {
        let base: RefOr<Schema> = string_with_max(10).into();
        let revision: RefOr<Schema> = string_with_max(15).into();
        let components = Components::default();

        let diff = diff_schema(&base, &revision, &components, &components).unwrap();
        let max = diff.max_length.unwrap();
        assert_eq!(max.from, Some(10));
        assert_eq!(max.to, Some(15));
        assert!(diff.types.is_none());
    }

    #[test]
    fn test_type_order_is_ignored() {
        let base: RefOr<Schema> = Schema {
            types: vec!["string".into(), "null".into()],
            ..Schema::default()
        }
        .into();
        let revision: RefOr<Schema> = Schema {
            types: vec!["null".into(), "string".into()],
            ..Schema::default()
        }
        .into();
        let components = Components::default();
        assert!(diff_schema(&base, &revision, &components, &components).is_none());
    }

    #[test]
    fn test_self_referential_schema_terminates() {
        let node = |max: u64| {
            let mut schema = Schema::of_type("object");
            schema
                .properties
                .insert("next".to_string(), RefOr::schema_ref("Node"));
            schema
                .properties
                .insert("label".to_string(), string_with_max(max).into());
            schema
        };

        let mut base = Components::default();
        component(&mut base, "Node", node(10));
        let mut revision = Components::default();
        component(&mut revision, "Node", node(20));

        let root = RefOr::schema_ref("Node");
        let diff = diff_schema(&root, &root, &base, &revision).unwrap();
        let properties = diff.properties.unwrap();
        assert!(properties.modified.contains_key("label"));
        // The loop back to Node is cut at the second visit.
        assert!(!properties.modified.contains_key("next"));

        assert!(diff_schema(&root, &root, &base, &base).is_none());
    }

    #[test]
    fn test_mutual_recursion_terminates() {
        let mut components = Components::default();
        let mut a = Schema::of_type("object");
        a.properties.insert("b".to_string(), RefOr::schema_ref("B"));
        let mut b = Schema::of_type("object");
        b.properties.insert("a".to_string(), RefOr::schema_ref("A"));
        component(&mut components, "A", a);
        component(&mut components, "B", b);

        let mut revision = components.clone();
        if let Some(RefOr::Item(b)) = revision.schemas.get_mut("B") {
            b.description = Some("changed description only".to_string());
        }

        let root = RefOr::schema_ref("A");
        assert!(diff_schema(&root, &root, &components, &revision).is_none());
    }

    #[test]
    fn test_unresolvable_reference_is_no_diff() {
        let components = Components::default();
        let base = RefOr::schema_ref("Missing");
        let revision: RefOr<Schema> = Schema::of_type("string").into();
        assert!(diff_schema(&base, &revision, &components, &components).is_none());
    }

    #[test]
    fn test_enum_transitions() {
        let values = |vs: &[&str]| Some(vs.iter().map(|v| Value::from(*v)).collect::<Vec<_>>());

        let diff = diff_enum(None, values(&["a"]).as_deref()).unwrap();
        assert!(diff.became_enum);

        let diff = diff_enum(values(&["a"]).as_deref(), None).unwrap();
        assert!(diff.became_unrestricted);
        assert!(diff.deleted.is_empty());

        let diff = diff_enum(values(&["a", "b"]).as_deref(), values(&["b", "c"]).as_deref()).unwrap();
        assert_eq!(diff.added, vec![Value::from("c")]);
        assert_eq!(diff.deleted, vec![Value::from("a")]);

        assert!(diff_enum(values(&["a", "b"]).as_deref(), values(&["b", "a"]).as_deref()).is_none());
    }

    #[test]
    fn test_discriminator_mapping_diff() {
        let mut from = Discriminator {
            property_name: "kind".to_string(),
            mapping: Default::default(),
        };
        from.mapping
            .insert("dog".to_string(), "#/components/schemas/Dog".to_string());
        let mut to = from.clone();
        to.mapping
            .insert("cat".to_string(), "#/components/schemas/Cat".to_string());

        let diff = diff_discriminator(Some(&from), Some(&to)).unwrap();
        let mapping = diff.mapping.unwrap();
        assert_eq!(mapping.added["cat"], "#/components/schemas/Cat");
        assert!(diff.property_name.is_none());
        assert!(diff_discriminator(Some(&from), Some(&from)).is_none());
    }
}
