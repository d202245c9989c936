//! Classification of one schema diff node into rule aspects.
//!
//! Only the node's own attributes are looked at here; descending into
//! properties, items and combinator branches is the walker's job.

use super::rules::{Aspect, Channel};
use crate::diff::{CombinatorKind, SchemaDiff, ValueDiff};
use crate::model::Schema;
use serde_json::{json, Value};

/// Aspects of one node together with their arguments.
pub(crate) type Findings = Vec<(Aspect, Vec<Value>)>;

/// Classify the attribute changes of `diff`.
///
/// `non_json` is true when the schema describes a parameter, a header, or a
/// body whose media type is neither JSON nor XML; any value then fits into
/// a string.
pub(crate) fn classify(diff: &SchemaDiff<'_>, channel: Channel, non_json: bool) -> Findings {
    let mut findings = Findings::new();

    if diff.types.is_some() || diff.format.is_some() {
        classify_type(&mut findings, diff.base, diff.revision, channel, non_json);
    }

    if let Some(nullable) = &diff.nullable {
        let aspect = if nullable.to {
            Aspect::BecameNullable
        } else {
            Aspect::BecameNotNullable
        };
        findings.push((aspect, Vec::new()));
    }

    if let Some(values) = &diff.enum_values {
        if values.became_enum {
            let allowed = diff.revision.enum_values.clone().unwrap_or_default();
            findings.push((Aspect::BecameEnum, vec![Value::Array(allowed)]));
        }
        for value in &values.added {
            findings.push((Aspect::EnumValueAdded, vec![value.clone()]));
        }
        for value in &values.deleted {
            findings.push((Aspect::EnumValueRemoved, vec![value.clone()]));
        }
    }

    if let Some(default) = &diff.default {
        findings.push(match (&default.from, &default.to) {
            (None, Some(to)) => (Aspect::DefaultValueAdded, vec![to.clone()]),
            (Some(from), None) => (Aspect::DefaultValueRemoved, vec![from.clone()]),
            (from, to) => (
                Aspect::DefaultValueChanged,
                vec![from.clone().unwrap_or_default(), to.clone().unwrap_or_default()],
            ),
        });
    }

    upper(
        &mut findings,
        diff.maximum.as_ref(),
        Aspect::MaxIncreased,
        Aspect::MaxDecreased,
        number_arg,
    );
    lower(
        &mut findings,
        diff.minimum.as_ref(),
        Aspect::MinIncreased,
        Aspect::MinDecreased,
        number_arg,
    );
    upper(
        &mut findings,
        diff.max_length.as_ref(),
        Aspect::MaxLengthIncreased,
        Aspect::MaxLengthDecreased,
        count_arg,
    );
    lower(
        &mut findings,
        diff.min_length.as_ref(),
        Aspect::MinLengthIncreased,
        Aspect::MinLengthDecreased,
        count_arg,
    );
    upper(
        &mut findings,
        diff.max_items.as_ref(),
        Aspect::MaxItemsIncreased,
        Aspect::MaxItemsDecreased,
        count_arg,
    );
    lower(
        &mut findings,
        diff.min_items.as_ref(),
        Aspect::MinItemsIncreased,
        Aspect::MinItemsDecreased,
        count_arg,
    );

    if let Some(pattern) = &diff.pattern {
        findings.push(match (&pattern.from, &pattern.to) {
            (None, Some(to)) => (Aspect::PatternAdded, vec![json!(to)]),
            (Some(from), None) => (Aspect::PatternRemoved, vec![json!(from)]),
            (from, to) => (Aspect::PatternChanged, vec![json!(from), json!(to)]),
        });
    }

    for kind in CombinatorKind::ALL {
        let Some(members) = diff.combinator(kind) else {
            continue;
        };
        let (added, removed) = combinator_aspects(kind);
        if !members.added.is_empty() {
            let signatures = members.added.iter().map(|m| json!(m.signature)).collect();
            findings.push((added, signatures));
        }
        if !members.deleted.is_empty() {
            let signatures = members.deleted.iter().map(|m| json!(m.signature)).collect();
            findings.push((removed, signatures));
        }
    }

    if let Some(discriminator) = &diff.discriminator {
        if discriminator.added {
            findings.push((Aspect::DiscriminatorAdded, Vec::new()));
        }
        if discriminator.deleted {
            findings.push((Aspect::DiscriminatorRemoved, Vec::new()));
        }
        if let Some(name) = &discriminator.property_name {
            findings.push((
                Aspect::DiscriminatorPropertyNameChanged,
                vec![json!(name.from), json!(name.to)],
            ));
        }
        if let Some(mapping) = &discriminator.mapping {
            if !mapping.added.is_empty() {
                let keys = mapping.added.keys().map(|k| json!(k)).collect();
                findings.push((Aspect::DiscriminatorMappingAdded, keys));
            }
            if !mapping.deleted.is_empty() {
                let keys = mapping.deleted.keys().map(|k| json!(k)).collect();
                findings.push((Aspect::DiscriminatorMappingDeleted, keys));
            }
            for (key, target) in &mapping.modified {
                findings.push((
                    Aspect::DiscriminatorMappingChanged,
                    vec![json!(key), json!(target.from), json!(target.to)],
                ));
            }
        }
    }

    findings
}

const fn combinator_aspects(kind: CombinatorKind) -> (Aspect, Aspect) {
    match kind {
        CombinatorKind::OneOf => (Aspect::OneOfAdded, Aspect::OneOfRemoved),
        CombinatorKind::AnyOf => (Aspect::AnyOfAdded, Aspect::AnyOfRemoved),
        CombinatorKind::AllOf => (Aspect::AllOfAdded, Aspect::AllOfRemoved),
    }
}

// ============================================================================
// Bounds
// ============================================================================

/// Render a numeric bound; whole numbers print without a fraction.
fn number_arg(bound: Option<f64>) -> Value {
    match bound {
        None => Value::Null,
        #[allow(clippy::cast_possible_truncation)]
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => json!(v as i64),
        Some(v) => json!(v),
    }
}

fn count_arg(bound: Option<u64>) -> Value {
    bound.map_or(Value::Null, |v| json!(v))
}

/// An upper bound; unset means unbounded above.
fn upper<T: PartialOrd + Copy>(
    findings: &mut Findings,
    diff: Option<&ValueDiff<Option<T>>>,
    increased: Aspect,
    decreased: Aspect,
    arg: fn(Option<T>) -> Value,
) {
    let Some(diff) = diff else { return };
    let grew = match (diff.from, diff.to) {
        (Some(from), Some(to)) if to > from => true,
        (Some(from), Some(to)) if to < from => false,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        _ => return,
    };
    let aspect = if grew { increased } else { decreased };
    findings.push((aspect, vec![arg(diff.from), arg(diff.to)]));
}

/// A lower bound; unset means unbounded below.
fn lower<T: PartialOrd + Copy>(
    findings: &mut Findings,
    diff: Option<&ValueDiff<Option<T>>>,
    increased: Aspect,
    decreased: Aspect,
    arg: fn(Option<T>) -> Value,
) {
    let Some(diff) = diff else { return };
    let grew = match (diff.from, diff.to) {
        (Some(from), Some(to)) if to > from => true,
        (Some(from), Some(to)) if to < from => false,
        (Some(_), None) => false,
        (None, Some(_)) => true,
        _ => return,
    };
    let aspect = if grew { increased } else { decreased };
    findings.push((aspect, vec![arg(diff.from), arg(diff.to)]));
}

// ============================================================================
// Types and formats
// ============================================================================

fn sorted_types(schema: &Schema) -> Vec<&str> {
    let mut types: Vec<&str> = schema.types.iter().map(String::as_str).collect();
    types.sort_unstable();
    types.dedup();
    types
}

/// `string`, `integer/int32`, `integer, null` or `any`.
fn type_description(schema: &Schema) -> String {
    let types = sorted_types(schema);
    let mut description = if types.is_empty() {
        "any".to_string()
    } else {
        types.join(", ")
    };
    if let Some(format) = &schema.format {
        description.push('/');
        description.push_str(format);
    }
    description
}

fn format_contains(outer: Option<&str>, inner: Option<&str>) -> bool {
    match (outer, inner) {
        (None, _) => true,
        (Some(outer), Some(inner)) if outer == inner => true,
        (Some("int64"), Some("int32")) | (Some("double"), Some("float")) => true,
        _ => false,
    }
}

/// Whether every value of `inner` is also a value of `outer`.
fn type_contains(outer: &Schema, inner: &Schema, non_json: bool) -> bool {
    let outer_type = outer.single_type();
    let inner_type = inner.single_type();
    let outer_format = outer.format.as_deref();
    let inner_format = inner.format.as_deref();

    if outer.types.is_empty() {
        return true;
    }
    if non_json && outer_type == Some("string") {
        return true;
    }
    match (outer_type, inner_type) {
        (Some(o), Some(i)) if o == i => format_contains(outer_format, inner_format),
        (Some("number"), Some("integer")) => matches!(outer_format, None | Some("double")),
        _ => false,
    }
}

fn classify_type(
    findings: &mut Findings,
    base: &Schema,
    revision: &Schema,
    channel: Channel,
    non_json: bool,
) {
    let from = sorted_types(base);
    let to = sorted_types(revision);

    if !from.is_empty() && !to.is_empty() && (from.len() > 1 || to.len() > 1) {
        // Format containment is undefined across several types.
        if base.format != revision.format {
            findings.push((
                Aspect::TypeChanged,
                vec![json!(type_description(base)), json!(type_description(revision))],
            ));
        }
        let added: Vec<Value> = to.iter().filter(|t| !from.contains(t)).map(|t| json!(t)).collect();
        let removed: Vec<Value> = from.iter().filter(|t| !to.contains(t)).map(|t| json!(t)).collect();
        if !added.is_empty() {
            findings.push((Aspect::ListOfTypesWidened, added));
        }
        if !removed.is_empty() {
            findings.push((Aspect::ListOfTypesNarrowed, removed));
        }
        return;
    }

    let compatible = match channel {
        Channel::Request => type_contains(revision, base, non_json),
        Channel::Response => type_contains(base, revision, non_json),
    };
    let aspect = match (compatible, channel) {
        (true, Channel::Request) => Aspect::TypeGeneralized,
        (true, Channel::Response) => Aspect::TypeSpecialized,
        (false, _) => Aspect::TypeChanged,
    };
    findings.push((
        aspect,
        vec![json!(type_description(base)), json!(type_description(revision))],
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_schema;
    use crate::model::{Components, RefOr};

    fn classify_pair(base: Schema, revision: Schema, channel: Channel, non_json: bool) -> Findings {
        let base: RefOr<Schema> = base.into();
        let revision: RefOr<Schema> = revision.into();
        let components = Components::default();
        diff_schema(&base, &revision, &components, &components)
            .map(|d| classify(&d, channel, non_json))
            .unwrap_or_default()
    }

    fn with_format(type_name: &str, format: &str) -> Schema {
        Schema {
            format: Some(format.to_string()),
            ..Schema::of_type(type_name)
        }
    }

    #[test]
    fn test_max_length_polarity_args() {
        let base = Schema {
            max_length: Some(10),
            ..Schema::of_type("string")
        };
        let revision = Schema {
            max_length: Some(15),
            ..Schema::of_type("string")
        };
        let findings = classify_pair(base, revision, Channel::Request, true);
        assert_eq!(
            findings,
            vec![(Aspect::MaxLengthIncreased, vec![json!(10), json!(15)])]
        );
    }

    #[test]
    fn test_unset_bound_is_unbounded() {
        let base = Schema {
            maximum: Some(100.0),
            minimum: Some(1.5),
            ..Schema::of_type("number")
        };
        let findings = classify_pair(base, Schema::of_type("number"), Channel::Request, false);
        assert_eq!(
            findings,
            vec![
                (Aspect::MaxIncreased, vec![json!(100), Value::Null]),
                (Aspect::MinDecreased, vec![json!(1.5), Value::Null]),
            ]
        );
    }

    #[test]
    fn test_integer_to_number_is_generalized_for_requests() {
        let findings = classify_pair(
            Schema::of_type("integer"),
            Schema::of_type("number"),
            Channel::Request,
            false,
        );
        assert_eq!(findings[0].0, Aspect::TypeGeneralized);
        assert_eq!(findings[0].1, vec![json!("integer"), json!("number")]);

        let findings = classify_pair(
            Schema::of_type("integer"),
            Schema::of_type("number"),
            Channel::Response,
            false,
        );
        assert_eq!(findings[0].0, Aspect::TypeChanged);
    }

    #[test]
    fn test_number_to_integer_is_specialized_for_responses() {
        let findings = classify_pair(
            Schema::of_type("number"),
            Schema::of_type("integer"),
            Channel::Response,
            false,
        );
        assert_eq!(findings[0].0, Aspect::TypeSpecialized);
    }

    #[test]
    fn test_string_absorbs_everything_outside_json() {
        let findings = classify_pair(
            Schema::of_type("integer"),
            Schema::of_type("string"),
            Channel::Request,
            true,
        );
        assert_eq!(findings[0].0, Aspect::TypeGeneralized);

        let findings = classify_pair(
            Schema::of_type("integer"),
            Schema::of_type("string"),
            Channel::Request,
            false,
        );
        assert_eq!(findings[0].0, Aspect::TypeChanged);
    }

    #[test]
    fn test_format_containment() {
        let findings = classify_pair(
            with_format("integer", "int32"),
            with_format("integer", "int64"),
            Channel::Request,
            false,
        );
        assert_eq!(findings[0].0, Aspect::TypeGeneralized);
        assert_eq!(findings[0].1, vec![json!("integer/int32"), json!("integer/int64")]);

        let findings = classify_pair(
            with_format("number", "double"),
            with_format("number", "float"),
            Channel::Request,
            false,
        );
        assert_eq!(findings[0].0, Aspect::TypeChanged);
    }

    #[test]
    fn test_multi_type_lists() {
        let base = Schema {
            types: vec!["string".into(), "null".into()],
            ..Schema::default()
        };
        let revision = Schema {
            types: vec!["integer".into(), "string".into(), "null".into()],
            ..Schema::default()
        };
        let findings = classify_pair(base, revision, Channel::Response, false);
        assert_eq!(
            findings,
            vec![(Aspect::ListOfTypesWidened, vec![json!("integer")])]
        );
    }

    #[test]
    fn test_multi_type_format_change_is_breaking() {
        let base = Schema {
            types: vec!["string".into(), "null".into()],
            format: Some("date-time".to_string()),
            ..Schema::default()
        };
        let revision = Schema {
            format: Some("date".to_string()),
            ..base.clone()
        };
        for channel in [Channel::Request, Channel::Response] {
            let findings = classify_pair(base.clone(), revision.clone(), channel, false);
            assert_eq!(
                findings,
                vec![(
                    Aspect::TypeChanged,
                    vec![json!("null, string/date-time"), json!("null, string/date")]
                )]
            );
        }
    }

    #[test]
    fn test_enum_changes() {
        let base = Schema {
            enum_values: Some(vec![json!("a"), json!("b")]),
            ..Schema::of_type("string")
        };
        let revision = Schema {
            enum_values: Some(vec![json!("b"), json!("c")]),
            ..Schema::of_type("string")
        };
        let findings = classify_pair(base.clone(), revision, Channel::Request, false);
        assert_eq!(
            findings,
            vec![
                (Aspect::EnumValueAdded, vec![json!("c")]),
                (Aspect::EnumValueRemoved, vec![json!("a")]),
            ]
        );

        // Dropping the restriction is not a value removal.
        let findings = classify_pair(base, Schema::of_type("string"), Channel::Request, false);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_pattern_and_default() {
        let base = Schema {
            default: Some(json!(5)),
            ..Schema::of_type("string")
        };
        let revision = Schema {
            pattern: Some("^[a-z]+$".to_string()),
            ..Schema::of_type("string")
        };
        let findings = classify_pair(base, revision, Channel::Request, false);
        assert_eq!(
            findings,
            vec![
                (Aspect::DefaultValueRemoved, vec![json!(5)]),
                (Aspect::PatternAdded, vec![json!("^[a-z]+$")]),
            ]
        );
    }

    #[test]
    fn test_nullable() {
        let revision = Schema {
            nullable: true,
            ..Schema::of_type("string")
        };
        let findings = classify_pair(Schema::of_type("string"), revision, Channel::Response, false);
        assert_eq!(findings, vec![(Aspect::BecameNullable, Vec::new())]);
    }
}
