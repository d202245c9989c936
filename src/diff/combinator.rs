//! Matching of `oneOf` / `anyOf` / `allOf` members.
//!
//! Members are matched by signature rather than by position. A referenced
//! member is identified by its reference string; an inline member by its
//! 1-based position and a short summary, e.g. `subschema #2: Rabbit`.

use super::schema::{SchemaDiff, SchemaDiffer};
use crate::model::{RefOr, Schema};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// The three schema combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CombinatorKind {
    OneOf,
    AnyOf,
    AllOf,
}

impl CombinatorKind {
    pub const ALL: [Self; 3] = [Self::OneOf, Self::AnyOf, Self::AllOf];

    /// Keyword as written in the document.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::OneOf => "oneOf",
            Self::AnyOf => "anyOf",
            Self::AllOf => "allOf",
        }
    }

    /// Kebab-case form used in rule ids.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::OneOf => "one-of",
            Self::AnyOf => "any-of",
            Self::AllOf => "all-of",
        }
    }
}

impl fmt::Display for CombinatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One combinator member, as seen from one side.
#[derive(Debug, Clone, Serialize)]
pub struct Subschema<'a> {
    pub signature: String,
    /// 1-based position in the member list.
    pub index: usize,
    #[serde(skip)]
    pub schema: &'a RefOr<Schema>,
}

/// Member-level differences of one combinator list.
///
/// `added` and `deleted` are the coarse result. `modified` holds matched
/// members whose internals differ; it exists so nested changes can be
/// attributed to the branch they occur in.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubschemaDiff<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<Subschema<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<Subschema<'a>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub modified: IndexMap<String, SchemaDiff<'a>>,
}

impl SubschemaDiff<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }
}

/// Signature of the member at 0-based `position`.
#[must_use]
pub fn signature(member: &RefOr<Schema>, position: usize) -> String {
    match member {
        RefOr::Ref(r) => r.reference.clone(),
        RefOr::Item(schema) => format!("subschema #{}: {}", position + 1, schema.summary()),
    }
}

fn index_members(members: &[RefOr<Schema>]) -> IndexMap<String, Subschema<'_>> {
    let mut indexed = IndexMap::new();
    for (position, member) in members.iter().enumerate() {
        let sig = signature(member, position);
        if !indexed.contains_key(&sig) {
            indexed.insert(
                sig.clone(),
                Subschema {
                    signature: sig,
                    index: position + 1,
                    schema: member,
                },
            );
        }
    }
    indexed
}

pub(crate) fn diff_subschemas<'a>(
    differ: &mut SchemaDiffer<'a>,
    kind: CombinatorKind,
    base: &'a [RefOr<Schema>],
    revision: &'a [RefOr<Schema>],
    base_id: &str,
    revision_id: &str,
) -> Option<SubschemaDiff<'a>> {
    if base.is_empty() && revision.is_empty() {
        return None;
    }
    let base_members = index_members(base);
    let mut revision_members = index_members(revision);

    let mut diff = SubschemaDiff::default();
    for (sig, from) in base_members {
        match revision_members.shift_remove(&sig) {
            None => diff.deleted.push(from),
            Some(to) => {
                let nested = differ.diff(
                    from.schema,
                    to.schema,
                    &format!("{base_id}/{kind}/{}", from.index - 1),
                    &format!("{revision_id}/{kind}/{}", to.index - 1),
                );
                if let Some(nested) = nested {
                    diff.modified.insert(sig, nested);
                }
            }
        }
    }
    diff.added.extend(revision_members.into_values());

    if diff.is_empty() {
        None
    } else {
        Some(diff)
    }
}
