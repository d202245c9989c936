//! Recursive schema descriptors.
//!
//! Schemas form a graph rather than a tree: a property, an array item or a
//! combinator member may be a `$ref` into the component arena, including a
//! reference back to the schema that contains it. Nothing here follows
//! references; resolution goes through [`Components`](super::Components).

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Prefix of local schema references.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// A `$ref` pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }

    /// Component name for a local `#/components/<section>/<name>` reference.
    #[must_use]
    pub fn component_name(&self, section: &str) -> Option<&str> {
        self.reference
            .strip_prefix("#/components/")?
            .strip_prefix(section)?
            .strip_prefix('/')
    }
}

/// Either a reference into the component arena or an inline value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Ref(Reference),
    Item(T),
}

impl<T> RefOr<T> {
    /// Convenience constructor for a reference.
    pub fn reference(reference: impl Into<String>) -> Self {
        Self::Ref(Reference::new(reference))
    }

    #[must_use]
    pub const fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Ref(r) => Some(r),
            Self::Item(_) => None,
        }
    }

    #[must_use]
    pub const fn as_item(&self) -> Option<&T> {
        match self {
            Self::Ref(_) => None,
            Self::Item(item) => Some(item),
        }
    }
}

impl RefOr<Schema> {
    /// Shorthand for `#/components/schemas/<name>`.
    pub fn schema_ref(name: &str) -> Self {
        Self::reference(format!("{SCHEMA_REF_PREFIX}{name}"))
    }
}

impl<T> From<T> for RefOr<T> {
    fn from(item: T) -> Self {
        Self::Item(item)
    }
}

/// Discriminator hint for combinator alternatives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    pub property_name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
}

/// A type descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    /// Declared primitive types; `type: string` and `type: [string, null]` are both accepted.
    #[serde(
        rename = "type",
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nullable: bool,
    pub read_only: bool,
    pub write_only: bool,
    pub deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, RefOr<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<RefOr<Schema>>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<RefOr<Schema>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<RefOr<Schema>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<RefOr<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,
    /// Vendor extensions and any keys not modelled above. Only `x-` keys are
    /// exposed through [`Schema::extension`].
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl Schema {
    /// Schema with a single declared type.
    pub fn of_type(type_name: impl Into<String>) -> Self {
        Self {
            types: vec![type_name.into()],
            ..Self::default()
        }
    }

    /// Look up an `x-` extension value.
    #[must_use]
    pub fn extension(&self, key: &str) -> Option<&Value> {
        if key.starts_with("x-") {
            self.extensions.get(key)
        } else {
            None
        }
    }

    /// The single declared type, if exactly one is declared.
    #[must_use]
    pub fn single_type(&self) -> Option<&str> {
        match self.types.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }

    /// Short structural summary used to label anonymous combinator members.
    #[must_use]
    pub fn summary(&self) -> String {
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        if self.types.is_empty() {
            "schema".to_string()
        } else {
            self.types.join(", ")
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(t)) => vec![t],
        Some(OneOrMany::Many(ts)) => ts,
    })
}
