//! Operation-level comparison: parameters, bodies, responses and security.

use super::primitives::{
    diff_keyed, diff_string_sets, value_diff, KeyedDiff, StringSetDiff, ValueDiff,
};
use super::schema::{diff_schema, SchemaDiff};
use crate::model::{
    security_requirement_key, Components, Header, MediaType, Operation, Parameter, ParameterKey,
    PathItem, RequestBody, Response, SecurityRequirement,
};
use indexmap::IndexMap;
use serde::Serialize;

/// Security requirement alternatives keyed by their scheme names; a
/// modified entry lists the per-scheme scope changes.
pub type SecurityRequirementsDiff<'a> =
    KeyedDiff<String, &'a SecurityRequirement, IndexMap<String, StringSetDiff>>;

/// Media type → schema changes.
pub type ContentDiff<'a> = KeyedDiff<String, &'a MediaType, SchemaDiff<'a>>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDiff<'a> {
    #[serde(skip)]
    pub base: &'a Parameter,
    #[serde(skip)]
    pub revision: &'a Parameter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDiff<'a>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBodyDiff<'a> {
    #[serde(skip)]
    pub base: Option<&'a RequestBody>,
    #[serde(skip)]
    pub revision: Option<&'a RequestBody>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub added: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentDiff<'a>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderDiff<'a> {
    #[serde(skip)]
    pub base: &'a Header,
    #[serde(skip)]
    pub revision: &'a Header,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDiff<'a>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDiff<'a> {
    #[serde(skip)]
    pub base: &'a Response,
    #[serde(skip)]
    pub revision: &'a Response,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentDiff<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<KeyedDiff<String, &'a Header, HeaderDiff<'a>>>,
}

/// Differences between two versions of one operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDiff<'a> {
    #[serde(skip)]
    pub base: &'a Operation,
    #[serde(skip)]
    pub revision: &'a Operation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<StringSetDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stability: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<KeyedDiff<ParameterKey, &'a Parameter, ParameterDiff<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyDiff<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<KeyedDiff<String, &'a Response, ResponseDiff<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityRequirementsDiff<'a>>,
}

impl OperationDiff<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operation_id.is_none()
            && self.tags.is_none()
            && self.deprecated.is_none()
            && self.stability.is_none()
            && self.sunset.is_none()
            && self.parameters.is_none()
            && self.request_body.is_none()
            && self.responses.is_none()
            && self.security.is_none()
    }
}

/// Component arenas of both sides.
#[derive(Clone, Copy)]
pub(crate) struct Arenas<'a> {
    pub base: &'a Components,
    pub revision: &'a Components,
}

/// Parameters in effect for an operation: path-level parameters overridden
/// by operation-level ones with the same location and name.
pub fn effective_parameters<'a>(
    components: &'a Components,
    item: &'a PathItem,
    operation: &'a Operation,
) -> IndexMap<ParameterKey, &'a Parameter> {
    let mut parameters = IndexMap::new();
    for parameter in item.parameters.iter().chain(&operation.parameters) {
        if let Some(resolved) = components.resolve_parameter(parameter) {
            parameters.insert(resolved.key(), resolved);
        }
    }
    parameters
}

pub(crate) fn diff_operation<'a>(
    arenas: Arenas<'a>,
    base_item: &'a PathItem,
    base: &'a Operation,
    revision_item: &'a PathItem,
    revision: &'a Operation,
) -> Option<OperationDiff<'a>> {
    let diff = OperationDiff {
        base,
        revision,
        operation_id: value_diff(&base.operation_id, &revision.operation_id),
        tags: diff_string_sets(&base.tags, &revision.tags),
        deprecated: value_diff(&base.deprecated, &revision.deprecated),
        stability: value_diff(&base.stability(), &revision.stability()),
        sunset: value_diff(&base.sunset(), &revision.sunset()),
        parameters: diff_keyed(
            effective_parameters(arenas.base, base_item, base),
            effective_parameters(arenas.revision, revision_item, revision),
            |_, from, to| diff_parameter(arenas, from, to),
        ),
        request_body: diff_request_body(
            arenas,
            base.request_body
                .as_ref()
                .and_then(|b| arenas.base.resolve_request_body(b)),
            revision
                .request_body
                .as_ref()
                .and_then(|b| arenas.revision.resolve_request_body(b)),
        ),
        responses: diff_keyed(
            base.responses
                .iter()
                .filter_map(|(status, r)| Some((status.clone(), arenas.base.resolve_response(r)?))),
            revision.responses.iter().filter_map(|(status, r)| {
                Some((status.clone(), arenas.revision.resolve_response(r)?))
            }),
            |_, from, to| diff_response(arenas, from, to),
        ),
        security: diff_security_requirements(
            base.security.as_deref().unwrap_or_default(),
            revision.security.as_deref().unwrap_or_default(),
        ),
    };
    if diff.is_empty() {
        None
    } else {
        Some(diff)
    }
}

fn diff_parameter<'a>(
    arenas: Arenas<'a>,
    base: &'a Parameter,
    revision: &'a Parameter,
) -> Option<ParameterDiff<'a>> {
    let diff = ParameterDiff {
        base,
        revision,
        required: value_diff(&base.is_required(), &revision.is_required()),
        deprecated: value_diff(&base.deprecated, &revision.deprecated),
        schema: match (&base.schema, &revision.schema) {
            (Some(from), Some(to)) => diff_schema(from, to, arenas.base, arenas.revision),
            _ => None,
        },
    };
    if diff.required.is_none() && diff.deprecated.is_none() && diff.schema.is_none() {
        None
    } else {
        Some(diff)
    }
}

fn diff_content<'a>(
    arenas: Arenas<'a>,
    base: &'a IndexMap<String, MediaType>,
    revision: &'a IndexMap<String, MediaType>,
) -> Option<ContentDiff<'a>> {
    diff_keyed(
        base.iter().map(|(k, v)| (k.clone(), v)),
        revision.iter().map(|(k, v)| (k.clone(), v)),
        |_, from, to| match (&from.schema, &to.schema) {
            (Some(from), Some(to)) => diff_schema(from, to, arenas.base, arenas.revision),
            _ => None,
        },
    )
}

fn diff_request_body<'a>(
    arenas: Arenas<'a>,
    base: Option<&'a RequestBody>,
    revision: Option<&'a RequestBody>,
) -> Option<RequestBodyDiff<'a>> {
    let mut diff = RequestBodyDiff {
        base,
        revision,
        added: false,
        deleted: false,
        required: None,
        content: None,
    };
    match (base, revision) {
        (None, None) => return None,
        (None, Some(_)) => diff.added = true,
        (Some(_), None) => diff.deleted = true,
        (Some(from), Some(to)) => {
            diff.required = value_diff(&from.required, &to.required);
            diff.content = diff_content(arenas, &from.content, &to.content);
            if diff.required.is_none() && diff.content.is_none() {
                return None;
            }
        }
    }
    Some(diff)
}

fn diff_response<'a>(
    arenas: Arenas<'a>,
    base: &'a Response,
    revision: &'a Response,
) -> Option<ResponseDiff<'a>> {
    let headers = diff_keyed(
        base.headers
            .iter()
            .filter_map(|(name, h)| Some((name.clone(), arenas.base.resolve_header(h)?))),
        revision
            .headers
            .iter()
            .filter_map(|(name, h)| Some((name.clone(), arenas.revision.resolve_header(h)?))),
        |_, from, to| diff_header(arenas, from, to),
    );
    let content = diff_content(arenas, &base.content, &revision.content);
    if headers.is_none() && content.is_none() {
        None
    } else {
        Some(ResponseDiff {
            base,
            revision,
            content,
            headers,
        })
    }
}

fn diff_header<'a>(
    arenas: Arenas<'a>,
    base: &'a Header,
    revision: &'a Header,
) -> Option<HeaderDiff<'a>> {
    let diff = HeaderDiff {
        base,
        revision,
        required: value_diff(&base.required, &revision.required),
        deprecated: value_diff(&base.deprecated, &revision.deprecated),
        schema: match (&base.schema, &revision.schema) {
            (Some(from), Some(to)) => diff_schema(from, to, arenas.base, arenas.revision),
            _ => None,
        },
    };
    if diff.required.is_none() && diff.deprecated.is_none() && diff.schema.is_none() {
        None
    } else {
        Some(diff)
    }
}

/// Compare two lists of security requirement alternatives.
pub fn diff_security_requirements<'a>(
    base: &'a [SecurityRequirement],
    revision: &'a [SecurityRequirement],
) -> Option<SecurityRequirementsDiff<'a>> {
    diff_keyed(
        base.iter().map(|r| (security_requirement_key(r), r)),
        revision.iter().map(|r| (security_requirement_key(r), r)),
        |_, from, to| {
            let scopes: IndexMap<String, StringSetDiff> = from
                .iter()
                .filter_map(|(scheme, scopes)| {
                    let other = to.get(scheme)?;
                    Some((scheme.clone(), diff_string_sets(scopes, other)?))
                })
                .collect();
            if scopes.is_empty() {
                None
            } else {
                Some(scopes)
            }
        },
    )
}
