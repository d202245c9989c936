//! API document structures.
//!
//! The document is reference-aware: parameters, request bodies, responses,
//! headers and schemas may be `$ref`s into [`Components`]. Resolution is a
//! lookup in that arena and never recurses, so cyclic schema graphs are safe
//! to hold and to resolve.

use super::schema::{RefOr, Reference, Schema};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Extension key carrying the operation stability level.
pub const STABILITY_EXTENSION: &str = "x-stability-level";
/// Extension key carrying the operation sunset date.
pub const SUNSET_EXTENSION: &str = "x-sunset";

/// A complete API description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub openapi: String,
    pub info: Info,
    pub paths: IndexMap<String, PathItem>,
    pub components: Components,
    /// Global security requirements (alternatives, any one of which suffices).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
    /// Content hash for quick equality checks; zero when unknown.
    #[serde(skip)]
    pub content_hash: u64,
}

impl Document {
    /// Iterate every operation in path order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, Method, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations()
                .map(move |(method, op)| (path.as_str(), method, op))
        })
    }

    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(|item| item.operations().count()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Info {
    pub title: String,
    pub version: String,
}

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl Method {
    pub const ALL: [Self; 8] = [
        Self::Get,
        Self::Put,
        Self::Post,
        Self::Delete,
        Self::Options,
        Self::Head,
        Self::Patch,
        Self::Trace,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations and shared parameters of one path template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<RefOr<Parameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
}

impl PathItem {
    #[must_use]
    pub const fn operation(&self, method: Method) -> Option<&Operation> {
        match method {
            Method::Get => self.get.as_ref(),
            Method::Put => self.put.as_ref(),
            Method::Post => self.post.as_ref(),
            Method::Delete => self.delete.as_ref(),
            Method::Options => self.options.as_ref(),
            Method::Head => self.head.as_ref(),
            Method::Patch => self.patch.as_ref(),
            Method::Trace => self.trace.as_ref(),
        }
    }

    /// Declared operations in canonical method order.
    pub fn operations(&self) -> impl Iterator<Item = (Method, &Operation)> {
        Method::ALL
            .into_iter()
            .filter_map(move |m| self.operation(m).map(|op| (m, op)))
    }
}

/// A single API operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub deprecated: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<RefOr<Parameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RefOr<RequestBody>>,
    pub responses: IndexMap<String, RefOr<Response>>,
    /// `None` inherits the global requirements; `Some(vec![])` opts out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl Operation {
    /// Look up an `x-` extension value.
    #[must_use]
    pub fn extension(&self, key: &str) -> Option<&Value> {
        if key.starts_with("x-") {
            self.extensions.get(key)
        } else {
            None
        }
    }

    /// Raw stability level, rendered as a string when present.
    #[must_use]
    pub fn stability(&self) -> Option<String> {
        self.extension(STABILITY_EXTENSION).map(value_as_text)
    }

    /// Raw sunset date, rendered as a string when present.
    #[must_use]
    pub fn sunset(&self) -> Option<String> {
        self.extension(SUNSET_EXTENSION).map(value_as_text)
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a parameter within an operation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParameterKey {
    pub location: ParameterLocation,
    pub name: String,
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.location, self.name)
    }
}

impl Serialize for ParameterKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<RefOr<Schema>>,
}

impl Parameter {
    #[must_use]
    pub fn key(&self) -> ParameterKey {
        ParameterKey {
            location: self.location,
            name: self.name.clone(),
        }
    }

    /// Path parameters are always required, whatever the document says.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required || self.location == ParameterLocation::Path
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<RefOr<Schema>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestBody {
    pub required: bool,
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, RefOr<Header>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub required: bool,
    pub deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<RefOr<Schema>>,
}

/// Security requirement: scheme name → required scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// Stable key of a security requirement (scheme names, sorted, joined).
#[must_use]
pub fn security_requirement_key(requirement: &SecurityRequirement) -> String {
    let mut names: Vec<&str> = requirement.keys().map(String::as_str).collect();
    names.sort_unstable();
    names.join(" AND ")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flows: Option<OAuthFlows>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OAuthFlows {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit: Option<OAuthFlow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<OAuthFlow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_credentials: Option<OAuthFlow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<OAuthFlow>,
}

impl OAuthFlows {
    /// Declared flows with their canonical names.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &OAuthFlow)> {
        [
            ("implicit", self.implicit.as_ref()),
            ("password", self.password.as_ref()),
            ("clientCredentials", self.client_credentials.as_ref()),
            ("authorizationCode", self.authorization_code.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, flow)| flow.map(|f| (name, f)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OAuthFlow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    pub scopes: IndexMap<String, String>,
}

/// The reusable component arena.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Components {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, RefOr<Schema>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, RefOr<Parameter>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub request_bodies: IndexMap<String, RefOr<RequestBody>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, RefOr<Response>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, RefOr<Header>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub security_schemes: IndexMap<String, SecurityScheme>,
}

/// Upper bound on `$ref` → `$ref` hops followed during resolution.
const MAX_REF_HOPS: usize = 32;

impl Components {
    /// Resolve a schema reference. Returns the schema together with its
    /// identity: the final reference string, or `None` for inline schemas.
    #[must_use]
    pub fn resolve_schema<'a>(
        &'a self,
        schema: &'a RefOr<Schema>,
    ) -> Option<(&'a Schema, Option<&'a str>)> {
        let mut current = schema;
        let mut identity = None;
        for _ in 0..MAX_REF_HOPS {
            match current {
                RefOr::Item(s) => return Some((s, identity)),
                RefOr::Ref(r) => {
                    identity = Some(r.reference.as_str());
                    current = self.schemas.get(r.component_name("schemas")?)?;
                }
            }
        }
        None
    }

    #[must_use]
    pub fn resolve_parameter<'a>(&'a self, p: &'a RefOr<Parameter>) -> Option<&'a Parameter> {
        resolve_in(&self.parameters, "parameters", p)
    }

    #[must_use]
    pub fn resolve_request_body<'a>(
        &'a self,
        body: &'a RefOr<RequestBody>,
    ) -> Option<&'a RequestBody> {
        resolve_in(&self.request_bodies, "requestBodies", body)
    }

    #[must_use]
    pub fn resolve_response<'a>(&'a self, r: &'a RefOr<Response>) -> Option<&'a Response> {
        resolve_in(&self.responses, "responses", r)
    }

    #[must_use]
    pub fn resolve_header<'a>(&'a self, h: &'a RefOr<Header>) -> Option<&'a Header> {
        resolve_in(&self.headers, "headers", h)
    }
}

fn resolve_in<'a, T>(
    arena: &'a IndexMap<String, RefOr<T>>,
    section: &str,
    value: &'a RefOr<T>,
) -> Option<&'a T> {
    let mut current = value;
    for _ in 0..MAX_REF_HOPS {
        match current {
            RefOr::Item(item) => return Some(item),
            RefOr::Ref(Reference { .. }) => {
                let name = current.as_reference()?.component_name(section)?;
                current = arena.get(name)?;
            }
        }
    }
    None
}
