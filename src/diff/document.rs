//! Document-level diff tree.

use super::operation::{diff_security_requirements, OperationDiff, SecurityRequirementsDiff};
use super::primitives::{
    diff_keyed, diff_string_sets, value_diff, KeyedDiff, StringSetDiff, ValueDiff,
};
use crate::model::{
    Components, Document, Method, OAuthFlow, Operation, PathItem, SecurityScheme,
};
use serde::Serialize;

/// Operations of one path matched across both documents.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDiff<'a> {
    /// Path as written in the base document.
    pub base_path: String,
    /// Path as written in the revision; differs from `base_path` only when
    /// paths were matched after normalization.
    pub revision_path: String,
    #[serde(skip)]
    pub base: &'a PathItem,
    #[serde(skip)]
    pub revision: &'a PathItem,
    pub operations: KeyedDiff<Method, &'a Operation, OperationDiff<'a>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFlowDiff<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<KeyedDiff<String, &'a String, ValueDiff<String>>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySchemeDiff<'a> {
    #[serde(skip)]
    pub base: &'a SecurityScheme,
    #[serde(skip)]
    pub revision: &'a SecurityScheme,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub scheme_type: Option<ValueDiff<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flows: Option<KeyedDiff<String, &'a OAuthFlow, OAuthFlowDiff<'a>>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentsDiff<'a> {
    /// Named schemas added to or removed from the arena.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<StringSetDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_schemes: Option<KeyedDiff<String, &'a SecurityScheme, SecuritySchemeDiff<'a>>>,
}

impl ComponentsDiff<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_none() && self.security_schemes.is_none()
    }
}

/// Root of the diff tree.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDiff<'a> {
    #[serde(skip)]
    pub base: &'a Document,
    #[serde(skip)]
    pub revision: &'a Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<KeyedDiff<String, &'a PathItem, PathDiff<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityRequirementsDiff<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<ComponentsDiff<'a>>,
}

impl<'a> DocumentDiff<'a> {
    /// A diff with no differences.
    #[must_use]
    pub const fn empty(base: &'a Document, revision: &'a Document) -> Self {
        Self {
            base,
            revision,
            paths: None,
            security: None,
            components: None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_none() && self.security.is_none() && self.components.is_none()
    }

    /// Every modified operation with its base and revision paths.
    pub fn modified_operations(
        &self,
    ) -> impl Iterator<Item = (&PathDiff<'a>, Method, &OperationDiff<'a>)> {
        self.paths.iter().flat_map(|paths| {
            paths.modified.values().flat_map(|path| {
                path.operations
                    .modified
                    .iter()
                    .map(move |(method, op)| (path, *method, op))
            })
        })
    }

    #[must_use]
    pub const fn base_components(&self) -> &'a Components {
        &self.base.components
    }

    #[must_use]
    pub const fn revision_components(&self) -> &'a Components {
        &self.revision.components
    }
}

pub(crate) fn diff_global_security<'a>(
    base: &'a Document,
    revision: &'a Document,
) -> Option<SecurityRequirementsDiff<'a>> {
    diff_security_requirements(&base.security, &revision.security)
}

pub(crate) fn diff_components<'a>(
    base: &'a Components,
    revision: &'a Components,
) -> Option<ComponentsDiff<'a>> {
    let diff = ComponentsDiff {
        schemas: diff_string_sets(base.schemas.keys(), revision.schemas.keys()),
        security_schemes: diff_keyed(
            base.security_schemes.iter().map(|(k, v)| (k.clone(), v)),
            revision.security_schemes.iter().map(|(k, v)| (k.clone(), v)),
            |_, from, to| diff_security_scheme(from, to),
        ),
    };
    if diff.is_empty() {
        None
    } else {
        Some(diff)
    }
}

fn diff_security_scheme<'a>(
    base: &'a SecurityScheme,
    revision: &'a SecurityScheme,
) -> Option<SecuritySchemeDiff<'a>> {
    let flows = diff_keyed(
        base.flows
            .iter()
            .flat_map(|f| f.iter())
            .map(|(name, flow)| (name.to_string(), flow)),
        revision
            .flows
            .iter()
            .flat_map(|f| f.iter())
            .map(|(name, flow)| (name.to_string(), flow)),
        |_, from, to| diff_oauth_flow(from, to),
    );
    let scheme_type = value_diff(&base.scheme_type, &revision.scheme_type);
    if scheme_type.is_none() && flows.is_none() {
        None
    } else {
        Some(SecuritySchemeDiff {
            base,
            revision,
            scheme_type,
            flows,
        })
    }
}

fn diff_oauth_flow<'a>(base: &'a OAuthFlow, revision: &'a OAuthFlow) -> Option<OAuthFlowDiff<'a>> {
    let diff = OAuthFlowDiff {
        authorization_url: value_diff(&base.authorization_url, &revision.authorization_url),
        token_url: value_diff(&base.token_url, &revision.token_url),
        refresh_url: value_diff(&base.refresh_url, &revision.refresh_url),
        scopes: diff_keyed(
            base.scopes.iter().map(|(k, v)| (k.clone(), v)),
            revision.scopes.iter().map(|(k, v)| (k.clone(), v)),
            |_, from, to| value_diff(from, to),
        ),
    };
    if diff.authorization_url.is_none()
        && diff.token_url.is_none()
        && diff.refresh_url.is_none()
        && diff.scopes.is_none()
    {
        None
    } else {
        Some(diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OAuthFlows;

    fn oauth(token_url: &str, scopes: &[&str]) -> SecurityScheme {
        SecurityScheme {
            scheme_type: "oauth2".to_string(),
            flows: Some(OAuthFlows {
                client_credentials: Some(OAuthFlow {
                    token_url: Some(token_url.to_string()),
                    scopes: scopes
                        .iter()
                        .map(|s| ((*s).to_string(), format!("{s} access")))
                        .collect(),
                    ..OAuthFlow::default()
                }),
                ..OAuthFlows::default()
            }),
            ..SecurityScheme::default()
        }
    }

    #[test]
    fn test_security_scheme_flow_changes() {
        let mut base = Components::default();
        base.security_schemes
            .insert("oauth".to_string(), oauth("https://a/token", &["read"]));
        let mut revision = Components::default();
        revision.security_schemes.insert(
            "oauth".to_string(),
            oauth("https://b/token", &["read", "write"]),
        );

        let diff = diff_components(&base, &revision).unwrap();
        let schemes = diff.security_schemes.unwrap();
        let flows = schemes.modified["oauth"].flows.as_ref().unwrap();
        let flow = &flows.modified["clientCredentials"];
        assert!(flow.token_url.is_some());
        assert!(flow.scopes.as_ref().unwrap().added.contains_key("write"));
    }

    #[test]
    fn test_schema_names_added() {
        let base = Components::default();
        let mut revision = Components::default();
        revision
            .schemas
            .insert("Pet".to_string(), crate::model::Schema::default().into());
        let diff = diff_components(&base, &revision).unwrap();
        assert_eq!(diff.schemas.unwrap().added, vec!["Pet"]);
    }
}
