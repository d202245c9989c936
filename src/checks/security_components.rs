//! Security scheme components and their OAuth flows.

use super::emit::Emitter;
use super::{static_rules, Check};
use crate::changes::{Change, Level};
use crate::config::CheckConfig;
use crate::diff::DocumentDiff;
use crate::model::SourceLocations;
use serde_json::json;

pub struct SecurityComponentsCheck;

impl Check for SecurityComponentsCheck {
    fn name(&self) -> &'static str {
        "security-components"
    }

    fn description(&self) -> &'static str {
        "Security schemes in components and their OAuth flows"
    }

    fn rules(&self) -> Vec<(String, Level)> {
        static_rules(&[
            ("api-security-component-added", Level::Info),
            ("api-security-component-removed", Level::Info),
            ("api-security-component-type-changed", Level::Warn),
            ("api-security-component-oauth-url-changed", Level::Warn),
            ("api-security-component-oauth-token-url-changed", Level::Warn),
            ("api-security-component-oauth-scope-added", Level::Info),
            ("api-security-component-oauth-scope-removed", Level::Warn),
            ("api-security-component-oauth-scope-changed", Level::Info),
        ])
    }

    fn run(
        &self,
        diff: &DocumentDiff<'_>,
        _sources: &SourceLocations,
        config: &CheckConfig,
    ) -> Vec<Change> {
        let mut emitter = Emitter::new(config);
        let Some(schemes) = diff
            .components
            .as_ref()
            .and_then(|components| components.security_schemes.as_ref())
        else {
            return Vec::new();
        };

        for name in schemes.added.keys() {
            emitter.component("api-security-component-added", name, Vec::new());
        }
        for name in schemes.deleted.keys() {
            emitter.component("api-security-component-removed", name, Vec::new());
        }

        for (name, scheme) in &schemes.modified {
            if let Some(scheme_type) = &scheme.scheme_type {
                emitter.component(
                    "api-security-component-type-changed",
                    name,
                    vec![json!(scheme_type.from), json!(scheme_type.to)],
                );
            }
            let Some(flows) = &scheme.flows else {
                continue;
            };

            // A whole flow appearing or disappearing changes its scopes.
            for (flow, oauth) in &flows.added {
                for scope in oauth.scopes.keys() {
                    emitter.component(
                        "api-security-component-oauth-scope-added",
                        name,
                        vec![json!(flow), json!(scope)],
                    );
                }
            }
            for (flow, oauth) in &flows.deleted {
                for scope in oauth.scopes.keys() {
                    emitter.component(
                        "api-security-component-oauth-scope-removed",
                        name,
                        vec![json!(flow), json!(scope)],
                    );
                }
            }

            for (flow, changes) in &flows.modified {
                if let Some(url) = &changes.authorization_url {
                    emitter.component(
                        "api-security-component-oauth-url-changed",
                        name,
                        vec![json!(flow), json!(url.from), json!(url.to)],
                    );
                }
                if let Some(url) = &changes.token_url {
                    emitter.component(
                        "api-security-component-oauth-token-url-changed",
                        name,
                        vec![json!(flow), json!(url.from), json!(url.to)],
                    );
                }
                let Some(scopes) = &changes.scopes else {
                    continue;
                };
                for scope in scopes.added.keys() {
                    emitter.component(
                        "api-security-component-oauth-scope-added",
                        name,
                        vec![json!(flow), json!(scope)],
                    );
                }
                for scope in scopes.deleted.keys() {
                    emitter.component(
                        "api-security-component-oauth-scope-removed",
                        name,
                        vec![json!(flow), json!(scope)],
                    );
                }
                for (scope, description) in &scopes.modified {
                    emitter.component(
                        "api-security-component-oauth-scope-changed",
                        name,
                        vec![
                            json!(flow),
                            json!(scope),
                            json!(description.from),
                            json!(description.to),
                        ],
                    );
                }
            }
        }
        emitter.into_changes()
    }
}
