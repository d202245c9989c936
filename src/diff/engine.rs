//! Diff engine entry point.

use super::document::{diff_components, diff_global_security, DocumentDiff, PathDiff};
use super::operation::{diff_operation, Arenas};
use super::primitives::{diff_keyed, KeyedDiff};
use crate::model::{Document, PathItem};
use indexmap::IndexMap;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;
use tracing::{debug, info};

/// Options controlling how paths are matched between documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Match `/users/{id}` against `/users/{userId}`.
    pub match_path_params: bool,
    /// Prefix removed from base paths before matching.
    pub strip_prefix_base: Option<String>,
    /// Prefix removed from revision paths before matching.
    pub strip_prefix_revision: Option<String>,
}

/// Structural diff engine for API documents.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    options: DiffOptions,
}

impl DiffEngine {
    /// Create a new diff engine with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all path matching options
    #[must_use]
    pub fn with_options(mut self, options: DiffOptions) -> Self {
        self.options = options;
        self
    }

    /// Match paths that differ only in path parameter names
    #[must_use]
    pub const fn match_path_params(mut self, enabled: bool) -> Self {
        self.options.match_path_params = enabled;
        self
    }

    /// Strip prefixes from base and revision paths before matching
    #[must_use]
    pub fn strip_prefixes(mut self, base: Option<String>, revision: Option<String>) -> Self {
        self.options.strip_prefix_base = base;
        self.options.strip_prefix_revision = revision;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Compare two documents.
    pub fn diff<'a>(&self, base: &'a Document, revision: &'a Document) -> DocumentDiff<'a> {
        // Quick check: if content hashes match, the documents are identical
        if base.content_hash == revision.content_hash && base.content_hash != 0 {
            debug!("content hashes match, skipping structural diff");
            return DocumentDiff::empty(base, revision);
        }

        let arenas = Arenas {
            base: &base.components,
            revision: &revision.components,
        };

        let diff = DocumentDiff {
            base,
            revision,
            paths: self.diff_paths(arenas, base, revision),
            security: diff_global_security(base, revision),
            components: diff_components(&base.components, &revision.components),
        };

        if let Some(paths) = &diff.paths {
            info!(
                added = paths.added.len(),
                removed = paths.deleted.len(),
                modified = paths.modified.len(),
                "path diff computed"
            );
        }
        diff
    }

    fn diff_paths<'a>(
        &self,
        arenas: Arenas<'a>,
        base: &'a Document,
        revision: &'a Document,
    ) -> Option<KeyedDiff<String, &'a PathItem, PathDiff<'a>>> {
        let (base_keys, revision_keys) = self.match_keys(base, revision);

        let diff = diff_keyed(
            base_keys.iter().map(|(key, (_, item))| (key.clone(), *item)),
            revision_keys
                .iter()
                .map(|(key, (_, item))| (key.clone(), *item)),
            |key, from, to| {
                let operations = diff_keyed(
                    from.operations(),
                    to.operations(),
                    |_, base_op, revision_op| {
                        diff_operation(arenas, from, base_op, to, revision_op)
                    },
                )?;
                Some(PathDiff {
                    base_path: original_path(&base_keys, key),
                    revision_path: original_path(&revision_keys, key),
                    base: from,
                    revision: to,
                    operations,
                })
            },
        )?;

        Some(diff.map_keys(
            |key| original_path(&revision_keys, &key),
            |key| original_path(&base_keys, &key),
            |key| original_path(&base_keys, &key),
        ))
    }

    /// Map each path to its matching key, keeping the original path alongside.
    ///
    /// A key that several paths of either document normalize to is
    /// ambiguous; those paths are matched on their original text instead.
    fn match_keys<'a>(
        &self,
        base: &'a Document,
        revision: &'a Document,
    ) -> (PathKeys<'a>, PathKeys<'a>) {
        let base_keys =
            self.normalized_keys(&base.paths, self.options.strip_prefix_base.as_deref());
        let revision_keys =
            self.normalized_keys(&revision.paths, self.options.strip_prefix_revision.as_deref());

        let mut ambiguous = duplicate_keys(&base_keys);
        ambiguous.extend(duplicate_keys(&revision_keys));
        if !ambiguous.is_empty() {
            debug!(keys = ?ambiguous, "ambiguous path keys, matching them verbatim");
        }

        (
            keyed_paths(base_keys, &ambiguous),
            keyed_paths(revision_keys, &ambiguous),
        )
    }

    fn normalized_keys<'a>(
        &self,
        paths: &'a IndexMap<String, PathItem>,
        strip_prefix: Option<&str>,
    ) -> Vec<(String, &'a str, &'a PathItem)> {
        paths
            .iter()
            .map(|(path, item)| (self.normalize_path(path, strip_prefix), path.as_str(), item))
            .collect()
    }

    /// Key used to match a path across documents.
    #[must_use]
    pub fn normalize_path(&self, path: &str, strip_prefix: Option<&str>) -> String {
        let stripped = strip_prefix
            .filter(|prefix| !prefix.is_empty())
            .and_then(|prefix| path.strip_prefix(prefix))
            .unwrap_or(path);
        let stripped = if stripped.starts_with('/') {
            stripped.to_string()
        } else {
            format!("/{stripped}")
        };
        if self.options.match_path_params {
            PATH_PARAM.replace_all(&stripped, "{}").into_owned()
        } else {
            stripped
        }
    }
}

static PATH_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}/]*\}").expect("static regex"));

/// Matching key to original path and item, in document order.
type PathKeys<'a> = IndexMap<String, (&'a str, &'a PathItem)>;

fn duplicate_keys(keys: &[(String, &str, &PathItem)]) -> BTreeSet<String> {
    let mut seen = HashSet::new();
    keys.iter()
        .filter(|(key, ..)| !seen.insert(key.as_str()))
        .map(|(key, ..)| key.clone())
        .collect()
}

fn keyed_paths<'a>(
    keys: Vec<(String, &'a str, &'a PathItem)>,
    ambiguous: &BTreeSet<String>,
) -> PathKeys<'a> {
    keys.into_iter()
        .map(|(key, path, item)| {
            let key = if ambiguous.contains(&key) {
                path.to_string()
            } else {
                key
            };
            (key, (path, item))
        })
        .collect()
}

fn original_path(keys: &PathKeys<'_>, key: &str) -> String {
    keys.get(key)
        .map_or_else(|| key.to_string(), |(path, _)| (*path).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Method, Operation, Parameter, ParameterLocation, RefOr};

    fn document(paths: &[(&str, PathItem)]) -> Document {
        Document {
            paths: paths
                .iter()
                .map(|(p, item)| ((*p).to_string(), item.clone()))
                .collect(),
            ..Document::default()
        }
    }

    fn get(operation_id: &str) -> PathItem {
        PathItem {
            get: Some(Operation {
                operation_id: Some(operation_id.to_string()),
                ..Operation::default()
            }),
            ..PathItem::default()
        }
    }

    #[test]
    fn test_self_diff_is_empty() {
        let doc = document(&[("/pets", get("listPets"))]);
        assert!(DiffEngine::new().diff(&doc, &doc).is_empty());
    }

    #[test]
    fn test_equal_hashes_short_circuit() {
        let mut base = document(&[("/pets", get("listPets"))]);
        let mut revision = document(&[("/users", get("listUsers"))]);
        base.content_hash = 42;
        revision.content_hash = 42;
        assert!(DiffEngine::new().diff(&base, &revision).is_empty());
    }

    #[test]
    fn test_paths_added_and_removed() {
        let base = document(&[("/pets", get("listPets"))]);
        let revision = document(&[("/users", get("listUsers"))]);
        let diff = DiffEngine::new().diff(&base, &revision);
        let paths = diff.paths.unwrap();
        assert!(paths.added.contains_key("/users"));
        assert!(paths.deleted.contains_key("/pets"));
    }

    #[test]
    fn test_operation_modified() {
        let base = document(&[("/pets", get("listPets"))]);
        let revision = document(&[("/pets", get("getPets"))]);
        let diff = DiffEngine::new().diff(&base, &revision);
        let (path, method, op) = diff.modified_operations().next().unwrap();
        assert_eq!(path.base_path, "/pets");
        assert_eq!(method, Method::Get);
        assert!(op.operation_id.is_some());
    }

    #[test]
    fn test_match_path_params() {
        let with_param = |name: &str, id: &str| {
            let mut item = get(id);
            item.parameters.push(RefOr::Item(Parameter {
                name: name.to_string(),
                location: ParameterLocation::Path,
                required: true,
                deprecated: false,
                schema: None,
            }));
            item
        };
        let base = document(&[("/users/{id}", with_param("id", "getUser"))]);
        let revision = document(&[("/users/{userId}", with_param("userId", "fetchUser"))]);

        let diff = DiffEngine::new().diff(&base, &revision);
        assert!(diff.paths.as_ref().unwrap().added.contains_key("/users/{userId}"));

        let diff = DiffEngine::new().match_path_params(true).diff(&base, &revision);
        let paths = diff.paths.unwrap();
        assert!(paths.added.is_empty() && paths.deleted.is_empty());
        let path = &paths.modified["/users/{id}"];
        assert_eq!(path.revision_path, "/users/{userId}");
    }

    #[test]
    fn test_ambiguous_param_names_match_verbatim() {
        let base = document(&[
            ("/users/{id}", get("getUser")),
            ("/users/{name}", get("getUserByName")),
        ]);
        let revision = document(&[("/users/{id}", get("getUser"))]);

        let diff = DiffEngine::new().match_path_params(true).diff(&base, &revision);
        let paths = diff.paths.unwrap();
        assert!(paths.added.is_empty());
        assert!(paths.modified.is_empty());
        let deleted: Vec<&str> = paths.deleted.keys().map(String::as_str).collect();
        assert_eq!(deleted, vec!["/users/{name}"]);
    }

    #[test]
    fn test_strip_prefix() {
        let base = document(&[("/api/v1/pets", get("listPets"))]);
        let revision = document(&[("/api/v2/pets", get("listPets"))]);
        let engine = DiffEngine::new()
            .strip_prefixes(Some("/api/v1".to_string()), Some("/api/v2".to_string()));
        assert!(engine.diff(&base, &revision).is_empty());
        assert_eq!(engine.normalize_path("/api/v1/pets", Some("/api/v1")), "/pets");
    }
}
