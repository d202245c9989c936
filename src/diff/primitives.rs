//! Generic comparison building blocks.
//!
//! Every keyed collection in the diff tree is compared with [`diff_keyed`]:
//! a key is either deleted, added, modified (with a nested diff) or absent
//! because it is identical on both sides. The three maps never share a key,
//! and an empty comparison is `None` rather than an empty container.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::hash::Hash;

/// A changed scalar attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueDiff<T> {
    pub from: T,
    pub to: T,
}

impl<T> ValueDiff<T> {
    pub const fn new(from: T, to: T) -> Self {
        Self { from, to }
    }
}

/// Compare two values, returning a diff only when they differ.
pub fn value_diff<T: PartialEq + Clone>(from: &T, to: &T) -> Option<ValueDiff<T>> {
    if from == to {
        None
    } else {
        Some(ValueDiff::new(from.clone(), to.clone()))
    }
}

/// Added, deleted and modified entries of a keyed collection.
///
/// Deleted and modified entries keep base order; added entries keep
/// revision order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound(serialize = "K: Serialize + Hash + Eq, A: Serialize, D: Serialize"))]
pub struct KeyedDiff<K: Hash + Eq, A, D> {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub added: IndexMap<K, A>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub deleted: IndexMap<K, A>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub modified: IndexMap<K, D>,
}

impl<K: Hash + Eq, A, D> Default for KeyedDiff<K, A, D> {
    fn default() -> Self {
        Self {
            added: IndexMap::new(),
            deleted: IndexMap::new(),
            modified: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, A, D> KeyedDiff<K, A, D> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.added.len() + self.deleted.len() + self.modified.len()
    }

    /// `None` when nothing changed.
    #[must_use]
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Re-key every entry, e.g. to swap a matching key for a display key.
    pub fn map_keys<K2: Hash + Eq>(
        self,
        mut added: impl FnMut(K) -> K2,
        mut deleted: impl FnMut(K) -> K2,
        mut modified: impl FnMut(K) -> K2,
    ) -> KeyedDiff<K2, A, D> {
        KeyedDiff {
            added: self.added.into_iter().map(|(k, v)| (added(k), v)).collect(),
            deleted: self.deleted.into_iter().map(|(k, v)| (deleted(k), v)).collect(),
            modified: self
                .modified
                .into_iter()
                .map(|(k, v)| (modified(k), v))
                .collect(),
        }
    }
}

/// Compare two keyed collections.
///
/// `compare` is called for keys present on both sides and returns the nested
/// diff, or `None` when the entries are equivalent. Duplicate keys keep their
/// first occurrence.
pub fn diff_keyed<'a, K, V, D, F>(
    base: impl IntoIterator<Item = (K, &'a V)>,
    revision: impl IntoIterator<Item = (K, &'a V)>,
    mut compare: F,
) -> Option<KeyedDiff<K, &'a V, D>>
where
    K: Hash + Eq + Clone,
    V: ?Sized + 'a,
    F: FnMut(&K, &'a V, &'a V) -> Option<D>,
{
    let mut base_map: IndexMap<K, &'a V> = IndexMap::new();
    for (key, value) in base {
        base_map.entry(key).or_insert(value);
    }
    let mut revision_map: IndexMap<K, &'a V> = IndexMap::new();
    for (key, value) in revision {
        revision_map.entry(key).or_insert(value);
    }

    let mut diff = KeyedDiff::new();
    for (key, base_value) in &base_map {
        match revision_map.get(key) {
            None => {
                diff.deleted.insert(key.clone(), *base_value);
            }
            Some(revision_value) => {
                if let Some(nested) = compare(key, base_value, revision_value) {
                    diff.modified.insert(key.clone(), nested);
                }
            }
        }
    }
    for (key, revision_value) in revision_map {
        if !base_map.contains_key(&key) {
            diff.added.insert(key, revision_value);
        }
    }
    diff.non_empty()
}

/// Added and deleted members of an unordered set of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StringSetDiff {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<String>,
}

impl StringSetDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Compare two string collections as sets.
pub fn diff_string_sets<'s>(
    base: impl IntoIterator<Item = &'s String>,
    revision: impl IntoIterator<Item = &'s String>,
) -> Option<StringSetDiff> {
    let base: IndexSet<&String> = base.into_iter().collect();
    let revision: IndexSet<&String> = revision.into_iter().collect();
    let diff = StringSetDiff {
        added: revision
            .iter()
            .filter(|s| !base.contains(*s))
            .map(|s| (*s).clone())
            .collect(),
        deleted: base
            .iter()
            .filter(|s| !revision.contains(*s))
            .map(|s| (*s).clone())
            .collect(),
    };
    if diff.is_empty() {
        None
    } else {
        Some(diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_diff_only_when_different() {
        assert!(value_diff(&3, &3).is_none());
        let diff = value_diff(&Some(10u64), &Some(15)).unwrap();
        assert_eq!(diff.from, Some(10));
        assert_eq!(diff.to, Some(15));
    }

    #[test]
    fn test_keyed_diff_states_are_disjoint() {
        let base: IndexMap<String, i32> =
            [("a".into(), 1), ("b".into(), 2), ("c".into(), 3)].into();
        let revision: IndexMap<String, i32> =
            [("d".into(), 4), ("c".into(), 30), ("b".into(), 2)].into();

        let diff = diff_keyed(
            base.iter().map(|(k, v)| (k.clone(), v)),
            revision.iter().map(|(k, v)| (k.clone(), v)),
            |_, from, to| value_diff(from, to),
        )
        .unwrap();

        assert_eq!(diff.deleted.keys().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(diff.added.keys().collect::<Vec<_>>(), vec!["d"]);
        assert_eq!(diff.modified.keys().collect::<Vec<_>>(), vec!["c"]);
        assert_eq!(diff.modified["c"], ValueDiff::new(3, 30));
        assert_eq!(diff.total(), 3);
    }

    #[test]
    fn test_keyed_diff_identical_is_none() {
        let map: IndexMap<String, i32> = [("a".into(), 1)].into();
        let diff = diff_keyed(
            map.iter().map(|(k, v)| (k.clone(), v)),
            map.iter().map(|(k, v)| (k.clone(), v)),
            |_, from, to| value_diff(from, to),
        );
        assert!(diff.is_none());
    }

    #[test]
    fn test_string_set_diff_ignores_order_and_duplicates() {
        let base = vec!["id".to_string(), "name".to_string()];
        let revision = vec!["name".to_string(), "id".to_string(), "id".to_string()];
        assert!(diff_string_sets(&base, &revision).is_none());

        let revision = vec!["name".to_string(), "tag".to_string()];
        let diff = diff_string_sets(&base, &revision).unwrap();
        assert_eq!(diff.added, vec!["tag"]);
        assert_eq!(diff.deleted, vec!["id"]);
    }
}
