//! Source positions of operations within the loaded document text.

use super::document::Method;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an operation in its source file. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Operation positions for one side of a comparison.
pub type LocationMap = IndexMap<(String, Method), SourceLocation>;

/// Operation positions for both sides of a comparison.
#[derive(Debug, Clone, Default)]
pub struct SourceLocations {
    pub base: LocationMap,
    pub revision: LocationMap,
}

impl SourceLocations {
    #[must_use]
    pub fn new(base: LocationMap, revision: LocationMap) -> Self {
        Self { base, revision }
    }

    #[must_use]
    pub fn base_location(&self, path: &str, method: Method) -> Option<&SourceLocation> {
        self.base.get(&(path.to_string(), method))
    }

    #[must_use]
    pub fn revision_location(&self, path: &str, method: Method) -> Option<&SourceLocation> {
        self.revision.get(&(path.to_string(), method))
    }

    /// Prefer the revision position and fall back to the base one, which is
    /// the only position a removed operation has.
    #[must_use]
    pub fn locate(
        &self,
        base_path: &str,
        revision_path: &str,
        method: Method,
    ) -> Option<SourceLocation> {
        self.revision_location(revision_path, method)
            .or_else(|| self.base_location(base_path, method))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(file: &str, line: usize) -> SourceLocation {
        SourceLocation {
            file: file.to_string(),
            line,
            column: 5,
        }
    }

    #[test]
    fn test_locate_prefers_revision() {
        let mut base = LocationMap::new();
        base.insert(("/pets".to_string(), Method::Get), loc("base.yaml", 4));
        let mut revision = LocationMap::new();
        revision.insert(("/pets".to_string(), Method::Get), loc("rev.yaml", 7));
        let sources = SourceLocations::new(base, revision);

        let found = sources.locate("/pets", "/pets", Method::Get).unwrap();
        assert_eq!(found.to_string(), "rev.yaml:7:5");
    }

    #[test]
    fn test_locate_falls_back_to_base_for_removed_operation() {
        let mut base = LocationMap::new();
        base.insert(("/pets".to_string(), Method::Delete), loc("base.yaml", 12));
        let sources = SourceLocations::new(base, LocationMap::new());

        let found = sources.locate("/pets", "/pets", Method::Delete).unwrap();
        assert_eq!(found.line, 12);
        assert!(sources.locate("/pets", "/pets", Method::Get).is_none());
    }
}
