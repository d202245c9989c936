//! Canonical, branch-qualified paths into a schema diff tree.

use super::combinator::CombinatorKind;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Property(String),
    Items,
    Combinator(CombinatorKind, String),
}

/// Location of a node below a body or parameter root.
///
/// Renders as `data/name`, `/items/name` or
/// `/oneOf[#/components/schemas/Dog]/breed`: properties are joined with `/`,
/// and array and combinator steps always carry a leading `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SchemaPath {
    segments: Vec<PathSegment>,
}

impl SchemaPath {
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Self {
        self.child(PathSegment::Property(name.to_string()))
    }

    #[must_use]
    pub fn items(&self) -> Self {
        self.child(PathSegment::Items)
    }

    #[must_use]
    pub fn combinator(&self, kind: CombinatorKind, signature: &str) -> Self {
        self.child(PathSegment::Combinator(kind, signature.to_string()))
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Property(name) if i == 0 => f.write_str(name)?,
                PathSegment::Property(name) => write!(f, "/{name}")?,
                PathSegment::Items => f.write_str("/items")?,
                PathSegment::Combinator(kind, signature) => write!(f, "/{kind}[{signature}]")?,
            }
        }
        Ok(())
    }
}
