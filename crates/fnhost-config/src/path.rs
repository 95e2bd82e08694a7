//! Field paths used to locate values inside a configuration document.

use std::fmt;

/// One step from a container to a child value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member.
    Key(String),
    /// Array element.
    Index(usize),
}

/// Location of a value in a document, e.g. `extensions.queues.batchSize`
/// or `bindings[1].direction`. The root renders as `$`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The document root.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of the member `key` below this one.
    #[must_use]
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self(segments)
    }

    /// Path of array element `index` below this one.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The segments from the root down.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Last object key on the path, if the path ends in one.
    #[must_use]
    pub fn leaf(&self) -> Option<&str> {
        match self.0.last() {
            Some(PathSegment::Key(key)) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("$");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl serde::Serialize for FieldPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_keys_and_indexes() {
        let path = FieldPath::root().child("bindings").index(1).child("direction");
        assert_eq!(path.to_string(), "bindings[1].direction");
        assert_eq!(path.leaf(), Some("direction"));
    }

    #[test]
    fn root_renders_as_dollar() {
        assert_eq!(FieldPath::root().to_string(), "$");
        assert!(FieldPath::root().is_root());
        assert_eq!(FieldPath::root().leaf(), None);
    }

    #[test]
    fn nested_keys_use_dots() {
        let path = FieldPath::root()
            .child("extensions")
            .child("queues")
            .child("batchSize");
        assert_eq!(path.to_string(), "extensions.queues.batchSize");
        assert_eq!(path.segments().len(), 3);
    }
}
