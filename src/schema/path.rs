// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Attribute paths used to point diagnostics at a specific value.

use serde::{Serialize, Serializer};
use std::fmt;

/// A single step of an [`AttributePath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// Named attribute inside an object
    Attribute(String),
    /// Position inside a list
    Index(usize),
    /// Key inside a map
    Key(String),
}

/// Location of a value inside a resource, e.g. `spec.selector.namespaces[0]`
/// or `metadata.labels["app"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributePath(Vec<PathStep>);

impl AttributePath {
    /// The empty path, pointing at the whole resource.
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of a top-level attribute.
    #[must_use]
    pub fn attribute_root(name: &str) -> Self {
        Self(vec![PathStep::Attribute(name.to_string())])
    }

    /// Extend the path with a nested attribute name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Self {
        self.with(PathStep::Attribute(name.to_string()))
    }

    /// Extend the path with a list index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.with(PathStep::Index(index))
    }

    /// Extend the path with a map key.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        self.with(PathStep::Key(key.to_string()))
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    fn with(&self, step: PathStep) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, step) in self.0.iter().enumerate() {
            match step {
                PathStep::Attribute(name) if position == 0 => write!(f, "{name}")?,
                PathStep::Attribute(name) => write!(f, ".{name}")?,
                PathStep::Index(index) => write!(f, "[{index}]")?,
                PathStep::Key(key) => write!(f, "[{key:?}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for AttributePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::AttributePath;

    #[test]
    fn test_display_nested_path() {
        let path = AttributePath::attribute_root("spec")
            .attribute("selector")
            .attribute("namespaces")
            .index(0);
        assert_eq!(path.to_string(), "spec.selector.namespaces[0]");
    }

    #[test]
    fn test_display_map_key() {
        let path = AttributePath::attribute_root("metadata")
            .attribute("labels")
            .key("app.kubernetes.io/name");
        assert_eq!(path.to_string(), r#"metadata.labels["app.kubernetes.io/name"]"#);
    }

    #[test]
    fn test_root_is_empty() {
        assert!(AttributePath::root().is_root());
        assert_eq!(AttributePath::root().to_string(), "");
        assert!(!AttributePath::root().attribute("spec").is_root());
    }
}
