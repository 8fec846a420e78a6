//! Addressing nodes inside a YAML document.
//!
//! A `NodePath` is a sequence of steps from the document root: a mapping key or a
//! sequence index per level. Entry processors record the `NodePath` of a matched
//! key's parent while the matcher walks the document with a shared borrow, and
//! resolve it mutably once the walk is over.
//!
//! # Example
//!
//! ```
//! use yamlpipe::document::node::YamlValue;
//! use yamlpipe::document::parser::parse_yaml;
//! use yamlpipe::document::tree::{NodePath, PathStep};
//!
//! let doc = parse_yaml("items:\n  - name: a\n  - name: b\n").unwrap();
//! let path = NodePath::from(vec![PathStep::key("items"), PathStep::Index(1)]);
//! let node = path.resolve(&doc).unwrap();
//! assert_eq!(node.as_object().unwrap()["name"], YamlValue::from("b"));
//! ```

use super::node::YamlValue;
use std::fmt;

/// One step of a `NodePath`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// A key inside a mapping
    Key(String),
    /// An element inside a sequence
    Index(usize),
}

impl PathStep {
    pub fn key(key: impl Into<String>) -> Self {
        PathStep::Key(key.into())
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(key) => write!(f, "{}", key),
            PathStep::Index(idx) => write!(f, "[{}]", idx),
        }
    }
}

/// Location of a node, relative to the document root.
///
/// The empty path addresses the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    steps: Vec<PathStep>,
}

impl NodePath {
    /// The path of the document root.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn push(&mut self, step: PathStep) {
        self.steps.push(step);
    }

    pub fn pop(&mut self) -> Option<PathStep> {
        self.steps.pop()
    }

    /// Returns a new path extended by one step.
    pub fn child(&self, step: PathStep) -> Self {
        let mut path = self.clone();
        path.push(step);
        path
    }

    /// Gets an immutable reference to the node at this path.
    ///
    /// Returns `None` if a key is missing, an index is out of bounds, or the
    /// path tries to step through a scalar.
    pub fn resolve<'a>(&self, root: &'a YamlValue) -> Option<&'a YamlValue> {
        let mut current = root;

        for step in &self.steps {
            current = match (step, current) {
                (PathStep::Key(key), YamlValue::Object(entries)) => entries.get(key)?,
                (PathStep::Index(idx), YamlValue::Array(elements)) => elements.get(*idx)?,
                _ => return None,
            };
        }

        Some(current)
    }

    /// Gets a mutable reference to the node at this path.
    ///
    /// Follows the same rules as [`NodePath::resolve`].
    pub fn resolve_mut<'a>(&self, root: &'a mut YamlValue) -> Option<&'a mut YamlValue> {
        let mut current = root;

        for step in &self.steps {
            current = match (step, current) {
                (PathStep::Key(key), YamlValue::Object(entries)) => entries.get_mut(key)?,
                (PathStep::Index(idx), YamlValue::Array(elements)) => elements.get_mut(*idx)?,
                _ => return None,
            };
        }

        Some(current)
    }
}

impl From<Vec<PathStep>> for NodePath {
    fn from(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "<root>");
        }
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Key(_) if i > 0 => write!(f, ".{}", step)?,
                _ => write!(f, "{}", step)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::parse_yaml;

    const DOC: &str = r#"
a:
  b:
    - x: 1
    - x: 2
  c: plain
"#;

    #[test]
    fn test_resolve_root() {
        let doc = parse_yaml(DOC).unwrap();
        assert_eq!(NodePath::root().resolve(&doc), Some(&doc));
    }

    #[test]
    fn test_resolve_nested() {
        let doc = parse_yaml(DOC).unwrap();
        let path = NodePath::from(vec![
            PathStep::key("a"),
            PathStep::key("b"),
            PathStep::Index(1),
            PathStep::key("x"),
        ]);
        assert_eq!(path.resolve(&doc), Some(&YamlValue::from(2)));
    }

    #[test]
    fn test_resolve_invalid() {
        let doc = parse_yaml(DOC).unwrap();
        let missing = NodePath::from(vec![PathStep::key("a"), PathStep::key("zzz")]);
        assert!(missing.resolve(&doc).is_none());

        let out_of_bounds = NodePath::from(vec![
            PathStep::key("a"),
            PathStep::key("b"),
            PathStep::Index(9),
        ]);
        assert!(out_of_bounds.resolve(&doc).is_none());

        let through_scalar = NodePath::from(vec![
            PathStep::key("a"),
            PathStep::key("c"),
            PathStep::key("d"),
        ]);
        assert!(through_scalar.resolve(&doc).is_none());
    }

    #[test]
    fn test_resolve_mut_modifies_in_place() {
        let mut doc = parse_yaml(DOC).unwrap();
        let path = NodePath::from(vec![PathStep::key("a"), PathStep::key("c")]);
        *path.resolve_mut(&mut doc).unwrap() = YamlValue::from("changed");
        assert_eq!(path.resolve(&doc), Some(&YamlValue::from("changed")));
    }

    #[test]
    fn test_display() {
        let path = NodePath::from(vec![
            PathStep::key("a"),
            PathStep::key("b"),
            PathStep::Index(0),
            PathStep::key("x"),
        ]);
        assert_eq!(path.to_string(), "a.b[0].x");
        assert_eq!(NodePath::root().to_string(), "<root>");
    }
}
