//! In-memory YAML document values.
//!
//! This module provides the core data structure for representing YAML documents
//! in yamlpipe. A document is a tree of `YamlValue`s: mappings keep their keys in
//! insertion order (backed by `IndexMap`), so a load → mutate → save round-trip
//! never reorders the user's keys.
//!
//! # Example
//!
//! ```
//! use yamlpipe::document::node::{YamlValue, YamlNumber};
//! use indexmap::IndexMap;
//!
//! let mut map = IndexMap::new();
//! map.insert("name".to_string(), YamlValue::String("yamlpipe".to_string()));
//! map.insert("version".to_string(), YamlValue::Number(YamlNumber::Integer(1)));
//! let doc = YamlValue::Object(map);
//!
//! assert!(doc.is_object());
//! ```

use indexmap::IndexMap;
use std::fmt;

/// Represents YAML numbers (integer or float)
#[derive(Debug, Clone, PartialEq)]
pub enum YamlNumber {
    Integer(i64),
    Float(f64),
}

impl fmt::Display for YamlNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YamlNumber::Integer(i) => write!(f, "{}", i),
            YamlNumber::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl YamlNumber {
    pub fn as_f64(&self) -> f64 {
        match self {
            YamlNumber::Integer(i) => *i as f64,
            YamlNumber::Float(f) => *f,
        }
    }
}

/// The mapping type used for YAML objects.
pub type YamlMap = IndexMap<String, YamlValue>;

/// A YAML document value.
///
/// `Object` and `Array` are the two container kinds. `String`, `Number`,
/// `Boolean` and `Null` are scalars; every scalar has a plain-text form
/// (see [`YamlValue::scalar_text`]) which is what path matching, macro
/// substitution and `print` operate on.
///
/// Cloning is a structural deep copy: two clones never share mutable state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum YamlValue {
    /// A YAML mapping with unique keys in insertion order
    Object(YamlMap),
    /// A YAML sequence
    Array(Vec<YamlValue>),
    /// A YAML string scalar
    String(String),
    /// A YAML number (integer or float)
    Number(YamlNumber),
    /// A YAML boolean
    Boolean(bool),
    /// A YAML null value
    #[default]
    Null,
}

impl YamlValue {
    /// Creates an empty mapping.
    pub fn empty_object() -> Self {
        YamlValue::Object(IndexMap::new())
    }

    /// Returns true if this value is an object.
    ///
    /// # Example
    ///
    /// ```
    /// use yamlpipe::document::node::{YamlValue, YamlNumber};
    ///
    /// assert!(YamlValue::empty_object().is_object());
    /// assert!(!YamlValue::Number(YamlNumber::Integer(42)).is_object());
    /// ```
    pub fn is_object(&self) -> bool {
        matches!(self, YamlValue::Object(_))
    }

    /// Returns true if this value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, YamlValue::Array(_))
    }

    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, YamlValue::Null)
    }

    /// Returns true if this value is a container (object or array).
    pub fn is_container(&self) -> bool {
        matches!(self, YamlValue::Object(_) | YamlValue::Array(_))
    }

    /// Returns true for strings, numbers, booleans and null.
    pub fn is_scalar(&self) -> bool {
        !self.is_container()
    }

    /// Short type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            YamlValue::Object(_) => "mapping",
            YamlValue::Array(_) => "sequence",
            YamlValue::String(_) => "string",
            YamlValue::Number(_) => "number",
            YamlValue::Boolean(_) => "boolean",
            YamlValue::Null => "null",
        }
    }

    pub fn as_object(&self) -> Option<&YamlMap> {
        match self {
            YamlValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut YamlMap> {
        match self {
            YamlValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<YamlValue>> {
        match self {
            YamlValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the plain-text form of a scalar, or `None` for containers.
    ///
    /// Null renders as `null`, matching how YAML would print it.
    ///
    /// # Example
    ///
    /// ```
    /// use yamlpipe::document::node::{YamlValue, YamlNumber};
    ///
    /// assert_eq!(YamlValue::Number(YamlNumber::Integer(7)).scalar_text().as_deref(), Some("7"));
    /// assert_eq!(YamlValue::empty_object().scalar_text(), None);
    /// ```
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            YamlValue::String(s) => Some(s.clone()),
            YamlValue::Number(n) => Some(n.to_string()),
            YamlValue::Boolean(b) => Some(b.to_string()),
            YamlValue::Null => Some("null".to_string()),
            YamlValue::Object(_) | YamlValue::Array(_) => None,
        }
    }

    /// Returns true if this is a mapping whose values are all scalars.
    pub fn is_shallow_object(&self) -> bool {
        match self {
            YamlValue::Object(map) => map.values().all(YamlValue::is_scalar),
            _ => false,
        }
    }
}

/// Compact single-line rendering, used for log messages and table cells.
impl fmt::Display for YamlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YamlValue::Object(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            YamlValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            YamlValue::String(s) => write!(f, "{}", s),
            YamlValue::Number(n) => write!(f, "{}", n),
            YamlValue::Boolean(b) => write!(f, "{}", b),
            YamlValue::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for YamlValue {
    fn from(s: &str) -> Self {
        YamlValue::String(s.to_string())
    }
}

impl From<String> for YamlValue {
    fn from(s: String) -> Self {
        YamlValue::String(s)
    }
}

impl From<i64> for YamlValue {
    fn from(i: i64) -> Self {
        YamlValue::Number(YamlNumber::Integer(i))
    }
}

impl From<bool> for YamlValue {
    fn from(b: bool) -> Self {
        YamlValue::Boolean(b)
    }
}

impl From<YamlMap> for YamlValue {
    fn from(map: YamlMap) -> Self {
        YamlValue::Object(map)
    }
}

impl From<Vec<YamlValue>> for YamlValue {
    fn from(items: Vec<YamlValue>) -> Self {
        YamlValue::Array(items)
    }
}
