//! Property sets used for macro substitution in batch scripts.
//!
//! Sets are looked up in order and the first one that defines a name wins.
//! The built-in `batch` set always comes first; it holds `setProperty`
//! values and the `foreach.*` loop variables.

use super::error::BatchErrorKind;
use crate::command::{reference, MemoryStore};
use crate::processor::macros::PropertyLookup;
use indexmap::IndexMap;

pub use crate::file::properties::Properties;

/// Name of the built-in property set.
pub const BATCH_SET: &str = "batch";

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySets {
    sets: IndexMap<String, Properties>,
}

impl Default for PropertySets {
    fn default() -> Self {
        let mut sets = IndexMap::new();
        sets.insert(BATCH_SET.to_string(), Properties::new());
        Self { sets }
    }
}

impl PropertySets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a named set. A replaced set keeps its lookup order.
    pub fn insert_set(&mut self, name: impl Into<String>, properties: Properties) {
        self.sets.insert(name.into(), properties);
    }

    pub fn set_names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Sets a property in the `batch` set, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.batch_set_mut().insert(key.into(), value.into())
    }

    /// Removes a property from the `batch` set.
    pub fn unset(&mut self, key: &str) -> Option<String> {
        self.batch_set_mut().shift_remove(key)
    }

    /// Puts a `batch` property back to an earlier value, or removes it.
    pub fn restore(&mut self, key: &str, previous: Option<String>) {
        match previous {
            Some(value) => {
                self.set(key, value);
            }
            None => {
                self.unset(key);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.sets
            .values()
            .find_map(|set| set.get(name))
            .map(String::as_str)
    }

    fn batch_set_mut(&mut self) -> &mut Properties {
        self.sets.entry(BATCH_SET.to_string()).or_default()
    }
}

impl PropertyLookup for PropertySets {
    fn property(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }
}

/// Loads a property set from `@file.properties`, `@file.yaml|json` (scalar
/// entries of a mapping) or `!memoryName` (scalar entries of a stored
/// mapping).
pub fn load_properties(reference: &str, memory: &MemoryStore) -> Result<Properties, BatchErrorKind> {
    let reference = reference.trim();
    if !reference.starts_with(['@', '!']) {
        return Err(BatchErrorKind::Malformed(format!(
            "properties must come from @file or !memory, got '{}'",
            reference
        )));
    }
    Ok(reference::resolve_properties(reference, memory)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ReferenceError;
    use crate::document::parser::parse_yaml;

    #[test]
    fn test_batch_set_has_priority() {
        let mut sets = PropertySets::new();
        let mut loaded = Properties::new();
        loaded.insert("env".to_string(), "file".to_string());
        loaded.insert("only".to_string(), "file".to_string());
        sets.insert_set("conf", loaded);

        sets.set("env", "batch");
        assert_eq!(sets.get("env"), Some("batch"));
        assert_eq!(sets.get("only"), Some("file"));
        assert_eq!(sets.set_names().collect::<Vec<_>>(), vec!["batch", "conf"]);
    }

    #[test]
    fn test_restore() {
        let mut sets = PropertySets::new();
        let previous = sets.set("foreach.index", "0");
        assert_eq!(previous, None);
        let inner_previous = sets.set("foreach.index", "5");
        assert_eq!(inner_previous.as_deref(), Some("0"));

        sets.restore("foreach.index", inner_previous);
        assert_eq!(sets.get("foreach.index"), Some("0"));
        sets.restore("foreach.index", previous);
        assert_eq!(sets.get("foreach.index"), None);
    }

    #[test]
    fn test_load_from_memory() {
        let mut memory = MemoryStore::new();
        memory.save("conf", parse_yaml("a: 1\nb: {c: 2}\nd: x\n").unwrap());
        memory.save("list", parse_yaml("[1]").unwrap());

        let props = load_properties("!conf", &memory).unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("a").map(String::as_str), Some("1"));

        assert!(matches!(
            load_properties("!list", &memory),
            Err(BatchErrorKind::Reference(ReferenceError::PropertiesShape { .. }))
        ));
        assert!(matches!(
            load_properties("!missing", &memory),
            Err(BatchErrorKind::Reference(ReferenceError::MissingMemory { .. }))
        ));
        assert!(matches!(
            load_properties("inline", &memory),
            Err(BatchErrorKind::Malformed(_))
        ));
    }

    #[test]
    fn test_load_from_properties_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("env.properties");
        std::fs::write(&path, "stage=prod\n").unwrap();

        let props = load_properties(&format!("@{}", path.display()), &MemoryStore::new()).unwrap();
        assert_eq!(props.get("stage").map(String::as_str), Some("prod"));
    }
}
