//! Named memory store shared by the statements of one run.

use crate::document::node::YamlValue;
use indexmap::IndexMap;
use tracing::debug;

/// Values saved under a name (`saveTo !name`) and recalled later
/// (`useAsInput !name`, `print !name`).
///
/// Names are kept in the order they were first saved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: IndexMap<String, YamlValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `name`, returning the value it replaced.
    pub fn save(&mut self, name: impl Into<String>, value: YamlValue) -> Option<YamlValue> {
        let name = name.into();
        debug!(name = %name, kind = value.type_name(), "saved to memory");
        self.entries.insert(name, value)
    }

    pub fn recall(&self, name: &str) -> Option<&YamlValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<YamlValue> {
        self.entries.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
