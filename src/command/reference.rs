//! Data references.
//!
//! Commands that take data (`insert`, `replace`, `macro`, `useAsInput`) accept
//! one of:
//!
//! - `@path/to/file.yaml` (or `.yml`, `.json`, each optionally `.gz`)
//! - `!name`, a value saved in memory earlier
//! - inline data, tried as JSON, then YAML, then kept as a plain string
//!
//! Property sets for `macro` and `properties` may also come from a
//! `.properties` file.

use super::error::ReferenceError;
use super::memory::MemoryStore;
use super::Session;
use crate::document::node::YamlValue;
use crate::document::parser::{parse_json, parse_yaml};
use crate::file::loader::{read_text, DocumentFormat};
use crate::file::properties::{parse_properties, Properties};
use crate::file::saver::save_document;
use tracing::debug;

/// Resolves a reference to a document.
///
/// Inline data never fails: text that is neither JSON nor YAML becomes a
/// string scalar.
pub fn resolve(reference: &str, memory: &MemoryStore) -> Result<YamlValue, ReferenceError> {
    let reference = reference.trim();

    if let Some(path) = reference.strip_prefix('@') {
        return load_file(path);
    }

    if let Some(name) = reference.strip_prefix('!') {
        return memory
            .recall(name)
            .cloned()
            .ok_or_else(|| ReferenceError::MissingMemory {
                name: name.to_string(),
            });
    }

    Ok(parse_json(reference)
        .or_else(|_| parse_yaml(reference))
        .unwrap_or_else(|_| YamlValue::String(reference.to_string())))
}

/// Resolves the source of `useAsInput`.
///
/// A bare name that is saved in memory is recalled, mirroring [`save`].
/// Anything else resolves like [`resolve`], so inline data still works.
pub fn recall(reference: &str, memory: &MemoryStore) -> Result<YamlValue, ReferenceError> {
    let reference = reference.trim();
    if !reference.starts_with(['@', '!']) {
        if let Some(value) = memory.recall(reference) {
            debug!(name = reference, "recalled bare name from memory");
            return Ok(value.clone());
        }
    }
    resolve(reference, memory)
}

/// Resolves a reference to a flat property set.
///
/// An `@file` that is not JSON or YAML is read as `.properties` text. Any
/// other reference must resolve to a mapping, whose scalar entries become
/// the properties.
pub fn resolve_properties(
    reference: &str,
    memory: &MemoryStore,
) -> Result<Properties, ReferenceError> {
    let reference = reference.trim();

    if let Some(path) = reference.strip_prefix('@') {
        if DocumentFormat::from_path(path).is_none() {
            let text = read_text(path).map_err(|e| ReferenceError::Io {
                path: path.to_string(),
                message: format!("{:#}", e),
            })?;
            debug!(path, "loaded properties file");
            return Ok(parse_properties(&text));
        }
    }

    match resolve(reference, memory)? {
        YamlValue::Object(map) => Ok(map
            .iter()
            .filter_map(|(key, value)| value.scalar_text().map(|text| (key.clone(), text)))
            .collect()),
        other => Err(ReferenceError::PropertiesShape {
            reference: reference.to_string(),
            found: other.type_name(),
        }),
    }
}

/// Saves `value` to an `@file` or to memory (`!name` or a bare name).
pub fn save(reference: &str, value: YamlValue, session: &mut Session) -> Result<(), ReferenceError> {
    let reference = reference.trim();

    if let Some(path) = reference.strip_prefix('@') {
        if DocumentFormat::from_path(path).is_none() {
            return Err(ReferenceError::UnsupportedFile {
                path: path.to_string(),
            });
        }
        debug!(path, "saving to file");
        return save_document(path, &value, &session.config).map_err(|e| ReferenceError::Io {
            path: path.to_string(),
            message: format!("{:#}", e),
        });
    }

    let name = reference.strip_prefix('!').unwrap_or(reference);
    session.memory.save(name, value);
    Ok(())
}

fn load_file(path: &str) -> Result<YamlValue, ReferenceError> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| ReferenceError::UnsupportedFile {
        path: path.to_string(),
    })?;

    let content = read_text(path).map_err(|e| ReferenceError::Io {
        path: path.to_string(),
        message: format!("{:#}", e),
    })?;

    let parsed = match format {
        DocumentFormat::Json => parse_json(&content),
        DocumentFormat::Yaml => parse_yaml(&content),
    };
    debug!(path, "loaded referenced file");
    parsed.map_err(|e| ReferenceError::Parse {
        path: path.to_string(),
        message: format!("{:#}", e),
    })
}
