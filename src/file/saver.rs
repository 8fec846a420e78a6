//! Document serialization and saving.
//!
//! Writes are atomic (temp file, then rename) and can keep a `.bak` copy of
//! the file being replaced. A `.gz` target is gzip-compressed.

use super::loader::DocumentFormat;
use crate::config::Config;
use crate::document::node::{YamlNumber, YamlValue};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_yaml::Value as SerdeYaml;
use std::fs;
use std::path::Path;

/// Converts a document into a `serde_yaml::Value`, keeping key order.
pub fn to_serde_yaml(value: &YamlValue) -> SerdeYaml {
    match value {
        YamlValue::Object(map) => {
            let mut mapping = serde_yaml::Mapping::with_capacity(map.len());
            for (key, child) in map {
                mapping.insert(SerdeYaml::String(key.clone()), to_serde_yaml(child));
            }
            SerdeYaml::Mapping(mapping)
        }
        YamlValue::Array(items) => SerdeYaml::Sequence(items.iter().map(to_serde_yaml).collect()),
        YamlValue::String(s) => SerdeYaml::String(s.clone()),
        YamlValue::Number(YamlNumber::Integer(i)) => SerdeYaml::Number((*i).into()),
        YamlValue::Number(YamlNumber::Float(f)) => SerdeYaml::Number((*f).into()),
        YamlValue::Boolean(b) => SerdeYaml::Bool(*b),
        YamlValue::Null => SerdeYaml::Null,
    }
}

/// Converts a document into a `serde_json::Value`, keeping key order.
///
/// Non-finite floats have no JSON form and become `null`.
pub fn to_serde_json(value: &YamlValue) -> JsonValue {
    match value {
        YamlValue::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(key, child)| (key.clone(), to_serde_json(child)))
                .collect(),
        ),
        YamlValue::Array(items) => JsonValue::Array(items.iter().map(to_serde_json).collect()),
        YamlValue::String(s) => JsonValue::String(s.clone()),
        YamlValue::Number(YamlNumber::Integer(i)) => JsonValue::Number((*i).into()),
        YamlValue::Number(YamlNumber::Float(f)) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        YamlValue::Boolean(b) => JsonValue::Bool(*b),
        YamlValue::Null => JsonValue::Null,
    }
}

/// Serializes a document as YAML.
pub fn to_yaml_string(value: &YamlValue) -> Result<String> {
    serde_yaml::to_string(&to_serde_yaml(value)).context("Failed to serialize YAML")
}

/// Serializes a document as pretty-printed JSON with the given indentation.
pub fn to_json_string(value: &YamlValue, indent_size: usize) -> Result<String> {
    let indent = vec![b' '; indent_size];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    to_serde_json(value)
        .serialize(&mut serializer)
        .context("Failed to serialize JSON")?;

    let mut text = String::from_utf8(out).context("Serialized JSON is not UTF-8")?;
    text.push('\n');
    Ok(text)
}

/// Serializes in the given format.
pub fn serialize(value: &YamlValue, format: DocumentFormat, indent_size: usize) -> Result<String> {
    match format {
        DocumentFormat::Yaml => to_yaml_string(value),
        DocumentFormat::Json => to_json_string(value, indent_size),
    }
}

/// Saves a document, choosing the format from the extension.
///
/// Files without a recognised extension use `config.output_format`.
///
/// # Errors
///
/// Returns an error if serialization, the backup copy, or the atomic write
/// fails.
pub fn save_document<P: AsRef<Path>>(path: P, value: &YamlValue, config: &Config) -> Result<()> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path).unwrap_or(if config.json_output() {
        DocumentFormat::Json
    } else {
        DocumentFormat::Yaml
    });
    let text = serialize(value, format, config.indent_size)?;

    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    let should_compress = path.to_string_lossy().ends_with(".gz");
    write_file_atomic(path, text.as_bytes(), should_compress)
        .with_context(|| format!("Failed to save {}", path.display()))
}

/// Creates a backup of a file by copying it with a .bak extension.
fn create_backup<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, backup_path).context("Failed to create backup")?;
    Ok(())
}

/// Writes to a temporary sibling file, then renames it over the target.
fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if compress {
        let file = fs::File::create(&temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(&temp_path, data).context("Failed to write temp file")?;
    }

    fs::rename(&temp_path, path).context("Failed to rename temp file")?;

    Ok(())
}
