//! YAML and JSON parsing into `YamlValue` documents.
//!
//! Both parsers go through serde (`serde_yaml` / `serde_json` with
//! `preserve_order`) and then convert the generic serde value into our own
//! document model, keeping mapping keys in source order.
//!
//! # Example
//!
//! ```
//! use yamlpipe::document::parser::parse_yaml;
//!
//! let doc = parse_yaml("name: Alice\nage: 30\n").unwrap();
//! assert!(doc.is_object());
//! ```

use super::node::{YamlMap, YamlNumber, YamlValue};
use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use serde_yaml::Value as SerdeYaml;

/// Parses a YAML string into a `YamlValue`.
///
/// Non-string mapping keys (`200: ok`, `true: x`) are converted to their
/// string form, since YAML-paths match keys as text.
///
/// # Errors
///
/// Returns an error if the input is not valid YAML.
pub fn parse_yaml(yaml_str: &str) -> Result<YamlValue> {
    let value: SerdeYaml = serde_yaml::from_str(yaml_str).context("Failed to parse YAML")?;
    Ok(convert_yaml_value(&value))
}

/// Parses a JSON string into a `YamlValue`.
///
/// # Errors
///
/// Returns an error if the input is not valid JSON.
pub fn parse_json(json_str: &str) -> Result<YamlValue> {
    let value: JsonValue = serde_json::from_str(json_str).context("Failed to parse JSON")?;
    Ok(convert_json_value(&value))
}

/// Converts a `serde_yaml::Value` into a `YamlValue`.
pub fn convert_yaml_value(value: &SerdeYaml) -> YamlValue {
    match value {
        SerdeYaml::Mapping(mapping) => {
            let entries: YamlMap = mapping
                .iter()
                .map(|(k, v)| (yaml_key_to_string(k), convert_yaml_value(v)))
                .collect();
            YamlValue::Object(entries)
        }
        SerdeYaml::Sequence(items) => {
            YamlValue::Array(items.iter().map(convert_yaml_value).collect())
        }
        SerdeYaml::String(s) => YamlValue::String(s.clone()),
        SerdeYaml::Number(n) => YamlValue::Number(convert_yaml_number(n)),
        SerdeYaml::Bool(b) => YamlValue::Boolean(*b),
        SerdeYaml::Null => YamlValue::Null,
        // Custom tags are dropped; the tagged value is kept
        SerdeYaml::Tagged(tagged) => convert_yaml_value(&tagged.value),
    }
}

fn convert_yaml_number(n: &serde_yaml::Number) -> YamlNumber {
    if let Some(i) = n.as_i64() {
        YamlNumber::Integer(i)
    } else {
        YamlNumber::Float(n.as_f64().unwrap_or(0.0))
    }
}

fn yaml_key_to_string(key: &SerdeYaml) -> String {
    match key {
        SerdeYaml::String(s) => s.clone(),
        SerdeYaml::Number(n) => n.to_string(),
        SerdeYaml::Bool(b) => b.to_string(),
        SerdeYaml::Null => "null".to_string(),
        other => convert_yaml_value(other).to_string(),
    }
}

/// Converts a `serde_json::Value` into a `YamlValue`.
pub fn convert_json_value(value: &JsonValue) -> YamlValue {
    match value {
        JsonValue::Object(map) => {
            let entries: YamlMap = map
                .iter()
                .map(|(k, v)| (k.clone(), convert_json_value(v)))
                .collect();
            YamlValue::Object(entries)
        }
        JsonValue::Array(arr) => YamlValue::Array(arr.iter().map(convert_json_value).collect()),
        JsonValue::String(s) => YamlValue::String(s.clone()),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => YamlValue::Number(YamlNumber::Integer(i)),
            None => YamlValue::Number(YamlNumber::Float(n.as_f64().unwrap_or(0.0))),
        },
        JsonValue::Bool(b) => YamlValue::Boolean(*b),
        JsonValue::Null => YamlValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_mapping() {
        let doc = parse_yaml("name: Test\ncount: 42\nenabled: true\n").unwrap();
        let map = doc.as_object().expect("root should be a mapping");
        assert_eq!(map.len(), 3);
        assert_eq!(map["name"], YamlValue::from("Test"));
        assert_eq!(map["count"], YamlValue::from(42));
        assert_eq!(map["enabled"], YamlValue::from(true));
    }

    #[test]
    fn test_parse_preserves_key_order() {
        let doc = parse_yaml("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_numeric_keys_become_strings() {
        let doc = parse_yaml("responses:\n  200:\n    description: ok\n").unwrap();
        let responses = doc.as_object().unwrap()["responses"].as_object().unwrap();
        assert!(responses.contains_key("200"));
    }

    #[test]
    fn test_parse_float() {
        let doc = parse_yaml("ratio: 2.5").unwrap();
        match &doc.as_object().unwrap()["ratio"] {
            YamlValue::Number(YamlNumber::Float(f)) => assert!((f - 2.5).abs() < f64::EPSILON),
            other => panic!("expected float, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_is_null() {
        assert_eq!(parse_yaml("").unwrap(), YamlValue::Null);
    }

    #[test]
    fn test_parse_invalid_yaml_fails() {
        assert!(parse_yaml("a: b: c").is_err());
    }

    #[test]
    fn test_parse_json_preserves_order() {
        let doc = parse_json(r#"{"b": 1, "a": [true, null, "s"]}"#).unwrap();
        let map = doc.as_object().unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(
            map["a"],
            YamlValue::Array(vec![true.into(), YamlValue::Null, "s".into()])
        );
    }

    #[test]
    fn test_parse_invalid_json_fails() {
        assert!(parse_json(r#"{"unclosed": "#).is_err());
        assert!(parse_json("plain words").is_err());
    }
}
