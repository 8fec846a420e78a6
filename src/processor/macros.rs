//! `${NAMESPACE::name}` substitution over a whole document.
//!
//! Unlike the other operations this one is not path driven: every key and
//! every string scalar in the tree is rewritten. Tokens whose namespace
//! differs from the configured one, or whose name no property set defines,
//! are left as they are.

use crate::document::node::{YamlMap, YamlValue};
use indexmap::IndexMap;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^${}]+)\}").expect("macro token regex is valid"));

/// A source of property values for macro tokens.
pub trait PropertyLookup {
    fn property(&self, name: &str) -> Option<String>;
}

impl PropertyLookup for IndexMap<String, String> {
    fn property(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Scalar entries of a mapping; nested containers are not properties.
impl PropertyLookup for YamlMap {
    fn property(&self, name: &str) -> Option<String> {
        self.get(name).and_then(YamlValue::scalar_text)
    }
}

/// The first set that defines `name` wins.
impl<L: PropertyLookup> PropertyLookup for [L] {
    fn property(&self, name: &str) -> Option<String> {
        self.iter().find_map(|set| set.property(name))
    }
}

impl<L: PropertyLookup + ?Sized> PropertyLookup for &L {
    fn property(&self, name: &str) -> Option<String> {
        (**self).property(name)
    }
}

/// Expands tokens in one string. Returns the new text and whether anything
/// was substituted.
pub fn substitute_str<L>(text: &str, lookup: &L, namespace: &str) -> (String, bool)
where
    L: PropertyLookup + ?Sized,
{
    let mut changed = false;
    let expanded = TOKEN_RE.replace_all(text, |caps: &Captures<'_>| {
        let inner = &caps[1];
        let name = match inner.split_once("::") {
            Some((ns, name)) if ns == namespace => Some(name),
            Some(_) => None,
            None => Some(inner),
        };
        match name.and_then(|name| lookup.property(name)) {
            Some(value) => {
                changed = true;
                value
            }
            None => caps[0].to_string(),
        }
    });
    (expanded.into_owned(), changed)
}

/// Returns a substituted copy of `value` and whether any token was replaced.
///
/// Keys are expanded too. If two keys expand to the same text the later
/// entry's value wins, at the earlier entry's position.
pub fn substitute<L>(value: &YamlValue, lookup: &L, namespace: &str) -> (YamlValue, bool)
where
    L: PropertyLookup + ?Sized,
{
    match value {
        YamlValue::Object(map) => {
            let mut changed = false;
            let mut out = YamlMap::with_capacity(map.len());
            for (key, child) in map {
                let (key, key_changed) = substitute_str(key, lookup, namespace);
                let (child, child_changed) = substitute(child, lookup, namespace);
                changed |= key_changed || child_changed;
                out.insert(key, child);
            }
            (YamlValue::Object(out), changed)
        }
        YamlValue::Array(items) => {
            let mut changed = false;
            let out = items
                .iter()
                .map(|item| {
                    let (item, item_changed) = substitute(item, lookup, namespace);
                    changed |= item_changed;
                    item
                })
                .collect();
            (YamlValue::Array(out), changed)
        }
        YamlValue::String(text) => {
            let (text, changed) = substitute_str(text, lookup, namespace);
            (YamlValue::String(text), changed)
        }
        other => (other.clone(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::parse_yaml;

    fn props(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitute_str_namespaced_and_short() {
        let p = props(&[("env", "prod"), ("region", "eu")]);
        let (out, changed) = substitute_str("${yamlpipe::env}-${region}", &p, "yamlpipe");
        assert_eq!(out, "prod-eu");
        assert!(changed);
    }

    #[test]
    fn test_unknown_and_foreign_tokens_are_kept() {
        let p = props(&[("env", "prod")]);
        let (out, changed) = substitute_str("${other::env} ${missing} $env", &p, "yamlpipe");
        assert_eq!(out, "${other::env} ${missing} $env");
        assert!(!changed);
    }

    #[test]
    fn test_first_property_set_wins() {
        let sets = vec![props(&[("a", "first")]), props(&[("a", "second"), ("b", "only")])];
        let (out, _) = substitute_str("${a}/${b}", sets.as_slice(), "yamlpipe");
        assert_eq!(out, "first/only");
    }

    #[test]
    fn test_substitute_keys_and_nested_values() {
        let doc = parse_yaml("${name}:\n  url: http://${host}/x\n  port: 80\n  list:\n    - ${host}\n    - 2\n").unwrap();
        let p = props(&[("name", "svc"), ("host", "example.org")]);
        let (out, changed) = substitute(&doc, &p, "yamlpipe");
        assert!(changed);
        let expected =
            parse_yaml("svc:\n  url: http://example.org/x\n  port: 80\n  list: [example.org, 2]\n")
                .unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_substitute_leaves_input_untouched() {
        let doc = parse_yaml("a: ${x}\n").unwrap();
        let p = props(&[("x", "1")]);
        let (out, _) = substitute(&doc, &p, "yamlpipe");
        assert_eq!(doc, parse_yaml("a: ${x}\n").unwrap());
        assert_eq!(out, parse_yaml("a: '1'\n").unwrap());
    }

    #[test]
    fn test_yaml_map_lookup_uses_scalars_only() {
        let map = match parse_yaml("a: 1\nb: {c: 2}\n").unwrap() {
            YamlValue::Object(map) => map,
            other => panic!("expected mapping, got {:?}", other),
        };
        assert_eq!(map.property("a"), Some("1".to_string()));
        assert_eq!(map.property("b"), None);
    }
}
