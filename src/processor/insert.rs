//! Insert: put new data at every matched path, creating missing paths like
//! `mkdir -p`.
//!
//! Existing end-to-end matches get a copy of the new data. Where the path
//! stops matching, the walk reports failures; those become candidate sites
//! for creating the missing branch. Only the deepest candidates survive, so a
//! branch is created once, right below the last key that did exist.

use super::{EntryProcessor, FailSite, MatchSite, PendingKey, ProcessorError};
use crate::document::node::{YamlMap, YamlValue};
use crate::document::tree::NodePath;
use crate::yamlpath::YamlPath;
use std::collections::HashSet;
use tracing::{debug, warn};

/// A place where the path stopped matching.
#[derive(Debug, Clone)]
struct MissingSite {
    parent: NodePath,
    pattern: YamlPath,
}

#[derive(Debug)]
pub struct InsertProcessor {
    new_data: YamlValue,
    existing: Vec<PendingKey>,
    missing: Vec<MissingSite>,
    /// (mapping, cursor) pairs where some key matched the segment
    matched_levels: HashSet<(NodePath, usize)>,
    replaced: usize,
    created: usize,
}

impl InsertProcessor {
    pub fn new(new_data: YamlValue) -> Self {
        Self {
            new_data,
            existing: Vec::new(),
            missing: Vec::new(),
            matched_levels: HashSet::new(),
            replaced: 0,
            created: 0,
        }
    }

    /// Existing keys whose value was set to the new data.
    pub fn replaced(&self) -> usize {
        self.replaced
    }

    /// Missing branches that were created.
    pub fn created(&self) -> usize {
        self.created
    }

    fn record_level(&mut self, site: &MatchSite<'_>) {
        self.matched_levels
            .insert((site.parent.clone(), site.pattern.cursor()));
    }

    /// Keeps only the deepest failure sites, one per parent mapping.
    fn cull_missing(&mut self) -> Vec<MissingSite> {
        let candidates: Vec<MissingSite> = self
            .missing
            .drain(..)
            .filter(|site| {
                !self
                    .matched_levels
                    .contains(&(site.parent.clone(), site.pattern.cursor()))
            })
            .collect();

        let Some(deepest) = candidates.iter().map(|s| s.pattern.cursor()).max() else {
            return Vec::new();
        };

        let mut survivors: Vec<MissingSite> = Vec::new();
        for site in candidates {
            if site.pattern.cursor() != deepest {
                continue;
            }
            let duplicate = survivors
                .iter()
                .any(|kept| kept.parent == site.parent && kept.pattern.equivalent(&site.pattern));
            if !duplicate {
                survivors.push(site);
            }
        }
        survivors
    }

    /// Wraps the new data in one single-key mapping per unmatched segment
    /// below the first; returns the first key and the wrapped value.
    fn build_branch(&self, pattern: &YamlPath) -> Option<(String, YamlValue)> {
        let segments = pattern.remaining_segments();
        let mut keys = Vec::with_capacity(segments.len());
        for segment in segments {
            match segment.literal() {
                Some(key) => keys.push(key.to_string()),
                None => {
                    warn!(
                        segment = segment.raw(),
                        path = %pattern,
                        "cannot create a key from a wildcard or regex segment"
                    );
                    return None;
                }
            }
        }

        let (first, rest) = keys.split_first()?;
        let mut value = self.new_data.clone();
        for key in rest.iter().rev() {
            let mut wrapper = YamlMap::new();
            wrapper.insert(key.clone(), value);
            value = YamlValue::Object(wrapper);
        }
        Some((first.clone(), value))
    }
}

impl EntryProcessor for InsertProcessor {
    fn on_partial_match(&mut self, site: &MatchSite<'_>) -> Result<(), ProcessorError> {
        self.record_level(site);
        Ok(())
    }

    fn on_end2end_match(&mut self, site: &MatchSite<'_>) -> Result<(), ProcessorError> {
        self.record_level(site);
        self.existing.push(PendingKey::from_site(site));
        Ok(())
    }

    fn on_match_fail(&mut self, site: &FailSite<'_>) -> Result<(), ProcessorError> {
        self.missing.push(MissingSite {
            parent: site.parent.clone(),
            pattern: site.pattern.clone(),
        });
        Ok(())
    }

    fn at_end_of_input(
        &mut self,
        doc: &mut YamlValue,
        _pattern: &YamlPath,
    ) -> Result<(), ProcessorError> {
        let existing = std::mem::take(&mut self.existing);
        for PendingKey { parent, key } in existing {
            if let Some(slot) = parent
                .resolve_mut(doc)
                .and_then(YamlValue::as_object_mut)
                .and_then(|map| map.get_mut(&key))
            {
                *slot = self.new_data.clone();
                debug!(parent = %parent, key = %key, "inserted at existing path");
                self.replaced += 1;
            }
        }

        for site in self.cull_missing() {
            let Some((key, branch)) = self.build_branch(&site.pattern) else {
                continue;
            };
            match site.parent.resolve_mut(doc).and_then(YamlValue::as_object_mut) {
                Some(map) => {
                    debug!(parent = %site.parent, key = %key, "created missing path");
                    map.insert(key, branch);
                    self.created += 1;
                }
                None => warn!(parent = %site.parent, "insertion point is not a mapping"),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::parse_yaml;
    use crate::yamlpath::{Matcher, Parser};

    fn insert(doc: &str, path: &str, data: &str) -> (YamlValue, InsertProcessor) {
        let mut doc = parse_yaml(doc).unwrap();
        let pattern = Parser::parse(path).unwrap();
        let mut inserter = InsertProcessor::new(parse_yaml(data).unwrap());
        Matcher::new(&mut inserter).run(&mut doc, &pattern).unwrap();
        (doc, inserter)
    }

    #[test]
    fn test_insert_at_existing_path() {
        let (doc, inserter) = insert("a:\n  b: old\n", "a.b", "new");
        assert_eq!(doc, parse_yaml("a:\n  b: new\n").unwrap());
        assert_eq!(inserter.replaced(), 1);
        assert_eq!(inserter.created(), 0);
    }

    #[test]
    fn test_insert_creates_missing_leaf() {
        let (doc, inserter) = insert("a:\n  b: 1\n", "a.c", "{x: 1}");
        assert_eq!(doc, parse_yaml("a:\n  b: 1\n  c:\n    x: 1\n").unwrap());
        assert_eq!(inserter.created(), 1);
    }

    #[test]
    fn test_insert_creates_nested_chain() {
        let (doc, _) = insert("a:\n  b: 1\n", "a.c.d.e", "v");
        assert_eq!(doc, parse_yaml("a:\n  b: 1\n  c:\n    d:\n      e: v\n").unwrap());
    }

    #[test]
    fn test_insert_into_empty_mapping() {
        let (doc, _) = insert("{}", "x.y", "1");
        assert_eq!(doc, parse_yaml("x:\n  y: 1\n").unwrap());
    }

    #[test]
    fn test_insert_only_at_deepest_failure() {
        // /user stops matching earlier than /pet, so only /pet gets the branch
        let doc = "paths:\n  /pet:\n    responses:\n      '200': ok\n  /user:\n    other: 1\n";
        let (doc, inserter) = insert(doc, "paths.*.responses.404", "missing");
        assert_eq!(inserter.created(), 1);
        let expected = "paths:\n  /pet:\n    responses:\n      '200': ok\n      '404': missing\n  /user:\n    other: 1\n";
        assert_eq!(doc, parse_yaml(expected).unwrap());
    }

    #[test]
    fn test_insert_one_branch_per_parent_at_same_depth() {
        let doc = "a:\n  p:\n    k1: 1\n    k2: 2\n  q:\n    k3: 3\n";
        let (doc, inserter) = insert(doc, "a.*.new", "v");
        assert_eq!(inserter.created(), 2);
        let expected = "a:\n  p:\n    k1: 1\n    k2: 2\n    new: v\n  q:\n    k3: 3\n    new: v\n";
        assert_eq!(doc, parse_yaml(expected).unwrap());
    }

    #[test]
    fn test_insert_does_not_clobber_existing_sibling() {
        let (doc, inserter) = insert("r:\n  '200': a\n  '404': b\n", "r.404", "c");
        assert_eq!(inserter.created(), 0);
        assert_eq!(inserter.replaced(), 1);
        assert_eq!(doc, parse_yaml("r:\n  '200': a\n  '404': c\n").unwrap());
    }

    #[test]
    fn test_insert_skips_wildcard_branch() {
        let (doc, inserter) = insert("a: {}\n", "a.*.b", "v");
        assert_eq!(inserter.created(), 0);
        assert_eq!(doc, parse_yaml("a: {}\n").unwrap());
    }
}
