//! Walks a document against a [`YamlPath`], driving an [`EntryProcessor`].

use super::ast::YamlPath;
use crate::document::node::{YamlMap, YamlValue};
use crate::document::tree::{NodePath, PathStep};
use crate::processor::{EntryProcessor, FailSite, MatchSite, ProcessorError};
use tracing::{debug, trace, warn};

pub struct Matcher<'p, P: EntryProcessor> {
    processor: &'p mut P,
    strict_sequences: bool,
}

impl<'p, P: EntryProcessor> Matcher<'p, P> {
    pub fn new(processor: &'p mut P) -> Self {
        Matcher {
            processor,
            strict_sequences: true,
        }
    }

    /// When false, a sequence element that is not a mapping is skipped with a
    /// warning instead of aborting the operation.
    pub fn strict_sequences(mut self, strict: bool) -> Self {
        self.strict_sequences = strict;
        self
    }

    /// Matches `pattern` against `doc` and lets the processor finish.
    ///
    /// The walk only reads the document; `at_end_of_input` runs exactly once
    /// afterwards with mutable access. Returns whether any end-to-end match
    /// was found. An exhausted pattern matches nothing and skips both phases.
    pub fn run(&mut self, doc: &mut YamlValue, pattern: &YamlPath) -> Result<bool, ProcessorError> {
        if !pattern.has_next() {
            return Ok(false);
        }

        let mut parent = NodePath::root();
        let mut trail = Vec::new();
        let matched = match &*doc {
            YamlValue::Object(map) => self.match_map(map, pattern, &mut parent, &mut trail)?,
            YamlValue::Array(items) => {
                self.match_sequence(items, pattern, &mut parent, &mut trail)?
            }
            other => {
                debug!(found = other.type_name(), "document root is a scalar, nothing to match");
                false
            }
        };

        debug!(pattern = %pattern, matched, "walk finished");
        self.processor.at_end_of_input(doc, pattern)?;
        Ok(matched)
    }

    fn match_map(
        &mut self,
        map: &YamlMap,
        pattern: &YamlPath,
        parent: &mut NodePath,
        trail: &mut Vec<String>,
    ) -> Result<bool, ProcessorError> {
        let Some(segment) = pattern.current() else {
            return Ok(false);
        };

        if map.is_empty() {
            self.processor.on_match_fail(&FailSite {
                parent,
                key: None,
                pattern,
                trail,
            })?;
            return Ok(false);
        }

        let mut matched = false;
        for (key, value) in map {
            if !segment.is_match(key) {
                trace!(key = %key, segment = segment.raw(), "no match");
                self.processor.on_match_fail(&FailSite {
                    parent,
                    key: Some(key.as_str()),
                    pattern,
                    trail,
                })?;
                continue;
            }

            trail.push(key.clone());
            let next = pattern.advanced();

            match value {
                YamlValue::Object(_) | YamlValue::Array(_) if next.has_next() => {
                    trace!(key = %key, remaining = %next.suffix(), "partial match");
                    self.processor.on_partial_match(&MatchSite {
                        parent,
                        key,
                        value,
                        pattern,
                        trail,
                    })?;

                    parent.push(PathStep::key(key.as_str()));
                    let result = match value {
                        YamlValue::Object(child) => self.match_map(child, &next, parent, trail),
                        YamlValue::Array(items) => {
                            self.match_sequence(items, &next, parent, trail)
                        }
                        _ => Ok(false),
                    };
                    parent.pop();
                    matched |= result?;
                }
                // Last segment consumed, or nothing below to descend into
                _ => {
                    trace!(trail = %trail.join(pattern.delimiter()), "end-to-end match");
                    self.processor.on_end2end_match(&MatchSite {
                        parent,
                        key,
                        value,
                        pattern,
                        trail,
                    })?;
                    matched = true;
                }
            }

            trail.pop();
        }

        Ok(matched)
    }

    /// Every mapping element is matched with the same pattern.
    fn match_sequence(
        &mut self,
        items: &[YamlValue],
        pattern: &YamlPath,
        parent: &mut NodePath,
        trail: &mut Vec<String>,
    ) -> Result<bool, ProcessorError> {
        let mut matched = false;

        for (idx, item) in items.iter().enumerate() {
            match item {
                YamlValue::Object(child) => {
                    parent.push(PathStep::Index(idx));
                    let result = self.match_map(child, pattern, parent, trail);
                    parent.pop();
                    matched |= result?;
                }
                other => {
                    let location = parent.child(PathStep::Index(idx));
                    self.processor.on_match_fail(&FailSite {
                        parent: &location,
                        key: None,
                        pattern,
                        trail,
                    })?;

                    if self.strict_sequences {
                        return Err(ProcessorError::ShapeMismatch {
                            path: location.to_string(),
                            found: other.type_name(),
                            pattern: pattern.as_str().to_string(),
                        });
                    }
                    warn!(
                        path = %location,
                        found = other.type_name(),
                        "skipping sequence element that is not a mapping"
                    );
                }
            }
        }

        Ok(matched)
    }
}
