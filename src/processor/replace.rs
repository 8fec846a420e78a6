//! Replace: overwrite the value of every end-to-end matched key.

use super::{EntryProcessor, MatchSite, PendingKey, ProcessorError};
use crate::document::node::YamlValue;
use crate::yamlpath::YamlPath;
use tracing::debug;

#[derive(Debug)]
pub struct ReplaceProcessor {
    replacement: YamlValue,
    pending: Vec<PendingKey>,
    replaced: usize,
}

impl ReplaceProcessor {
    pub fn new(replacement: YamlValue) -> Self {
        Self {
            replacement,
            pending: Vec::new(),
            replaced: 0,
        }
    }

    pub fn replaced(&self) -> usize {
        self.replaced
    }
}

impl EntryProcessor for ReplaceProcessor {
    fn on_end2end_match(&mut self, site: &MatchSite<'_>) -> Result<(), ProcessorError> {
        self.pending.push(PendingKey::from_site(site));
        Ok(())
    }

    fn at_end_of_input(
        &mut self,
        doc: &mut YamlValue,
        _pattern: &YamlPath,
    ) -> Result<(), ProcessorError> {
        for PendingKey { parent, key } in self.pending.drain(..) {
            let Some(map) = parent.resolve_mut(doc).and_then(YamlValue::as_object_mut) else {
                continue;
            };
            // Each location gets its own copy of the replacement
            if let Some(slot) = map.get_mut(&key) {
                *slot = self.replacement.clone();
                debug!(parent = %parent, key = %key, "replaced");
                self.replaced += 1;
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

    #[test]
    fn test_replace_keeps_key_position() {
        let mut doc = parse_yaml("a: 1\nb: 2\nc: 3\n").unwrap();
        let pattern = Parser::parse("b").unwrap();
        let mut replacer = ReplaceProcessor::new(YamlValue::from("two"));
        Matcher::new(&mut replacer).run(&mut doc, &pattern).unwrap();

        assert_eq!(doc, parse_yaml("a: 1\nb: two\nc: 3\n").unwrap());
        assert_eq!(replacer.replaced(), 1);
    }

    #[test]
    fn test_replaced_copies_are_independent() {
        let mut doc = parse_yaml("x:\n  a: 1\n  b: 2\n").unwrap();
        let pattern = Parser::parse("x.*").unwrap();
        let mut replacer = ReplaceProcessor::new(parse_yaml("inner: [1]").unwrap());
        Matcher::new(&mut replacer).run(&mut doc, &pattern).unwrap();
        assert_eq!(replacer.replaced(), 2);

        let x = doc.as_object_mut().unwrap().get_mut("x").unwrap();
        let x = x.as_object_mut().unwrap();
        if let Some(YamlValue::Object(a)) = x.get_mut("a") {
            a.insert("extra".to_string(), YamlValue::from(true));
        }
        assert_eq!(x["b"], parse_yaml("inner: [1]").unwrap());
        assert_ne!(x["a"], x["b"]);
    }

    #[test]
    fn test_replace_no_match_leaves_document() {
        let mut doc = parse_yaml("a: 1\n").unwrap();
        let before = doc.clone();
        let pattern = Parser::parse("zzz").unwrap();
        let mut replacer = ReplaceProcessor::new(YamlValue::Null);
        Matcher::new(&mut replacer).run(&mut doc, &pattern).unwrap();
        assert_eq!(doc, before);
    }
}
