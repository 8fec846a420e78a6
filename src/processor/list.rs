//! List: collect the dotted path of every end-to-end match.

use super::{EntryProcessor, MatchSite, ProcessorError};

#[derive(Debug, Default)]
pub struct ListProcessor {
    paths: Vec<String>,
}

impl ListProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<String> {
        self.paths
    }
}

impl EntryProcessor for ListProcessor {
    fn on_end2end_match(&mut self, site: &MatchSite<'_>) -> Result<(), ProcessorError> {
        self.paths.push(site.trail.join(site.pattern.delimiter()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::parse_yaml;
    use crate::yamlpath::{Matcher, Parser};

    #[test]
    fn test_list_uses_pattern_delimiter() {
        let mut doc = parse_yaml("a:\n  b.c: 1\n  d: 2\n").unwrap();
        let pattern = Parser::parse_with_delimiter("a/*", "/").unwrap();
        let mut lister = ListProcessor::new();
        Matcher::new(&mut lister).run(&mut doc, &pattern).unwrap();
        assert_eq!(lister.into_paths(), vec!["a/b.c", "a/d"]);
    }

    #[test]
    fn test_list_through_sequences_omits_indices() {
        let mut doc = parse_yaml("servers:\n  - url: a\n  - url: b\n").unwrap();
        let pattern = Parser::parse("servers.url").unwrap();
        let mut lister = ListProcessor::new();
        Matcher::new(&mut lister).run(&mut doc, &pattern).unwrap();
        assert_eq!(lister.paths(), ["servers.url", "servers.url"]);
    }
}
