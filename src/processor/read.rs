//! Read: collect the values at every end-to-end match.

use super::{EntryProcessor, MatchSite, ProcessorError};
use crate::document::node::YamlValue;

#[derive(Debug, Default)]
pub struct ReadProcessor {
    values: Vec<YamlValue>,
}

impl ReadProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matched values, in document order.
    pub fn values(&self) -> &[YamlValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<YamlValue> {
        self.values
    }
}

impl EntryProcessor for ReadProcessor {
    fn on_end2end_match(&mut self, site: &MatchSite<'_>) -> Result<(), ProcessorError> {
        self.values.push(site.value.clone());
        Ok(())
    }
}
