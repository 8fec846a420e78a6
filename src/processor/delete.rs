//! Delete: remove every end-to-end matched key from its parent mapping.

use super::{EntryProcessor, MatchSite, PendingKey, ProcessorError};
use crate::document::node::YamlValue;
use crate::yamlpath::YamlPath;
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct DeleteProcessor {
    pending: Vec<PendingKey>,
    deleted: usize,
}

impl DeleteProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys actually removed.
    pub fn deleted(&self) -> usize {
        self.deleted
    }
}

impl EntryProcessor for DeleteProcessor {
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
            match parent.resolve_mut(doc).and_then(YamlValue::as_object_mut) {
                Some(map) => {
                    if map.shift_remove(&key).is_some() {
                        debug!(parent = %parent, key = %key, "deleted");
                        self.deleted += 1;
                    }
                }
                // An earlier deletion may have removed an enclosing key
                None => warn!(parent = %parent, key = %key, "parent vanished before delete"),
            }
        }
        Ok(())
    }
}
