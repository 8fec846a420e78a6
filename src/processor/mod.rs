//! Entry processors: one strategy per YAML-path operation.
//!
//! The [`Matcher`](crate::yamlpath::Matcher) walks a document and reports what
//! it sees through the [`EntryProcessor`] callbacks. The three match callbacks
//! only get a shared view of the document, so they can only *record* what they
//! want to do; anything that changes the tree happens in
//! [`EntryProcessor::at_end_of_input`], which receives the document mutably
//! once the walk is over.
//!
//! # Variants
//!
//! - [`read::ReadProcessor`]: collect matched values
//! - [`list::ListProcessor`]: collect dotted paths of matches
//! - [`table::TableProcessor`]: extract named fields as rows
//! - [`delete::DeleteProcessor`]: remove matched keys
//! - [`insert::InsertProcessor`]: add data at matched or missing paths
//! - [`replace::ReplaceProcessor`]: overwrite matched keys
//! - [`macros`]: `${...}` substitution over a whole tree (not matcher driven)

pub mod delete;
pub mod insert;
pub mod list;
pub mod macros;
pub mod read;
pub mod replace;
pub mod table;

use crate::document::node::YamlValue;
use crate::document::tree::NodePath;
use crate::yamlpath::YamlPath;
use thiserror::Error;

pub use delete::DeleteProcessor;
pub use insert::InsertProcessor;
pub use list::ListProcessor;
pub use read::ReadProcessor;
pub use replace::ReplaceProcessor;
pub use table::TableProcessor;

/// A key that matched the current path segment.
#[derive(Debug)]
pub struct MatchSite<'a> {
    /// Location of the mapping that holds `key`
    pub parent: &'a NodePath,
    pub key: &'a str,
    pub value: &'a YamlValue,
    /// The pattern positioned at the segment that matched `key`
    pub pattern: &'a YamlPath,
    /// Keys matched so far, including `key`
    pub trail: &'a [String],
}

/// A key (or an empty mapping) that did not match the current segment.
#[derive(Debug)]
pub struct FailSite<'a> {
    pub parent: &'a NodePath,
    /// `None` when the mapping is empty or the node is not a mapping at all
    pub key: Option<&'a str>,
    /// The pattern positioned at the segment that failed
    pub pattern: &'a YamlPath,
    pub trail: &'a [String],
}

/// Errors raised by the matcher or by an entry processor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessorError {
    /// A node does not have the shape the operation needs.
    #[error("Cannot descend into {found} at '{path}' while matching '{pattern}'")]
    ShapeMismatch {
        path: String,
        found: &'static str,
        pattern: String,
    },
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Errors specific to the table operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("Field '{field}' not found under '{path}'")]
    MissingField { field: String, path: String },
    #[error("'{path}' has no sub-elements to build a table row from")]
    NoSubElements { path: String },
}

/// Callbacks invoked by the matcher.
///
/// Only `at_end_of_input` may change the document.
pub trait EntryProcessor {
    /// A key matched, and more segments remain.
    fn on_partial_match(&mut self, _site: &MatchSite<'_>) -> Result<(), ProcessorError> {
        Ok(())
    }

    /// A key matched the last segment, or descent stopped at a scalar.
    fn on_end2end_match(&mut self, site: &MatchSite<'_>) -> Result<(), ProcessorError>;

    /// A key did not match the current segment.
    fn on_match_fail(&mut self, _site: &FailSite<'_>) -> Result<(), ProcessorError> {
        Ok(())
    }

    /// Called once after the whole document was walked.
    fn at_end_of_input(
        &mut self,
        _doc: &mut YamlValue,
        _pattern: &YamlPath,
    ) -> Result<(), ProcessorError> {
        Ok(())
    }
}

/// A matched key, recorded for mutation after the walk.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingKey {
    pub parent: NodePath,
    pub key: String,
}

impl PendingKey {
    pub fn from_site(site: &MatchSite<'_>) -> Self {
        Self {
            parent: site.parent.clone(),
            key: site.key.to_string(),
        }
    }
}
