//! Error types for command dispatch and reference resolution.

use crate::processor::ProcessorError;
use crate::yamlpath::YamlPathError;
use thiserror::Error;

/// Errors raised while turning a reference (`@file`, `!memory`, inline
/// data) into a document, or while saving one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Cannot access '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Cannot parse '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Nothing stored in memory under '{name}'")]
    MissingMemory { name: String },

    /// Only `.json`, `.yaml` and `.yml` files (optionally gzipped) can be
    /// referenced as documents.
    #[error("Unsupported file type for '{path}': expected .json, .yaml or .yml")]
    UnsupportedFile { path: String },

    #[error("Properties from '{reference}' must be a mapping, found {found}")]
    PropertiesShape {
        reference: String,
        found: &'static str,
    },
}

/// Errors raised by a single command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Path(#[from] YamlPathError),

    #[error(transparent)]
    Processor(#[from] ProcessorError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// The command line could not be tokenized or did not fit the grammar.
    #[error("{0}")]
    Usage(String),
}
