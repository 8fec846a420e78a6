//! Error types for YAML-path construction.

use thiserror::Error;

/// Errors that can occur while building a [`YamlPath`](super::YamlPath).
///
/// Only construction can fail; once a path exists, every cursor operation
/// on it is infallible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YamlPathError {
    /// The path was empty after trimming.
    #[error("YAML-path is empty")]
    EmptyPath,
    /// The delimiter was the empty string.
    #[error("YAML-path delimiter must not be empty")]
    EmptyDelimiter,
    /// A segment is not a valid regular expression.
    #[error("Invalid YAML-path segment '{segment}' at position {position}: {message}")]
    InvalidSegment {
        segment: String,
        position: usize,
        message: String,
    },
}
