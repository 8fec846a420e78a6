//! Batch script errors.

use crate::command::{CommandError, ReferenceError};
use thiserror::Error;

/// What went wrong on a batch line.
#[derive(Debug, Error)]
pub enum BatchErrorKind {
    /// The statement is missing an argument or has the wrong form.
    #[error("{0}")]
    Malformed(String),

    #[error("'foreach' has no matching 'end'")]
    UnmatchedForeach,

    #[error("'end' without a matching 'foreach'")]
    UnexpectedEnd,

    #[error("foreach needs a sequence of scalars or mappings, or a mapping of scalars; found {found}")]
    ForeachShape { found: String },

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("{0}")]
    Io(String),
}

/// A batch failure, located at a line of a script file.
///
/// Any failure aborts the whole run.
#[derive(Debug, Error)]
#[error("{file}:{line}: {kind}\n    {text}")]
pub struct BatchFileError {
    pub file: String,
    /// 1-based line number, 0 when the script itself could not be read
    pub line: usize,
    pub text: String,
    pub kind: BatchErrorKind,
}
