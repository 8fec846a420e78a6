//! Classification of batch lines into statements.

use super::error::BatchErrorKind;

pub(crate) const FOREACH: &str = "foreach";
pub(crate) const END: &str = "end";

/// One batch statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatement {
    /// `properties name=@file.properties` or `properties name=!memory`
    Properties { name: String, reference: String },
    /// `setProperty key=value`
    SetProperty { key: String, value: String },
    /// `print <expr>`
    Print(String),
    /// `saveTo <ref>`
    SaveTo(String),
    /// `useAsInput <ref>`
    UseAsInput(String),
    Foreach,
    End,
    /// `batch <path>`
    SubBatch(String),
    /// Anything else: a command line for the `YamlCommand` grammar
    Command { name: String, args: String },
}

impl BatchStatement {
    /// Classifies a comment-free statement line.
    pub fn parse(content: &str) -> Result<Self, BatchErrorKind> {
        let content = content.trim();
        let (word, rest) = match content.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (content, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "properties" => {
                let (name, reference) = split_assignment(word, rest)?;
                Ok(BatchStatement::Properties { name, reference })
            }
            "setproperty" => {
                let (key, value) = split_assignment(word, rest)?;
                Ok(BatchStatement::SetProperty { key, value })
            }
            "print" => Ok(BatchStatement::Print(rest.to_string())),
            "saveto" => Ok(BatchStatement::SaveTo(required(word, rest)?)),
            "useasinput" => Ok(BatchStatement::UseAsInput(required(word, rest)?)),
            "batch" => Ok(BatchStatement::SubBatch(required(word, rest)?)),
            FOREACH => no_arguments(word, rest, BatchStatement::Foreach),
            END => no_arguments(word, rest, BatchStatement::End),
            "" => Err(BatchErrorKind::Malformed("Empty statement".to_string())),
            _ => Ok(BatchStatement::Command {
                name: word.to_string(),
                args: rest.to_string(),
            }),
        }
    }

    /// The full command line of a generic command.
    pub fn command_line(&self) -> Option<String> {
        match self {
            BatchStatement::Command { name, args } if args.is_empty() => Some(name.clone()),
            BatchStatement::Command { name, args } => Some(format!("{} {}", name, args)),
            _ => None,
        }
    }
}

fn required(word: &str, rest: &str) -> Result<String, BatchErrorKind> {
    if rest.is_empty() {
        Err(BatchErrorKind::Malformed(format!("'{}' needs an argument", word)))
    } else {
        Ok(rest.to_string())
    }
}

fn no_arguments(
    word: &str,
    rest: &str,
    statement: BatchStatement,
) -> Result<BatchStatement, BatchErrorKind> {
    if rest.is_empty() {
        Ok(statement)
    } else {
        Err(BatchErrorKind::Malformed(format!(
            "'{}' takes no arguments, got '{}'",
            word, rest
        )))
    }
}

/// Splits `name=value`; both sides are trimmed and the name must not be empty.
fn split_assignment(word: &str, rest: &str) -> Result<(String, String), BatchErrorKind> {
    match rest.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(BatchErrorKind::Malformed(format!(
            "'{}' expects name=value, got '{}'",
            word, rest
        ))),
    }
}
