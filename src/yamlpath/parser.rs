//! YAML-path string parser.

use super::ast::{PathSegment, YamlPath};
use super::error::YamlPathError;
use regex::Regex;
use std::rc::Rc;

/// Default segment delimiter.
pub const DEFAULT_DELIMITER: &str = ".";

/// Parser for YAML-path strings.
///
/// The delimiter is a literal string, not a regex: `|` or `.` split only on
/// themselves. Trails are joined back with the same string, so a parsed path
/// always reassembles into its input. Segments are regexes.
pub struct Parser<'a> {
    input: &'a str,
    delimiter: &'a str,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given path and delimiter.
    pub fn new(input: &'a str, delimiter: &'a str) -> Self {
        Self { input, delimiter }
    }

    /// Parses a path using the default `.` delimiter.
    pub fn parse(input: &str) -> Result<YamlPath, YamlPathError> {
        Parser::new(input, DEFAULT_DELIMITER).parse_path()
    }

    /// Parses a path using a custom delimiter.
    pub fn parse_with_delimiter(input: &str, delimiter: &str) -> Result<YamlPath, YamlPathError> {
        Parser::new(input, delimiter).parse_path()
    }

    fn parse_path(&self) -> Result<YamlPath, YamlPathError> {
        if self.delimiter.is_empty() {
            return Err(YamlPathError::EmptyDelimiter);
        }

        let trimmed = self.input.trim();
        if trimmed.is_empty() {
            return Err(YamlPathError::EmptyPath);
        }

        let segments = trimmed
            .split(self.delimiter)
            .enumerate()
            .map(|(position, raw)| Self::compile_segment(raw, position))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(YamlPath {
            original: trimmed.to_string(),
            delimiter: self.delimiter.to_string(),
            segments: Rc::from(segments),
            cursor: 0,
        })
    }

    /// Compiles one segment; a bare `*` means "any single key".
    fn compile_segment(raw: &str, position: usize) -> Result<PathSegment, YamlPathError> {
        let pattern = if raw == "*" { ".*" } else { raw };

        // Anchor so the whole key must match, not a substring of it
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
            YamlPathError::InvalidSegment {
                segment: raw.to_string(),
                position,
                message: e.to_string(),
            }
        })?;

        Ok(PathSegment {
            raw: raw.to_string(),
            regex,
            literal: literal_key(raw),
        })
    }
}

/// Returns the only key `raw` can match, or `None` if it contains regex
/// metacharacters.
fn literal_key(raw: &str) -> Option<String> {
    let mut literal = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(escaped) if escaped.is_ascii_punctuation() => literal.push(escaped),
                _ => return None,
            },
            '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' => {
                return None
            }
            _ => literal.push(ch),
        }
    }

    Some(literal)
}

impl YamlPath {
    /// Parses `path` split on `delimiter`.
    pub fn parse(path: &str, delimiter: &str) -> Result<YamlPath, YamlPathError> {
        Parser::parse_with_delimiter(path, delimiter)
    }
}
