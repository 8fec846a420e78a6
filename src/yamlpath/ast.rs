//! YAML-path pattern types.

use regex::Regex;
use std::fmt;
use std::rc::Rc;

/// One segment of a YAML-path, matched in full against a mapping key.
#[derive(Debug, Clone)]
pub struct PathSegment {
    /// Segment text as written by the user (`*`, `paths`, `/pet.*`)
    pub(crate) raw: String,
    /// Anchored regex compiled from the segment (`*` becomes `.*`)
    pub(crate) regex: Regex,
    /// The single key this segment matches, if it is not a real pattern
    pub(crate) literal: Option<String>,
}

impl PathSegment {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The key this segment stands for when it has to be created.
    ///
    /// `None` for wildcards and regex segments, which match many keys.
    /// Escaped metacharacters (`\{id\}`) are unescaped.
    pub fn literal(&self) -> Option<&str> {
        self.literal.as_deref()
    }

    /// Returns true if the whole key matches this segment.
    pub fn is_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

impl PartialEq for PathSegment {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

/// A parsed YAML-path with a cursor.
///
/// The segment list is immutable and shared between clones; only the cursor
/// moves. Cloning a `YamlPath` is therefore cheap, and each clone has its own
/// independent cursor, which is what the matcher relies on when it descends
/// into sibling branches.
#[derive(Debug, Clone)]
pub struct YamlPath {
    pub(crate) original: String,
    pub(crate) delimiter: String,
    pub(crate) segments: Rc<[PathSegment]>,
    pub(crate) cursor: usize,
}

impl YamlPath {
    /// The trimmed path text this pattern was built from.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Total number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Index of the current segment.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns true while there is a current (unconsumed) segment.
    pub fn has_next(&self) -> bool {
        self.cursor < self.segments.len()
    }

    /// The current segment, or `None` once the path is exhausted.
    pub fn current(&self) -> Option<&PathSegment> {
        self.segments.get(self.cursor)
    }

    /// Moves the cursor one segment forward. Returns false if already exhausted.
    pub fn advance(&mut self) -> bool {
        if self.has_next() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Returns a copy advanced by one segment; `self` is untouched.
    pub fn advanced(&self) -> Self {
        let mut next = self.clone();
        next.advance();
        next
    }

    /// Returns true if `key` matches the current segment.
    pub fn is_match(&self, key: &str) -> bool {
        self.current().is_some_and(|seg| seg.is_match(key))
    }

    /// Consumed segments (before the cursor), joined with the delimiter.
    pub fn prefix(&self) -> String {
        self.join(&self.segments[..self.cursor.min(self.segments.len())])
    }

    /// Segments after the current one, joined with the delimiter.
    pub fn suffix(&self) -> String {
        let start = (self.cursor + 1).min(self.segments.len());
        self.join(&self.segments[start..])
    }

    /// The current segment and every segment after it.
    pub fn remaining_segments(&self) -> &[PathSegment] {
        &self.segments[self.cursor.min(self.segments.len())..]
    }

    /// Raw text of the current segment and every segment after it.
    pub fn remaining(&self) -> Vec<&str> {
        self.remaining_segments()
            .iter()
            .map(PathSegment::raw)
            .collect()
    }

    /// Same segments and same cursor position.
    pub fn equivalent(&self, other: &YamlPath) -> bool {
        self.cursor == other.cursor && self.segments[..] == other.segments[..]
    }

    fn join(&self, segments: &[PathSegment]) -> String {
        segments
            .iter()
            .map(PathSegment::raw)
            .collect::<Vec<_>>()
            .join(&self.delimiter)
    }
}

impl fmt::Display for YamlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
