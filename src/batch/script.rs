//! Batch script model.
//!
//! A script is a shared, immutable list of statement lines plus a window
//! (`start..end`) and a position inside it. The body of a `foreach` is just
//! another window over the same lines, so replaying it for each iteration
//! only copies three indices.

use super::statement::{END, FOREACH};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// One statement line of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-based line number in the source file
    pub number: usize,
    /// The line as written
    pub text: String,
    /// The line with comments and surrounding whitespace removed
    pub content: String,
}

impl ScriptLine {
    /// First word of the statement, lowercased.
    pub fn keyword(&self) -> String {
        self.content
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }
}

#[derive(Debug, Clone)]
pub struct BatchScript {
    source: Rc<str>,
    lines: Rc<[ScriptLine]>,
    start: usize,
    end: usize,
    position: usize,
}

impl BatchScript {
    /// Builds a script from text. Blank and comment lines are dropped.
    pub fn parse(source: impl Into<String>, text: &str) -> Self {
        let lines: Vec<ScriptLine> = text
            .lines()
            .enumerate()
            .filter_map(|(idx, raw)| {
                strip_comments(raw).map(|content| ScriptLine {
                    number: idx + 1,
                    text: raw.trim_end().to_string(),
                    content,
                })
            })
            .collect();
        let end = lines.len();

        Self {
            source: Rc::from(source.into()),
            lines: Rc::from(lines),
            start: 0,
            end,
            position: 0,
        }
    }

    /// Reads and parses a script file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch file {}", path.display()))?;
        Ok(Self::parse(path.display().to_string(), &text))
    }

    /// Name of the file (or other source) the lines came from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Directory of the source file, for resolving nested scripts.
    pub fn base_dir(&self) -> Option<&Path> {
        Path::new(&*self.source)
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
    }

    /// Number of statement lines in this window.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn lines(&self) -> &[ScriptLine] {
        &self.lines[self.start..self.end]
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.end
    }

    /// Returns the next line and moves past it.
    pub fn next_line(&mut self) -> Option<ScriptLine> {
        if self.is_finished() {
            return None;
        }
        let line = self.lines[self.position].clone();
        self.position += 1;
        Some(line)
    }

    pub fn rewind(&mut self) {
        self.position = self.start;
    }

    /// Splits off the body of a `foreach` whose line was just consumed.
    ///
    /// The matching `end` is found by depth counting. On success the body is
    /// returned as a rewound script and this script continues after the
    /// `end`; `None` means the loop is never closed.
    pub fn take_block(&mut self) -> Option<BatchScript> {
        let mut depth = 1usize;

        for idx in self.position..self.end {
            match self.lines[idx].keyword().as_str() {
                FOREACH => depth += 1,
                END => {
                    depth -= 1;
                    if depth == 0 {
                        let body = BatchScript {
                            source: Rc::clone(&self.source),
                            lines: Rc::clone(&self.lines),
                            start: self.position,
                            end: idx,
                            position: self.position,
                        };
                        self.position = idx + 1;
                        return Some(body);
                    }
                }
                _ => {}
            }
        }

        None
    }
}

/// Removes whole-line and trailing comments. Returns `None` if nothing is left.
///
/// Lines starting with `#`, `//` or `--` are comments. A `#` or `//` later in
/// the line starts a comment only when preceded by whitespace and outside a
/// quoted argument, so URLs, `${...}` tokens and quoted data survive. A quote
/// opens only at the start of a word.
pub fn strip_comments(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("//")
        || trimmed.starts_with("--")
    {
        return None;
    }

    let mut cut = trimmed.len();
    let mut prev_ws = false;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (idx, ch) in trimmed.char_indices() {
        if escaped {
            escaped = false;
        } else if let Some(open) = quote {
            if ch == open {
                quote = None;
            } else if ch == '\\' && open == '"' {
                escaped = true;
            }
        } else if prev_ws && (ch == '#' || trimmed[idx..].starts_with("//")) {
            cut = idx;
            break;
        } else if prev_ws && (ch == '\'' || ch == '"') {
            quote = Some(ch);
        }
        prev_ws = quote.is_none() && ch.is_whitespace();
    }

    let content = trimmed[..cut].trim_end();
    (!content.is_empty()).then(|| content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("   "), None);
        assert_eq!(strip_comments("# note"), None);
        assert_eq!(strip_comments("  // note"), None);
        assert_eq!(strip_comments("-- note"), None);
        assert_eq!(strip_comments("print hi # trailing"), Some("print hi".to_string()));
        assert_eq!(strip_comments("print hi // trailing"), Some("print hi".to_string()));
        assert_eq!(
            strip_comments("useAsInput @http://x/a#b.yaml"),
            Some("useAsInput @http://x/a#b.yaml".to_string())
        );
    }

    #[test]
    fn test_strip_comments_skips_quoted_arguments() {
        assert_eq!(
            strip_comments(r#"insert a '{"k": "v #1"}'"#),
            Some(r#"insert a '{"k": "v #1"}'"#.to_string())
        );
        assert_eq!(
            strip_comments(r#"replace a "x // y" # set a"#),
            Some(r#"replace a "x // y""#.to_string())
        );
        assert_eq!(
            strip_comments(r#"replace a "say \"hi # there\"" # note"#),
            Some(r#"replace a "say \"hi # there\"""#.to_string())
        );
        // An apostrophe inside a word does not open a quote
        assert_eq!(strip_comments("print it's # note"), Some("print it's".to_string()));
    }

    #[test]
    fn test_parse_keeps_line_numbers() {
        let script = BatchScript::parse("inline", "# header\n\nread a\n  print -  \n");
        let numbers: Vec<_> = script.lines().iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![3, 4]);
        assert_eq!(script.lines()[1].content, "print -");
        assert_eq!(script.lines()[1].text, "  print -");
        assert_eq!(script.len(), 2);
    }

    #[test]
    fn test_take_block_nested() {
        let text = "foreach\n  foreach\n    print x\n  end\n  print y\nend\nprint z\n";
        let mut script = BatchScript::parse("inline", text);
        assert_eq!(script.next_line().map(|l| l.keyword()), Some("foreach".to_string()));

        let body = script.take_block().unwrap();
        let body_lines: Vec<_> = body.lines().iter().map(|l| l.content.as_str()).collect();
        assert_eq!(body_lines, vec!["foreach", "print x", "end", "print y"]);

        assert_eq!(script.next_line().map(|l| l.content), Some("print z".to_string()));
        assert!(script.is_finished());
    }

    #[test]
    fn test_take_block_unmatched() {
        let mut script = BatchScript::parse("inline", "foreach\nforeach\nend\n");
        script.next_line();
        assert!(script.take_block().is_none());
    }

    #[test]
    fn test_rewind_replays_window() {
        let mut script = BatchScript::parse("inline", "foreach\na\nb\nend\n");
        script.next_line();
        let mut body = script.take_block().unwrap();
        assert_eq!(body.next_line().map(|l| l.content), Some("a".to_string()));
        assert_eq!(body.next_line().map(|l| l.content), Some("b".to_string()));
        assert!(body.next_line().is_none());

        body.rewind();
        assert_eq!(body.next_line().map(|l| l.number), Some(2));
    }

    #[test]
    fn test_base_dir() {
        let script = BatchScript::parse("scripts/main.batch", "");
        assert_eq!(script.base_dir(), Some(Path::new("scripts")));
        assert_eq!(BatchScript::parse("main.batch", "").base_dir(), None);
    }
}
