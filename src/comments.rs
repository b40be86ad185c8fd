//! Leading-comment extraction and formatting for YAML keys.
//!
//! YAML comments are discarded by the value decoder, so descriptions are
//! recovered from the source text instead: the comment attached to a key is
//! the contiguous run of full-line `#` comments immediately above the key
//! line, with no blank line in between. Attachment is computed for every
//! top-level key and for every input key nested under `spec.inputs`.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// An unindented mapping key line, e.g. `spec:` or `my-job: {}`.
/// Quoted keys may contain colons; bare keys end at the first one.
static RE_KEY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^("[^"]*"|'[^']*'|[^\s#][^:]*):(?:\s|$)"#).unwrap());

/// Format a block of comment lines as plain text.
///
/// Strips exactly the `#` marker and at most one following space per line;
/// nothing else is removed, so a `#` later in a line (e.g. a markdown
/// anchor link) survives. An empty block yields an empty string.
pub fn format_comment(comment: &str) -> String {
    comment
        .lines()
        .map(|line| {
            let line = line.strip_prefix('#').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Comments attached to the keys of one component document.
#[derive(Debug, Default)]
pub struct CommentMap {
    top_level: HashMap<String, String>,
    inputs: HashMap<String, String>,
}

impl CommentMap {
    /// Scan a separator-stripped document once and record the formatted
    /// comment block attached to each key of interest.
    pub fn scan(content: &str) -> Self {
        let lines: Vec<&str> = content.lines().collect();
        let mut map = CommentMap::default();

        for (i, line) in lines.iter().enumerate() {
            if let Some(caps) = RE_KEY_LINE.captures(line) {
                if let Some(comment) = attached_comment(&lines, i) {
                    map.top_level
                        .insert(unquote(caps[1].trim_end()).to_string(), comment);
                }
            }
        }

        map.scan_input_comments(&lines);
        map
    }

    /// Comment attached to a top-level key.
    pub fn top_level(&self, key: &str) -> Option<&str> {
        self.top_level.get(key).map(String::as_str)
    }

    /// Comment attached to an input key under `spec.inputs`.
    pub fn input(&self, key: &str) -> Option<&str> {
        self.inputs.get(key).map(String::as_str)
    }

    fn scan_input_comments(&mut self, lines: &[&str]) {
        let Some(spec_idx) = lines.iter().position(|line| {
            RE_KEY_LINE
                .captures(line)
                .is_some_and(|caps| unquote(caps[1].trim_end()) == "spec")
        }) else {
            return;
        };

        // The spec block ends at the next top-level key line.
        let spec_end = (spec_idx + 1..lines.len())
            .find(|&i| RE_KEY_LINE.is_match(lines[i]))
            .unwrap_or(lines.len());

        let Some(inputs_idx) =
            (spec_idx + 1..spec_end).find(|&i| lines[i].trim() == "inputs:")
        else {
            return;
        };
        let inputs_indent = indent_of(lines[inputs_idx]);

        // The first input key fixes the indentation level for the block;
        // deeper lines are field declarations, shallower lines end it.
        let mut key_indent = None;
        for i in inputs_idx + 1..spec_end {
            let line = lines[i];
            if line.trim().is_empty() || is_comment_line(line) {
                continue;
            }
            let indent = indent_of(line);
            if indent <= inputs_indent {
                break;
            }
            let level = *key_indent.get_or_insert(indent);
            if indent != level {
                continue;
            }
            if let Some(caps) = RE_KEY_LINE.captures(line.trim_start()) {
                if let Some(comment) = attached_comment(lines, i) {
                    self.inputs
                        .insert(unquote(caps[1].trim_end()).to_string(), comment);
                }
            }
        }
    }
}

/// The formatted comment block directly above line `index`, if any.
fn attached_comment(lines: &[&str], index: usize) -> Option<String> {
    let mut start = index;
    while start > 0 && is_comment_line(lines[start - 1]) {
        start -= 1;
    }
    if start == index {
        return None;
    }
    let block: Vec<&str> = lines[start..index].iter().map(|l| l.trim_start()).collect();
    Some(format_comment(&block.join("\n")))
}

fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn unquote(key: &str) -> &str {
    key.strip_prefix('"')
        .and_then(|k| k.strip_suffix('"'))
        .or_else(|| key.strip_prefix('\'').and_then(|k| k.strip_suffix('\'')))
        .unwrap_or(key)
}
