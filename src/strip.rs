//! YAML document separator stripping.
//!
//! Component files commonly concatenate two documents (the `spec` document
//! and the jobs document) separated by `---` / `...` markers. Blanking the
//! marker lines lets the concatenation decode as a single top-level mapping
//! while keeping line positions (and therefore comment adjacency) intact.

use regex::Regex;
use std::sync::LazyLock;

/// A whole line consisting solely of a document-start or document-end
/// marker. The dots are escaped so an arbitrary three-character line
/// is not mistaken for a marker.
static RE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(---|\.\.\.)$").unwrap());

/// Blank every whole-line `---` / `...` marker.
///
/// Lines that merely contain the sequences mid-line (`key: --- value ...`)
/// are left untouched.
pub fn strip_document_separators(content: &str) -> String {
    RE_SEPARATOR.replace_all(content, "").into_owned()
}
