//! Frontmatter split and YAML mapping parse
//!
//! Frontmatter is the `---`-delimited block at the very top of a note.
//! Malformed YAML never fails a note: it degrades to "no frontmatter",
//! the same way an absent block does.

use crate::scan::{Zone, frontmatter_close_line, scan};
use regex::Regex;
use std::sync::LazyLock;

static TOP_LEVEL_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_-]+)\s*:").expect("valid top-level key pattern"));

/// Raw YAML text of the frontmatter block, delimiters excluded.
pub(crate) fn raw_frontmatter(content: &str) -> Option<&str> {
    let close = frontmatter_close_line(content)?;

    let mut offset = 0;
    let mut start = None;
    for (idx, line) in content.split_inclusive('\n').enumerate() {
        let number = idx + 1;
        if number == 2 {
            start = Some(offset);
        }
        if number == close {
            return Some(&content[start.unwrap_or(offset)..offset]);
        }
        offset += line.len();
    }

    // close == 2 with no line in between
    Some("")
}

/// Note content with the frontmatter block (delimiters included) removed.
///
/// Leading blank lines after the closing `---` are kept; body line numbers
/// stay file-absolute through the scanner, not through this slice.
#[must_use]
pub fn body(content: &str) -> &str {
    let Some(close) = frontmatter_close_line(content) else {
        return content;
    };

    let mut offset = 0;
    for (idx, line) in content.split_inclusive('\n').enumerate() {
        offset += line.len();
        if idx + 1 == close {
            return &content[offset..];
        }
    }

    ""
}

/// Parse the frontmatter block into a YAML mapping
///
/// Returns `None` when the note has no frontmatter, when the block is not
/// terminated, when the YAML is malformed, or when the document is not a
/// mapping at the top level.
///
/// # Example
/// ```
/// use notevault::parse::parse_frontmatter;
///
/// let content = "---\ntitle: Physics\n---\nbody";
/// let mapping = parse_frontmatter(content).unwrap();
/// assert_eq!(mapping["title"], "Physics");
/// ```
#[must_use]
pub fn parse_frontmatter(content: &str) -> Option<serde_yml::Mapping> {
    let raw = raw_frontmatter(content)?;

    match serde_yml::from_str::<serde_yml::Value>(raw) {
        Ok(serde_yml::Value::Mapping(mapping)) => Some(mapping),
        Ok(_) => None,
        Err(_error) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(%_error, "Malformed frontmatter, treating as absent");

            None
        }
    }
}

/// One frontmatter line attributed to the top-level key it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeyedLine<'a> {
    /// 1-based file-absolute line number
    pub number: usize,
    /// Top-level key in effect on this line, `""` before the first key
    pub key: &'a str,
    /// Raw line text
    pub text: &'a str,
}

/// Frontmatter lines (delimiters excluded) tagged with the top-level key
/// in effect on each line.
///
/// This is a line-oriented view, not a YAML parse: it exists so that tag
/// and link records found inside frontmatter can carry real file-absolute
/// line numbers, which a value-level YAML tree cannot give back.
pub(crate) fn keyed_lines(content: &str) -> impl Iterator<Item = KeyedLine<'_>> {
    let close = frontmatter_close_line(content).unwrap_or(0);
    let mut key = "";

    scan(content)
        .filter(move |line| {
            line.zone == Zone::Frontmatter && line.number > 1 && line.number < close
        })
        .map(move |line| {
            if let Some(found) = TOP_LEVEL_KEY.captures(line.text).and_then(|c| c.get(1)) {
                key = found.as_str();
            }

            KeyedLine {
                number: line.number,
                key,
                text: line.text,
            }
        })
}
