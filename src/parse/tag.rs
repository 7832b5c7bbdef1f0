//! Tag extraction, inline and frontmatter
//!
//! Inline: `#` preceded by start-of-line or whitespace, name starting with
//! a letter or underscore. `/` nests (`#area/physics` is one tag).
//! Frontmatter: values of the `tags` key, block list, flow list or single
//! scalar, each reported at the file-absolute line it sits on.

use crate::parse::frontmatter::keyed_lines;
use crate::scan::{Zone, scan};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static INLINE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)#([A-Za-z_][A-Za-z0-9_/-]*)").expect("valid inline tag pattern")
});

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-\s+(.+)$").expect("valid list item pattern"));

/// One tag occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name without the leading `#`
    pub name: String,

    /// 1-based content line the tag appears on
    pub line: usize,
}

/// Inline tags on a single line.
pub(crate) fn tags_in_line(text: &str, line: usize) -> impl Iterator<Item = Tag> + '_ {
    INLINE_TAG.captures_iter(text).filter_map(move |found| {
        Some(Tag {
            name: found.get(1)?.as_str().to_string(),
            line,
        })
    })
}

/// Strip quotes and an optional leading `#` from a frontmatter tag value.
fn clean_value(raw: &str) -> Option<String> {
    let trimmed = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim_start_matches('#')
        .trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn frontmatter_tags(content: &str) -> Vec<Tag> {
    let mut tags = Vec::new();

    for keyed in keyed_lines(content) {
        if keyed.key != "tags" {
            continue;
        }

        if let Some(rest) = keyed.text.trim_start().strip_prefix("tags") {
            // The key line itself: scalar or flow list after the colon
            let Some(value) = rest.trim_start().strip_prefix(':') else {
                continue;
            };
            let value = value.trim();

            if let Some(flow) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
                tags.extend(flow.split(',').filter_map(clean_value).map(|name| Tag {
                    name,
                    line: keyed.number,
                }));
            } else if let Some(name) = clean_value(value) {
                tags.push(Tag {
                    name,
                    line: keyed.number,
                });
            }
        } else if let Some(item) = LIST_ITEM.captures(keyed.text).and_then(|c| c.get(1)) {
            if let Some(name) = clean_value(item.as_str()) {
                tags.push(Tag {
                    name,
                    line: keyed.number,
                });
            }
        }
    }

    tags
}

/// Extract every tag from the note, frontmatter `tags` values included
///
/// Records come back in line order; duplicates are kept. A heading marker
/// (`# ` at line start) never produces a tag, and fenced code is skipped.
///
/// # Example
/// ```
/// use notevault::parse::parse_content_tags;
///
/// let content = "---\ntags:\n  - project\n---\nWork on #area/physics today";
/// let names: Vec<_> = parse_content_tags(content)
///     .into_iter()
///     .map(|tag| tag.name)
///     .collect();
///
/// assert_eq!(names, ["project", "area/physics"]);
/// ```
#[must_use]
pub fn parse_content_tags(content: &str) -> Vec<Tag> {
    let inline = scan(content)
        .filter(|line| line.zone == Zone::Body)
        .flat_map(|line| tags_in_line(line.text, line.number));

    // Frontmatter always sits above the body, so chaining keeps line order
    let mut tags = frontmatter_tags(content);
    tags.extend(inline);
    tags
}
