//! Wikilink and embed extraction
//!
//! Handles all the usual bracket forms:
//! - `[[Note]]`
//! - `[[Note|Alias]]`
//! - `[[Note#Heading]]`
//! - `[[Note#^block]]`
//! - `![[Note]]` (embed)
//!
//! An unterminated `[[` never matches, and a target that is empty after
//! trimming is not a link.

use crate::scan::{Zone, scan};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static WIKILINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!?)\[\[([^\]\|#]+)(?:#\^([A-Za-z0-9_-]+))?(?:#([^\]\|]+))?(?:\|([^\]]+))?\]\]")
        .expect("valid wikilink pattern")
});

/// One wikilink or embed found in note content
///
/// `heading` and `block_id` are mutually exclusive: a link addresses a
/// heading, a block, or the whole note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Link target as written, trimmed, without `.md`-normalization
    pub target: String,

    /// Heading fragment from `[[target#heading]]`
    pub heading: Option<String>,

    /// Block fragment from `[[target#^block]]`
    pub block_id: Option<String>,

    /// Display alias from `[[target|alias]]`
    pub alias: Option<String>,

    /// `true` for `![[...]]` embeds
    pub embed: bool,

    /// 1-based content line the link starts on
    pub line: usize,
}

/// All links on a single line, left to right, non-overlapping.
pub(crate) fn links_in_line(text: &str, line: usize) -> impl Iterator<Item = Link> + '_ {
    WIKILINK.captures_iter(text).filter_map(move |found| {
        let target = found.get(2)?.as_str().trim();
        if target.is_empty() {
            return None;
        }

        Some(Link {
            target: target.to_string(),
            heading: found.get(4).map(|m| m.as_str().trim().to_string()),
            block_id: found.get(3).map(|m| m.as_str().to_string()),
            alias: found.get(5).map(|m| m.as_str().trim().to_string()),
            embed: found.get(1).is_some_and(|m| m.as_str() == "!"),
            line,
        })
    })
}

/// Extract every wikilink and embed from the note body
///
/// Frontmatter and fenced code are skipped. Records come back in line
/// order, then column order within a line.
///
/// # Example
/// ```
/// use notevault::parse::parse_links;
///
/// let content = "See [[Physics]] and ![[Math|Mathematics]]";
/// let links = parse_links(content);
///
/// assert_eq!(links[0].target, "Physics");
/// assert!(!links[0].embed);
/// assert_eq!(links[1].target, "Math");
/// assert_eq!(links[1].alias.as_deref(), Some("Mathematics"));
/// assert!(links[1].embed);
/// ```
#[must_use]
pub fn parse_links(content: &str) -> Vec<Link> {
    scan(content)
        .filter(|line| line.zone == Zone::Body)
        .flat_map(|line| links_in_line(line.text, line.number))
        .collect()
}
