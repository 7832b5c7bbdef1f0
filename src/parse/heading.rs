//! ATX heading extraction and slug generation

use crate::parse::block_id::strip_trailing_block_id;
use crate::scan::{Zone, scan};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static ATX_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(#{1,6}) +(.*)$").expect("valid heading pattern"));

/// One ATX heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level, 1 through 6
    pub level: u8,

    /// Heading text with closing `#` runs and a trailing `^block-id` removed
    pub text: String,

    /// 1-based content line
    pub line: usize,

    /// URL-ish anchor, unique within the note (`-2`, `-3` suffixes)
    pub slug: String,
}

/// Lowercase, collapse every run outside `[a-z0-9]` into a single `-`,
/// trim `-` from both ends.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Remove a CommonMark-style closing sequence (` ###`) from heading text.
fn strip_closing_hashes(text: &str) -> &str {
    let trimmed = text.trim_end();
    let without = trimmed.trim_end_matches('#');

    if without.len() == trimmed.len() {
        return trimmed;
    }

    // Closing hashes count only when separated from the text by whitespace
    if without.is_empty() || without.ends_with(char::is_whitespace) {
        without.trim_end()
    } else {
        trimmed
    }
}

/// Extract every ATX heading from the note body
///
/// Up to 3 leading spaces of indent are tolerated. Setext headings are not
/// recognized. Duplicate slugs within a note are disambiguated with `-2`,
/// `-3` and so on, second occurrence first.
///
/// # Example
/// ```
/// use notevault::parse::parse_content_headings;
///
/// let content = "# Intro\n## Intro\ntext";
/// let headings = parse_content_headings(content);
///
/// assert_eq!(headings[0].slug, "intro");
/// assert_eq!(headings[1].slug, "intro-2");
/// assert_eq!(headings[1].level, 2);
/// ```
#[must_use]
pub fn parse_content_headings(content: &str) -> Vec<Heading> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();

    scan(content)
        .filter(|line| line.zone == Zone::Body)
        .filter_map(|line| {
            let found = ATX_HEADING.captures(line.text)?;
            let level = u8::try_from(found.get(1)?.as_str().len()).ok()?;

            let (without_block_id, _) = strip_trailing_block_id(found.get(2)?.as_str());
            let text = strip_closing_hashes(without_block_id).trim().to_string();

            let base = slugify(&text);
            let count = counts.entry(base.clone()).or_insert(0);
            *count += 1;
            let mut slug = if *count == 1 {
                base.clone()
            } else {
                format!("{base}-{count}")
            };

            // The counted candidate can still collide with a literal
            // heading like `Notes 2`; keep bumping until it is unique
            while !used.insert(slug.clone()) {
                *count += 1;
                slug = format!("{base}-{count}");
            }

            Some(Heading {
                level,
                text,
                line: line.number,
                slug,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn levels_and_lines() {
        let content = "# One\ntext\n###### Six";
        let headings = parse_content_headings(content);

        assert_eq!(headings.len(), 2);
        assert_eq!((headings[0].level, headings[0].line), (1, 1));
        assert_eq!((headings[1].level, headings[1].line), (6, 3));
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn seven_hashes_is_not_a_heading() {
        assert_eq!(parse_content_headings("####### Too deep"), []);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn hash_without_space_is_not_a_heading() {
        assert_eq!(parse_content_headings("#NoSpace"), []);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn up_to_three_leading_spaces() {
        assert_eq!(parse_content_headings("   # Indented")[0].text, "Indented");
        assert_eq!(parse_content_headings("    # Too far"), []);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn closing_hashes_are_stripped() {
        assert_eq!(parse_content_headings("## Title ##")[0].text, "Title");
        assert_eq!(parse_content_headings("## C# ")[0].text, "C#");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn trailing_block_id_is_stripped() {
        let heading = &parse_content_headings("## Results ^tbl-1")[0];
        assert_eq!(heading.text, "Results");
        assert_eq!(heading.slug, "results");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn slug_generation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Spaces   everywhere  "), "spaces-everywhere");
        assert_eq!(slugify("C++ & Rust"), "c-rust");
        assert_eq!(slugify("___"), "");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn duplicate_slugs_get_numeric_suffixes() {
        let content = "# Notes\n# Notes\n# Notes";
        let slugs: Vec<_> = parse_content_headings(content)
            .into_iter()
            .map(|h| h.slug)
            .collect();

        assert_eq!(slugs, ["notes", "notes-2", "notes-3"]);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn suffix_skips_slugs_taken_by_literal_headings() {
        let content = "# Notes\n# Notes 2\n# Notes";
        let slugs: Vec<_> = parse_content_headings(content)
            .into_iter()
            .map(|h| h.slug)
            .collect();

        assert_eq!(slugs, ["notes", "notes-2", "notes-3"]);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn literal_heading_after_suffixed_slug_stays_unique() {
        let content = "# Notes\n# Notes\n# Notes 2";
        let slugs: Vec<_> = parse_content_headings(content)
            .into_iter()
            .map(|h| h.slug)
            .collect();

        assert_eq!(slugs.len(), 3);
        let unique: std::collections::HashSet<_> = slugs.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn fenced_code_is_skipped() {
        let content = "```\n# comment in code\n```\n# Real";
        let headings = parse_content_headings(content);

        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Real");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn extraction_is_idempotent() {
        let content = "# A\n## A\n# B";
        assert_eq!(parse_content_headings(content), parse_content_headings(content));
    }
}
