//! Inline attribute extraction (`[key::value]`)
//!
//! Bracketed key/value pairs embedded in note text, as written by the
//! Dataview family of plugins: `[status::active]`, `[parent::[[Index]]]`.
//! The bare `key:: value` form without brackets is deliberately not
//! matched.

use crate::scan::{Zone, scan};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// Value runs up to the closing bracket, but a `]]` pair is allowed
// through so wikilink values survive intact
static INLINE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([\w-]+)::([^\]]*(?:\]\][^\]]*)*)\]").expect("valid inline attribute pattern")
});

/// One `[key::value]` occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineAttr {
    /// Attribute key, word characters and hyphens
    pub key: String,

    /// Attribute value, trimmed; may itself contain a wikilink
    pub value: String,

    /// 1-based content line
    pub line: usize,
}

/// Extract every inline attribute from the note body
///
/// Frontmatter and fenced code are skipped. Records come back in line
/// order, then column order within a line.
///
/// # Example
/// ```
/// use notevault::parse::parse_inline_attrs;
///
/// let content = "Reading [status::active] by [author::[[Knuth]]]";
/// let attrs = parse_inline_attrs(content);
///
/// assert_eq!(attrs[0].key, "status");
/// assert_eq!(attrs[0].value, "active");
/// assert_eq!(attrs[1].value, "[[Knuth]]");
/// ```
#[must_use]
pub fn parse_inline_attrs(content: &str) -> Vec<InlineAttr> {
    scan(content)
        .filter(|line| line.zone == Zone::Body)
        .flat_map(|line| {
            INLINE_ATTR
                .captures_iter(line.text)
                .filter_map(move |found| {
                    Some(InlineAttr {
                        key: found.get(1)?.as_str().to_string(),
                        value: found.get(2)?.as_str().trim().to_string(),
                        line: line.number,
                    })
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
    fn simple_attribute() {
        let attrs = parse_inline_attrs("Some text [status::active] here.");

        assert_eq!(
            attrs,
            [InlineAttr {
                key: "status".to_string(),
                value: "active".to_string(),
                line: 1,
            }]
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn wikilink_value_survives() {
        let attrs = parse_inline_attrs("[parent::[[Other Note]]]");

        assert_eq!(attrs[0].key, "parent");
        assert_eq!(attrs[0].value, "[[Other Note]]");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn multiple_attributes_in_line_order() {
        let content = "[key1::value1] text [key2::value2]\n[key3::value3]";
        let keys: Vec<_> = parse_inline_attrs(content)
            .into_iter()
            .map(|a| (a.key, a.line))
            .collect();

        assert_eq!(
            keys,
            [
                ("key1".to_string(), 1),
                ("key2".to_string(), 1),
                ("key3".to_string(), 2)
            ]
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn hyphenated_key_and_spaced_value() {
        let attrs = parse_inline_attrs("[my-key::a longer value]");

        assert_eq!(attrs[0].key, "my-key");
        assert_eq!(attrs[0].value, "a longer value");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn bare_dataview_form_is_not_matched() {
        assert_eq!(parse_inline_attrs("status:: active"), []);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn fenced_code_is_skipped() {
        let content = "[real::attr]\n```\n[fake::attr]\n```";
        let attrs = parse_inline_attrs(content);

        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].key, "real");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn frontmatter_is_skipped() {
        let content = "---\ntitle: [not::an attr]\n---\n[real::attr]";
        let attrs = parse_inline_attrs(content);

        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].line, 4);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn empty_value_is_kept() {
        let attrs = parse_inline_attrs("[done::]");

        assert_eq!(attrs[0].key, "done");
        assert_eq!(attrs[0].value, "");
    }
}
