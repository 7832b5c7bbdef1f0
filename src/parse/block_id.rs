//! Block identifier extraction
//!
//! A block id is a trailing `^id` token separated from the block text by
//! whitespace, as in `Some paragraph. ^quote-1`.

use crate::scan::{Zone, scan};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static TRAILING_BLOCK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\^([A-Za-z0-9_-]+)\s*$").expect("valid block id pattern"));

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s").expect("valid list marker pattern"));

/// Kind of block a block id is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    /// Plain paragraph line
    Paragraph,
    /// Bulleted or numbered list item
    ListItem,
}

/// One block identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockId {
    /// Identifier without the `^`
    pub id: String,

    /// 1-based content line
    pub line: usize,

    /// Kind of line the id is attached to
    pub block_type: BlockType,
}

/// Split a trailing `^id` token off a line, if present.
///
/// Returns the text without the token and the id. A bare `^id` with no
/// text before it does not count: the token needs leading whitespace.
pub(crate) fn strip_trailing_block_id(text: &str) -> (&str, Option<&str>) {
    match TRAILING_BLOCK_ID.captures(text) {
        Some(found) => {
            let whole = found.get(0).map_or(text.len(), |m| m.start());
            let id = found.get(1).map(|m| m.as_str());
            (&text[..whole], id)
        }
        None => (text, None),
    }
}

fn classify(text: &str) -> BlockType {
    if LIST_MARKER.is_match(text) {
        BlockType::ListItem
    } else {
        BlockType::Paragraph
    }
}

/// Extract every block identifier from the note body
///
/// # Example
/// ```
/// use notevault::parse::{BlockType, parse_content_block_ids};
///
/// let content = "A paragraph. ^para\n- item ^item";
/// let blocks = parse_content_block_ids(content);
///
/// assert_eq!(blocks[0].id, "para");
/// assert_eq!(blocks[0].block_type, BlockType::Paragraph);
/// assert_eq!(blocks[1].block_type, BlockType::ListItem);
/// ```
#[must_use]
pub fn parse_content_block_ids(content: &str) -> Vec<BlockId> {
    scan(content)
        .filter(|line| line.zone == Zone::Body)
        .filter_map(|line| {
            let (_, id) = strip_trailing_block_id(line.text);

            Some(BlockId {
                id: id?.to_string(),
                line: line.number,
                block_type: classify(line.text),
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
    fn paragraph_block_id() {
        let blocks = parse_content_block_ids("Some text here. ^quote-1");

        assert_eq!(
            blocks,
            [BlockId {
                id: "quote-1".to_string(),
                line: 1,
                block_type: BlockType::Paragraph
            }]
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn list_item_block_ids() {
        let content = "- first ^a\n* second ^b\n+ third ^c\n12. numbered ^d\n3) also ^e";
        let blocks = parse_content_block_ids(content);

        assert_eq!(blocks.len(), 5);
        assert!(blocks.iter().all(|b| b.block_type == BlockType::ListItem));
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn bare_caret_token_is_not_an_id() {
        assert_eq!(parse_content_block_ids("^orphan"), []);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn mid_line_caret_is_not_an_id() {
        assert_eq!(parse_content_block_ids("x ^not-trailing more text"), []);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn trailing_whitespace_is_tolerated() {
        let blocks = parse_content_block_ids("text ^id1   ");
        assert_eq!(blocks[0].id, "id1");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn fenced_code_is_skipped() {
        let content = "```\ncode ^nope\n```\ntext ^yes";
        let blocks = parse_content_block_ids(content);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id, "yes");
        assert_eq!(blocks[0].line, 4);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn strip_helper_returns_remainder() {
        assert_eq!(strip_trailing_block_id("Heading ^h1"), ("Heading", Some("h1")));
        assert_eq!(strip_trailing_block_id("No id"), ("No id", None));
    }
}
