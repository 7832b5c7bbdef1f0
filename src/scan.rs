//! Zone-tagged line scanning
//!
//! Every extractor in this crate consumes the same lazy stream of
//! [`ScannedLine`]s instead of re-implementing fence and frontmatter
//! tracking. A line belongs to exactly one [`Zone`]:
//!
//! * [`Zone::Frontmatter`]: the `---`-delimited block at the very top of
//!   the note, including both delimiter lines. Only the frontmatter-aware
//!   paths (tags, frontmatter links) look at these lines.
//! * [`Zone::FencedCode`]: lines between a fence opener (three or more
//!   backticks or tildes at the start of a line) and its matching closer,
//!   including the fence lines themselves. All extractors skip them.
//! * [`Zone::Body`]: everything else.
//!
//! Inline code spans are deliberately *not* a zone: `[[link]]` or `#tag`
//! inside single backticks is still detected, matching the behavior vaults
//! have historically relied on.
//!
//! # Example
//! ```
//! use notevault::scan::{scan, Zone};
//!
//! let content = "---\ntags: [a]\n---\nbody\n```\ncode\n```";
//! let zones: Vec<Zone> = scan(content).map(|line| line.zone).collect();
//!
//! assert_eq!(
//!     zones,
//!     [
//!         Zone::Frontmatter,
//!         Zone::Frontmatter,
//!         Zone::Frontmatter,
//!         Zone::Body,
//!         Zone::FencedCode,
//!         Zone::FencedCode,
//!         Zone::FencedCode,
//!     ]
//! );
//! ```

/// Classification of a single content line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Inside the leading `---` block (delimiters included)
    Frontmatter,
    /// Inside a fenced code block (fence lines included)
    FencedCode,
    /// Plain note body
    Body,
}

/// One line of note content with its 1-based number and [`Zone`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedLine<'a> {
    /// 1-based line number in the original content
    pub number: usize,
    /// Raw line text without the trailing newline
    pub text: &'a str,
    /// Zone the line belongs to
    pub zone: Zone,
}

/// Returns the 1-based line number of the closing `---`, if frontmatter
/// is present and properly terminated.
///
/// Unterminated frontmatter yields `None`: the whole content is then
/// treated as body, which is what the extractors want.
pub(crate) fn frontmatter_close_line(content: &str) -> Option<usize> {
    let mut lines = content.lines();
    if lines.next()?.trim_end() != "---" {
        return None;
    }

    lines
        .position(|line| line.trim_end() == "---")
        .map(|idx| idx + 2)
}

/// An open fence: the delimiter character and its length
#[derive(Debug, Clone, Copy)]
struct Fence {
    delimiter: char,
    length: usize,
}

fn fence_opener(line: &str) -> Option<Fence> {
    let delimiter = match line.chars().next() {
        Some(c @ ('`' | '~')) => c,
        _ => return None,
    };

    let length = line.chars().take_while(|&c| c == delimiter).count();
    (length >= 3).then_some(Fence { delimiter, length })
}

fn closes_fence(line: &str, fence: Fence) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= fence.length && trimmed.chars().all(|c| c == fence.delimiter)
}

/// Scan content into an ordered, restartable sequence of zone-tagged lines.
///
/// The scanner is a pure function of the content: calling it twice yields
/// identical sequences. It runs in one pass over the input.
pub fn scan(content: &str) -> impl Iterator<Item = ScannedLine<'_>> {
    let frontmatter_close = frontmatter_close_line(content);
    let mut fence: Option<Fence> = None;

    content.lines().enumerate().map(move |(idx, text)| {
        let number = idx + 1;

        if frontmatter_close.is_some_and(|close| number <= close) {
            return ScannedLine {
                number,
                text,
                zone: Zone::Frontmatter,
            };
        }

        let zone = match fence {
            Some(open) => {
                if closes_fence(text, open) {
                    fence = None;
                }
                Zone::FencedCode
            }
            None => {
                if let Some(open) = fence_opener(text) {
                    fence = Some(open);
                    Zone::FencedCode
                } else {
                    Zone::Body
                }
            }
        };

        ScannedLine { number, text, zone }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zones(content: &str) -> Vec<Zone> {
        scan(content).map(|line| line.zone).collect()
    }

    #[test]
    fn plain_body() {
        assert_eq!(zones("one\ntwo"), [Zone::Body, Zone::Body]);
    }

    #[test]
    fn frontmatter_block() {
        let content = "---\ntitle: Test\n---\nbody";
        assert_eq!(
            zones(content),
            [
                Zone::Frontmatter,
                Zone::Frontmatter,
                Zone::Frontmatter,
                Zone::Body
            ]
        );
    }

    #[test]
    fn unterminated_frontmatter_is_body() {
        let content = "---\ntitle: Test\nbody without closer";
        assert_eq!(zones(content), [Zone::Body, Zone::Body, Zone::Body]);
    }

    #[test]
    fn frontmatter_must_start_at_first_line() {
        let content = "intro\n---\nkey: value\n---";
        assert!(zones(content).iter().all(|&z| z != Zone::Frontmatter));
    }

    #[test]
    fn backtick_fence() {
        let content = "before\n```rust\nlet x = 1;\n```\nafter";
        assert_eq!(
            zones(content),
            [
                Zone::Body,
                Zone::FencedCode,
                Zone::FencedCode,
                Zone::FencedCode,
                Zone::Body
            ]
        );
    }

    #[test]
    fn tilde_fence_not_closed_by_backticks() {
        let content = "~~~\n```\nstill code\n~~~\nafter";
        assert_eq!(
            zones(content),
            [
                Zone::FencedCode,
                Zone::FencedCode,
                Zone::FencedCode,
                Zone::FencedCode,
                Zone::Body
            ]
        );
    }

    #[test]
    fn closer_must_be_at_least_as_long() {
        let content = "````\n```\nstill code\n````\nafter";
        assert_eq!(
            zones(content),
            [
                Zone::FencedCode,
                Zone::FencedCode,
                Zone::FencedCode,
                Zone::FencedCode,
                Zone::Body
            ]
        );
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        let content = "```\ncode forever";
        assert_eq!(zones(content), [Zone::FencedCode, Zone::FencedCode]);
    }

    #[test]
    fn line_numbers_are_one_based_and_absolute() {
        let content = "---\na: 1\n---\nbody";
        let numbers: Vec<usize> = scan(content).map(|line| line.number).collect();
        assert_eq!(numbers, [1, 2, 3, 4]);
    }

    #[test]
    fn scanner_is_restartable() {
        let content = "---\na: 1\n---\n```\nx\n```\ntext";
        let first: Vec<_> = scan(content).collect();
        let second: Vec<_> = scan(content).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn frontmatter_close_line_detection() {
        assert_eq!(frontmatter_close_line("---\na: 1\n---\nbody"), Some(3));
        assert_eq!(frontmatter_close_line("no frontmatter"), None);
        assert_eq!(frontmatter_close_line("---\nnever closed"), None);
        assert_eq!(frontmatter_close_line("--- \na: 1\n--- "), Some(3));
    }
}
