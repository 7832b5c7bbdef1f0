//! Checkbox task extraction with metadata glyphs
//!
//! Recognizes list-item checkboxes (`- [ ] ...`, `* [x] ...`, `+ [>] ...`)
//! and pulls the metadata conventions popularized by the Obsidian Tasks
//! plugin out of the item text: due / scheduled / completion dates, a
//! priority glyph, trailing tags and a trailing block id. The glyphs and
//! the indent unit come from [`TaskConfig`].

use crate::config::TaskConfig;
use crate::parse::block_id::strip_trailing_block_id;
use crate::parse::tag::tags_in_line;
use crate::scan::{Zone, scan};
use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static TASK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)([-*+]) \[(.)\] (.*)$").expect("valid task pattern"));

static TRAILING_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)#[A-Za-z_][A-Za-z0-9_/-]*\s*$").expect("valid trailing tag pattern")
});

/// Checkbox state of a task
///
/// Checkbox characters outside this set do not produce a task at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSymbol {
    /// `[ ]`
    Todo,
    /// `[x]` or `[X]`
    Done,
    /// `[>]`
    Deferred,
    /// `[-]`
    Cancelled,
}

impl TaskSymbol {
    const fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' => Some(Self::Todo),
            'x' | 'X' => Some(Self::Done),
            '>' => Some(Self::Deferred),
            '-' => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Task priority, highest tier first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Highest,
    High,
    Medium,
    Low,
    Lowest,
}

/// One checkbox task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Checkbox state
    pub symbol: TaskSymbol,

    /// Item text with metadata glyphs removed and whitespace collapsed
    pub description: String,

    /// ISO date following the due glyph
    pub due: Option<String>,

    /// ISO date following the scheduled glyph
    pub scheduled: Option<String>,

    /// ISO date following the completion glyph
    pub done: Option<String>,

    /// Priority glyph found on the line, highest tier wins
    pub priority: Option<Priority>,

    /// Every tag on the line, leading `#` removed
    pub tags: Vec<String>,

    /// Trailing `^id`, if any
    pub block_id: Option<String>,

    /// Nesting depth: tabs plus `indent_unit` spaces each count one level
    pub indent: usize,

    /// 1-based content line
    pub line: usize,

    /// Note the task came from, vault-relative
    pub file: PathBuf,
}

fn indent_level(prefix: &str, indent_unit: usize) -> usize {
    let tabs = prefix.chars().filter(|&c| c == '\t').count();
    let spaces = prefix.chars().filter(|&c| c == ' ').count();

    tabs + spaces / indent_unit.max(1)
}

/// First glyph+date pair for `glyph`; returns the date and removes the
/// matched span from `text`.
fn take_dated_glyph(text: &mut String, glyph: &str) -> Option<String> {
    if glyph.is_empty() {
        return None;
    }

    let pattern = format!(r"{}\s*(\d{{4}}-\d{{2}}-\d{{2}})", regex::escape(glyph));
    let re = Regex::new(&pattern).expect("escaped glyph pattern is valid");

    let found = re.captures(text)?;
    let date = found.get(1)?.as_str().to_string();
    let span = found.get(0)?.range();
    text.replace_range(span, " ");

    Some(date)
}

fn take_priority(text: &mut String, config: &TaskConfig) -> Option<Priority> {
    let tiers = [
        (Priority::Highest, &config.priority_highest),
        (Priority::High, &config.priority_high),
        (Priority::Medium, &config.priority_medium),
        (Priority::Low, &config.priority_low),
        (Priority::Lowest, &config.priority_lowest),
    ];

    for (priority, glyph) in tiers {
        if glyph.is_empty() {
            continue;
        }
        if let Some(at) = text.find(glyph.as_str()) {
            text.replace_range(at..at + glyph.len(), " ");
            return Some(priority);
        }
    }

    None
}

fn strip_trailing_tags(text: &str) -> &str {
    let mut rest = text.trim_end();
    while let Some(found) = TRAILING_TAG.find(rest) {
        rest = rest[..found.start()].trim_end();
    }
    rest
}

/// Extract every checkbox task from the note body
///
/// `file` is recorded verbatim on each task so that vault-wide task lists
/// can say where an item lives.
///
/// # Example
/// ```
/// use notevault::config::TaskConfig;
/// use notevault::parse::{Priority, parse_tasks};
/// use std::path::Path;
///
/// let content = "- [ ] Foo 📅 2024-02-15 ⏫ #urgent";
/// let tasks = parse_tasks(content, Path::new("inbox.md"), &TaskConfig::default());
///
/// assert_eq!(tasks[0].description, "Foo");
/// assert_eq!(tasks[0].due.as_deref(), Some("2024-02-15"));
/// assert_eq!(tasks[0].priority, Some(Priority::High));
/// assert_eq!(tasks[0].tags, ["urgent"]);
/// ```
#[must_use]
pub fn parse_tasks(content: &str, file: &Path, config: &TaskConfig) -> Vec<Task> {
    scan(content)
        .filter(|line| line.zone == Zone::Body)
        .filter_map(|line| {
            let found = TASK_LINE.captures(line.text)?;
            let symbol = TaskSymbol::from_char(found.get(3)?.as_str().chars().next()?)?;
            let indent = indent_level(found.get(1)?.as_str(), config.indent_unit);

            let (rest, block_id) = strip_trailing_block_id(found.get(4)?.as_str());
            let tags: Vec<String> = tags_in_line(rest, line.number)
                .map(|tag| tag.name)
                .collect();

            let mut working = rest.to_string();
            let due = take_dated_glyph(&mut working, &config.due);
            let scheduled = take_dated_glyph(&mut working, &config.scheduled);
            let done = take_dated_glyph(&mut working, &config.done);
            let priority = take_priority(&mut working, config);

            let description = strip_trailing_tags(&working)
                .split_whitespace()
                .join(" ");

            Some(Task {
                symbol,
                description,
                due,
                scheduled,
                done,
                priority,
                tags,
                block_id: block_id.map(str::to_string),
                indent,
                line: line.number,
                file: file.to_path_buf(),
            })
        })
        .collect()
}
