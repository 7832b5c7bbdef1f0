//! Link graph queries over an indexed vault
//!
//! The graph is never stored: every query walks the cached extraction in
//! the [`NoteIndex`] and resolves targets on the fly, so it can never go
//! stale. Unresolvable targets are dropped silently; a broken link is a
//! vault-content problem, not an error.
//!
//! Frontmatter participates too: wikilinks inside frontmatter string
//! values (`up: "[[Index]]"`) count as references, with context
//! `frontmatter:<key>` instead of `body`.

use crate::index::NoteIndex;
use crate::parse::frontmatter::keyed_lines;
use crate::parse::wikilink::links_in_line;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// One end of a reference between two notes
///
/// For outgoing queries `from_note` is the resolved target; for incoming
/// queries it is the source note. Line and context always describe where
/// the wikilink physically sits in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    /// The note on the other end of the reference
    pub from_note: PathBuf,

    /// 1-based line of the wikilink in the source note
    pub line: usize,

    /// `body` or `frontmatter:<top-level key>`
    pub context: String,

    /// Whether the wikilink is an embed
    pub embed: bool,
}

/// A resolved reference as seen from its source note.
struct Resolved {
    target: PathBuf,
    line: usize,
    context: String,
    embed: bool,
}

/// Every resolved reference leaving `path`, body first, then frontmatter.
///
/// The entry for `path` must already be parsed; the vault guarantees that
/// before querying.
fn resolved_refs(index: &NoteIndex, path: &Path) -> Vec<Resolved> {
    let Some(entry) = index.entry(path) else {
        return Vec::new();
    };

    let mut refs = Vec::new();

    for link in &entry.links {
        if let Some(target) = index.resolve(&link.target) {
            refs.push(Resolved {
                target: target.to_path_buf(),
                line: link.line,
                context: "body".to_string(),
                embed: link.embed,
            });
        }
    }

    for keyed in keyed_lines(&entry.content) {
        for link in links_in_line(keyed.text, keyed.number) {
            if let Some(target) = index.resolve(&link.target) {
                refs.push(Resolved {
                    target: target.to_path_buf(),
                    line: link.line,
                    context: format!("frontmatter:{}", keyed.key),
                    embed: link.embed,
                });
            }
        }
    }

    refs
}

/// References leaving `note`, `from_note` carrying the resolved target.
pub(crate) fn outgoing_refs(index: &NoteIndex, note: &Path) -> Vec<LinkRef> {
    #[cfg(feature = "tracing")]
    tracing::debug!(note = %note.display(), "Collecting outgoing refs");

    resolved_refs(index, note)
        .into_iter()
        .map(|r| LinkRef {
            from_note: r.target,
            line: r.line,
            context: r.context,
            embed: r.embed,
        })
        .collect()
}

/// References arriving at `note` from every other note in the vault.
pub(crate) fn incoming_refs(index: &NoteIndex, note: &Path) -> Vec<LinkRef> {
    #[cfg(feature = "tracing")]
    tracing::debug!(note = %note.display(), "Collecting incoming refs");

    let mut refs = Vec::new();

    for source in index.paths() {
        if source == note {
            continue;
        }

        for r in resolved_refs(index, source) {
            if r.target == note {
                refs.push(LinkRef {
                    from_note: source.to_path_buf(),
                    line: r.line,
                    context: r.context,
                    embed: r.embed,
                });
            }
        }
    }

    refs
}

/// Notes no other note links to, sorted.
pub(crate) fn orphans(index: &NoteIndex) -> Vec<PathBuf> {
    let mut targeted: BTreeSet<PathBuf> = BTreeSet::new();

    for source in index.paths() {
        for r in resolved_refs(index, source) {
            if r.target != source {
                targeted.insert(r.target);
            }
        }
    }

    index
        .paths()
        .filter(|path| !targeted.contains(*path))
        .map(Path::to_path_buf)
        .collect()
}

/// Directed graph of the whole vault, one node per note, one edge per
/// resolved reference (A → B means A links to B).
///
/// Node weights are the vault-relative paths as strings.
#[cfg(feature = "petgraph")]
pub(crate) fn digraph(index: &NoteIndex) -> petgraph::graph::DiGraph<String, ()> {
    use std::collections::HashMap;

    #[cfg(feature = "tracing")]
    tracing::debug!("Building directed graph");

    let mut graph = petgraph::graph::DiGraph::new();
    let mut nodes = HashMap::new();

    for path in index.paths() {
        let node = graph.add_node(path.display().to_string());
        nodes.insert(path.to_path_buf(), node);
    }

    for path in index.paths() {
        let Some(&source) = nodes.get(path) else {
            continue;
        };

        for r in resolved_refs(index, path) {
            if let Some(&target) = nodes.get(&r.target) {
                graph.add_edge(source, target, ());
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Graph construction complete"
    );

    graph
}
