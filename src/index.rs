//! Per-note cache bundle and reference resolution
//!
//! The index maps every known vault-relative note path to an optionally
//! parsed [`NoteEntry`]. Entries are computed in one pass when a note is
//! first read and dropped again when the note is written, so repeated
//! queries never re-parse unchanged content.
//!
//! Reference resolution and the alias table live here too, since both are
//! pure functions of the indexed set.

use crate::config::TaskConfig;
use crate::parse::{
    BlockId, Heading, InlineAttr, Link, Tag, Task, parse_content_block_ids,
    parse_content_headings, parse_content_tags, parse_frontmatter, parse_inline_attrs,
    parse_links, parse_tasks,
};
use crate::parse::frontmatter;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Everything the crate knows about one note, computed in a single pass
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEntry {
    /// Full note content as read from disk
    pub content: String,

    /// Parsed frontmatter mapping, `None` when absent or malformed
    pub frontmatter: Option<serde_yml::Mapping>,

    /// Content with the frontmatter block removed
    pub body: String,

    /// Monotonic counter, bumped on every index mutation that touched
    /// this note
    pub generation: u64,

    /// Wikilinks and embeds, in line order
    pub links: Vec<Link>,

    /// Inline and frontmatter tags, in line order
    pub tags: Vec<Tag>,

    /// ATX headings with note-unique slugs
    pub headings: Vec<Heading>,

    /// Block identifiers
    pub blocks: Vec<BlockId>,

    /// Inline `[key::value]` attributes
    pub inline_attrs: Vec<InlineAttr>,

    /// Checkbox tasks
    pub tasks: Vec<Task>,
}

impl NoteEntry {
    fn parse(path: &Path, content: String, tasks_config: &TaskConfig, generation: u64) -> Self {
        Self {
            frontmatter: parse_frontmatter(&content),
            body: frontmatter::body(&content).to_string(),
            links: parse_links(&content),
            tags: parse_content_tags(&content),
            headings: parse_content_headings(&content),
            blocks: parse_content_block_ids(&content),
            inline_attrs: parse_inline_attrs(&content),
            tasks: parse_tasks(&content, path, tasks_config),
            generation,
            content,
        }
    }

    /// Frontmatter `aliases` values: list of strings or a single scalar.
    fn aliases(&self) -> Vec<String> {
        let Some(value) = self.frontmatter.as_ref().and_then(|fm| fm.get("aliases")) else {
            return Vec::new();
        };

        match value {
            serde_yml::Value::String(alias) => vec![alias.clone()],
            serde_yml::Value::Sequence(list) => list
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// When two notes claim the same name or alias, the shorter path wins;
/// equal lengths tie-break lexicographically. Registration order never
/// matters.
fn preferred(current: PathBuf, challenger: PathBuf) -> PathBuf {
    let current_key = (current.as_os_str().len(), current);
    let challenger_key = (challenger.as_os_str().len(), challenger);

    if challenger_key < current_key {
        challenger_key.1
    } else {
        current_key.1
    }
}

fn register(table: &mut HashMap<String, PathBuf>, key: String, path: &Path) {
    match table.remove(&key) {
        Some(existing) => {
            table.insert(key, preferred(existing, path.to_path_buf()));
        }
        None => {
            table.insert(key, path.to_path_buf());
        }
    }
}

#[derive(Debug, Default)]
struct AliasTable {
    /// Exact base name (file stem) -> canonical path
    by_name: HashMap<String, PathBuf>,
    /// Lowercased base name -> canonical path
    by_name_lower: HashMap<String, PathBuf>,
    /// Lowercased frontmatter alias -> canonical path
    by_alias: HashMap<String, PathBuf>,
}

/// The vault's note cache: known paths, parsed entries, alias table
#[derive(Debug, Default)]
pub(crate) struct NoteIndex {
    /// Every known note path, parsed or not. `BTreeMap` keeps listings
    /// sorted for free.
    notes: BTreeMap<PathBuf, Option<NoteEntry>>,

    aliases: AliasTable,
    aliases_dirty: bool,
    generation: u64,
}

impl NoteIndex {
    pub(crate) fn new() -> Self {
        Self {
            aliases_dirty: true,
            ..Self::default()
        }
    }

    pub(crate) fn contains(&self, path: &Path) -> bool {
        self.notes.contains_key(path)
    }

    /// Sorted vault-relative paths of every known note.
    pub(crate) fn paths(&self) -> impl Iterator<Item = &Path> {
        self.notes.keys().map(PathBuf::as_path)
    }

    pub(crate) fn entry(&self, path: &Path) -> Option<&NoteEntry> {
        self.notes.get(path)?.as_ref()
    }

    /// Register a note path without parsing it yet.
    pub(crate) fn insert_note(&mut self, path: PathBuf) {
        self.generation += 1;
        self.notes.entry(path).or_insert(None);
        self.aliases_dirty = true;
    }

    pub(crate) fn remove_note(&mut self, path: &Path) -> bool {
        let removed = self.notes.remove(path).is_some();
        if removed {
            self.generation += 1;
            self.aliases_dirty = true;
        }
        removed
    }

    /// Drop a note's parsed entry after its content changed on disk.
    pub(crate) fn invalidate(&mut self, path: &Path) {
        self.generation += 1;
        self.aliases_dirty = true;
        self.notes.insert(path.to_path_buf(), None);
    }

    /// Parse `content` and cache the result, returning the fresh entry.
    pub(crate) fn store_entry(
        &mut self,
        path: &Path,
        content: String,
        tasks_config: &TaskConfig,
    ) -> &NoteEntry {
        self.generation += 1;
        let entry = NoteEntry::parse(path, content, tasks_config, self.generation);

        // A newly parsed note may carry aliases the table has not seen
        if entry.frontmatter.is_some() {
            self.aliases_dirty = true;
        }

        let slot = self.notes.entry(path.to_path_buf()).or_insert(None);
        &*slot.insert(entry)
    }

    pub(crate) const fn aliases_dirty(&self) -> bool {
        self.aliases_dirty
    }

    /// Rebuild the alias table from every known path and every parsed
    /// entry's frontmatter aliases.
    pub(crate) fn rebuild_aliases(&mut self) {
        let mut table = AliasTable::default();

        for (path, entry) in &self.notes {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                register(&mut table.by_name, stem.to_string(), path);
                register(&mut table.by_name_lower, stem.to_lowercase(), path);
            }

            if let Some(parsed) = entry {
                for alias in parsed.aliases() {
                    register(&mut table.by_alias, alias.to_lowercase(), path);
                }
            }
        }

        self.aliases = table;
        self.aliases_dirty = false;
    }

    /// Resolve a reference string to a known note path.
    ///
    /// Order: exact relative path (`.md` as written or appended), base
    /// name (case-sensitive, then case-insensitive), frontmatter alias
    /// (case-insensitive). Collisions were already settled at table build
    /// time, so lookups are deterministic.
    pub(crate) fn resolve(&self, reference: &str) -> Option<&Path> {
        let as_path = Path::new(reference);
        if self.contains(as_path) {
            return self.notes.get_key_value(as_path).map(|(k, _)| k.as_path());
        }

        let with_md = PathBuf::from(format!("{reference}.md"));
        if let Some((known, _)) = self.notes.get_key_value(&with_md) {
            return Some(known.as_path());
        }

        if let Some(path) = self.aliases.by_name.get(reference) {
            return Some(path.as_path());
        }

        let lowered = reference.to_lowercase();
        if let Some(path) = self.aliases.by_name_lower.get(&lowered) {
            return Some(path.as_path());
        }

        self.aliases.by_alias.get(&lowered).map(PathBuf::as_path)
    }

    pub(crate) const fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index_with(paths: &[&str]) -> NoteIndex {
        let mut index = NoteIndex::new();
        for path in paths {
            index.insert_note(PathBuf::from(path));
        }
        index.rebuild_aliases();
        index
    }

    fn store(index: &mut NoteIndex, path: &str, content: &str) {
        index.store_entry(
            Path::new(path),
            content.to_string(),
            &TaskConfig::default(),
        );
        index.rebuild_aliases();
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn entry_holds_one_pass_extraction() {
        let mut index = NoteIndex::new();
        let content =
            "---\ntags: [a]\n---\n# Head\n[[Other]] #inline [status::open]\n- [ ] task\npara ^b1";
        index.insert_note(PathBuf::from("n.md"));
        store(&mut index, "n.md", content);

        let entry = index.entry(Path::new("n.md")).unwrap();
        assert_eq!(entry.links.len(), 1);
        assert_eq!(entry.tags.len(), 2);
        assert_eq!(entry.headings.len(), 1);
        assert_eq!(entry.blocks.len(), 1);
        assert_eq!(entry.inline_attrs.len(), 1);
        assert_eq!(entry.tasks.len(), 1);
        assert_eq!(
            entry.body,
            "# Head\n[[Other]] #inline [status::open]\n- [ ] task\npara ^b1"
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn invalidate_drops_entry_and_bumps_generation() {
        let mut index = NoteIndex::new();
        index.insert_note(PathBuf::from("n.md"));
        store(&mut index, "n.md", "old");

        let before = index.entry(Path::new("n.md")).unwrap().generation;
        index.invalidate(Path::new("n.md"));

        assert!(index.entry(Path::new("n.md")).is_none());
        assert!(index.contains(Path::new("n.md")));
        assert!(index.generation() > before);
        assert!(index.aliases_dirty());
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn resolve_exact_path() {
        let index = index_with(&["dir/Note.md", "Other.md"]);

        assert_eq!(
            index.resolve("dir/Note.md"),
            Some(Path::new("dir/Note.md"))
        );
        assert_eq!(index.resolve("dir/Note"), Some(Path::new("dir/Note.md")));
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn resolve_base_name_case_sensitivity() {
        let index = index_with(&["a/Note.md", "b/note.md"]);

        // Exact case goes to the exactly-matching stem
        assert_eq!(index.resolve("Note"), Some(Path::new("a/Note.md")));
        assert_eq!(index.resolve("note"), Some(Path::new("b/note.md")));
        // Unmatched case falls back to the case-insensitive table
        assert_eq!(index.resolve("NOTE"), Some(Path::new("a/Note.md")));
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn resolve_alias() {
        let mut index = index_with(&["physics/Quantum.md"]);
        store(
            &mut index,
            "physics/Quantum.md",
            "---\naliases:\n  - QM\n  - Quantum Mechanics\n---\nbody",
        );

        assert_eq!(index.resolve("qm"), Some(Path::new("physics/Quantum.md")));
        assert_eq!(
            index.resolve("quantum mechanics"),
            Some(Path::new("physics/Quantum.md"))
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn scalar_alias() {
        let mut index = index_with(&["n.md"]);
        store(&mut index, "n.md", "---\naliases: solo\n---\nbody");

        assert_eq!(index.resolve("Solo"), Some(Path::new("n.md")));
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn unresolvable_reference() {
        let index = index_with(&["Note.md"]);
        assert_eq!(index.resolve("missing"), None);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn name_collision_prefers_shorter_path() {
        let index = index_with(&["deeply/nested/Note.md", "Note.md"]);
        assert_eq!(index.resolve("Note"), Some(Path::new("Note.md")));

        // Same result with reversed registration order
        let reversed = index_with(&["Note.md", "deeply/nested/Note.md"]);
        assert_eq!(reversed.resolve("Note"), Some(Path::new("Note.md")));
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn equal_length_collision_is_lexicographic() {
        let index = index_with(&["b/Note.md", "a/Note.md"]);
        assert_eq!(index.resolve("Note"), Some(Path::new("a/Note.md")));
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn alias_collision_uses_same_policy() {
        let mut index = index_with(&["a.md", "dir/b.md"]);
        store(&mut index, "a.md", "---\naliases: [shared]\n---\nx");
        store(&mut index, "dir/b.md", "---\naliases: [shared]\n---\nx");

        assert_eq!(index.resolve("shared"), Some(Path::new("a.md")));
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn paths_are_sorted() {
        let index = index_with(&["z.md", "a.md", "m/n.md"]);
        let paths: Vec<_> = index.paths().collect();

        assert_eq!(
            paths,
            [Path::new("a.md"), Path::new("m/n.md"), Path::new("z.md")]
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn remove_note_forgets_everything() {
        let mut index = index_with(&["n.md"]);
        assert!(index.remove_note(Path::new("n.md")));
        assert!(!index.remove_note(Path::new("n.md")));
        index.rebuild_aliases();

        assert_eq!(index.resolve("n"), None);
    }
}
