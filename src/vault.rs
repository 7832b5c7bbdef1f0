//! The vault facade
//!
//! [`Vault`] owns the note index behind an `RwLock`: queries share a read
//! lock, writes and lazy parses take the write lock. The extraction
//! functions themselves stay pure and lock-free, so holding the lock is
//! only ever about the cache, never about parsing speed.
//!
//! # Examples
//! ```no_run
//! use notevault::prelude::*;
//!
//! let vault = Vault::open(VaultOptions::new("/path/to/vault")).unwrap();
//!
//! for path in vault.list_notes() {
//!     let links = vault.get_links(&path).unwrap();
//!     println!("{}: {} links", path.display(), links.len());
//! }
//! ```

use crate::config::{TaskConfig, VaultOptions};
use crate::error::{Error, Result};
use crate::graph;
use crate::graph::LinkRef;
use crate::index::NoteIndex;
use crate::parse::{BlockId, Heading, InlineAttr, Link, Tag, Task};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use walkdir::{DirEntry, WalkDir};

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

/// Vault-relative note path with a `.md` extension guaranteed.
fn normalized(path: &Path) -> PathBuf {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
    {
        return path.to_path_buf();
    }

    let mut with_md = path.as_os_str().to_os_string();
    with_md.push(".md");
    PathBuf::from(with_md)
}

/// An opened vault: a root directory of Markdown notes plus the cache of
/// everything parsed out of them so far
#[derive(Debug)]
pub struct Vault {
    root: PathBuf,
    tasks_config: TaskConfig,
    index: RwLock<NoteIndex>,
}

impl Vault {
    /// Open a vault rooted at `options.path()`
    ///
    /// Recursively collects every `.md` file (extension matched case
    /// insensitively), skipping hidden files and directories. Note content
    /// is not read yet; parsing happens lazily on first query per note.
    ///
    /// # Errors
    /// [`Error::IsNotDir`] when the root is missing or not a directory,
    /// [`Error::Io`] when the directory walk fails.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(options), fields(path = %options.path().display())))]
    pub fn open(options: VaultOptions) -> Result<Self> {
        let root = options.path().to_path_buf();

        #[cfg(feature = "tracing")]
        tracing::debug!("Opening vault");

        if !root.is_dir() {
            return Err(Error::IsNotDir(root));
        }

        let mut index = NoteIndex::new();
        for entry in WalkDir::new(&root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
        {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
            {
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(&root) {
                index.insert_note(relative.to_path_buf());
            }
        }

        #[cfg(feature = "tracing")]
        tracing::info!(notes = index.paths().count(), "Vault opened");

        Ok(Self {
            root,
            tasks_config: options.tasks().clone(),
            index: RwLock::new(index),
        })
    }

    /// Turn a caller-supplied path into a vault-relative `.md` path.
    ///
    /// An absolute path under the root is accepted and stripped down to
    /// its relative form; anything that would escape the root (absolute
    /// outside it, or a `..` component) is rejected.
    fn vault_relative(&self, path: &Path) -> Result<PathBuf> {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);

        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(Error::OutsideVault(path.to_path_buf()));
        }

        Ok(normalized(relative))
    }

    fn read_index(&self) -> RwLockReadGuard<'_, NoteIndex> {
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_index(&self) -> RwLockWriteGuard<'_, NoteIndex> {
        self.index.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read and UTF-8-validate a note's bytes from disk.
    fn read_note_content(&self, relative: &Path) -> Result<String> {
        let bytes = fs::read(self.root.join(relative))?;

        String::from_utf8(bytes).map_err(|e| Error::InvalidContent {
            path: relative.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Run `f` against the parsed entry for `path`, parsing it first if
    /// this is the note's first read since open or last write.
    fn with_entry<T>(&self, path: &Path, f: impl FnOnce(&crate::index::NoteEntry) -> T) -> Result<T> {
        let relative = self.vault_relative(path)?;

        {
            let index = self.read_index();
            if !index.contains(&relative) {
                return Err(Error::NoteNotFound(relative));
            }
            if let Some(entry) = index.entry(&relative) {
                return Ok(f(entry));
            }
        }

        // File I/O happens outside any lock
        let content = self.read_note_content(&relative)?;

        let mut index = self.write_index();
        if !index.contains(&relative) {
            // Deleted concurrently between the two locks
            return Err(Error::NoteNotFound(relative));
        }
        let entry = index.store_entry(&relative, content, &self.tasks_config);
        Ok(f(entry))
    }

    /// Parse every not-yet-parsed note and rebuild the alias table if a
    /// write left it dirty. Notes that cannot be read are skipped, the
    /// same way unreadable files are skipped at open.
    fn refresh_aliases(&self) -> Result<()> {
        let missing: Vec<PathBuf> = {
            let index = self.read_index();
            if !index.aliases_dirty() {
                return Ok(());
            }

            index
                .paths()
                .filter(|path| index.entry(path).is_none())
                .map(Path::to_path_buf)
                .collect()
        };

        let mut contents = Vec::with_capacity(missing.len());
        for path in missing {
            match self.read_note_content(&path) {
                Ok(content) => contents.push((path, content)),
                Err(_error) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(path = %path.display(), %_error, "Skipping unreadable note");
                }
            }
        }

        let mut index = self.write_index();
        for (path, content) in contents {
            if index.contains(&path) && index.entry(&path).is_none() {
                index.store_entry(&path, content, &self.tasks_config);
            }
        }
        index.rebuild_aliases();

        Ok(())
    }

    /// Create a note, or overwrite it if it already exists
    ///
    /// Missing parent directories are created. The note's cached entry is
    /// dropped so the next query re-parses the fresh content.
    ///
    /// # Errors
    /// [`Error::OutsideVault`] for paths escaping the root,
    /// [`Error::Io`] when the write fails.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, content), fields(path = %path.as_ref().display())))]
    pub fn create_note(&self, path: impl AsRef<Path>, content: &str) -> Result<()> {
        let relative = self.vault_relative(path.as_ref())?;
        let full = self.root.join(&relative);

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, content)?;

        let mut index = self.write_index();
        index.insert_note(relative.clone());
        index.invalidate(&relative);

        Ok(())
    }

    /// Delete a note from disk and forget everything cached about it
    ///
    /// The file is unlinked first; the index entry stays untouched when
    /// the unlink fails, so a note that is still on disk is never
    /// forgotten.
    ///
    /// # Errors
    /// [`Error::NoteNotFound`] for unknown paths, [`Error::Io`] when the
    /// removal fails.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), fields(path = %path.as_ref().display())))]
    pub fn delete_note(&self, path: impl AsRef<Path>) -> Result<()> {
        let relative = self.vault_relative(path.as_ref())?;

        if !self.read_index().contains(&relative) {
            return Err(Error::NoteNotFound(relative));
        }

        fs::remove_file(self.root.join(&relative))?;

        self.write_index().remove_note(&relative);
        Ok(())
    }

    /// Whether the vault knows a note at this path
    #[must_use]
    pub fn note_exists(&self, path: impl AsRef<Path>) -> bool {
        self.vault_relative(path.as_ref())
            .is_ok_and(|relative| self.read_index().contains(&relative))
    }

    /// Sorted vault-relative paths of every note
    #[must_use]
    pub fn list_notes(&self) -> Vec<PathBuf> {
        self.read_index().paths().map(Path::to_path_buf).collect()
    }

    /// Notes whose vault-relative path matches a glob pattern
    ///
    /// # Errors
    /// [`Error::Pattern`] for malformed patterns.
    ///
    /// # Example
    /// ```no_run
    /// use notevault::prelude::*;
    ///
    /// let vault = Vault::open(VaultOptions::new("/path/to/vault")).unwrap();
    /// let daily = vault.list_notes_matching("journal/**/*.md").unwrap();
    /// ```
    pub fn list_notes_matching(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = glob::Pattern::new(pattern)?;

        Ok(self
            .read_index()
            .paths()
            .filter(|path| pattern.matches_path(path))
            .map(Path::to_path_buf)
            .collect())
    }

    /// Full note content as read from disk
    ///
    /// # Errors
    /// [`Error::NoteNotFound`], [`Error::InvalidContent`], [`Error::Io`].
    pub fn get_content(&self, path: impl AsRef<Path>) -> Result<String> {
        self.with_entry(path.as_ref(), |entry| entry.content.clone())
    }

    /// Note content with the frontmatter block removed
    ///
    /// # Errors
    /// Same as [`Vault::get_content`].
    pub fn get_body(&self, path: impl AsRef<Path>) -> Result<String> {
        self.with_entry(path.as_ref(), |entry| entry.body.clone())
    }

    /// Parsed frontmatter mapping, `None` when absent or malformed
    ///
    /// # Errors
    /// Same as [`Vault::get_content`].
    pub fn get_frontmatter(&self, path: impl AsRef<Path>) -> Result<Option<serde_yml::Mapping>> {
        self.with_entry(path.as_ref(), |entry| entry.frontmatter.clone())
    }

    /// Wikilinks and embeds of a note, in line order
    ///
    /// # Errors
    /// Same as [`Vault::get_content`].
    pub fn get_links(&self, path: impl AsRef<Path>) -> Result<Vec<Link>> {
        self.with_entry(path.as_ref(), |entry| entry.links.clone())
    }

    /// Inline and frontmatter tags of a note, in line order
    ///
    /// # Errors
    /// Same as [`Vault::get_content`].
    pub fn get_tags(&self, path: impl AsRef<Path>) -> Result<Vec<Tag>> {
        self.with_entry(path.as_ref(), |entry| entry.tags.clone())
    }

    /// ATX headings of a note with note-unique slugs
    ///
    /// # Errors
    /// Same as [`Vault::get_content`].
    pub fn get_headings(&self, path: impl AsRef<Path>) -> Result<Vec<Heading>> {
        self.with_entry(path.as_ref(), |entry| entry.headings.clone())
    }

    /// Block identifiers of a note
    ///
    /// # Errors
    /// Same as [`Vault::get_content`].
    pub fn get_block_ids(&self, path: impl AsRef<Path>) -> Result<Vec<BlockId>> {
        self.with_entry(path.as_ref(), |entry| entry.blocks.clone())
    }

    /// Inline `[key::value]` attributes of a note, in line order
    ///
    /// # Errors
    /// Same as [`Vault::get_content`].
    pub fn get_inline_attrs(&self, path: impl AsRef<Path>) -> Result<Vec<InlineAttr>> {
        self.with_entry(path.as_ref(), |entry| entry.inline_attrs.clone())
    }

    /// Checkbox tasks of a note, `file` set to the note's path
    ///
    /// # Errors
    /// Same as [`Vault::get_content`].
    pub fn get_tasks(&self, path: impl AsRef<Path>) -> Result<Vec<Task>> {
        self.with_entry(path.as_ref(), |entry| entry.tasks.clone())
    }

    /// Resolve a reference string the way a wikilink target resolves
    ///
    /// Tries, in order: exact vault-relative path (`.md` as written or
    /// appended), base name (case-sensitive, then case-insensitive),
    /// frontmatter alias (case-insensitive). Name collisions settle
    /// deterministically: shortest path first, then lexicographic.
    ///
    /// # Errors
    /// [`Error::ReferenceNotFound`] when nothing matches.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn resolve_note(&self, reference: &str) -> Result<PathBuf> {
        self.refresh_aliases()?;

        self.read_index()
            .resolve(reference)
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::ReferenceNotFound(reference.to_string()))
    }

    /// Resolved references leaving a note, frontmatter links included
    ///
    /// `from_note` on each [`LinkRef`] is the resolved target.
    /// Unresolvable targets are omitted.
    ///
    /// # Errors
    /// [`Error::NoteNotFound`] for unknown paths.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), fields(path = %path.as_ref().display())))]
    pub fn get_outgoing_links(&self, path: impl AsRef<Path>) -> Result<Vec<LinkRef>> {
        let relative = self.vault_relative(path.as_ref())?;
        self.refresh_aliases()?;

        let index = self.read_index();
        if !index.contains(&relative) {
            return Err(Error::NoteNotFound(relative));
        }

        Ok(graph::outgoing_refs(&index, &relative))
    }

    /// References arriving at a note from everywhere else in the vault
    ///
    /// `from_note` on each [`LinkRef`] is the source note.
    ///
    /// # Errors
    /// [`Error::NoteNotFound`] for unknown paths.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), fields(path = %path.as_ref().display())))]
    pub fn get_incoming_links(&self, path: impl AsRef<Path>) -> Result<Vec<LinkRef>> {
        let relative = self.vault_relative(path.as_ref())?;
        self.refresh_aliases()?;

        let index = self.read_index();
        if !index.contains(&relative) {
            return Err(Error::NoteNotFound(relative));
        }

        Ok(graph::incoming_refs(&index, &relative))
    }

    /// Notes no other note links to, sorted
    ///
    /// # Errors
    /// Propagates alias-table refresh failures.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn orphaned_notes(&self) -> Result<Vec<PathBuf>> {
        self.refresh_aliases()?;
        Ok(graph::orphans(&self.read_index()))
    }

    /// Directed link graph of the whole vault (A → B means A links to B)
    ///
    /// Node weights are vault-relative paths as strings.
    ///
    /// # Errors
    /// Propagates alias-table refresh failures.
    ///
    /// # Example
    /// ```no_run
    /// use notevault::prelude::*;
    /// use petgraph::dot::{Config, Dot};
    ///
    /// let vault = Vault::open(VaultOptions::new("/path/to/vault")).unwrap();
    /// let graph = vault.get_digraph().unwrap();
    ///
    /// println!("{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel]));
    /// ```
    #[cfg(feature = "petgraph")]
    #[cfg_attr(docsrs, doc(cfg(feature = "petgraph")))]
    pub fn get_digraph(&self) -> Result<petgraph::graph::DiGraph<String, ()>> {
        self.refresh_aliases()?;
        Ok(graph::digraph(&self.read_index()))
    }

    /// Path to the vault root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}
