//! Error handling for vault operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vault operations
///
/// Extraction functions never fail on malformed Markdown: constructs that
/// do not match are simply not reported. Errors are reserved for identity
/// problems (unknown notes, unresolvable references) and for the filesystem.
#[derive(Debug, Error)]
pub enum Error {
    /// A note path that is not known to the vault
    #[error("Note not found: {0}")]
    NoteNotFound(PathBuf),

    /// A reference string that matched no path, base name or alias
    ///
    /// # Example
    /// ```no_run
    /// use notevault::prelude::*;
    ///
    /// let vault = Vault::open(VaultOptions::new("/path/to/vault")).unwrap();
    /// vault.resolve_note("no-such-note").unwrap_err();
    /// ```
    #[error("Unresolvable reference: `{0}`")]
    ReferenceNotFound(String),

    /// The vault root is not a directory
    #[error("Path: `{0}` is not a directory")]
    IsNotDir(PathBuf),

    /// A note path that would escape the vault root
    ///
    /// Absolute paths outside the root and `..` components are rejected
    /// before any filesystem access happens.
    #[error("Path: `{0}` is outside the vault")]
    OutsideVault(PathBuf),

    /// Note bytes could not be read as UTF-8 text
    ///
    /// Malformed frontmatter is *not* this error: it degrades to
    /// "no frontmatter" instead of failing the note.
    #[error("Invalid content in `{path}`: {message}")]
    InvalidContent { path: PathBuf, message: String },

    /// I/O operation failed (file reading, directory traversal, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid glob pattern passed to `list_notes_matching`
    #[error("Glob pattern error: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, Error>;
