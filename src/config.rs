//! Options for opening a [`Vault`] and tuning task metadata detection
//!
//! [`Vault`]: crate::vault::Vault

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options for opening a [`Vault`]
///
/// [`Vault`]: crate::vault::Vault
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct VaultOptions {
    /// Path to vault root
    path: PathBuf,

    /// Task metadata configuration
    tasks: TaskConfig,
}

impl VaultOptions {
    /// Create new [`VaultOptions`] with default task glyphs
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            tasks: TaskConfig::default(),
        }
    }

    /// Replace the task metadata configuration
    #[must_use]
    pub fn with_tasks(mut self, tasks: TaskConfig) -> Self {
        self.tasks = tasks;
        self
    }

    /// Get path to vault root
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get task metadata configuration
    #[inline]
    #[must_use]
    pub const fn tasks(&self) -> &TaskConfig {
        &self.tasks
    }
}

/// Glyphs and indent unit used by the task extractor
///
/// Defaults match the Obsidian Tasks plugin conventions. Every glyph is a
/// plain string, so vaults that use non-emoji markers can override them.
///
/// # Example
/// ```
/// use notevault::config::TaskConfig;
///
/// let config = TaskConfig::default();
/// assert_eq!(config.due, "📅");
/// assert_eq!(config.indent_unit, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Marker preceding a due date
    #[serde(default = "default_due")]
    pub due: String,

    /// Marker preceding a scheduled date
    #[serde(default = "default_scheduled")]
    pub scheduled: String,

    /// Marker preceding a completion date
    #[serde(default = "default_done")]
    pub done: String,

    /// Highest-priority marker
    #[serde(default = "default_priority_highest")]
    pub priority_highest: String,

    /// High-priority marker
    #[serde(default = "default_priority_high")]
    pub priority_high: String,

    /// Medium-priority marker
    #[serde(default = "default_priority_medium")]
    pub priority_medium: String,

    /// Low-priority marker
    #[serde(default = "default_priority_low")]
    pub priority_low: String,

    /// Lowest-priority marker
    #[serde(default = "default_priority_lowest")]
    pub priority_lowest: String,

    /// Spaces per nesting level; a tab always counts as one level
    #[serde(default = "default_indent_unit")]
    pub indent_unit: usize,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            due: default_due(),
            scheduled: default_scheduled(),
            done: default_done(),
            priority_highest: default_priority_highest(),
            priority_high: default_priority_high(),
            priority_medium: default_priority_medium(),
            priority_low: default_priority_low(),
            priority_lowest: default_priority_lowest(),
            indent_unit: default_indent_unit(),
        }
    }
}

fn default_due() -> String {
    "📅".to_string()
}
fn default_scheduled() -> String {
    "⏳".to_string()
}
fn default_done() -> String {
    "✅".to_string()
}
fn default_priority_highest() -> String {
    "🔺".to_string()
}
fn default_priority_high() -> String {
    "⏫".to_string()
}
fn default_priority_medium() -> String {
    "🔼".to_string()
}
fn default_priority_low() -> String {
    "🔽".to_string()
}
fn default_priority_lowest() -> String {
    "⏬".to_string()
}
const fn default_indent_unit() -> usize {
    4
}
