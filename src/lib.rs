//! `notevault` - Parsing, resolution and link-graph engine for [Obsidian](https://obsidian.md)-style Markdown vaults
//!
//! Provides idiomatic APIs for:
//! - Extracting wikilinks, tags, headings, block ids and checkbox tasks
//!   from individual notes
//! - Resolving reference strings to notes by path, base name or alias
//! - Querying the vault-wide link graph (outgoing, incoming, orphans)
//!
//! ## Key Features
//! * 🔗 **Wikilink Parsing**: All bracket forms, embeds, heading and block
//!   fragments
//! * 🏷️ **Tags Everywhere**: Inline tags and frontmatter `tags` values,
//!   with real line numbers for both
//! * ✅ **Task Metadata**: Due/scheduled/done dates, priorities and tags
//!   in the Obsidian Tasks glyph convention, all configurable
//! * 🧠 **Knowledge Graphs**: Optional [`petgraph`](https://docs.rs/petgraph/latest/petgraph)
//!   export for advanced analysis
//! * 🔍 **Frontmatter Parsing**: YAML properties with
//!   [`serde`](https://docs.rs/serde/latest/serde) compatibility
//!
//! ## Usage
//! Add to `Cargo.toml`:
//! ```toml
//! [dependencies]
//! notevault = { version = "0.1", features = ["petgraph"] }
//! ```
//!
//! ## Examples
//!
//! ### Parsing note content directly
//! ```
//! use notevault::prelude::*;
//!
//! let content = "# Projects\nSee [[Rust Crate|the crate]] #active";
//!
//! let links = parse_links(content);
//! assert_eq!(links[0].target, "Rust Crate");
//!
//! let tags = parse_content_tags(content);
//! assert_eq!(tags[0].name, "active");
//! ```
//!
//! ### Working with a vault
//! ```no_run
//! use notevault::prelude::*;
//!
//! let vault = Vault::open(VaultOptions::new("/path/to/vault")).unwrap();
//!
//! // Resolve a wikilink target the way the editor would
//! let path = vault.resolve_note("quantum mechanics").unwrap();
//!
//! // Who links here?
//! for incoming in vault.get_incoming_links(&path).unwrap() {
//!     println!("{} (line {})", incoming.from_note.display(), incoming.line);
//! }
//! ```
//!
//! ### Graph Analysis (requires [`petgraph`](https://docs.rs/petgraph/latest/petgraph) feature)
//! ```no_run
//! #[cfg(feature = "petgraph")]
//! {
//!     use notevault::prelude::*;
//!     use petgraph::dot::{Config, Dot};
//!
//!     let vault = Vault::open(VaultOptions::new("/path/to/vault")).unwrap();
//!     let graph = vault.get_digraph().unwrap();
//!
//!     // Export to Graphviz format
//!     println!("{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel]));
//! }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::cargo)]
#![warn(clippy::nursery)]
#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::panic)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::unreadable_literal)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::as_conversions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod graph;
pub mod parse;
pub mod prelude;
pub mod scan;
pub mod vault;

mod index;
