//! All prelude

pub use crate::config::{TaskConfig, VaultOptions};
pub use crate::error::{Error, Result};
pub use crate::graph::LinkRef;
pub use crate::parse::{
    BlockId, BlockType, Heading, InlineAttr, Link, Priority, Tag, Task, TaskSymbol,
    parse_content_block_ids, parse_content_headings, parse_content_tags, parse_frontmatter,
    parse_inline_attrs, parse_links, parse_tasks,
};
pub use crate::scan::{ScannedLine, Zone, scan};
pub use crate::vault::Vault;
