//! Pure extraction functions over note content
//!
//! Every extractor here is a pure function: same content in, same records
//! out, no filesystem and no locks. They all ride on the zone-tagged
//! [`scan`](crate::scan::scan) stream, so fenced code is excluded once,
//! uniformly.
//!
//! Line numbers in every record are 1-based and file-absolute.

pub mod block_id;
pub mod frontmatter;
pub mod heading;
pub mod inline_attr;
pub mod tag;
pub mod task;
pub mod wikilink;

pub use block_id::{BlockId, BlockType, parse_content_block_ids};
pub use frontmatter::parse_frontmatter;
pub use heading::{Heading, parse_content_headings};
pub use inline_attr::{InlineAttr, parse_inline_attrs};
pub use tag::{Tag, parse_content_tags};
pub use task::{Priority, Task, TaskSymbol, parse_tasks};
pub use wikilink::{Link, parse_links};
