//! Content module - content items, front-matter and the item store

pub mod body;
mod error;
mod frontmatter;
mod item;
pub mod listing;
mod path;
pub mod store;

pub use error::ContentError;
pub use frontmatter::{parse_date, Format, FrontMatter, ParseOptions};
pub use item::ContentItem;
pub use listing::{listing, sort_by_date_desc, ListingOptions};
pub use path::ContentPath;
pub use store::{ContentStore, ScanReport, StoreOptions};
