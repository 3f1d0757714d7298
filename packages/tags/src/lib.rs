// ABOUTME: Tag management system for labelling bookmarks
// ABOUTME: Provides types, storage layer, and the tag resolver

pub mod resolver;
pub mod storage;
pub mod types;

// Re-export main types
pub use resolver::{resolve_ids, resolve_names};
pub use storage::TagStorage;
pub use types::{normalize_tag_name, Tag, TagCreateInput};
