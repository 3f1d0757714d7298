//! # Vault Bookmarks
//!
//! A bookmark management library for Vault that provides CRUD operations
//! for bookmarks and their tag associations with persistent storage.

pub mod api;
pub mod db;
pub mod storage;
pub mod types;

// Re-export main types
pub use db::DbState;
pub use storage::BookmarkStorage;
pub use types::{
    Bookmark, BookmarkCreateInput, BookmarkFilter, BookmarkUpdateInput, TagSelector,
};

// Re-export tag types used by API handlers
pub use vault_tags::{normalize_tag_name, Tag, TagCreateInput, TagStorage};

// Re-export storage error types
pub use vault_storage::{StorageError, StorageResult};
