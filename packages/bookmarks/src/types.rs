// ABOUTME: Bookmark type definitions and request inputs
// ABOUTME: Structures for bookmarks, partial updates, and list filters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vault_storage::{StorageError, StorageResult};
use vault_tags::Tag;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub notes: String,
    /// Associated tags, sorted by name
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookmarkCreateInput {
    pub url: String,
    pub title: String,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub tag_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookmarkUpdateInput {
    pub url: Option<String>,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub tag_ids: Option<Vec<i64>>,
}

/// Optional list filters, applied conjunctively when combined
#[derive(Debug, Clone, Default)]
pub struct BookmarkFilter {
    /// Case-insensitive substring match against title, notes, or url
    pub q: Option<String>,
    /// Single tag by (normalized) name
    pub tag: Option<String>,
    /// Bookmarks must carry ALL of these tag ids
    pub tag_ids: Option<Vec<i64>>,
}

/// Which form of tag input a create/update request carried. A request
/// may use names (get-or-create) or ids (strict lookup), not both.
#[derive(Debug, Clone)]
pub enum TagSelector {
    Names(Vec<String>),
    Ids(Vec<i64>),
}

impl TagSelector {
    pub fn from_parts(
        tags: Option<Vec<String>>,
        tag_ids: Option<Vec<i64>>,
    ) -> StorageResult<Option<Self>> {
        match (tags, tag_ids) {
            (Some(_), Some(_)) => Err(StorageError::validation(
                "provide either tags or tag_ids, not both",
            )),
            (Some(names), None) => Ok(Some(TagSelector::Names(names))),
            (None, Some(ids)) => Ok(Some(TagSelector::Ids(ids))),
            (None, None) => Ok(None),
        }
    }
}
