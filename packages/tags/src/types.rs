// ABOUTME: Tag type definitions and name normalization
// ABOUTME: Structures for tags used to label bookmarks

use serde::{Deserialize, Serialize};

/// Color assigned to tags created implicitly through name resolution.
pub const DEFAULT_TAG_COLOR: &str = "#94a3b8";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCreateInput {
    pub name: String,
    pub color: Option<String>,
}

/// Canonical form of a tag name: trimmed, lowercased, internal
/// whitespace runs collapsed to single spaces. Idempotent.
pub fn normalize_tag_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
