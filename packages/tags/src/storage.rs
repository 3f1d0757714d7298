// ABOUTME: Tag storage layer using SQLite
// ABOUTME: Handles listing, create-or-update by name, and deletion

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use vault_storage::{StorageError, StorageResult};

use crate::types::{normalize_tag_name, Tag, TagCreateInput, DEFAULT_TAG_COLOR};

/// Maximum normalized length accepted when creating a tag directly.
pub const MAX_TAG_NAME_LEN: usize = 32;

pub(crate) fn row_to_tag(row: &SqliteRow) -> StorageResult<Tag> {
    Ok(Tag {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        color: row.try_get("color")?,
    })
}

pub struct TagStorage {
    pool: SqlitePool,
}

impl TagStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all tags, alphabetical by name
    pub async fn list_tags(&self) -> StorageResult<Vec<Tag>> {
        debug!("Fetching all tags");

        let rows = sqlx::query("SELECT id, name, color FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_tag).collect()
    }

    pub async fn get_tag(&self, tag_id: i64) -> StorageResult<Tag> {
        let row = sqlx::query("SELECT id, name, color FROM tags WHERE id = ?")
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound("tag"))?;

        row_to_tag(&row)
    }

    pub async fn get_tag_by_name(&self, name: &str) -> StorageResult<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, color FROM tags WHERE name = ?")
            .bind(normalize_tag_name(name))
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_tag).transpose()
    }

    /// Create a tag, or update the color of the existing tag with the
    /// same normalized name. Returns the tag and whether it was created.
    pub async fn create_or_update_tag(&self, input: TagCreateInput) -> StorageResult<(Tag, bool)> {
        let name = normalize_tag_name(&input.name);
        if name.is_empty() {
            return Err(StorageError::validation("tag name is required"));
        }
        if name.chars().count() > MAX_TAG_NAME_LEN {
            return Err(StorageError::validation(format!("tag name too long: {}", name)));
        }
        if let Some(ref color) = input.color {
            if !color.starts_with('#') || color.chars().count() != 7 {
                return Err(StorageError::validation(format!("invalid color: {}", color)));
            }
        }

        if let Some(existing) = self.get_tag_by_name(&name).await? {
            match input.color {
                Some(color) if color != existing.color => {
                    debug!("Updating color of tag {} to {}", existing.id, color);

                    sqlx::query("UPDATE tags SET color = ? WHERE id = ?")
                        .bind(&color)
                        .bind(existing.id)
                        .execute(&self.pool)
                        .await?;

                    Ok((Tag { color, ..existing }, false))
                }
                _ => Ok((existing, false)),
            }
        } else {
            let color = input.color.unwrap_or_else(|| DEFAULT_TAG_COLOR.to_string());

            // Upsert so a concurrent create of the same name returns the
            // winning row instead of a unique-constraint error.
            let row = sqlx::query(
                r#"
                INSERT INTO tags (name, color)
                VALUES (?, ?)
                ON CONFLICT(name) DO UPDATE SET color = excluded.color
                RETURNING id, name, color
                "#,
            )
            .bind(&name)
            .bind(&color)
            .fetch_one(&self.pool)
            .await?;

            Ok((row_to_tag(&row)?, true))
        }
    }

    /// Delete a tag by id, removing it from every bookmark's tag set.
    /// The bookmarks themselves survive.
    pub async fn delete_tag(&self, tag_id: i64) -> StorageResult<()> {
        debug!("Deleting tag: {}", tag_id);

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM bookmark_tags WHERE tag_id = ?")
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("tag"));
        }

        tx.commit().await?;
        Ok(())
    }
}
