// ABOUTME: Bookmark storage layer using SQLite
// ABOUTME: Handles CRUD, filtered listing, and transactional tag association

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::debug;

use vault_storage::{StorageError, StorageResult};
use vault_tags::{normalize_tag_name, resolve_ids, resolve_names, Tag};

use crate::types::{
    Bookmark, BookmarkCreateInput, BookmarkFilter, BookmarkUpdateInput, TagSelector,
};

/// Turns a user query into a LIKE pattern, escaping LIKE metacharacters
fn like_pattern(q: &str) -> String {
    let escaped = q
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn row_to_bookmark(row: &SqliteRow) -> StorageResult<Bookmark> {
    Ok(Bookmark {
        id: row.try_get("id")?,
        url: row.try_get("url")?,
        title: row.try_get("title")?,
        notes: row.try_get("notes")?,
        tags: Vec::new(),
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn sorted_by_name(mut tags: Vec<Tag>) -> Vec<Tag> {
    tags.sort_by(|a, b| a.name.cmp(&b.name));
    tags
}

pub struct BookmarkStorage {
    pool: SqlitePool,
}

impl BookmarkStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List bookmarks, newest first, applying any combination of the
    /// optional filters conjunctively.
    pub async fn list_bookmarks(&self, filter: &BookmarkFilter) -> StorageResult<Vec<Bookmark>> {
        debug!("Listing bookmarks (filter: {:?})", filter);

        let mut sql = String::from(
            "SELECT id, url, title, notes, created_at, updated_at FROM bookmarks",
        );
        let mut conditions: Vec<String> = Vec::new();

        if filter.q.is_some() {
            conditions.push(
                "(title LIKE ? ESCAPE '\\' OR notes LIKE ? ESCAPE '\\' OR url LIKE ? ESCAPE '\\')"
                    .to_string(),
            );
        }
        if filter.tag.is_some() {
            conditions.push(
                "id IN (SELECT bt.bookmark_id FROM bookmark_tags bt \
                 JOIN tags t ON t.id = bt.tag_id WHERE t.name = ?)"
                    .to_string(),
            );
        }

        let distinct_ids: Vec<i64> = match &filter.tag_ids {
            Some(ids) => {
                let mut distinct = Vec::new();
                for id in ids {
                    if !distinct.contains(id) {
                        distinct.push(*id);
                    }
                }
                distinct
            }
            None => Vec::new(),
        };
        if !distinct_ids.is_empty() {
            // AND semantics: the bookmark must carry every requested id
            let placeholders = vec!["?"; distinct_ids.len()].join(", ");
            conditions.push(format!(
                "id IN (SELECT bookmark_id FROM bookmark_tags WHERE tag_id IN ({}) \
                 GROUP BY bookmark_id HAVING COUNT(DISTINCT tag_id) = ?)",
                placeholders
            ));
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut query = sqlx::query(&sql);
        if let Some(ref q) = filter.q {
            let pattern = like_pattern(q);
            query = query
                .bind(pattern.clone())
                .bind(pattern.clone())
                .bind(pattern);
        }
        if let Some(ref tag) = filter.tag {
            query = query.bind(normalize_tag_name(tag));
        }
        if !distinct_ids.is_empty() {
            for id in &distinct_ids {
                query = query.bind(id);
            }
            query = query.bind(distinct_ids.len() as i64);
        }

        let rows = query.fetch_all(&self.pool).await?;

        let mut bookmarks = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut bookmark = row_to_bookmark(row)?;
            bookmark.tags = self.load_tags(bookmark.id).await?;
            bookmarks.push(bookmark);
        }

        Ok(bookmarks)
    }

    pub async fn get_bookmark(&self, bookmark_id: i64) -> StorageResult<Bookmark> {
        debug!("Fetching bookmark: {}", bookmark_id);

        let row = sqlx::query(
            "SELECT id, url, title, notes, created_at, updated_at FROM bookmarks WHERE id = ?",
        )
        .bind(bookmark_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound("bookmark"))?;

        let mut bookmark = row_to_bookmark(&row)?;
        bookmark.tags = self.load_tags(bookmark.id).await?;
        Ok(bookmark)
    }

    /// Create a bookmark and associate its tags in one transaction.
    /// A tag resolution failure rolls the whole create back, so no
    /// bookmark is ever left dangling without its tags.
    pub async fn create_bookmark(&self, input: BookmarkCreateInput) -> StorageResult<Bookmark> {
        let url = input.url.trim().to_string();
        let title = input.title.trim().to_string();
        if url.is_empty() || title.is_empty() {
            return Err(StorageError::validation("url and title are required"));
        }
        let notes = input.notes.unwrap_or_default().trim().to_string();
        let selector = TagSelector::from_parts(input.tags, input.tag_ids)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO bookmarks (url, title, notes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&url)
        .bind(&title)
        .bind(&notes)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        let tags = match selector {
            Some(ref selector) => Self::resolve_and_associate(&mut tx, id, selector).await?,
            None => Vec::new(),
        };

        tx.commit().await?;
        debug!("Created bookmark {} with {} tag(s)", id, tags.len());

        Ok(Bookmark {
            id,
            url,
            title,
            notes,
            tags: sorted_by_name(tags),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update. Only fields present in the input change;
    /// a present tags/tag_ids fully replaces the association set.
    /// Every successful update advances updated_at.
    pub async fn update_bookmark(
        &self,
        bookmark_id: i64,
        input: BookmarkUpdateInput,
    ) -> StorageResult<Bookmark> {
        let selector = TagSelector::from_parts(input.tags, input.tag_ids)?;

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT id, url, title, notes, created_at, updated_at FROM bookmarks WHERE id = ?",
        )
        .bind(bookmark_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound("bookmark"))?;
        let mut bookmark = row_to_bookmark(&row)?;

        if let Some(url) = input.url {
            let url = url.trim().to_string();
            if url.is_empty() {
                return Err(StorageError::validation("url cannot be empty"));
            }
            bookmark.url = url;
        }
        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(StorageError::validation("title cannot be empty"));
            }
            bookmark.title = title;
        }
        if let Some(notes) = input.notes {
            bookmark.notes = notes.trim().to_string();
        }
        bookmark.updated_at = Utc::now();

        sqlx::query("UPDATE bookmarks SET url = ?, title = ?, notes = ?, updated_at = ? WHERE id = ?")
            .bind(&bookmark.url)
            .bind(&bookmark.title)
            .bind(&bookmark.notes)
            .bind(bookmark.updated_at)
            .bind(bookmark.id)
            .execute(&mut *tx)
            .await?;

        bookmark.tags = match selector {
            Some(ref selector) => {
                sqlx::query("DELETE FROM bookmark_tags WHERE bookmark_id = ?")
                    .bind(bookmark.id)
                    .execute(&mut *tx)
                    .await?;
                sorted_by_name(Self::resolve_and_associate(&mut tx, bookmark.id, selector).await?)
            }
            None => {
                let rows = sqlx::query(
                    "SELECT t.id, t.name, t.color FROM tags t \
                     JOIN bookmark_tags bt ON bt.tag_id = t.id \
                     WHERE bt.bookmark_id = ? ORDER BY t.name",
                )
                .bind(bookmark.id)
                .fetch_all(&mut *tx)
                .await?;
                rows.iter().map(row_to_tag).collect::<StorageResult<_>>()?
            }
        };

        tx.commit().await?;
        debug!("Updated bookmark {}", bookmark.id);

        Ok(bookmark)
    }

    /// Delete a bookmark and its tag associations. The tags themselves
    /// survive.
    pub async fn delete_bookmark(&self, bookmark_id: i64) -> StorageResult<()> {
        debug!("Deleting bookmark: {}", bookmark_id);

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM bookmark_tags WHERE bookmark_id = ?")
            .bind(bookmark_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM bookmarks WHERE id = ?")
            .bind(bookmark_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("bookmark"));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn resolve_and_associate(
        tx: &mut Transaction<'_, Sqlite>,
        bookmark_id: i64,
        selector: &TagSelector,
    ) -> StorageResult<Vec<Tag>> {
        let tags = match selector {
            TagSelector::Names(names) => resolve_names(&mut *tx, names).await?,
            TagSelector::Ids(ids) => resolve_ids(&mut *tx, ids).await?,
        };

        for tag in &tags {
            sqlx::query(
                "INSERT OR IGNORE INTO bookmark_tags (bookmark_id, tag_id) VALUES (?, ?)",
            )
            .bind(bookmark_id)
            .bind(tag.id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(tags)
    }

    async fn load_tags(&self, bookmark_id: i64) -> StorageResult<Vec<Tag>> {
        let rows = sqlx::query(
            "SELECT t.id, t.name, t.color FROM tags t \
             JOIN bookmark_tags bt ON bt.tag_id = t.id \
             WHERE bt.bookmark_id = ? ORDER BY t.name",
        )
        .bind(bookmark_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_tag).collect()
    }
}

fn row_to_tag(row: &SqliteRow) -> StorageResult<Tag> {
    Ok(Tag {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        color: row.try_get("color")?,
    })
}
