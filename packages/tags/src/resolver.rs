// ABOUTME: Resolves raw tag input (names or ids) into canonical Tag rows
// ABOUTME: Name mode is get-or-create; id mode is strict lookup

use sqlx::SqliteConnection;
use tracing::debug;

use vault_storage::{StorageError, StorageResult};

use crate::storage::row_to_tag;
use crate::types::{normalize_tag_name, Tag, DEFAULT_TAG_COLOR};

/// Maximum normalized length accepted by name resolution.
pub const MAX_RESOLVED_NAME_LEN: usize = 20;

/// Resolve free-form tag names into canonical tags, creating missing
/// ones. Names are normalized; empties are skipped; duplicates collapse
/// to one tag keeping first-seen order.
///
/// Runs on a plain connection so callers can scope it to their own
/// transaction: a failure mid-way must roll back any tags the caller
/// would have associated.
pub async fn resolve_names(
    conn: &mut SqliteConnection,
    names: &[String],
) -> StorageResult<Vec<Tag>> {
    let mut tags: Vec<Tag> = Vec::new();

    for raw in names {
        let name = normalize_tag_name(raw);
        if name.is_empty() {
            continue;
        }
        if name.chars().count() > MAX_RESOLVED_NAME_LEN {
            return Err(StorageError::validation(format!("tag too long: {}", name)));
        }
        if tags.iter().any(|t| t.name == name) {
            continue;
        }

        // Atomic get-or-create keyed on the unique name column. The
        // no-op DO UPDATE makes RETURNING yield the existing row on
        // conflict instead of erroring.
        let row = sqlx::query(
            r#"
            INSERT INTO tags (name, color)
            VALUES (?, ?)
            ON CONFLICT(name) DO UPDATE SET name = excluded.name
            RETURNING id, name, color
            "#,
        )
        .bind(&name)
        .bind(DEFAULT_TAG_COLOR)
        .fetch_one(&mut *conn)
        .await?;

        tags.push(row_to_tag(&row)?);
    }

    debug!("Resolved {} tag name(s) to {} tag(s)", names.len(), tags.len());
    Ok(tags)
}

/// Resolve tag ids into canonical tags. Never creates: if any distinct
/// requested id is missing the whole resolution fails, so callers never
/// end up with a partial association set.
pub async fn resolve_ids(conn: &mut SqliteConnection, ids: &[i64]) -> StorageResult<Vec<Tag>> {
    let mut distinct: Vec<i64> = Vec::new();
    for id in ids {
        if !distinct.contains(id) {
            distinct.push(*id);
        }
    }

    if distinct.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; distinct.len()].join(", ");
    let sql = format!("SELECT id, name, color FROM tags WHERE id IN ({})", placeholders);

    let mut query = sqlx::query(&sql);
    for id in &distinct {
        query = query.bind(id);
    }

    let rows = query.fetch_all(&mut *conn).await?;
    if rows.len() != distinct.len() {
        return Err(StorageError::validation("one or more tag ids not found"));
    }

    let mut fetched = Vec::with_capacity(rows.len());
    for row in &rows {
        fetched.push(row_to_tag(row)?);
    }

    // Preserve the requested order
    let mut tags = Vec::with_capacity(distinct.len());
    for id in &distinct {
        if let Some(tag) = fetched.iter().find(|t| t.id == *id) {
            tags.push(tag.clone());
        }
    }

    Ok(tags)
}
