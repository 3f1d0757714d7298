// ABOUTME: HTTP request handlers for bookmark operations
// ABOUTME: Handles CRUD operations and filtered listing with database integration

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use vault_storage::{StorageError, StorageResult};

use super::response::ApiError;
use crate::db::DbState;
use crate::types::{BookmarkCreateInput, BookmarkFilter, BookmarkUpdateInput};

#[derive(Deserialize)]
pub struct ListBookmarksQuery {
    pub q: Option<String>,
    pub tag: Option<String>,
    /// Comma-separated tag ids; bookmarks must carry all of them
    pub tag_ids: Option<String>,
}

fn parse_tag_ids(raw: &str) -> StorageResult<Vec<i64>> {
    let mut ids = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id = part
            .parse::<i64>()
            .map_err(|_| StorageError::validation(format!("invalid tag id: {}", part)))?;
        ids.push(id);
    }
    Ok(ids)
}

/// List bookmarks with optional filters
pub async fn list_bookmarks(
    State(db): State<DbState>,
    Query(params): Query<ListBookmarksQuery>,
) -> impl IntoResponse {
    info!("Listing bookmarks");

    let tag_ids = match params.tag_ids.as_deref() {
        Some(raw) => match parse_tag_ids(raw) {
            Ok(ids) if ids.is_empty() => None,
            Ok(ids) => Some(ids),
            Err(e) => return ApiError(e).into_response(),
        },
        None => None,
    };

    // Empty filter values behave as if absent
    let filter = BookmarkFilter {
        q: params.q.filter(|q| !q.trim().is_empty()),
        tag: params.tag.filter(|t| !t.trim().is_empty()),
        tag_ids,
    };

    match db.bookmark_storage.list_bookmarks(&filter).await {
        Ok(bookmarks) => (StatusCode::OK, ResponseJson(bookmarks)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// Request body for creating a bookmark
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBookmarkRequest {
    pub url: String,
    pub title: String,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub tag_ids: Option<Vec<i64>>,
}

/// Create a new bookmark
pub async fn create_bookmark(
    State(db): State<DbState>,
    Json(request): Json<CreateBookmarkRequest>,
) -> impl IntoResponse {
    info!("Creating bookmark: {}", request.title);

    let input = BookmarkCreateInput {
        url: request.url,
        title: request.title,
        notes: request.notes,
        tags: request.tags,
        tag_ids: request.tag_ids,
    };

    match db.bookmark_storage.create_bookmark(input).await {
        Ok(bookmark) => (StatusCode::CREATED, ResponseJson(bookmark)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// Get a single bookmark by id
pub async fn get_bookmark(State(db): State<DbState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("Getting bookmark: {}", id);

    match db.bookmark_storage.get_bookmark(id).await {
        Ok(bookmark) => (StatusCode::OK, ResponseJson(bookmark)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// Request body for partially updating a bookmark
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateBookmarkRequest {
    pub url: Option<String>,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub tag_ids: Option<Vec<i64>>,
}

/// Partially update a bookmark; a present tags/tag_ids replaces the
/// whole association set
pub async fn update_bookmark(
    State(db): State<DbState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateBookmarkRequest>,
) -> impl IntoResponse {
    info!("Updating bookmark: {}", id);

    let input = BookmarkUpdateInput {
        url: request.url,
        title: request.title,
        notes: request.notes,
        tags: request.tags,
        tag_ids: request.tag_ids,
    };

    match db.bookmark_storage.update_bookmark(id, input).await {
        Ok(bookmark) => (StatusCode::OK, ResponseJson(bookmark)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// Delete a bookmark
pub async fn delete_bookmark(State(db): State<DbState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("Deleting bookmark: {}", id);

    match db.bookmark_storage.delete_bookmark(id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "deleted": true }))).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
