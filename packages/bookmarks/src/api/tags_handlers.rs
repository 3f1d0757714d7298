// ABOUTME: HTTP request handlers for tag operations
// ABOUTME: Handles listing, create-or-update-color, and deletion of tags

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::response::ApiError;
use crate::db::DbState;
use vault_tags::TagCreateInput;

/// List all tags, alphabetical by name
pub async fn list_tags(State(db): State<DbState>) -> impl IntoResponse {
    info!("Listing tags");

    match db.tag_storage.list_tags().await {
        Ok(tags) => (StatusCode::OK, ResponseJson(tags)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// Request body for creating a tag
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTagRequest {
    pub name: String,
    pub color: Option<String>,
}

/// Create a tag, or update the color of the tag with the same name
pub async fn create_tag(
    State(db): State<DbState>,
    Json(request): Json<CreateTagRequest>,
) -> impl IntoResponse {
    info!("Creating tag: {}", request.name);

    let input = TagCreateInput {
        name: request.name,
        color: request.color,
    };

    match db.tag_storage.create_or_update_tag(input).await {
        Ok((tag, created)) => {
            let status = if created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, ResponseJson(tag)).into_response()
        }
        Err(e) => ApiError(e).into_response(),
    }
}

/// Delete a tag; it is removed from every bookmark's tag set
pub async fn delete_tag(State(db): State<DbState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("Deleting tag: {}", id);

    match db.tag_storage.delete_tag(id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "deleted": true }))).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
