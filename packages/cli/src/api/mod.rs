use axum::{routing::get, Router};

use vault_bookmarks::{api as bookmarks_api, DbState};

pub mod health;

/// Assemble the full application router over shared database state
pub fn create_router(db: DbState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api/bookmarks/", bookmarks_api::create_bookmarks_router())
        .nest("/api/tags/", bookmarks_api::create_tags_router())
        .with_state(db)
}
