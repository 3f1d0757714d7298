use axum::{
    routing::{delete, get},
    Router,
};

use crate::db::DbState;

pub mod handlers;
pub mod response;
pub mod tags_handlers;

/// Creates the bookmarks API router
pub fn create_bookmarks_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_bookmarks).post(handlers::create_bookmark),
        )
        .route(
            "/{id}",
            get(handlers::get_bookmark)
                .patch(handlers::update_bookmark)
                .delete(handlers::delete_bookmark),
        )
        .route(
            "/{id}/",
            get(handlers::get_bookmark)
                .patch(handlers::update_bookmark)
                .delete(handlers::delete_bookmark),
        )
}

/// Creates the tags API router
pub fn create_tags_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(tags_handlers::list_tags).post(tags_handlers::create_tag),
        )
        .route("/{id}", delete(tags_handlers::delete_tag))
        .route("/{id}/", delete(tags_handlers::delete_tag))
}
