// ABOUTME: Router-level tests for the bookmarks and tags API
// ABOUTME: Exercises status codes, error mapping, and JSON bodies end to end

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::util::ServiceExt;

use vault_bookmarks::api::{create_bookmarks_router, create_tags_router};
use vault_bookmarks::DbState;

async fn create_test_db() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();

    sqlx::query(
        r#"
        CREATE TABLE tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            color TEXT NOT NULL DEFAULT '#94a3b8'
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE bookmarks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL,
            title TEXT NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE bookmark_tags (
            bookmark_id INTEGER NOT NULL,
            tag_id INTEGER NOT NULL,
            PRIMARY KEY (bookmark_id, tag_id)
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    pool
}

async fn setup_app() -> Router {
    let db = DbState::new(create_test_db().await);
    Router::new()
        .nest("/api/bookmarks/", create_bookmarks_router())
        .nest("/api/tags/", create_tags_router())
        .with_state(db)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_bookmark_returns_created() {
    let app = setup_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/bookmarks/",
            json!({
                "url": "https://example.com",
                "title": "Example",
                "notes": "a note",
                "tags": ["Reading", "reading"]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["url"], "https://example.com");
    assert_eq!(body["title"], "Example");
    assert_eq!(body["tags"].as_array().unwrap().len(), 1);
    assert_eq!(body["tags"][0]["name"], "reading");
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_create_bookmark_missing_title_is_bad_request() {
    let app = setup_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/bookmarks/",
            json!({ "url": "https://example.com", "title": "  " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "url and title are required");
}

#[tokio::test]
async fn test_malformed_json_body_is_client_error() {
    let app = setup_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/bookmarks/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_get_unknown_bookmark_is_not_found() {
    let app = setup_app().await;

    let response = app.oneshot(get_request("/api/bookmarks/999999/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "bookmark not found");
}

#[tokio::test]
async fn test_malformed_tag_ids_filter_is_bad_request() {
    let app = setup_app().await;

    let response = app
        .oneshot(get_request("/api/bookmarks/?tag_ids=1,abc"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tag_ids_filter_requires_all_tags() {
    let app = setup_app().await;

    // Two tags via the tags endpoint
    let first = response_json(
        app.clone()
            .oneshot(json_request("POST", "/api/tags/", json!({ "name": "one" })))
            .await
            .unwrap(),
    )
    .await;
    let second = response_json(
        app.clone()
            .oneshot(json_request("POST", "/api/tags/", json!({ "name": "two" })))
            .await
            .unwrap(),
    )
    .await;
    let (one_id, two_id) = (first["id"].as_i64().unwrap(), second["id"].as_i64().unwrap());

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/bookmarks/",
            json!({ "url": "https://both.test", "title": "Both", "tag_ids": [one_id, two_id] }),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/bookmarks/",
            json!({ "url": "https://one.test", "title": "Only one", "tag_ids": [one_id] }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(get_request(&format!(
            "/api/bookmarks/?tag_ids={},{}",
            one_id, two_id
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "Both");
}

#[tokio::test]
async fn test_create_bookmark_with_unknown_tag_id_is_bad_request() {
    let app = setup_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/bookmarks/",
            json!({ "url": "https://x.test", "title": "X", "tag_ids": [12345] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "one or more tag ids not found");
}

#[tokio::test]
async fn test_patch_updates_only_present_fields() {
    let app = setup_app().await;

    let created = response_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/bookmarks/",
                json!({ "url": "https://patch.test", "title": "Before", "notes": "keep" }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/api/bookmarks/{}/", id),
            json!({ "title": "After" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["title"], "After");
    assert_eq!(body["url"], "https://patch.test");
    assert_eq!(body["notes"], "keep");
    assert_eq!(body["created_at"], created["created_at"]);
}

#[tokio::test]
async fn test_delete_bookmark_leaves_tags_listable() {
    let app = setup_app().await;

    let created = response_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/bookmarks/",
                json!({ "url": "https://del.test", "title": "Del", "tags": ["keeper"] }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/bookmarks/{}/", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["deleted"], true);

    let tags = response_json(app.oneshot(get_request("/api/tags/")).await.unwrap()).await;
    let list = tags.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "keeper");
}

#[tokio::test]
async fn test_create_tag_validates_color() {
    let app = setup_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tags/",
            json!({ "name": "bad", "color": "123456" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/tags/",
            json!({ "name": "good", "color": "#123456" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["color"], "#123456");
}

#[tokio::test]
async fn test_recreate_tag_updates_color_with_ok_status() {
    let app = setup_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tags/",
            json!({ "name": "accent", "color": "#111111" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/tags/",
            json!({ "name": "accent", "color": "#222222" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["color"], "#222222");
}

#[tokio::test]
async fn test_delete_unknown_tag_is_not_found() {
    let app = setup_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/tags/999999/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
