#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use forum_core::roles::Role;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use forum_api::auth::jwt::{generate_access_token, JwtConfig};
use forum_api::config::{ForumConfig, ServerConfig};
use forum_api::router::build_app;
use forum_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and a fixed token secret.
///
/// Posts are paged two at a time so page arithmetic is easy to exercise.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "forum-test-secret-that-is-long-enough".to_string(),
            access_token_expiry_mins: 15,
        },
        forum: ForumConfig {
            posts_per_page: 2,
            ..ForumConfig::default()
        },
    }
}

/// The production router over `pool`, configured by [`test_config`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(AppState::new(pool, test_config()))
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

pub const ADMIN_ID: i64 = 1;
pub const MODERATOR_ID: i64 = 2;
pub const MEMBER_ID: i64 = 3;
pub const OTHER_MEMBER_ID: i64 = 4;

/// A bearer token for `user_id` with `role`, signed with the test secret.
pub fn token(user_id: i64, role: Role) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

pub fn admin() -> String {
    token(ADMIN_ID, Role::Admin)
}

pub fn moderator() -> String {
    token(MODERATOR_ID, Role::Moderator)
}

pub fn member() -> String {
    token(MEMBER_ID, Role::Member)
}

pub fn other_member() -> String {
    token(OTHER_MEMBER_ID, Role::Member)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::PATCH, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Read the response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a category as admin and return its id.
pub async fn create_category(pool: &PgPool, title: &str, parent: Option<i64>) -> i64 {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/categories",
        serde_json::json!({ "title": title, "category_id": parent }),
        &admin(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Start a thread in `category_id` as `token`'s user and return its id.
pub async fn create_thread(pool: &PgPool, category_id: i64, title: &str, token: &str) -> i64 {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/categories/{category_id}/threads"),
        serde_json::json!({ "title": title, "content": "Opening post" }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Reply to `thread_id` as `token`'s user and return the post id.
pub async fn reply(pool: &PgPool, thread_id: i64, content: &str, token: &str) -> i64 {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/threads/{thread_id}/posts"),
        serde_json::json!({ "content": content }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
