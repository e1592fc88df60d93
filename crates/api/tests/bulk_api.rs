//! HTTP-level integration tests for `POST /{resource}/bulk`.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_category, create_thread, get, member, moderator, other_member,
    post_json_auth,
};
use sqlx::PgPool;

fn ids(json: &serde_json::Value) -> Vec<i64> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_bulk_destroy_skips_missing_items(pool: PgPool) {
    let category = create_category(&pool, "General", None).await;
    let first = create_thread(&pool, category, "First", &member()).await;
    let second = create_thread(&pool, category, "Second", &member()).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/threads/bulk",
        serde_json::json!({"action": "destroy", "items": [first, second, 999999]}),
        &moderator(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "2 threads deleted");
    assert_eq!(ids(&json), vec![first, second]);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/threads/{first}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_bulk_destroy_skips_forbidden_items(pool: PgPool) {
    let category = create_category(&pool, "General", None).await;
    let mine = create_thread(&pool, category, "Mine", &member()).await;
    let theirs = create_thread(&pool, category, "Theirs", &other_member()).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/threads/bulk",
        serde_json::json!({"action": "destroy", "items": [mine, theirs]}),
        &member(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "1 thread deleted");
    assert_eq!(ids(&json), vec![mine]);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/threads/{theirs}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_bulk_restore_and_force_destroy(pool: PgPool) {
    let category = create_category(&pool, "General", None).await;
    let a = create_thread(&pool, category, "A", &member()).await;
    let b = create_thread(&pool, category, "B", &member()).await;

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/v1/threads/bulk",
        serde_json::json!({"action": "destroy", "items": [a, b]}),
        &moderator(),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/threads/bulk",
        serde_json::json!({"action": "restore", "items": [a]}),
        &moderator(),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["message"], "1 thread restored");
    assert_eq!(ids(&json), vec![a]);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/threads/bulk",
        serde_json::json!({"action": "destroy", "items": [a, b], "force": true}),
        &moderator(),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["message"], "2 threads permanently deleted");

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/threads").await).await;
    assert_eq!(json["meta"]["total"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_bulk_update_keeps_updated_at(pool: PgPool) {
    let category = create_category(&pool, "General", None).await;
    let a = create_thread(&pool, category, "A", &member()).await;
    let b = create_thread(&pool, category, "B", &member()).await;

    let app = common::build_test_app(pool.clone());
    let before = body_json(get(app, &format!("/api/v1/threads/{a}")).await).await["data"]
        ["updated_at"]
        .clone();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/threads/bulk",
        serde_json::json!({"action": "update", "items": [a, b], "attributes": {"pinned": true}}),
        &moderator(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "2 threads updated");
    assert!(json["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|t| t["pinned"] == true));

    let app = common::build_test_app(pool);
    let after = body_json(get(app, &format!("/api/v1/threads/{a}")).await).await["data"]
        ["updated_at"]
        .clone();
    assert_eq!(before, after);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_bulk_pin_by_member_skips_every_item(pool: PgPool) {
    let category = create_category(&pool, "General", None).await;
    let own = create_thread(&pool, category, "Own", &member()).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/threads/bulk",
        serde_json::json!({"action": "update", "items": [own], "attributes": {"pinned": true}}),
        &member(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "0 threads updated");

    let app = common::build_test_app(pool);
    let thread = body_json(get(app, &format!("/api/v1/threads/{own}")).await).await;
    assert_eq!(thread["data"]["pinned"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_bulk_category_reparent_skips_cycles(pool: PgPool) {
    let root = create_category(&pool, "Root", None).await;
    let child = create_category(&pool, "Child", Some(root)).await;
    let target = create_category(&pool, "Target", None).await;

    // Moving `root` under `child` would create a cycle; `target` moves fine.
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/categories/bulk",
        serde_json::json!({"action": "update", "items": [root, target], "attributes": {"category_id": child}}),
        &common::admin(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "1 category updated");
    assert_eq!(ids(&json), vec![target]);
    assert_eq!(json["data"][0]["category_id"], child);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_bulk_with_empty_items_is_422(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/posts/bulk",
        serde_json::json!({"action": "restore", "items": []}),
        &moderator(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_bulk_unknown_action_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/posts/bulk",
        serde_json::json!({"action": "explode", "items": [1]}),
        &moderator(),
    )
    .await;
    assert!(response.status().is_client_error());
}
