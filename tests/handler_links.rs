mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;

const KEY: &str = "owner-api-key";
const OTHER_KEY: &str = "other-api-key";

// ─── Authentication ──────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_missing_api_key_is_unauthorized(pool: PgPool) {
    let server = common::make_api_server(pool);

    let response = server.get("/api/v1/links").await;

    response.assert_status_unauthorized();
    assert_eq!(response.header("www-authenticate"), "Bearer");
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[sqlx::test]
async fn test_unknown_api_key_is_unauthorized(pool: PgPool) {
    common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    let server = common::make_api_server(pool);

    server
        .get("/api/v1/links")
        .add_header("X-API-Key", "not-a-real-key")
        .await
        .assert_status_unauthorized();
}

#[sqlx::test]
async fn test_bearer_token_is_accepted(pool: PgPool) {
    common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    let server = common::make_api_server(pool);

    server
        .get("/api/v1/links")
        .add_header("Authorization", format!("Bearer {KEY}"))
        .await
        .assert_status_ok();
}

// ─── POST /links ─────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_create_link_with_generated_code(pool: PgPool) {
    common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    let server = common::make_api_server(pool);

    let response = server
        .post("/api/v1/links")
        .add_header("X-API-Key", KEY)
        .json(&json!({ "url": "example.com/docs", "tags": ["work"] }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let code = body["short_code"].as_str().unwrap();
    assert_eq!(code.len(), 7);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(body["destination_url"], "https://example.com/docs");
    assert_eq!(body["short_url"], format!("https://sho.rt/{code}"));
    assert_eq!(body["tags"], json!(["work"]));
    assert_eq!(body["is_expired"], false);
}

#[sqlx::test]
async fn test_create_link_with_custom_code(pool: PgPool) {
    common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    let server = common::make_api_server(pool);

    let response = server
        .post("/api/v1/links")
        .add_header("X-API-Key", KEY)
        .json(&json!({ "url": "http://example.com", "custom_code": "my-link" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["short_code"], "my-link");
    assert_eq!(body["destination_url"], "http://example.com");
}

#[sqlx::test]
async fn test_create_link_custom_code_rules(pool: PgPool) {
    common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    let server = common::make_api_server(pool);

    let cases = [
        ("ab", "invalid_code_length"),
        ("has space", "invalid_code_charset"),
        ("Admin", "reserved_code"),
    ];

    for (code, expected) in cases {
        let response = server
            .post("/api/v1/links")
            .add_header("X-API-Key", KEY)
            .json(&json!({ "url": "example.com", "custom_code": code }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], expected, "custom code {code:?}");
    }
}

#[sqlx::test]
async fn test_create_link_custom_code_taken(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    common::create_test_link(&pool, owner, "taken", "https://example.com").await;
    let server = common::make_api_server(pool);

    let response = server
        .post("/api/v1/links")
        .add_header("X-API-Key", KEY)
        .json(&json!({ "url": "example.com", "custom_code": "taken" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "code_taken");
}

#[sqlx::test]
async fn test_create_link_empty_url_rejected(pool: PgPool) {
    common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    let server = common::make_api_server(pool);

    let response = server
        .post("/api/v1/links")
        .add_header("X-API-Key", KEY)
        .json(&json!({ "url": "" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[sqlx::test]
async fn test_create_link_quota_exceeded(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    for i in 0..49 {
        common::create_test_link(&pool, owner, &format!("q{i:04}"), "https://example.com").await;
    }
    let server = common::make_api_server(pool.clone());

    // 50th link fits the free tier.
    server
        .post("/api/v1/links")
        .add_header("X-API-Key", KEY)
        .json(&json!({ "url": "example.com" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/v1/links")
        .add_header("X-API-Key", KEY)
        .json(&json!({ "url": "example.com" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "quota_exceeded");
    assert_eq!(body["error"]["details"]["tier"], "free");
    assert_eq!(body["error"]["details"]["limit"], 50);
    assert_eq!(common::count_rows(&pool, "links").await, 50);
}

// ─── GET /links ──────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_list_links_only_own(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    let other = common::create_test_user(&pool, "b@example.com", "free", OTHER_KEY).await;
    common::create_test_link(&pool, owner, "mine001", "https://example.com/1").await;
    common::create_test_link(&pool, owner, "mine002", "https://example.com/2").await;
    common::create_test_link(&pool, other, "theirs1", "https://example.com/3").await;
    let server = common::make_api_server(pool);

    let response = server
        .get("/api/v1/links")
        .add_header("X-API-Key", KEY)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let codes: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["short_code"].as_str().unwrap())
        .collect();
    // Newest first.
    assert_eq!(codes, vec!["mine002", "mine001"]);
    assert_eq!(body["limit"], 20);
    assert_eq!(body["offset"], 0);
}

#[sqlx::test]
async fn test_list_links_paging_and_clamp(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    for i in 0..5 {
        common::create_test_link(&pool, owner, &format!("page{i}"), "https://example.com").await;
    }
    let server = common::make_api_server(pool);

    let response = server
        .get("/api/v1/links?limit=2&offset=1&sort=created_asc")
        .add_header("X-API-Key", KEY)
        .await;
    let body: Value = response.json();
    let codes: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["short_code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["page1", "page2"]);

    let response = server
        .get("/api/v1/links?limit=1000")
        .add_header("X-API-Key", KEY)
        .await;
    let body: Value = response.json();
    assert_eq!(body["limit"], 100);
    assert_eq!(body["items"].as_array().unwrap().len(), 5);
}

#[sqlx::test]
async fn test_list_links_search(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    common::create_test_link(&pool, owner, "docs001", "https://docs.rs/axum").await;
    common::create_test_link(&pool, owner, "blog001", "https://blog.example.com").await;
    let server = common::make_api_server(pool);

    let response = server
        .get("/api/v1/links?search=DOCS")
        .add_header("X-API-Key", KEY)
        .await;

    let body: Value = response.json();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["short_code"], "docs001");
}

#[sqlx::test]
async fn test_list_links_by_tag(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    common::create_tagged_link(&pool, owner, "tag0001", &["work", "rust"]).await;
    common::create_tagged_link(&pool, owner, "tag0002", &["home"]).await;
    let server = common::make_api_server(pool);

    let response = server
        .get("/api/v1/links?tag=rust")
        .add_header("X-API-Key", KEY)
        .await;

    let body: Value = response.json();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["short_code"], "tag0001");
}

#[sqlx::test]
async fn test_list_links_by_tag_is_paged(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    for i in 0..3 {
        common::create_tagged_link(&pool, owner, &format!("tagp{i}"), &["rust"]).await;
    }
    let server = common::make_api_server(pool);

    let response = server
        .get("/api/v1/links?tag=rust&limit=1&offset=1")
        .add_header("X-API-Key", KEY)
        .await;

    let body: Value = response.json();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["short_code"], "tagp1");
    assert_eq!(body["limit"], 1);
    assert_eq!(body["offset"], 1);
}

#[sqlx::test]
async fn test_list_links_bad_query(pool: PgPool) {
    common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    let server = common::make_api_server(pool);

    server
        .get("/api/v1/links?limit=many")
        .add_header("X-API-Key", KEY)
        .await
        .assert_status_bad_request();
}

// ─── GET /links/{id} ─────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_get_link(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    let id = common::create_test_link(&pool, owner, "get0001", "https://example.com").await;
    let server = common::make_api_server(pool);

    let response = server
        .get(&format!("/api/v1/links/{id}"))
        .add_header("X-API-Key", KEY)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], id);
    assert_eq!(body["short_code"], "get0001");
}

#[sqlx::test]
async fn test_get_link_of_other_account_is_not_found(pool: PgPool) {
    common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    let other = common::create_test_user(&pool, "b@example.com", "free", OTHER_KEY).await;
    let id = common::create_test_link(&pool, other, "theirs1", "https://example.com").await;
    let server = common::make_api_server(pool);

    let response = server
        .get(&format!("/api/v1/links/{id}"))
        .add_header("X-API-Key", KEY)
        .await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}

// ─── PUT /links/{id} ─────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_update_link(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    let id = common::create_test_link(&pool, owner, "upd0001", "https://old.example.com").await;
    let server = common::make_api_server(pool);

    let response = server
        .put(&format!("/api/v1/links/{id}"))
        .add_header("X-API-Key", KEY)
        .json(&json!({ "url": "new.example.com", "title": "New", "tags": ["a"] }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["destination_url"], "https://new.example.com");
    assert_eq!(body["title"], "New");
    assert_eq!(body["short_code"], "upd0001");
    assert_eq!(body["tags"], json!(["a"]));
}

#[sqlx::test]
async fn test_update_link_of_other_account_is_not_found(pool: PgPool) {
    common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    let other = common::create_test_user(&pool, "b@example.com", "free", OTHER_KEY).await;
    let id = common::create_test_link(&pool, other, "theirs1", "https://example.com").await;
    let server = common::make_api_server(pool.clone());

    server
        .put(&format!("/api/v1/links/{id}"))
        .add_header("X-API-Key", KEY)
        .json(&json!({ "url": "https://evil.example.com" }))
        .await
        .assert_status_not_found();

    let url: String = sqlx::query_scalar("SELECT destination_url FROM links WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(url, "https://example.com");
}

// ─── DELETE /links/{id} ──────────────────────────────────────────────────────

#[sqlx::test]
async fn test_delete_link(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    let id = common::create_test_link(&pool, owner, "del0001", "https://example.com").await;
    common::create_test_click(&pool, id, Some("US"), None, Some("desktop")).await;
    let server = common::make_api_server(pool.clone());

    server
        .delete(&format!("/api/v1/links/{id}"))
        .add_header("X-API-Key", KEY)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    // Second delete finds nothing.
    server
        .delete(&format!("/api/v1/links/{id}"))
        .add_header("X-API-Key", KEY)
        .await
        .assert_status_not_found();

    assert_eq!(common::count_rows(&pool, "clicks").await, 0);
}

#[sqlx::test]
async fn test_delete_link_of_other_account_is_not_found(pool: PgPool) {
    common::create_test_user(&pool, "a@example.com", "free", KEY).await;
    let other = common::create_test_user(&pool, "b@example.com", "free", OTHER_KEY).await;
    let id = common::create_test_link(&pool, other, "theirs1", "https://example.com").await;
    let server = common::make_api_server(pool.clone());

    server
        .delete(&format!("/api/v1/links/{id}"))
        .add_header("X-API-Key", KEY)
        .await
        .assert_status_not_found();

    assert_eq!(common::count_rows(&pool, "links").await, 1);
}
