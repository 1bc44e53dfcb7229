mod common;

use linkstat::domain::entities::{LinkChanges, NewLink};
use linkstat::domain::repositories::{LinkListQuery, LinkRepository, SortMode};
use linkstat::error::AppError;
use linkstat::infrastructure::persistence::PgLinkRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_link(owner_id: i64, code: &str) -> NewLink {
    NewLink {
        owner_id,
        short_code: code.to_string(),
        destination_url: "https://example.com".to_string(),
        title: Some("Example".to_string()),
        tags: vec!["work".to_string()],
        expires_at: None,
    }
}

fn query(sort: SortMode) -> LinkListQuery {
    LinkListQuery {
        limit: 20,
        offset: 0,
        search: None,
        sort,
    }
}

fn codes(links: &[linkstat::domain::entities::Link]) -> Vec<&str> {
    links.iter().map(|l| l.short_code.as_str()).collect()
}

#[sqlx::test]
async fn test_create_link(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", "k").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.create(new_link(owner, "test123")).await.unwrap();

    assert_eq!(link.owner_id, owner);
    assert_eq!(link.short_code, "test123");
    assert_eq!(link.title.as_deref(), Some("Example"));
    assert_eq!(link.tags, vec!["work"]);
    assert_eq!(link.created_at, link.updated_at);
}

#[sqlx::test]
async fn test_create_duplicate_code_is_conflict(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", "k").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.create(new_link(owner, "dup0001")).await.unwrap();
    let result = repo.create(new_link(owner, "dup0001")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
async fn test_find_by_code_is_case_sensitive(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", "k").await;
    common::create_test_link(&pool, owner, "AbC1234", "https://example.com").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.find_by_code("AbC1234").await.unwrap().is_some());
    assert!(repo.find_by_code("abc1234").await.unwrap().is_none());
    assert!(repo.code_exists("AbC1234").await.unwrap());
    assert!(!repo.code_exists("nothere").await.unwrap());
}

#[sqlx::test]
async fn test_count_by_owner(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", "k").await;
    let other = common::create_test_user(&pool, "b@example.com", "free", "k2").await;
    common::create_test_link(&pool, owner, "own0001", "https://example.com").await;
    common::create_test_link(&pool, owner, "own0002", "https://example.com").await;
    common::create_expired_link(&pool, owner, "own0003", "https://example.com").await;
    common::create_test_link(&pool, other, "oth0001", "https://example.com").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    // Expired links still count toward the quota.
    assert_eq!(repo.count_by_owner(owner).await.unwrap(), 3);
    assert_eq!(repo.count_by_owner(other).await.unwrap(), 1);
}

#[sqlx::test]
async fn test_list_by_owner_sort_modes(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", "k").await;
    let first = common::create_test_link(&pool, owner, "first01", "https://example.com").await;
    let second = common::create_test_link(&pool, owner, "second1", "https://example.com").await;
    common::create_test_link(&pool, owner, "third01", "https://example.com").await;

    common::create_test_click(&pool, second, None, None, None).await;
    common::create_test_click(&pool, second, None, None, None).await;
    common::create_test_click(&pool, first, None, None, None).await;

    let repo = PgLinkRepository::new(Arc::new(pool));

    let links = repo.list_by_owner(owner, query(SortMode::CreatedDesc)).await.unwrap();
    assert_eq!(codes(&links), vec!["third01", "second1", "first01"]);

    let links = repo.list_by_owner(owner, query(SortMode::CreatedAsc)).await.unwrap();
    assert_eq!(codes(&links), vec!["first01", "second1", "third01"]);

    let links = repo.list_by_owner(owner, query(SortMode::Clicks)).await.unwrap();
    assert_eq!(codes(&links), vec!["second1", "first01", "third01"]);
}

#[sqlx::test]
async fn test_list_by_owner_search_escapes_wildcards(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", "k").await;
    common::create_test_link(&pool, owner, "pct0001", "https://example.com/100%25").await;
    common::create_test_link(&pool, owner, "plain01", "https://example.com/plain").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let mut q = query(SortMode::CreatedDesc);
    q.search = Some("%".to_string());
    let links = repo.list_by_owner(owner, q).await.unwrap();
    assert_eq!(codes(&links), vec!["pct0001"]);

    let mut q = query(SortMode::CreatedDesc);
    q.search = Some("PLAIN".to_string());
    let links = repo.list_by_owner(owner, q).await.unwrap();
    assert_eq!(codes(&links), vec!["plain01"]);
}

#[sqlx::test]
async fn test_list_by_owner_paging(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", "k").await;
    for i in 0..5 {
        common::create_test_link(&pool, owner, &format!("page{i}"), "https://example.com").await;
    }
    let repo = PgLinkRepository::new(Arc::new(pool));

    let q = LinkListQuery {
        limit: 2,
        offset: 4,
        search: None,
        sort: SortMode::CreatedAsc,
    };
    let links = repo.list_by_owner(owner, q).await.unwrap();

    assert_eq!(codes(&links), vec!["page4"]);
}

#[sqlx::test]
async fn test_list_by_tag(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", "k").await;
    let other = common::create_test_user(&pool, "b@example.com", "free", "k2").await;
    common::create_tagged_link(&pool, owner, "tag0001", &["rust"]).await;
    common::create_tagged_link(&pool, owner, "tag0002", &["Rust"]).await;
    common::create_tagged_link(&pool, other, "tag0003", &["rust"]).await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let links = repo.list_by_tag(owner, "rust", 20, 0).await.unwrap();

    assert_eq!(codes(&links), vec!["tag0001"]);
}

#[sqlx::test]
async fn test_list_by_tag_paging(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", "k").await;
    for i in 0..5 {
        common::create_tagged_link(&pool, owner, &format!("tagp{i}"), &["rust"]).await;
    }
    let repo = PgLinkRepository::new(Arc::new(pool));

    let links = repo.list_by_tag(owner, "rust", 2, 1).await.unwrap();

    assert_eq!(codes(&links), vec!["tagp3", "tagp2"]);
}

#[sqlx::test]
async fn test_update_link(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", "k").await;
    let repo = PgLinkRepository::new(Arc::new(pool));
    let link = repo.create(new_link(owner, "upd0001")).await.unwrap();

    let updated = repo
        .update(
            link.id,
            LinkChanges {
                destination_url: "https://new.example.com".to_string(),
                title: None,
                tags: vec![],
                expires_at: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.short_code, "upd0001");
    assert_eq!(updated.destination_url, "https://new.example.com");
    assert!(updated.title.is_none());
    assert!(updated.tags.is_empty());
    assert!(updated.updated_at >= link.updated_at);
}

#[sqlx::test]
async fn test_update_missing_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let result = repo
        .update(
            999,
            LinkChanges {
                destination_url: "https://example.com".to_string(),
                title: None,
                tags: vec![],
                expires_at: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
async fn test_delete_requires_owner(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", "k").await;
    let other = common::create_test_user(&pool, "b@example.com", "free", "k2").await;
    let id = common::create_test_link(&pool, owner, "del0001", "https://example.com").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert_eq!(repo.delete_by_id_and_owner(id, other).await.unwrap(), 0);
    assert_eq!(repo.delete_by_id_and_owner(id, owner).await.unwrap(), 1);
    assert!(repo.find_by_id(id).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_distinct_tags(pool: PgPool) {
    let owner = common::create_test_user(&pool, "a@example.com", "free", "k").await;
    common::create_tagged_link(&pool, owner, "tag0001", &["work", "rust"]).await;
    common::create_tagged_link(&pool, owner, "tag0002", &["rust", ""]).await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let mut tags = repo.distinct_tags_by_owner(owner).await.unwrap();
    tags.sort();

    assert_eq!(tags, vec!["rust", "work"]);
}
