mod common;

use linkstat::application::services::auth_service::hash_api_key;
use linkstat::domain::entities::{NewUser, SubscriptionTier};
use linkstat::domain::repositories::UserRepository;
use linkstat::error::AppError;
use linkstat::infrastructure::persistence::PgUserRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_user(email: &str, tier: SubscriptionTier) -> NewUser {
    NewUser {
        email: email.to_string(),
        subscription_tier: tier,
    }
}

#[sqlx::test]
async fn test_create_and_find(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    let user = repo
        .create(new_user("a@example.com", SubscriptionTier::Pro))
        .await
        .unwrap();

    assert_eq!(user.email, "a@example.com");
    assert_eq!(user.subscription_tier, SubscriptionTier::Pro);
    assert!(!user.has_api_key);

    let found = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(found, user);
    assert!(repo.find_by_id(user.id + 1).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_duplicate_email_is_conflict(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    repo.create(new_user("a@example.com", SubscriptionTier::Free))
        .await
        .unwrap();
    let result = repo
        .create(new_user("a@example.com", SubscriptionTier::Free))
        .await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
async fn test_api_key_hash_lifecycle(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    let user = repo
        .create(new_user("a@example.com", SubscriptionTier::Free))
        .await
        .unwrap();
    let hash = hash_api_key(common::SIGNING_SECRET, "raw-key");

    repo.set_api_key_hash(user.id, Some(hash.clone()))
        .await
        .unwrap();
    let found = repo.find_by_api_key_hash(&hash).await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert!(found.has_api_key);

    repo.set_api_key_hash(user.id, None).await.unwrap();
    assert!(repo.find_by_api_key_hash(&hash).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_set_api_key_for_missing_user(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    let result = repo.set_api_key_hash(42, None).await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
async fn test_set_tier(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    let user = repo
        .create(new_user("a@example.com", SubscriptionTier::Free))
        .await
        .unwrap();

    let upgraded = repo
        .set_tier(user.id, SubscriptionTier::Business)
        .await
        .unwrap();

    assert_eq!(upgraded.subscription_tier, SubscriptionTier::Business);
    assert_eq!(upgraded.link_limit(), 5_000);
    assert!(matches!(
        repo.set_tier(999, SubscriptionTier::Pro).await,
        Err(AppError::NotFound { .. })
    ));
}

#[sqlx::test]
async fn test_unknown_stored_tier_reads_as_free(pool: PgPool) {
    let id = common::create_test_user(&pool, "odd@example.com", "enterprise", "k").await;
    let repo = PgUserRepository::new(Arc::new(pool));

    let user = repo.find_by_id(id).await.unwrap().unwrap();

    assert_eq!(user.subscription_tier, SubscriptionTier::Free);
}

#[sqlx::test]
async fn test_list_oldest_first(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    repo.create(new_user("first@example.com", SubscriptionTier::Free))
        .await
        .unwrap();
    repo.create(new_user("second@example.com", SubscriptionTier::Pro))
        .await
        .unwrap();

    let users = repo.list().await.unwrap();
    let emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();

    assert_eq!(emails, vec!["first@example.com", "second@example.com"]);
}
