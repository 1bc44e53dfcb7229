//! Repository trait for account lookup and provisioning.

use crate::domain::entities::{NewUser, SubscriptionTier, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for accounts.
///
/// API keys are never stored in clear; callers pass the HMAC hash computed by
/// [`crate::application::services::AuthService`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds an account by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Finds the account whose API key hashes to `key_hash`.
    async fn find_by_api_key_hash(&self, key_hash: &str) -> Result<Option<User>, AppError>;

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Lists all accounts, oldest first.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Changes an account's subscription tier.
    async fn set_tier(&self, id: i64, tier: SubscriptionTier) -> Result<User, AppError>;

    /// Replaces (or with `None`, revokes) the account's API key hash.
    async fn set_api_key_hash(&self, id: i64, key_hash: Option<String>) -> Result<(), AppError>;
}
