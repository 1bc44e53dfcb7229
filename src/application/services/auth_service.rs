//! Authentication service for API key validation.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::User;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

const API_KEY_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const API_KEY_LEN: usize = 48;

/// Hashes a raw API key with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. The admin CLI stores
/// keys with this function, so both sides must share the secret.
pub fn hash_api_key(signing_secret: &str, api_key: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(api_key.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Generates a new random API key of 48 alphanumeric characters.
pub fn generate_api_key() -> String {
    let mut rng = rand::rng();

    (0..API_KEY_LEN)
        .map(|_| {
            let idx = rng.random_range(0..API_KEY_CHARSET.len());
            API_KEY_CHARSET[idx] as char
        })
        .collect()
}

/// Service for authenticating API requests via account API keys.
///
/// Keys are hashed with HMAC-SHA256 (keyed by `signing_secret`) before lookup.
/// An attacker with read-only access to the database cannot verify or forge
/// keys without the server-side secret.
pub struct AuthService<U: UserRepository> {
    repository: Arc<U>,
    signing_secret: String,
}

impl<U: UserRepository> AuthService<U> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `repository` - user repository for key lookups
    /// - `signing_secret` - HMAC key; must match the value used when keys were issued
    pub fn new(repository: Arc<U>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Resolves a raw API key to the account it belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the key is empty or matches no
    /// account. Returns [`AppError::Storage`] on database errors.
    pub async fn authenticate(&self, api_key: &str) -> Result<User, AppError> {
        if api_key.is_empty() {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Missing API key" }),
            ));
        }

        let key_hash = hash_api_key(&self.signing_secret, api_key);

        self.repository
            .find_by_api_key_hash(&key_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": "Invalid or revoked API key" }),
                )
            })
    }

    /// Loads an account by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the account does not exist.
    pub async fn get_user(&self, user_id: i64) -> Result<User, AppError> {
        self.repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "user_id": user_id })))
    }
}
