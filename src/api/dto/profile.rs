//! DTOs for account endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{SubscriptionTier, TierLimits, User};

/// Response of `GET /api/v1/profile`.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub email: String,
    pub subscription_tier: SubscriptionTier,
    pub limits: TierLimits,
    pub created_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            limits: user.subscription_tier.limits(),
            subscription_tier: user.subscription_tier,
            created_at: user.created_at,
        }
    }
}

/// Response of `GET /api/v1/tags`.
#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<String>,
}
