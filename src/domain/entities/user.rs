//! Account entity and subscription tiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription level governing an account's quotas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Pro,
    Business,
}

/// Quotas attached to a tier.
///
/// Only `link_limit` is enforced; the click and API limits are reported to
/// clients but not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierLimits {
    pub link_limit: i64,
    pub click_limit: i64,
    pub api_rate_limit: i64,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Pro => "pro",
            SubscriptionTier::Business => "business",
        }
    }

    pub fn limits(&self) -> TierLimits {
        match self {
            SubscriptionTier::Free => TierLimits {
                link_limit: 50,
                click_limit: 1_000,
                api_rate_limit: 0,
            },
            SubscriptionTier::Pro => TierLimits {
                link_limit: 500,
                click_limit: 10_000,
                api_rate_limit: 5_000,
            },
            SubscriptionTier::Business => TierLimits {
                link_limit: 5_000,
                click_limit: 100_000,
                api_rate_limit: 50_000,
            },
        }
    }

    /// Parses a stored tier value, treating anything unrecognised as free.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "free" => Ok(SubscriptionTier::Free),
            "pro" => Ok(SubscriptionTier::Pro),
            "business" => Ok(SubscriptionTier::Business),
            other => Err(format!("unknown subscription tier: {other}")),
        }
    }
}

/// An account that owns links.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub subscription_tier: SubscriptionTier,
    pub has_api_key: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn link_limit(&self) -> i64 {
        self.subscription_tier.limits().link_limit
    }
}

/// Input data for provisioning an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub subscription_tier: SubscriptionTier,
}

#[cfg(test)]
pub(crate) fn sample_user(id: i64, tier: SubscriptionTier) -> User {
    User {
        id,
        email: format!("user{id}@example.com"),
        subscription_tier: tier,
        has_api_key: true,
        created_at: Utc::now(),
    }
}
