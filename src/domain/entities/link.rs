//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL owned by an account.
///
/// `short_code` and `owner_id` are fixed at creation; only the destination,
/// title, tags and expiry can change afterwards (see [`LinkChanges`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub owner_id: i64,
    pub short_code: String,
    pub destination_url: String,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Returns true if the link's expiry lies in the past.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expiry check against an explicit instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }

    pub fn is_owned_by(&self, owner_id: i64) -> bool {
        self.owner_id == owner_id
    }
}

/// Input accepted by the link service when creating a link.
///
/// `custom_code` is validated before use; when absent a random code is drawn.
#[derive(Debug, Clone, Default)]
pub struct LinkDraft {
    pub destination_url: String,
    pub custom_code: Option<String>,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Fully resolved record handed to the repository for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub owner_id: i64,
    pub short_code: String,
    pub destination_url: String,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Replacement values for the mutable fields of a link.
///
/// Every field is written; `None` clears the title or expiry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinkChanges {
    pub destination_url: String,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
pub(crate) fn sample_link(id: i64, owner_id: i64, short_code: &str) -> Link {
    let now = Utc::now();
    Link {
        id,
        owner_id,
        short_code: short_code.to_string(),
        destination_url: "https://example.com".to_string(),
        title: None,
        tags: Vec::new(),
        expires_at: None,
        created_at: now,
        updated_at: now,
    }
}
