//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures; the rules that govern them live in
//! [`crate::application::services`].
//!
//! # Entity Types
//!
//! - [`Link`] - A short code mapped to a destination URL, owned by an account
//! - [`Click`] - A recorded redirect on a link
//! - [`User`] - An account with a [`SubscriptionTier`]
//!
//! Creation inputs use separate structs (`NewLink`, `NewClick`, `NewUser`,
//! [`LinkDraft`]) and updates use [`LinkChanges`].

pub mod click;
pub mod link;
pub mod user;

pub use click::{Click, DeviceType, NewClick};
pub use link::{Link, LinkChanges, LinkDraft, NewLink};
pub use user::{NewUser, SubscriptionTier, TierLimits, User};

#[cfg(test)]
pub(crate) use link::sample_link;
#[cfg(test)]
pub(crate) use user::sample_user;
