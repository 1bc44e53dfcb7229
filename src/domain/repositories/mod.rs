//! Repository trait definitions for the domain layer.
//!
//! These traits are the only storage surface the services see. Concrete
//! implementations live in `crate::infrastructure::persistence`; mocks are
//! generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link persistence and code existence checks
//! - [`UserRepository`] - Account lookup and API key hashes
//! - [`AnalyticsRepository`] - Click events, daily aggregates and rollups
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod analytics_repository;
pub mod link_repository;
pub mod user_repository;

pub use analytics_repository::{AnalyticsRepository, ClickDimension, DailyClickCount, GroupCount};
pub use link_repository::{LinkListQuery, LinkRepository, SortMode};
pub use user_repository::UserRepository;

#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
