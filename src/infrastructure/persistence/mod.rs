//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx prepared
//! statements. Rows are read into private `FromRow` structs and converted to
//! domain entities, so the domain layer never depends on SQLx.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, listing and tags
//! - [`PgUserRepository`] - Accounts and API key hashes
//! - [`PgAnalyticsRepository`] - Clicks, daily aggregates and breakdowns

pub mod pg_analytics_repository;
pub mod pg_link_repository;
pub mod pg_user_repository;

pub use pg_analytics_repository::PgAnalyticsRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_user_repository::PgUserRepository;
