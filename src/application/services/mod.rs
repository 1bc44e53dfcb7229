//! Business logic services for the application layer.

pub mod auth_service;
pub mod click_tracker;
pub mod code_allocator;
pub mod link_service;

pub use auth_service::AuthService;
pub use click_tracker::{ClickStats, ClickTracker, CountBucket, UserAnalytics};
pub use code_allocator::CodeAllocator;
pub use link_service::LinkService;
