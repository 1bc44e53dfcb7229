//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers and the click worker.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link lifecycle, quotas and ownership
//! - [`services::code_allocator::CodeAllocator`] - Short code generation and validation
//! - [`services::click_tracker::ClickTracker`] - Click recording and analytics
//! - [`services::auth_service::AuthService`] - API key authentication

pub mod services;
