//! HTTP middleware for request processing.
//!
//! Provides API key authentication and observability middleware.

pub mod auth;
pub mod tracing;
