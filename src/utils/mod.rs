//! Utility functions for code generation, URL processing, and request handling.
//!
//! This module provides helper functions used across the application:
//!
//! - [`code_generator`] - Short code generation and format validation
//! - [`url_normalizer`] - Destination URL normalization
//! - [`client_ip`] - Client address and header extraction

pub mod client_ip;
pub mod code_generator;
pub mod url_normalizer;
