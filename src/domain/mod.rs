//! Domain layer containing business entities and repository contracts.
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers; business rules live in [`crate::application::services`].
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - In-flight click handed to the background worker
//! - [`click_worker`] - Bounded, panic-isolating click processing loop
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves the link and answers immediately
//! 2. A [`click_event::ClickEvent`] is pushed to the bounded channel
//! 3. [`click_worker::run_click_worker`] hands it to a [`click_worker::ClickSink`]
//! 4. The click and its daily aggregate are persisted via
//!    [`repositories::AnalyticsRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
