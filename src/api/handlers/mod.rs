//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod account;
pub mod analytics;
pub mod health;
pub mod links;
pub mod redirect;

pub use account::{profile_handler, tags_handler};
pub use analytics::{link_stats_handler, user_analytics_handler};
pub use health::health_handler;
pub use links::{
    create_link_handler, delete_link_handler, get_link_handler, list_links_handler,
    update_link_handler,
};
pub use redirect::redirect_handler;
