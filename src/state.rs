//! Shared application state handed to every handler.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::application::services::{AuthService, ClickTracker, LinkService};
use crate::domain::click_event::ClickEvent;
use crate::infrastructure::persistence::{PgAnalyticsRepository, PgLinkRepository, PgUserRepository};

pub type AppLinkService = LinkService<PgLinkRepository, PgUserRepository>;
pub type AppClickTracker = ClickTracker<PgAnalyticsRepository>;
pub type AppAuthService = AuthService<PgUserRepository>;

/// Services, click queue and settings shared across requests.
///
/// Cloning is cheap: every field is reference-counted or a channel handle.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<AppLinkService>,
    pub click_tracker: Arc<AppClickTracker>,
    pub auth_service: Arc<AppAuthService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Public base URL short links are built from, without trailing slash.
    pub base_url: String,
    /// Read client addresses from proxy headers.
    pub behind_proxy: bool,
    pub pool: Arc<PgPool>,
}

impl AppState {
    /// Wires PostgreSQL repositories into services.
    ///
    /// `signing_secret` keys the API key hashes and must match the secret the
    /// admin CLI used when issuing keys.
    pub fn new(
        pool: Arc<PgPool>,
        click_sender: mpsc::Sender<ClickEvent>,
        base_url: &str,
        behind_proxy: bool,
        signing_secret: String,
    ) -> Self {
        let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
        let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
        let analytics_repository = Arc::new(PgAnalyticsRepository::new(pool.clone()));

        Self {
            link_service: Arc::new(LinkService::new(link_repository, user_repository.clone())),
            click_tracker: Arc::new(ClickTracker::new(analytics_repository)),
            auth_service: Arc::new(AuthService::new(user_repository, signing_secret)),
            click_sender,
            base_url: base_url.trim_end_matches('/').to_string(),
            behind_proxy,
            pool,
        }
    }
}
