//! Click event model for asynchronous click tracking.

/// An in-memory click handed from the redirect handler to the click worker.
///
/// Built from raw request headers; empty header values are kept as-is here
/// and normalised when the tracker turns the event into a
/// [`crate::domain::entities::NewClick`].
///
/// # Usage Flow
///
/// 1. Created in the redirect handler once the link has been resolved
/// 2. Sent to the bounded click channel with `try_send` (never awaited)
/// 3. Processed by [`crate::domain::click_worker::run_click_worker`]
/// 4. Persisted by [`crate::application::services::ClickTracker::track_click`]
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub ip_address: String,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Correlation id of the originating request, carried into worker logs.
    pub request_id: Option<String>,
}

impl ClickEvent {
    /// Creates a new click event.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(
    ///     42,
    ///     "192.168.1.1".to_string(),
    ///     Some("https://google.com"),
    ///     Some("Mozilla/5.0"),
    /// );
    /// ```
    pub fn new(
        link_id: i64,
        ip_address: String,
        referer: Option<&str>,
        user_agent: Option<&str>,
    ) -> Self {
        Self {
            link_id,
            ip_address,
            referer: referer.map(str::to_string),
            user_agent: user_agent.map(str::to_string),
            request_id: None,
        }
    }

    /// Attaches the originating request's correlation id.
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}
