//! Background consumer of the click queue.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::Instrument;

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::Click;
use crate::error::AppError;

/// Anything able to persist a [`ClickEvent`].
///
/// Implemented by [`crate::application::services::ClickTracker`]; the worker
/// depends only on this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickSink: Send + Sync {
    async fn track_click(&self, event: ClickEvent) -> Result<Click, AppError>;

    /// Waits for follow-up work started by earlier `track_click` calls.
    async fn flush(&self);
}

/// Drains the click channel until every sender is dropped.
///
/// At most `concurrency` events are processed at once. Each event runs in its
/// own task: a failure is logged and counted, a panic is caught through the
/// task's [`JoinError`], and neither ever reaches the request that produced
/// the event. Pending tasks and the sink's own follow-up work are awaited
/// before the function returns.
pub async fn run_click_worker<S>(
    mut rx: mpsc::Receiver<ClickEvent>,
    sink: Arc<S>,
    concurrency: usize,
) where
    S: ClickSink + ?Sized + 'static,
{
    let concurrency = concurrency.max(1);
    let mut tasks = JoinSet::new();

    while let Some(event) = rx.recv().await {
        while tasks.len() >= concurrency {
            if let Some(result) = tasks.join_next().await {
                log_task_outcome(result);
            }
        }

        let span = tracing::info_span!(
            "click",
            request_id = event.request_id.as_deref().unwrap_or("-"),
            link_id = event.link_id,
        );
        let sink = sink.clone();

        tasks.spawn(
            async move {
                match sink.track_click(event).await {
                    Ok(click) => {
                        metrics::counter!("clicks_recorded_total").increment(1);
                        tracing::debug!(click_id = click.id, "Click recorded");
                    }
                    Err(e) => {
                        metrics::counter!("clicks_failed_total").increment(1);
                        tracing::warn!(error = %e, "Failed to record click");
                    }
                }
            }
            .instrument(span),
        );

        while let Some(result) = tasks.try_join_next() {
            log_task_outcome(result);
        }
    }

    while let Some(result) = tasks.join_next().await {
        log_task_outcome(result);
    }
    sink.flush().await;

    tracing::info!("Click worker stopped");
}

fn log_task_outcome(result: Result<(), JoinError>) {
    if let Err(e) = result {
        metrics::counter!("clicks_failed_total").increment(1);
        if e.is_panic() {
            tracing::error!("Click task panicked: {}", e);
        } else {
            tracing::warn!("Click task cancelled: {}", e);
        }
    }
}
