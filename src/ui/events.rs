//! Application event handling.
//!
//! Applies results from background tasks to `App`. Stale fetch results are
//! filtered out by the request controller's generation check.

use crate::app::{App, AppEvent};
use tokio::sync::mpsc;

pub fn handle_app_event(app: &mut App, event: AppEvent, event_tx: &mpsc::Sender<AppEvent>) {
    match event {
        AppEvent::SubscriptionsLoaded { generation, result } => {
            app.on_fetch_completed(generation, result);
        }
        AppEvent::CacheRefreshFailed { error } => {
            app.set_status(format!("Cache refresh failed ({}), showing cached list", error));
        }
        AppEvent::FetchAbandoned { generation } => {
            app.on_fetch_abandoned(generation);
        }
        AppEvent::UnsubscribeCompleted { result } => {
            app.on_unsubscribe_completed(result, event_tx);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}
