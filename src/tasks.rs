//! Background tasks for network calls.
//!
//! Every task reports back over the app's `mpsc` channel and never touches
//! `App` directly. Panics inside a task are caught and turned into
//! [`AppEvent::TaskPanicked`] followed by the event that unblocks whatever was
//! waiting on the task, so a crashed request cannot leave the UI stuck in a
//! loading state.
use crate::api::ApiClient;
use crate::app::AppEvent;
use crate::controller::FetchTicket;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Wraps a future so a panic comes back as `Err(message)` instead of
/// silently killing the task.
pub async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

async fn send(tx: &mpsc::Sender<AppEvent>, event: AppEvent) {
    let name = event.name();
    if let Err(e) = tx.send(event).await {
        tracing::warn!(error = %e, event = name, "Channel send failed (receiver dropped)");
    }
}

/// Run a fetch ticket.
///
/// When the ticket asks for cache invalidation the refresh endpoint is hit
/// first. A failed refresh is reported but the fetch still runs, so the user
/// at least sees the cached list.
pub fn spawn_fetch(
    client: Arc<ApiClient>,
    ticket: FetchTicket,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    let generation = ticket.generation;
    tracing::debug!(
        generation,
        page = ticket.query.page,
        invalidate_cache = ticket.invalidate_cache,
        "Spawning fetch task"
    );

    tokio::spawn(async move {
        let work = async {
            if ticket.invalidate_cache {
                if let Err(e) = client.refresh_cache().await {
                    tracing::warn!(error = %e, "Cache refresh failed, fetching anyway");
                    send(
                        &tx,
                        AppEvent::CacheRefreshFailed {
                            error: e.to_string(),
                        },
                    )
                    .await;
                }
            }

            let result = client.list_subscriptions(&ticket.query).await;
            send(&tx, AppEvent::SubscriptionsLoaded { generation, result }).await;
        };

        if let Err(panic_msg) = catch_task_panic(work).await {
            tracing::error!(task = "fetch", generation, error = %panic_msg, "Background task panicked");
            send(
                &tx,
                AppEvent::TaskPanicked {
                    task: "fetch",
                    error: panic_msg,
                },
            )
            .await;
            send(&tx, AppEvent::FetchAbandoned { generation }).await;
        }
    })
}

/// Post a bulk unsubscribe for `ids`.
pub fn spawn_unsubscribe(
    client: Arc<ApiClient>,
    ids: Vec<String>,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tracing::debug!(count = ids.len(), "Spawning unsubscribe task");

    tokio::spawn(async move {
        let work = async {
            let result = client.unsubscribe(&ids).await.map_err(|e| e.to_string());
            send(&tx, AppEvent::UnsubscribeCompleted { result }).await;
        };

        if let Err(panic_msg) = catch_task_panic(work).await {
            tracing::error!(task = "unsubscribe", error = %panic_msg, "Background task panicked");
            send(
                &tx,
                AppEvent::TaskPanicked {
                    task: "unsubscribe",
                    error: panic_msg.clone(),
                },
            )
            .await;
            send(
                &tx,
                AppEvent::UnsubscribeCompleted {
                    result: Err(format!("Internal error: {}", panic_msg)),
                },
            )
            .await;
        }
    })
}
