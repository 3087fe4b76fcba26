use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

use crate::api::{MastodonClient, StatusAction};
use crate::app::AppEvent;
use crate::util::validate_url_for_open;

/// Run a future, turning a panic into an `Err` with the panic message so
/// the spawning task can report it instead of dying silently.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
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

/// Send a boost/favourite request in the background. The outcome comes
/// back as `ActionCompleted` or `ActionFailed`.
pub(super) fn spawn_status_action(
    client: MastodonClient,
    status_id: String,
    action: StatusAction,
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let tx_panic = tx.clone();
        let outcome = catch_task_panic(async {
            let event = match client.status_action(&status_id, action).await {
                Ok(status) => AppEvent::ActionCompleted {
                    action,
                    status: Box::new(status),
                },
                Err(e) => {
                    tracing::warn!(status_id = %status_id, action = ?action, error = %e, "Status action failed");
                    AppEvent::ActionFailed {
                        status_id: status_id.clone(),
                        action,
                        error: e.to_string(),
                    }
                }
            };
            if let Err(e) = tx.send(event).await {
                tracing::warn!(error = %e, "Channel send failed (receiver dropped)");
            }
        })
        .await;

        if let Err(panic_msg) = outcome {
            tracing::error!(error = %panic_msg, "Status action task panicked");
            let _ = tx_panic
                .send(AppEvent::TaskPanicked {
                    task: "status_action",
                    error: panic_msg,
                })
                .await;
        }
    })
}

/// Open a server-supplied link in the system browser after validation.
pub(super) fn open_in_browser(link: &str) -> Result<(), String> {
    let url = validate_url_for_open(link).map_err(|e| e.to_string())?;
    open::that(url.as_str()).map_err(|e| format!("Failed to open browser: {}", e))?;
    tracing::debug!(url = %url, "Opened link in browser");
    Ok(())
}
