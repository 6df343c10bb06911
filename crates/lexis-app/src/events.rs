use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lexis_types::AppEvent;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::state::AppState;

pub mod history;
pub mod lookup;

use history::{handle_delete, handle_refresh, handle_select};
use lookup::handle_submit;

/// App's main loop.
///
/// Work started by an event runs on `tasks`. Quitting waits for it, so a
/// lookup typed just before EOF is still saved. Cancellation abandons it.
pub async fn event_loop(
    state: Arc<AppState>,
    input_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Waiting for input");
    let tasks = TaskTracker::new();
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = input_rx.recv() => event?,
        };

        tracing::debug!("[EVENT_LOOP] Event received: {:?}", event);
        if !handle_events(state.clone(), &tasks, &app_to_ui_tx, event).await? {
            tracing::info!("[EVENT_LOOP] Quit requested, {} tasks pending", tasks.len());
            tasks.close();
            tasks.wait().await;
            cancel.cancel();
            break;
        }
    }

    Ok(())
}

/// Returns false once the app should stop
async fn handle_events(
    state: Arc<AppState>,
    tasks: &TaskTracker,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<bool> {
    match event {
        AppEvent::Submit(text) => {
            // Lookups stream for a while; keep reading input meanwhile
            handle_submit(state, tasks, text);
        }
        AppEvent::Select(entry) => handle_select(state, &entry).await,
        AppEvent::Delete(entry) => handle_delete(state, tasks, entry).await,
        AppEvent::Refresh => {
            handle_refresh(state, tasks);
        }
        AppEvent::ShowList | AppEvent::Help => app_to_ui_tx.send(event).await?,
        AppEvent::Quit => return Ok(false),
    }

    Ok(true)
}
