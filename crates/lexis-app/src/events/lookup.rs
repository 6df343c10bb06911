use std::sync::Arc;

use lexis_core::SubmitOutcome;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

use crate::state::AppState;

pub fn handle_submit(
    state: Arc<AppState>,
    tasks: &TaskTracker,
    text: String,
) -> JoinHandle<SubmitOutcome> {
    tasks.spawn(async move {
        let outcome = state.controller.submit(&text).await;
        match &outcome {
            SubmitOutcome::Completed { word, saved } => {
                tracing::info!(
                    "Lookup of '{}' finished ({} bytes, saved: {})",
                    word.word,
                    word.description.len(),
                    saved
                );
            }
            SubmitOutcome::Superseded => tracing::debug!("Lookup of '{}' superseded", text.trim()),
            SubmitOutcome::Failed => tracing::debug!("Lookup of '{}' failed", text.trim()),
            SubmitOutcome::Rejected => {}
        }
        outcome
    })
}
