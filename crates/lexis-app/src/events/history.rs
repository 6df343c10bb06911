use std::sync::Arc;

use lexis_types::{EntryRef, Notice, WordEntry};
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

use crate::state::AppState;

fn resolve(state: &AppState, entry: &EntryRef) -> Option<WordEntry> {
    let view = state.controller.snapshot();
    entry.resolve(&view.words).cloned()
}

async fn report_missing(state: &AppState, entry: &EntryRef) {
    let what = match entry {
        EntryRef::Index(n) => format!("No word at position {n}"),
        EntryRef::Word(word) => format!("'{word}' is not in the list"),
    };
    if let Err(e) = state.notices.send(Notice::warning("Notice", what)).await {
        tracing::warn!("Notice dropped: {}", e);
    }
}

pub async fn handle_select(state: Arc<AppState>, entry: &EntryRef) {
    match resolve(&state, entry) {
        Some(found) => state.controller.select_existing(&found),
        None => report_missing(&state, entry).await,
    }
}

pub async fn handle_delete(state: Arc<AppState>, tasks: &TaskTracker, entry: EntryRef) {
    let Some(found) = resolve(&state, &entry) else {
        report_missing(&state, &entry).await;
        return;
    };

    tasks.spawn(async move {
        if state.controller.delete(&found).await
            && let Err(e) = state
                .notices
                .send(Notice::info("Deleted", found.word.clone()))
                .await
        {
            tracing::warn!("Notice dropped: {}", e);
        }
    });
}

pub fn handle_refresh(state: Arc<AppState>, tasks: &TaskTracker) -> JoinHandle<bool> {
    tasks.spawn(async move { state.controller.refresh().await })
}
