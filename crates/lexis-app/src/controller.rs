use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender, Receiver, Sender};
use lexis_types::{AppEvent, Notice};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::read_input;
use crate::state::AppState;
use crate::ui::ui_loop;

/// Centralized channel management
pub struct ChannelSet {
    /// Filled from the blocking stdin thread
    pub input: (Sender<AppEvent>, Receiver<AppEvent>),
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub notices: (AsyncSender<Notice>, AsyncReceiver<Notice>),
}

impl ChannelSet {
    pub fn new(capacity: usize) -> Self {
        // Startup queues two events before the event loop runs
        let capacity = capacity.max(2);
        Self {
            input: kanal::bounded(capacity),
            app_to_ui: kanal::bounded_async(capacity),
            notices: kanal::bounded_async(capacity),
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>, channels: ChannelSet) -> Self {
        Self {
            channels,
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Queue the startup list load and an optional first lookup
    pub fn queue_startup(&self, initial_word: Option<String>) -> anyhow::Result<()> {
        let tx = &self.channels.input.0;
        tx.send(AppEvent::Refresh)?;
        if let Some(word) = initial_word {
            tx.send(AppEvent::Submit(word))?;
        }
        Ok(())
    }

    pub async fn spawn_tasks(&self) -> anyhow::Result<JoinSet<anyhow::Result<()>>> {
        let mut tasks = JoinSet::new();
        let ui_config = self.state.config.read().await.ui.clone();

        // Event loop
        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.input.1.clone().to_async(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.child_token(),
        ));

        // UI loop
        tasks.spawn(ui_loop(
            self.state.controller.subscribe(),
            self.channels.notices.1.clone(),
            self.channels.app_to_ui.1.clone(),
            ui_config,
            self.cancel_token.child_token(),
        ));

        // Stdin reader, detached so a pending read cannot block exit
        let input_tx = self.channels.input.0.clone();
        std::thread::Builder::new()
            .name("lexis-input".to_string())
            .spawn(move || read_input(std::io::stdin().lock(), input_tx))?;

        Ok(tasks)
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
