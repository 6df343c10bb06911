use std::sync::Arc;

use kanal::AsyncSender;
use lexis_config::Config;
use lexis_core::QueryController;
use lexis_store::{BackendClient, HttpLookupClient, HttpWordStore};
use lexis_types::Notice;
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub controller: Arc<QueryController>,
    /// For notices raised outside the controller, e.g. unknown list entries
    pub notices: AsyncSender<Notice>,
}

impl AppState {
    pub fn new(config: Config, notices: AsyncSender<Notice>) -> anyhow::Result<Self> {
        let backend = BackendClient::new(config.backend.clone())?;
        tracing::info!("Using backend at {}", config.backend.base_url);

        let controller = QueryController::new(
            Arc::new(HttpWordStore::new(backend.clone())),
            Arc::new(HttpLookupClient::new(backend)),
            notices.clone(),
        )
        .with_lookup_error_policy(config.lookup.on_error);

        Ok(Self::with_controller(config, Arc::new(controller), notices))
    }

    pub fn with_controller(
        config: Config,
        controller: Arc<QueryController>,
        notices: AsyncSender<Notice>,
    ) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            controller,
            notices,
        }
    }
}
