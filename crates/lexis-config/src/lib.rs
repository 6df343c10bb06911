use std::env;

use serde::{Deserialize, Serialize};

use self::backend::BackendConfig;
use self::lookup::{LookupConfig, LookupErrorPolicy};
use self::ui::UiConfig;

pub mod backend;
pub mod lookup;
pub mod ui;

fn default_log_filter() -> String {
    "warn".to_string()
}

fn default_channel_capacity() -> usize {
    64
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub lookup: LookupConfig,
    pub ui: UiConfig,

    /// Used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Bound of the input and notice channels
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            lookup: LookupConfig::default(),
            ui: UiConfig::default(),
            log_filter: default_log_filter(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl Config {
    /// Overlay `LEXIS_*` variables onto an already loaded config
    pub fn apply_env(&mut self) {
        self.backend.apply_env();

        if let Some(policy) = env::var("LEXIS_ON_LOOKUP_ERROR")
            .ok()
            .and_then(|v| v.parse::<LookupErrorPolicy>().ok())
        {
            self.lookup.on_error = policy;
        }

        if let Ok(filter) = env::var("LEXIS_LOG") {
            self.log_filter = filter;
        }
    }
}
