use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_lookup_path() -> String {
    "/api/claude".to_string()
}

fn default_list_path() -> String {
    "/api/word/all".to_string()
}

fn default_word_path() -> String {
    "/api/word".to_string()
}

fn default_connect_timeout_seconds() -> u64 {
    10
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_lookup_timeout_seconds() -> u64 {
    120
}

/// Where the word storage and AI generation endpoints live
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Streams the generated explanation for a word
    #[serde(default = "default_lookup_path")]
    pub lookup_path: String,
    /// Returns every stored word
    #[serde(default = "default_list_path")]
    pub list_path: String,
    /// POST upserts a word, DELETE removes one by id
    #[serde(default = "default_word_path")]
    pub word_path: String,
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,
    /// Applies to list, save and delete calls
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    /// Whole-stream limit for a lookup, generation can be slow
    #[serde(default = "default_lookup_timeout_seconds")]
    pub lookup_timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            lookup_path: default_lookup_path(),
            list_path: default_list_path(),
            word_path: default_word_path(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            request_timeout_seconds: default_request_timeout_seconds(),
            lookup_timeout_seconds: default_lookup_timeout_seconds(),
        }
    }
}

impl BackendConfig {
    pub fn apply_env(&mut self) {
        if let Ok(url) = env::var("LEXIS_BASE_URL") {
            self.base_url = url;
        }

        if let Some(seconds) = env::var("LEXIS_REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.request_timeout_seconds = seconds;
        }

        if let Some(seconds) = env::var("LEXIS_LOOKUP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.lookup_timeout_seconds = seconds;
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn lookup_url(&self) -> String {
        self.url(&self.lookup_path)
    }

    pub fn list_url(&self) -> String {
        self.url(&self.list_path)
    }

    pub fn word_url(&self) -> String {
        self.url(&self.word_path)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_seconds)
    }
}
