use futures_util::StreamExt;
use lexis_config::backend::BackendConfig;
use lexis_types::{NewWord, WordEntry};
use serde_json::json;

use crate::{ByteStream, LookupClient, TransportError, WordStore};

/// Shared HTTP plumbing for every backend route
#[derive(Clone)]
pub struct BackendClient {
    config: BackendConfig,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Send a JSON body and fail on any non-2xx status
    async fn send_json(
        &self,
        method: reqwest::Method,
        url: String,
        body: &serde_json::Value,
        timeout: std::time::Duration,
    ) -> Result<reqwest::Response, TransportError> {
        tracing::debug!("{} {}", method, url);

        let response = self
            .client
            .request(method, &url)
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} answered HTTP {}", url, status);
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

/// `WordStore` over the backend's word collection routes
#[derive(Clone)]
pub struct HttpWordStore {
    backend: BackendClient,
}

impl HttpWordStore {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

#[async_trait::async_trait]
impl WordStore for HttpWordStore {
    async fn list_all(&self) -> Result<Vec<WordEntry>, TransportError> {
        let config = self.backend.config();
        let response = self
            .backend
            .send_json(
                reqwest::Method::POST,
                config.list_url(),
                &json!({}),
                config.request_timeout(),
            )
            .await?;

        let words = response
            .json::<Vec<WordEntry>>()
            .await
            .map_err(|e| TransportError::Malformed(format!("Failed to parse word list: {}", e)))?;

        tracing::debug!("Fetched {} words", words.len());
        Ok(words)
    }

    async fn save(&self, word: &NewWord) -> Result<(), TransportError> {
        let config = self.backend.config();
        let body = serde_json::to_value(word)
            .map_err(|e| TransportError::Malformed(format!("Failed to encode word: {}", e)))?;

        self.backend
            .send_json(
                reqwest::Method::POST,
                config.word_url(),
                &body,
                config.request_timeout(),
            )
            .await?;

        Ok(())
    }

    async fn delete(&self, entry: &WordEntry) -> Result<(), TransportError> {
        let config = self.backend.config();
        self.backend
            .send_json(
                reqwest::Method::DELETE,
                config.word_url(),
                &json!({ "id": entry.id }),
                config.request_timeout(),
            )
            .await?;

        Ok(())
    }
}

/// `LookupClient` over the backend's streaming generation route
#[derive(Clone)]
pub struct HttpLookupClient {
    backend: BackendClient,
}

impl HttpLookupClient {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

#[async_trait::async_trait]
impl LookupClient for HttpLookupClient {
    async fn lookup(&self, word: &str) -> Result<ByteStream, TransportError> {
        let config = self.backend.config();
        let response = self
            .backend
            .send_json(
                reqwest::Method::POST,
                config.lookup_url(),
                &json!({ "word": word }),
                config.lookup_timeout(),
            )
            .await?;

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(TransportError::from))
            .boxed())
    }
}
