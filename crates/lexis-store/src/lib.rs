mod client;

pub use client::{BackendClient, HttpLookupClient, HttpWordStore};

use bytes::Bytes;
use futures_util::stream::BoxStream;
use lexis_types::{NewWord, WordEntry};

/// Raw body chunks of a lookup response, in arrival order
pub type ByteStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// Persistence of looked-up words
#[async_trait::async_trait]
pub trait WordStore: Send + Sync {
    /// Fetch every stored word; callers replace their local copy with the result
    async fn list_all(&self) -> Result<Vec<WordEntry>, TransportError>;

    /// Create or update by word, the backend decides which
    async fn save(&self, word: &NewWord) -> Result<(), TransportError>;

    /// Remove by backend id
    async fn delete(&self, entry: &WordEntry) -> Result<(), TransportError>;
}

/// AI explanation provider
#[async_trait::async_trait]
pub trait LookupClient: Send + Sync {
    /// Start generating an explanation for `word`, returning the open body stream
    async fn lookup(&self, word: &str) -> Result<ByteStream, TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend returned HTTP {status}")]
    Status { status: u16 },

    #[error("Malformed response: {0}")]
    Malformed(String),
}
