use lexis_store::TransportError;

/// Submitted text was empty after trimming
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Please enter a word")]
pub struct ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Invalid UTF-8 sequence at byte {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("Stream ended inside a multi-byte character ({pending} bytes pending)")]
    Truncated { pending: usize },
}

/// Why a lookup session ended without a complete explanation
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Lookup request failed: {0}")]
    Request(#[from] TransportError),

    #[error("Lookup stream failed: {0}")]
    Stream(#[from] DecodeError),
}
