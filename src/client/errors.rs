//! Search store error types

use thiserror::Error;

/// Result type for store requests
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures while talking to the search store.
///
/// None of these are retried here; retry belongs to the transport.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection, TLS, or timeout failure
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Store answered with a non-success status
    #[error("Store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Malformed store response: {0}")]
    MalformedResponse(String),

    /// A non-empty page came back without a scroll token
    #[error("Store response is missing a scroll id")]
    MissingScrollId,

    /// No store is reachable through this client
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Stable code for logs and CLI output
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Transport(_) => "STORE_TRANSPORT",
            StoreError::Status { .. } => "STORE_STATUS",
            StoreError::MalformedResponse(_) => "STORE_MALFORMED_RESPONSE",
            StoreError::MissingScrollId => "STORE_MISSING_SCROLL_ID",
            StoreError::Unavailable(_) => "STORE_UNAVAILABLE",
        }
    }
}
