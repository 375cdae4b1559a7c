use std::time::Duration;
use thiserror::Error;

/// Failure while talking to the block-explorer API.
///
/// A `FetchError` for one wallet is recoverable: the wallet's transaction
/// list degrades to empty and the run continues.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("unexpected API status for {address}: status={status} message={message}")]
    UnexpectedStatus {
        address: String,
        status: String,
        message: String,
    },

    #[error("failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Configuration problems are fatal and abort the run before any fetch.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
