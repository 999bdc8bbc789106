//! Transport error types.

use thiserror::Error;

/// Errors raised below the envelope boundary, while talking to the network.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Request did not complete within its timeout
    #[error("request timed out")]
    Timeout,

    /// Could not reach the remote host (DNS, refused, reset)
    #[error("connection failed: {0}")]
    Connect(String),

    /// Request could not be built (bad header, bad body)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Anything else, including malformed responses
    #[error("http request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidRequest(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}
