//! Transport error types.

use earshot_core::RelayError;
use thiserror::Error;

/// Errors that can occur while delivering to the conversation service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// HTTP request failed.
    #[error("Conversation service request failed: {0}")]
    RequestFailed(String),

    /// The service answered with a non-success status.
    #[error("Conversation service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Request timed out.
    #[error("Conversation service request timed out after {0}ms")]
    Timeout(u64),

    /// Nothing is listening at the endpoint.
    #[error("Conversation service unavailable: {0}")]
    Unavailable(String),

    /// The HTTP client or its runtime could not be built.
    #[error("Conversation service client setup failed: {0}")]
    Setup(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            ServiceError::Unavailable(err.to_string())
        } else {
            ServiceError::RequestFailed(err.to_string())
        }
    }
}

impl From<ServiceError> for RelayError {
    fn from(err: ServiceError) -> Self {
        RelayError::Delivery(err.to_string())
    }
}
