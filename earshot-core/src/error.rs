//! Error types for the Earshot core library.

use thiserror::Error;

/// Top-level error type for all Earshot operations.
///
/// None of these abort a host notification: the [`Dispatcher`](crate::Dispatcher)
/// logs them and carries on in a degraded mode.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The host's participant roster could not be located at setup.
    #[error("Participant roster unavailable: {0}")]
    RosterUnavailable(String),

    /// The conversation service rejected or never received a delivery.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A save record was truncated or otherwise malformed.
    #[error("Malformed save record: {0}")]
    MalformedRecord(String),

    /// A save record was written by a format version this build does not know.
    #[error("Unsupported record version: {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version found in the record header.
        found: u32,
        /// Version this build reads and writes.
        supported: u32,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, RelayError>;
