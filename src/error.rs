//! Error types for kfmd
//!
//! Validation failures are raised locally before any network call; transport
//! and service failures are propagated unchanged from the remote call.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// kfmd error types
#[derive(Error, Debug)]
pub enum Error {
    /// Artifact custom properties already carry a key owned by `Run::log`
    #[error("custom_properties contains reserved key {0}")]
    ReservedProperty(String),

    /// Unknown metrics type name
    #[error("Invalid metrics type: {0}\nExpected one of: training, validation, testing, production")]
    InvalidMetricsType(String),

    /// Network failure talking to the metadata service
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Metadata service rejected the request
    #[error("Metadata service returned HTTP {status}: {body}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Response body, as sent by the service
        body: String,
    },

    /// Response could not be interpreted as a created artifact
    #[error("Malformed service response: {0}")]
    MalformedResponse(String),

    /// JSON encoding/decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error was raised locally, before any call to the service.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::ReservedProperty(_) | Self::InvalidMetricsType(_))
    }
}
