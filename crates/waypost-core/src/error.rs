//! Error types for waypost.

use thiserror::Error;

/// Result type alias using waypost's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for waypost operations.
///
/// Every component boundary returns these as values; nothing in the core
/// panics across a crate boundary. There is no retry or circuit-breaking
/// layer: a failed provider call is terminal for that resolution attempt.
#[derive(Error, Debug)]
pub enum Error {
    /// The composed address had no usable content.
    #[error("Composed address is empty")]
    EmptyAddress,

    /// A remote lookup was required but no provider is configured.
    #[error("No geocoding provider configured")]
    NoProviderConfigured,

    /// Remote provider call failed (network, non-success status, unparseable
    /// response).
    #[error("Provider error: {0}")]
    Provider(String),

    /// Proximity-search origin is neither a coordinate pair nor a resolvable
    /// address.
    #[error("Invalid query origin: {0}")]
    InvalidQueryOrigin(String),

    /// Storage adapter failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input (bad radius, missing coordinate columns, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
