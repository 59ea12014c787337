//! Error types and result types for collection operations.
//!
//! Use [`LayerResult<T>`] as the return type for fallible operations. A record
//! that does not exist is never an error: reads report it as `Ok(None)` and
//! updates as `Ok(false)`.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when talking to the data API.
#[derive(Error, Debug)]
pub enum LayerError {
    /// A query tried to set a key the layer reserves for request routing
    /// (`act` or `type`). This is detected before any request is sent.
    #[error(
        "Query uses reserved key `{0}`; filter on it through an operator instead, e.g. {{eq: {{{0}: value}}}}"
    )]
    ReservedQueryKey(String),
    /// Serialization/deserialization error when converting between BSON, JSON and typed values.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// A typed value did not serialize to a field mapping.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// Error during client configuration or construction.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// The data API (or the transport in front of it) reported a failure.
    #[error("Backend error: {0}")]
    Backend(String),
    /// The remote data API answered with a non-success status.
    #[error("Backend responded with status {status}: {message}")]
    Remote {
        /// HTTP status code of the reply.
        status: u16,
        /// Reply body, untouched.
        message: String,
    },
}

/// A specialized `Result` type for collection operations.
pub type LayerResult<T> = Result<T, LayerError>;

impl From<BsonError> for LayerError {
    fn from(err: BsonError) -> Self {
        LayerError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for LayerError {
    fn from(err: SerdeJsonError) -> Self {
        LayerError::Serialization(err.to_string())
    }
}
