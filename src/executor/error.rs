//! Error types for request execution.

use thiserror::Error;

use crate::store::StoreError;
use crate::transport::HttpError;

/// Error type for request execution.
///
/// Any HTTP status returned by the remote server is a successful
/// execution; only failures to build or complete the call appear here.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The stored request cannot be turned into a valid HTTP request.
    ///
    /// Raised before any network I/O: malformed URL, unsupported scheme,
    /// or a header that cannot be encoded.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The call was dispatched but did not complete.
    ///
    /// Covers DNS, connect, TLS, timeout and body-read failures.
    #[error("Failed to execute request: {cause}")]
    ExecutionFailed {
        /// Underlying transport failure
        #[source]
        cause: HttpError,
    },

    /// The stored request or its collection does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The caller may not use the request's collection.
    #[error("Access denied")]
    AccessDenied,

    /// The store failed while loading or authorizing the request.
    #[error("Store error: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for ExecuteError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::AccessDenied => Self::AccessDenied,
            other => Self::Store(other),
        }
    }
}
