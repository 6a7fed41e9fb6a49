//! Error types for HTTP transport operations.

use thiserror::Error;

/// Error type for HTTP transport operations.
///
/// Describes what went wrong at the transport level. Any HTTP status code
/// returned by a server is a successful transport outcome and never appears
/// here.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused, TLS
    /// handshake failures, and errors while draining the response body.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request exceeded the client's total call duration bound.
    #[error("Request timed out")]
    Timeout,

    /// The request was rejected before any network I/O took place.
    ///
    /// Raised by the underlying client while building the request, for
    /// example for an unsupported URL scheme.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
