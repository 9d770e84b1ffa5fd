//! Error types for the AppTweak API client.
//!
//! # Design
//! The three failure categories of a call (transport, HTTP status, decode)
//! each get their own variant so callers can branch on them. `Unauthorized`
//! is split out of `HttpError` because a rejected token needs a different
//! response from the caller than a server fault.

use thiserror::Error;

/// Errors returned by `AuthClient`, its transports and `Config`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, I/O, timeout).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 401 or 403 for the supplied token.
    #[error("unauthorized: {body}")]
    Unauthorized { body: String },

    /// The server returned a non-2xx status other than 401/403.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// A request URL or rewrite target could not be built.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Required configuration is missing or malformed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        ApiError::InvalidUrl(e.to_string())
    }
}
