use std::time::Duration;
use thiserror::Error;

/// Why a URL was rejected before any bytes hit the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidUriKind {
    /// URL could not be parsed
    ParseError,
    /// URL has no host
    MissingAuthority,
    /// URL has no scheme
    MissingScheme,
}

/// Transport-level failures.
///
/// Non-2xx responses only become an error through the checked body readers
/// ([`HttpResponse::checked_bytes`](crate::HttpResponse::checked_bytes),
/// [`HttpResponse::json`](crate::HttpResponse::json)); `send()` itself
/// succeeds for every status the server returns.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    /// Request building failed
    #[error("Failed to build request: {0}")]
    RequestBuild(#[from] http::Error),

    /// Invalid header name
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    /// Invalid header value
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// The request did not complete within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Network failure (connect, DNS, reset, ...)
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// TLS setup failure
    #[error("TLS error: {0}")]
    Tls(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Response body exceeded the configured limit
    #[error("Response body too large: limit {limit} bytes, got {actual} bytes")]
    BodyTooLarge { limit: usize, actual: usize },

    /// Non-2xx status observed by a checked reader
    #[error("HTTP {status}: {body_preview}")]
    HttpStatus {
        status: http::StatusCode,
        body_preview: String,
        content_type: Option<String>,
    },

    /// JSON encoding or decoding failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// URL failed validation; match on `kind`, `reason` is for logs only
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUri {
        url: String,
        kind: InvalidUriKind,
        reason: String,
    },

    /// URL scheme not permitted by the transport security mode
    #[error("URL scheme '{scheme}' not allowed: {reason}")]
    InvalidScheme { scheme: String, reason: String },
}

impl From<hyper_util::client::legacy::Error> for HttpError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        HttpError::Transport(Box::new(err))
    }
}
