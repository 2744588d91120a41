//! Error types for the console API client.
//!
//! # Design
//! `TransportError` covers failures that produced no response at all. Non-2xx
//! responses are not errors at this level; `normalize_response` folds both
//! into a `ResultEnvelope`. `ApiError` is only surfaced by envelope helpers
//! such as `ResultEnvelope::decode`, never by `ApiClient::request`.

use thiserror::Error;

use crate::envelope::ErrorMessage;

/// A request that never got a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server could not be reached (DNS, connection refused, TLS).
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// No response arrived before the request timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// The request was cancelled before a response arrived.
    #[error("request aborted")]
    Aborted,

    /// The request could not be built (bad url, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Any other I/O failure, including a body that could not be read.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors from turning envelopes and payloads into typed values.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A success result did not match the expected type.
    #[error("decoding result failed: {0}")]
    Decode(String),

    /// The envelope was a failure.
    #[error("request failed: {0}")]
    Failed(ErrorMessage),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported HTTP method: {0}")]
pub struct ParseMethodError(pub String);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
