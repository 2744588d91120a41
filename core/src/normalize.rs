//! Pure request and response transforms.
//!
//! # Design
//! `prepare_request` runs before the transport, `normalize_response` after
//! it. Neither does I/O or keeps state, so `ApiClient::request` is just the
//! composition of the two around `Transport::execute`.

use serde_json::Value;

use crate::envelope::{ErrorMessage, ResultEnvelope};
use crate::error::TransportError;
use crate::http::{HttpResponse, RequestConfig, APPLICATION_JSON, CONTENT_TYPE};

/// Message for failures where no response was received.
pub const NETWORK_ERROR: &str = "Network Error";

/// Message for failures where the request timed out before any response.
pub const TIMEOUT_ERROR: &str = "Request timed out";

/// Return a copy of `config` that is ready to send.
///
/// Mutating requests without a `Content-Type` header (matched in any case)
/// get `Content-Type: application/json`. An existing header is kept as is.
pub fn prepare_request(config: &RequestConfig) -> RequestConfig {
    let mut prepared = config.clone();
    if prepared.method.is_mutating() && prepared.header_value(CONTENT_TYPE).is_none() {
        prepared
            .headers
            .push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
    }
    prepared
}

/// Fold a transport outcome into a `ResultEnvelope`.
pub fn normalize_response(outcome: Result<HttpResponse, TransportError>) -> ResultEnvelope {
    match outcome {
        Ok(response) if response.is_success() => ResultEnvelope::success(decode_body(&response.body)),
        Ok(response) => ResultEnvelope::failure(failure_message(&response)),
        Err(TransportError::Timeout) => ResultEnvelope::failure(TIMEOUT_ERROR),
        Err(_) => ResultEnvelope::failure(NETWORK_ERROR),
    }
}

/// Empty bodies decode to `null`, JSON bodies to their value, anything else
/// to a JSON string holding the raw text.
pub fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

fn failure_message(response: &HttpResponse) -> ErrorMessage {
    if let Value::Object(mut fields) = decode_body(&response.body) {
        match fields.remove("message") {
            None | Some(Value::Null) => {}
            Some(message) => return ErrorMessage::from(message),
        }
    }
    if response.status_text.is_empty() {
        ErrorMessage::Text(format!("Request failed with status code {}", response.status))
    } else {
        ErrorMessage::Text(response.status_text.clone())
    }
}
