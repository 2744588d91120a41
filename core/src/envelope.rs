//! The uniform result shape handed back to callers.
//!
//! On the wire an envelope is either
//! `{"isSuccess": true, "result": <body>}` or
//! `{"isSuccess": false, "errorMessage": <message>}`. The Rust enum makes the
//! "exactly one branch" rule structural; serde goes through `WireEnvelope`
//! to produce the flat camelCase shape UI code expects.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Message carried by a failure envelope.
///
/// Servers usually send a string `message`, but any JSON value is passed
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(String),
    Structured(Value),
}

impl ErrorMessage {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ErrorMessage::Text(s) => Some(s),
            ErrorMessage::Structured(_) => None,
        }
    }
}

impl From<Value> for ErrorMessage {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => ErrorMessage::Text(s),
            other => ErrorMessage::Structured(other),
        }
    }
}

impl From<&str> for ErrorMessage {
    fn from(s: &str) -> Self {
        ErrorMessage::Text(s.to_string())
    }
}

impl From<String> for ErrorMessage {
    fn from(s: String) -> Self {
        ErrorMessage::Text(s)
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMessage::Text(s) => f.write_str(s),
            ErrorMessage::Structured(v) => write!(f, "{v}"),
        }
    }
}

/// Outcome of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireEnvelope", try_from = "WireEnvelope")]
pub enum ResultEnvelope {
    Success { result: Value },
    Failure { error_message: ErrorMessage },
}

impl ResultEnvelope {
    pub fn success(result: Value) -> Self {
        ResultEnvelope::Success { result }
    }

    pub fn failure(error_message: impl Into<ErrorMessage>) -> Self {
        ResultEnvelope::Failure {
            error_message: error_message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResultEnvelope::Success { .. })
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            ResultEnvelope::Success { result } => Some(result),
            ResultEnvelope::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&ErrorMessage> {
        match self {
            ResultEnvelope::Success { .. } => None,
            ResultEnvelope::Failure { error_message } => Some(error_message),
        }
    }

    pub fn into_result(self) -> Result<Value, ErrorMessage> {
        match self {
            ResultEnvelope::Success { result } => Ok(result),
            ResultEnvelope::Failure { error_message } => Err(error_message),
        }
    }

    /// Deserialize a success result into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let result = self.into_result().map_err(ApiError::Failed)?;
        serde_json::from_value(result).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEnvelope {
    is_success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_message: Option<ErrorMessage>,
}

impl From<ResultEnvelope> for WireEnvelope {
    fn from(envelope: ResultEnvelope) -> Self {
        match envelope {
            ResultEnvelope::Success { result } => WireEnvelope {
                is_success: true,
                result: Some(result),
                error_message: None,
            },
            ResultEnvelope::Failure { error_message } => WireEnvelope {
                is_success: false,
                result: None,
                error_message: Some(error_message),
            },
        }
    }
}

impl TryFrom<WireEnvelope> for ResultEnvelope {
    type Error = String;

    fn try_from(wire: WireEnvelope) -> Result<Self, Self::Error> {
        if wire.is_success {
            if wire.error_message.is_some() {
                return Err("success envelope must not carry errorMessage".to_string());
            }
            Ok(ResultEnvelope::Success {
                result: wire.result.unwrap_or(Value::Null),
            })
        } else {
            if wire.result.is_some() {
                return Err("failure envelope must not carry result".to_string());
            }
            wire.error_message
                .map(|error_message| ResultEnvelope::Failure { error_message })
                .ok_or_else(|| "failure envelope requires errorMessage".to_string())
        }
    }
}
