//! Request and response messages and their value codec.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Correlation id for one in-flight call.
///
/// Ids come from a per-client monotonic counter starting at 1 and are
/// unique within that client's lifetime. There is no reuse guard across
/// process restarts; at one call per nanosecond a `u64` counter lasts
/// roughly 584 years, so overflow is not handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(u64);

impl CallId {
    /// Creates a call id from a raw counter value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Call({})", self.0)
    }
}

/// Request message sent from a client to a dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Correlation id assigned by the calling client.
    pub id: CallId,
    /// Dot-delimited path addressing the target procedure.
    pub method: String,
    /// Unvalidated call parameters; absent on the wire when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Request {
    /// Creates a new request.
    pub fn new(id: CallId, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }

    /// Encodes this request as the structural value the transport carries.
    pub fn to_value(&self) -> Result<Value, CodecError> {
        serde_json::to_value(self).map_err(|err| CodecError::Encode(err.to_string()))
    }

    /// Decodes a request from a transport value.
    pub fn from_value(value: Value) -> Result<Self, CodecError> {
        serde_json::from_value(value).map_err(|err| CodecError::MalformedRequest(err.to_string()))
    }
}

/// Response message sent from a dispatcher to a client.
///
/// Exactly one of the two shapes exists per id: `{id, result}` on
/// success, `{id, error}` on failure. The failure shape is matched
/// first, so an error field always settles a call as a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    /// The call failed; carries the error text.
    Failure {
        /// Correlation id of the call this answers.
        id: CallId,
        /// Human-readable failure message.
        error: String,
    },
    /// The procedure resolved; carries its result value.
    Success {
        /// Correlation id of the call this answers.
        id: CallId,
        /// Result value produced by the resolver.
        result: Value,
    },
}

impl Response {
    /// Creates a success response.
    pub fn success(id: CallId, result: Value) -> Self {
        Self::Success { id, result }
    }

    /// Creates a failure response.
    pub fn failure(id: CallId, error: impl Into<String>) -> Self {
        Self::Failure {
            id,
            error: error.into(),
        }
    }

    /// Returns the correlation id this response answers.
    pub fn id(&self) -> CallId {
        match self {
            Self::Failure { id, .. } | Self::Success { id, .. } => *id,
        }
    }

    /// Encodes this response as the structural value the transport carries.
    pub fn to_value(&self) -> Result<Value, CodecError> {
        serde_json::to_value(self).map_err(|err| CodecError::Encode(err.to_string()))
    }

    /// Decodes a response from a transport value.
    pub fn from_value(value: Value) -> Result<Self, CodecError> {
        serde_json::from_value(value).map_err(|err| CodecError::MalformedResponse(err.to_string()))
    }
}

/// Errors when encoding or decoding wire messages.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A transport value did not decode as a request.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    /// A transport value did not decode as a response.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// A message failed to serialize.
    #[error("Encode failed: {0}")]
    Encode(String),
}
