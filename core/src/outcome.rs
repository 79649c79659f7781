//! The tagged result of one normalized exchange.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::types::EnvelopeCode;

/// What a successful call carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `data` (or `result`) of a JSON envelope.
    Json(Value),
    /// Raw body of an HTML response.
    Html(String),
}

/// Exactly one of these is produced per call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Payload),
    /// Status 200 with nothing to return.
    NoContent,
    /// The envelope reported an application error; already alerted.
    Failure {
        code: EnvelopeCode,
        message: String,
        session_expired: bool,
    },
    /// The server answered with a status other than 200; already alerted.
    HttpStatus { status: u16, status_text: String },
    /// No response; alerted according to the reporting policy.
    TransportError(String),
    /// Status 200 JSON whose body is not an envelope; already alerted.
    Malformed(String),
}

impl Outcome {
    pub fn value(&self) -> Option<&Payload> {
        match self {
            Outcome::Success(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn json(&self) -> Option<&Value> {
        match self.value() {
            Some(Payload::Json(value)) => Some(value),
            _ => None,
        }
    }

    /// True only when the envelope code signalled failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_) | Outcome::NoContent)
    }

    pub fn into_result(self) -> Result<Option<Payload>, ApiError> {
        match self {
            Outcome::Success(payload) => Ok(Some(payload)),
            Outcome::NoContent => Ok(None),
            Outcome::Failure {
                message,
                session_expired: true,
                ..
            } => Err(ApiError::SessionExpired { message }),
            Outcome::Failure { code, message, .. } => Err(ApiError::Application { code, message }),
            Outcome::HttpStatus { status, status_text } => Err(ApiError::HttpStatus { status, status_text }),
            Outcome::TransportError(message) => Err(ApiError::Transport(message)),
            Outcome::Malformed(message) => Err(ApiError::Deserialization(message)),
        }
    }

    /// Decode the JSON payload into `T`. An HTML payload is decoded as a
    /// JSON string.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<Option<T>, ApiError> {
        let value = match self.into_result()? {
            None => return Ok(None),
            Some(Payload::Json(value)) => value,
            Some(Payload::Html(text)) => Value::String(text),
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}
