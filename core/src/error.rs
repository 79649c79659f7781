//! Error types for the envelope client.
//!
//! # Design
//! The normalizer never returns these directly; it reports problems through
//! the host and hands back an `Outcome`. `ApiError` is what callers get when
//! they opt into `?`-style handling via `Outcome::into_result`, and what
//! request construction and configuration loading fail with.

use thiserror::Error;

use crate::types::EnvelopeCode;

/// Errors surfaced by request building, configuration, and `Outcome::into_result`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received, or the request could not be sent.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a status other than 200.
    #[error("HTTP {status} {status_text}")]
    HttpStatus { status: u16, status_text: String },

    /// The envelope carried a non-zero code.
    #[error("application error {code}: {message}")]
    Application { code: EnvelopeCode, message: String },

    /// The envelope carried the session-expired sentinel code.
    #[error("session expired: {message}")]
    SessionExpired { message: String },

    /// The request payload could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Client configuration is missing or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}
