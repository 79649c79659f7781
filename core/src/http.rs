//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and normalizes `HttpResponse` values; a
//! `Transport` performs the actual I/O. Bodies are raw bytes so multipart
//! uploads can carry binary files.

use serde_json::Value;
use thiserror::Error;

use crate::content_type::ContentType;

pub const ACCEPT_LANGUAGE: &str = "Accept-Language";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const METHOD_OVERRIDE: &str = "X-HTTP-Method-Override";

/// HTTP method sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
///
/// `json` carries a body the transport already decoded; the normalizer
/// prefers it over re-parsing `body`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub json: Option<Value>,
}

impl HttpResponse {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            status_text: String::new(),
            headers: Vec::new(),
            body: body.to_string(),
            json: None,
        }
    }

    pub fn with_status_text(mut self, text: &str) -> Self {
        self.status_text = text.to_string();
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_json(mut self, json: Value) -> Self {
        self.json = Some(json);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// The parsed `Content-Type`, `None` when the header is absent or unknown.
    pub fn content_type(&self) -> Option<ContentType> {
        self.header(CONTENT_TYPE).and_then(ContentType::from_header)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Why no response came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request was sent but nothing usable was received.
    NoResponse,
    /// The request could not be built or dispatched.
    RequestSetup,
}

/// A low-level failure reported by a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportFailure {
    pub fn no_response(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::NoResponse,
            message: message.into(),
        }
    }

    pub fn request_setup(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::RequestSetup,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse::new(200, "").with_header("content-type", "application/json;charset=UTF-8");
        assert_eq!(response.header("Content-Type"), Some("application/json;charset=UTF-8"));
        assert_eq!(response.content_type(), Some(ContentType::Json));
    }

    #[test]
    fn missing_content_type_is_none() {
        assert_eq!(HttpResponse::new(200, "").content_type(), None);
    }

    #[test]
    fn failure_displays_message() {
        assert_eq!(TransportFailure::no_response("Network Error").to_string(), "Network Error");
    }
}
