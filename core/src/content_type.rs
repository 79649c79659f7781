//! Enumerated content types and the request encodings they select.

use crate::http::HttpMethod;

/// Media types the client sends or recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Form,
    Json,
    Html,
    Multipart,
}

impl ContentType {
    /// Header value sent on requests. The trailing `;` on the first three
    /// matches what the backend has always received.
    pub fn header_value(self) -> &'static str {
        match self {
            ContentType::Form => "application/x-www-form-urlencoded;",
            ContentType::Json => "application/json;",
            ContentType::Html => "text/html;",
            ContentType::Multipart => "multipart/form-data",
        }
    }

    pub fn essence(self) -> &'static str {
        match self {
            ContentType::Form => "application/x-www-form-urlencoded",
            ContentType::Json => "application/json",
            ContentType::Html => "text/html",
            ContentType::Multipart => "multipart/form-data",
        }
    }

    /// Parse a `Content-Type` header by its media-type essence, ignoring
    /// parameters and case.
    pub fn from_header(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        [
            ContentType::Form,
            ContentType::Json,
            ContentType::Html,
            ContentType::Multipart,
        ]
        .into_iter()
        .find(|ct| essence.eq_ignore_ascii_case(ct.essence()))
    }
}

/// How a request body is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// Serialized into the query string (GET).
    Query,
    Form,
    Json,
    Multipart,
}

impl BodyEncoding {
    /// The `Content-Type` this encoding sends, if any.
    pub fn content_type(self) -> Option<ContentType> {
        match self {
            BodyEncoding::Query => None,
            BodyEncoding::Form => Some(ContentType::Form),
            BodyEncoding::Json => Some(ContentType::Json),
            BodyEncoding::Multipart => Some(ContentType::Multipart),
        }
    }

    /// The encoding a plain call of `method` uses; `json` selects JSON
    /// bodies over form bodies for non-GET verbs.
    pub fn for_method(method: HttpMethod, json: bool) -> Self {
        match (method, json) {
            (HttpMethod::Get, _) => BodyEncoding::Query,
            (_, true) => BodyEncoding::Json,
            (_, false) => BodyEncoding::Form,
        }
    }
}
