//! Wire DTOs: the backend's response envelope and multipart upload parts.
//!
//! # Design
//! The envelope mirrors the mock-server's schema but is defined independently.
//! `code` arrives as either a JSON number or a JSON string depending on the
//! backend endpoint, so it is kept as an untagged enum rather than coerced.
//! Decoding is lenient: any JSON object is an envelope. A missing or
//! non-scalar `code` is a failure code, and a `msg` that is null or not a
//! string is read as its text form.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Application status code carried by every envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeCode {
    Number(serde_json::Number),
    Text(String),
    /// `null`, booleans, arrays, objects, or a missing field.
    Other(Value),
}

impl Default for EnvelopeCode {
    fn default() -> Self {
        EnvelopeCode::Other(Value::Null)
    }
}

impl EnvelopeCode {
    /// `0` and `"0"` are the only success codes.
    pub fn is_success(&self) -> bool {
        match self {
            EnvelopeCode::Number(n) => n.as_f64() == Some(0.0),
            EnvelopeCode::Text(s) => s == "0",
            EnvelopeCode::Other(_) => false,
        }
    }

    /// Exact match against the string form only; a numeric code never
    /// matches the sentinel.
    pub fn is_session_expired(&self, sentinel: &str) -> bool {
        matches!(self, EnvelopeCode::Text(s) if s == sentinel)
    }
}

impl fmt::Display for EnvelopeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeCode::Number(n) => write!(f, "{n}"),
            EnvelopeCode::Text(s) => f.write_str(s),
            EnvelopeCode::Other(v) => write!(f, "{v}"),
        }
    }
}

/// The JSON wrapper `{code, msg, data|result}` returned by every API call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub code: EnvelopeCode,
    #[serde(default, deserialize_with = "lenient_text")]
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl Envelope {
    /// First non-empty of `data` then `result`.
    pub fn into_payload(self) -> Option<Value> {
        [self.data, self.result].into_iter().flatten().find(is_truthy)
    }
}

/// `null` becomes `""`, strings pass through, anything else is rendered as JSON.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// `null`, `false`, `0` and `""` count as absent. Arrays and objects are
/// present even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// One field of a `multipart/form-data` upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl FormPart {
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            filename: None,
            content_type: None,
            data: value.as_bytes().to_vec(),
        }
    }

    pub fn file(name: &str, filename: &str, content_type: &str, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            filename: Some(filename.to_string()),
            content_type: Some(content_type.to_string()),
            data,
        }
    }
}

/// A multipart upload body, encoded by `Multipart::encode`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Multipart {
    pub parts: Vec<FormPart>,
}

impl Multipart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn part(mut self, part: FormPart) -> Self {
        self.parts.push(part);
        self
    }

    /// Serialize all parts separated by `boundary`, terminated by the closing
    /// delimiter.
    pub fn encode(&self, boundary: &str) -> Vec<u8> {
        let mut out = Vec::new();
        for part in &self.parts {
            out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            let disposition = match &part.filename {
                Some(filename) => format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"\r\n",
                    part.name
                ),
                None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
            };
            out.extend_from_slice(disposition.as_bytes());
            if let Some(content_type) = &part.content_type {
                out.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
            }
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(&part.data);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        out
    }
}
