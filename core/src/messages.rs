//! Localized user-facing strings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const FALLBACK_LANGUAGE: &str = "en";

/// Strings shown in alerts for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    /// Prefix for transport and decoding failures.
    pub system_error: String,
    /// Prefix for non-200 responses.
    pub error_msg: String,
}

impl Messages {
    pub fn english() -> Self {
        Self {
            system_error: "System error".to_string(),
            error_msg: "Request failed".to_string(),
        }
    }

    pub fn chinese() -> Self {
        Self {
            system_error: "系统错误".to_string(),
            error_msg: "请求失败".to_string(),
        }
    }

    pub fn system_error(&self, detail: &str) -> String {
        if detail.is_empty() {
            self.system_error.clone()
        } else {
            format!("{}: {detail}", self.system_error)
        }
    }

    pub fn http_status(&self, status: u16, status_text: &str) -> String {
        format!("{}: {status} {status_text}", self.error_msg)
            .trim_end()
            .to_string()
    }
}

/// Messages keyed by language code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageCatalog(HashMap<String, Messages>);

impl MessageCatalog {
    pub fn insert(&mut self, language: &str, messages: Messages) {
        self.0.insert(language.to_string(), messages);
    }

    /// Exact code first, then the primary subtag (`zh-CN` → `zh`), then English.
    pub fn lookup(&self, language: &str) -> Messages {
        let primary = language.split(['-', '_']).next().unwrap_or(language);
        self.0
            .get(language)
            .or_else(|| self.0.get(primary))
            .or_else(|| self.0.get(FALLBACK_LANGUAGE))
            .cloned()
            .unwrap_or_else(Messages::english)
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        let mut catalog = Self(HashMap::new());
        catalog.insert("en", Messages::english());
        catalog.insert("zh", Messages::chinese());
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_falls_back_through_primary_subtag() {
        let catalog = MessageCatalog::default();
        assert_eq!(catalog.lookup("zh-CN"), Messages::chinese());
        assert_eq!(catalog.lookup("fr"), Messages::english());
    }

    #[test]
    fn empty_catalog_still_yields_english() {
        let catalog: MessageCatalog = serde_json::from_str("{}").unwrap();
        assert_eq!(catalog.lookup("en"), Messages::english());
    }

    #[test]
    fn http_status_message_without_status_text() {
        assert_eq!(Messages::english().http_status(502, ""), "Request failed: 502");
        assert_eq!(Messages::english().http_status(404, "Not Found"), "Request failed: 404 Not Found");
    }

    #[test]
    fn system_error_with_and_without_detail() {
        assert_eq!(Messages::english().system_error(""), "System error");
        assert_eq!(Messages::english().system_error("boom"), "System error: boom");
    }
}
