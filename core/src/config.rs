//! Client configuration.
//!
//! # Design
//! Everything the client needs is passed in at construction; nothing is read
//! from the environment implicitly. `from_env` and `from_json` exist for hosts
//! that want one of those sources, and both fill gaps from `Default`.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::messages::MessageCatalog;

pub const DEFAULT_SESSION_EXPIRED_CODE: &str = "000000000010";
pub const DEFAULT_LOGIN_ROUTE: &str = "/identityLogin";

/// When transport failures are shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReporting {
    Always,
    #[default]
    DebugOnly,
    Never,
}

impl ErrorReporting {
    pub fn should_alert(self, debug: bool) -> bool {
        match self {
            ErrorReporting::Always => true,
            ErrorReporting::DebugOnly => debug,
            ErrorReporting::Never => false,
        }
    }

    fn parse(value: &str) -> Result<Self, ApiError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(ErrorReporting::Always),
            "debug_only" | "debug" => Ok(ErrorReporting::DebugOnly),
            "never" => Ok(ErrorReporting::Never),
            other => Err(ApiError::Config(format!("unknown error reporting policy: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Page protocol including the colon, e.g. `https:`.
    pub scheme: String,
    pub api_domain: String,
    pub api_context: String,
    pub debug: bool,
    pub error_reporting: ErrorReporting,
    pub session_expired_code: String,
    pub login_route: String,
    pub messages: MessageCatalog,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: "https:".to_string(),
            api_domain: String::new(),
            api_context: String::new(),
            debug: false,
            error_reporting: ErrorReporting::default(),
            session_expired_code: DEFAULT_SESSION_EXPIRED_CODE.to_string(),
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            messages: MessageCatalog::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(scheme: &str, api_domain: &str, api_context: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            api_domain: api_domain.to_string(),
            api_context: api_context.to_string(),
            ..Self::default()
        }
    }

    /// `<scheme>//<api_domain>/<api_context>`; internal paths are appended verbatim.
    pub fn api_url(&self) -> String {
        format!("{}//{}/{}", self.scheme, self.api_domain, self.api_context)
    }

    /// `<scheme>//<api_domain>/`
    pub fn base_url(&self) -> String {
        format!("{}//{}/", self.scheme, self.api_domain)
    }

    pub fn from_json(raw: &str) -> Result<Self, ApiError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ApiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read `API_SCHEME`, `API_DOMAIN`, `API_CONTEXT`, `API_DEBUG` and
    /// `API_ERROR_REPORTING` from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut config = Self::default();
        if let Some(scheme) = lookup("API_SCHEME") {
            config.scheme = scheme;
        }
        config.api_domain = lookup("API_DOMAIN").unwrap_or_default();
        config.api_context = lookup("API_CONTEXT").unwrap_or_default();
        if let Some(debug) = lookup("API_DEBUG") {
            config.debug = matches!(debug.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(policy) = lookup("API_ERROR_REPORTING") {
            config.error_reporting = ErrorReporting::parse(&policy)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.api_domain.trim().is_empty() {
            return Err(ApiError::Config("api_domain must not be empty".to_string()));
        }
        if !self.scheme.ends_with(':') {
            return Err(ApiError::Config(format!(
                "scheme must include the trailing colon: {}",
                self.scheme
            )));
        }
        Ok(())
    }
}
