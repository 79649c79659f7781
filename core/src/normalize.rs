//! Turns a completed exchange into an `Outcome` plus at most one category of
//! side effect: nothing, an alert, or an alert followed by a login redirect.
//!
//! # Design
//! The loading guard is released first on every path, before any alert is
//! raised, so a modal alert never sits on top of a spinner.

use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::content_type::ContentType;
use crate::host::Host;
use crate::http::{FailureKind, HttpResponse, TransportFailure};
use crate::loading::LoadingGuard;
use crate::messages::Messages;
use crate::outcome::{Outcome, Payload};
use crate::types::Envelope;

/// Marker appended to the saved URL so the page knows it was restored.
pub const REDIRECT_SUFFIX: &str = "#back=true";

#[derive(Debug, Clone, Copy)]
pub struct ResponseNormalizer<'a> {
    config: &'a ClientConfig,
}

impl<'a> ResponseNormalizer<'a> {
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    pub fn normalize<H: Host + ?Sized>(
        &self,
        host: &H,
        guard: &mut LoadingGuard<'_, H>,
        exchange: Result<HttpResponse, TransportFailure>,
    ) -> Outcome {
        guard.release();
        let messages = self.config.messages.lookup(&host.language());
        match exchange {
            Ok(response) => self.normalize_response(host, &messages, response),
            Err(failure) => self.transport_failure(host, &messages, failure),
        }
    }

    fn transport_failure<H: Host + ?Sized>(
        &self,
        host: &H,
        messages: &Messages,
        failure: TransportFailure,
    ) -> Outcome {
        match failure.kind {
            FailureKind::NoResponse => warn!(error = %failure, "no response received"),
            FailureKind::RequestSetup => warn!(error = %failure, "request could not be sent"),
        }
        if self.config.error_reporting.should_alert(self.config.debug) {
            host.alert(&messages.system_error(&failure.message));
        }
        Outcome::TransportError(failure.message)
    }

    fn normalize_response<H: Host + ?Sized>(
        &self,
        host: &H,
        messages: &Messages,
        response: HttpResponse,
    ) -> Outcome {
        if response.status != 200 {
            warn!(
                status = response.status,
                headers = ?response.headers,
                body = %response.body,
                "unexpected response status"
            );
            host.alert(&messages.http_status(response.status, &response.status_text));
            return Outcome::HttpStatus {
                status: response.status,
                status_text: response.status_text,
            };
        }

        match response.content_type() {
            Some(ContentType::Html) => Outcome::Success(Payload::Html(response.body)),
            Some(ContentType::Json) => self.normalize_envelope(host, messages, response),
            other => {
                warn!(content_type = ?other, "response has no recognized content type");
                Outcome::NoContent
            }
        }
    }

    fn normalize_envelope<H: Host + ?Sized>(
        &self,
        host: &H,
        messages: &Messages,
        response: HttpResponse,
    ) -> Outcome {
        let decoded = match response.json {
            Some(value) if !value.is_null() => serde_json::from_value::<Envelope>(value),
            _ => serde_json::from_str::<Envelope>(&response.body),
        };
        let envelope = match decoded {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "response body is not an envelope");
                host.alert(&messages.system_error(&e.to_string()));
                return Outcome::Malformed(e.to_string());
            }
        };

        if envelope.code.is_success() {
            return match envelope.into_payload() {
                Some(value) => Outcome::Success(Payload::Json(value)),
                None => Outcome::NoContent,
            };
        }

        host.alert(&envelope.msg);
        let session_expired = envelope.code.is_session_expired(&self.config.session_expired_code);
        if session_expired {
            self.redirect_to_login(host);
        } else {
            debug!(code = %envelope.code, msg = %envelope.msg, "application error");
        }
        Outcome::Failure {
            code: envelope.code,
            message: envelope.msg,
            session_expired,
        }
    }

    fn redirect_to_login<H: Host + ?Sized>(&self, host: &H) {
        let resume = format!("{}{REDIRECT_SUFFIX}", host.current_url());
        info!(resume = %resume, route = %self.config.login_route, "session expired, redirecting to login");
        host.save_redirect_url(&resume);
        host.push_route(&self.config.login_route);
    }
}
