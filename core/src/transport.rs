//! The I/O seam: executes an `HttpRequest` and reports what came back.

use crate::http::{HttpRequest, HttpResponse, TransportFailure};

/// Performs one HTTP round trip.
///
/// Any status code, including 4xx/5xx, must come back as `Ok`; `Err` is
/// reserved for exchanges that produced no response at all.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        (**self).execute(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use tracing::trace;

    use super::Transport;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse, TransportFailure};

    /// Blocking transport backed by a shared `ureq::Agent`.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl UreqTransport {
        /// Status codes are returned as data, never as `Err`.
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }

        pub fn with_agent(agent: ureq::Agent) -> Self {
            Self { agent }
        }
    }

    fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    fn into_failure(error: ureq::Error) -> TransportFailure {
        match error {
            ureq::Error::BadUri(_) | ureq::Error::Http(_) => TransportFailure::request_setup(error.to_string()),
            other => TransportFailure::no_response(other.to_string()),
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
            let HttpRequest {
                method,
                url,
                headers,
                body,
            } = request;
            trace!(method = method.as_str(), url = %url, "executing request");
            let body = body.unwrap_or_default();

            let result = match method {
                HttpMethod::Get => with_headers(self.agent.get(&url), &headers).call(),
                HttpMethod::Delete => with_headers(self.agent.delete(&url), &headers).call(),
                HttpMethod::Post => with_headers(self.agent.post(&url), &headers).send(&body[..]),
                HttpMethod::Put => with_headers(self.agent.put(&url), &headers).send(&body[..]),
            };
            let mut response = result.map_err(into_failure)?;

            let status = response.status();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| TransportFailure::no_response(e.to_string()))?;

            Ok(HttpResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                headers,
                body,
                json: None,
            })
        }
    }
}
