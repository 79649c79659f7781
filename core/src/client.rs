//! Request builder and dispatcher for the envelope API.
//!
//! # Design
//! `ApiClient` owns its configuration and the shared loading counter, and is
//! otherwise stateless. `build_*` methods produce plain `HttpRequest` values;
//! `call` runs one through a `Transport` under the loading guard and hands the
//! result to the `ResponseNormalizer`. The verb helpers (`get`, `post`, ...)
//! combine the two.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::content_type::{BodyEncoding, ContentType};
use crate::error::ApiError;
use crate::host::Host;
use crate::http::{HttpMethod, HttpRequest, TransportFailure, ACCEPT_LANGUAGE, CONTENT_TYPE, METHOD_OVERRIDE};
use crate::loading::LoadingTracker;
use crate::normalize::ResponseNormalizer;
use crate::outcome::Outcome;
use crate::transport::Transport;
use crate::types::Multipart;

/// Per-call switches.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Extra request headers; `Content-Type` and `Accept-Language` are always
    /// set by the client.
    pub headers: Vec<(String, String)>,
    /// Show the loading indicator while the call is in flight.
    pub mask: bool,
    /// Treat the path as an absolute URL instead of appending it to the API base.
    pub external: bool,
    /// Encode `post`/`put`/`delete` bodies as JSON instead of a form.
    pub post_data: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            mask: true,
            external: false,
            post_data: false,
        }
    }
}

impl RequestOptions {
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn unmasked(mut self) -> Self {
        self.mask = false;
        self
    }

    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    pub fn json(mut self) -> Self {
        self.post_data = true;
        self
    }
}

#[derive(Debug)]
pub struct ApiClient {
    config: ClientConfig,
    loading: LoadingTracker,
    clock: fn() -> u64,
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            loading: LoadingTracker::new(),
            clock: unix_millis,
        }
    }

    /// Replace the cache-busting timestamp source.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn loading(&self) -> &LoadingTracker {
        &self.loading
    }

    // -----------------------------------------------------------------------
    // Request building
    // -----------------------------------------------------------------------

    pub fn build_get<H: Host + ?Sized>(&self, host: &H, path: &str, options: &RequestOptions) -> HttpRequest {
        self.assemble(host, HttpMethod::Get, path, None, None, options)
    }

    /// GET with `query` serialized into the query string after `_t`.
    pub fn build_get_with_query<H, B>(
        &self,
        host: &H,
        path: &str,
        query: &B,
        options: &RequestOptions,
    ) -> Result<HttpRequest, ApiError>
    where
        H: Host + ?Sized,
        B: Serialize + ?Sized,
    {
        let query = serde_urlencoded::to_string(query).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut request = self.assemble(host, HttpMethod::Get, path, None, None, options);
        if !query.is_empty() {
            request.url.push('&');
            request.url.push_str(&query);
        }
        Ok(request)
    }

    /// POST with a form body, or a JSON body when `options.post_data` is set.
    pub fn build_post<H, B>(&self, host: &H, path: &str, body: &B, options: &RequestOptions) -> Result<HttpRequest, ApiError>
    where
        H: Host + ?Sized,
        B: Serialize + ?Sized,
    {
        self.build_with_body(host, HttpMethod::Post, path, body, options)
    }

    /// Sent as POST with `X-HTTP-Method-Override: put`.
    pub fn build_put<H, B>(&self, host: &H, path: &str, body: &B, options: &RequestOptions) -> Result<HttpRequest, ApiError>
    where
        H: Host + ?Sized,
        B: Serialize + ?Sized,
    {
        self.build_with_body(host, HttpMethod::Put, path, body, options)
    }

    /// Sent as POST with `X-HTTP-Method-Override: delete`.
    pub fn build_delete<H, B>(&self, host: &H, path: &str, body: &B, options: &RequestOptions) -> Result<HttpRequest, ApiError>
    where
        H: Host + ?Sized,
        B: Serialize + ?Sized,
    {
        self.build_with_body(host, HttpMethod::Delete, path, body, options)
    }

    /// POST with a JSON body regardless of `options.post_data`.
    pub fn build_post_body<H, B>(&self, host: &H, path: &str, body: &B, options: &RequestOptions) -> Result<HttpRequest, ApiError>
    where
        H: Host + ?Sized,
        B: Serialize + ?Sized,
    {
        let bytes = encode(BodyEncoding::Json, body)?;
        Ok(self.assemble(host, HttpMethod::Post, path, Some(ContentType::Json.header_value().to_string()), Some(bytes), options))
    }

    /// POST a `multipart/form-data` body with a freshly generated boundary.
    pub fn build_upload<H: Host + ?Sized>(
        &self,
        host: &H,
        path: &str,
        form: &Multipart,
        options: &RequestOptions,
    ) -> HttpRequest {
        let boundary = format!("----envelope{}", Uuid::new_v4().simple());
        let content_type = format!("{}; boundary={boundary}", ContentType::Multipart.header_value());
        let body = form.encode(&boundary);
        self.assemble(host, HttpMethod::Post, path, Some(content_type), Some(body), options)
    }

    fn build_with_body<H, B>(
        &self,
        host: &H,
        method: HttpMethod,
        path: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<HttpRequest, ApiError>
    where
        H: Host + ?Sized,
        B: Serialize + ?Sized,
    {
        let encoding = BodyEncoding::for_method(method, options.post_data);
        let bytes = encode(encoding, body)?;
        let content_type = encoding.content_type().map(|ct| ct.header_value().to_string());
        Ok(self.assemble(host, method, path, content_type, Some(bytes), options))
    }

    fn assemble<H: Host + ?Sized>(
        &self,
        host: &H,
        method: HttpMethod,
        path: &str,
        content_type: Option<String>,
        body: Option<Vec<u8>>,
        options: &RequestOptions,
    ) -> HttpRequest {
        let mut url = if options.external {
            path.to_string()
        } else {
            format!("{}{path}", self.config.api_url())
        };
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&format!("_t={}", (self.clock)()));

        let mut headers: Vec<(String, String)> = options
            .headers
            .iter()
            .filter(|(name, _)| {
                !name.eq_ignore_ascii_case(ACCEPT_LANGUAGE)
                    && !(content_type.is_some() && name.eq_ignore_ascii_case(CONTENT_TYPE))
            })
            .cloned()
            .collect();
        if let Some(content_type) = content_type {
            headers.push((CONTENT_TYPE.to_string(), content_type));
        }
        headers.push((ACCEPT_LANGUAGE.to_string(), host.language()));

        let wire_method = match method {
            HttpMethod::Put | HttpMethod::Delete => {
                headers.push((METHOD_OVERRIDE.to_string(), method.as_str().to_ascii_lowercase()));
                HttpMethod::Post
            }
            other => other,
        };

        HttpRequest {
            method: wire_method,
            url,
            headers,
            body,
        }
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Execute `request` and normalize the result. With `mask` the loading
    /// indicator is held from before dispatch until normalization begins.
    pub fn call<H, T>(&self, host: &H, transport: &T, request: HttpRequest, mask: bool) -> Outcome
    where
        H: Host + ?Sized,
        T: Transport + ?Sized,
    {
        self.dispatch(host, transport, Ok(request), mask)
    }

    fn dispatch<H, T>(&self, host: &H, transport: &T, request: Result<HttpRequest, ApiError>, mask: bool) -> Outcome
    where
        H: Host + ?Sized,
        T: Transport + ?Sized,
    {
        let mut guard = if mask {
            self.loading.acquire(host)
        } else {
            self.loading.inert()
        };
        let exchange = match request {
            Ok(request) => {
                debug!(method = request.method.as_str(), url = %request.url, "dispatching request");
                transport.execute(request)
            }
            Err(e) => Err(TransportFailure::request_setup(e.to_string())),
        };
        ResponseNormalizer::new(&self.config).normalize(host, &mut guard, exchange)
    }

    pub fn get<H, T>(&self, host: &H, transport: &T, path: &str, options: &RequestOptions) -> Outcome
    where
        H: Host + ?Sized,
        T: Transport + ?Sized,
    {
        let request = self.build_get(host, path, options);
        self.dispatch(host, transport, Ok(request), options.mask)
    }

    pub fn get_with_query<H, T, B>(&self, host: &H, transport: &T, path: &str, query: &B, options: &RequestOptions) -> Outcome
    where
        H: Host + ?Sized,
        T: Transport + ?Sized,
        B: Serialize + ?Sized,
    {
        let request = self.build_get_with_query(host, path, query, options);
        self.dispatch(host, transport, request, options.mask)
    }

    pub fn post<H, T, B>(&self, host: &H, transport: &T, path: &str, body: &B, options: &RequestOptions) -> Outcome
    where
        H: Host + ?Sized,
        T: Transport + ?Sized,
        B: Serialize + ?Sized,
    {
        let request = self.build_post(host, path, body, options);
        self.dispatch(host, transport, request, options.mask)
    }

    pub fn put<H, T, B>(&self, host: &H, transport: &T, path: &str, body: &B, options: &RequestOptions) -> Outcome
    where
        H: Host + ?Sized,
        T: Transport + ?Sized,
        B: Serialize + ?Sized,
    {
        let request = self.build_put(host, path, body, options);
        self.dispatch(host, transport, request, options.mask)
    }

    pub fn delete<H, T, B>(&self, host: &H, transport: &T, path: &str, body: &B, options: &RequestOptions) -> Outcome
    where
        H: Host + ?Sized,
        T: Transport + ?Sized,
        B: Serialize + ?Sized,
    {
        let request = self.build_delete(host, path, body, options);
        self.dispatch(host, transport, request, options.mask)
    }

    pub fn post_body<H, T, B>(&self, host: &H, transport: &T, path: &str, body: &B, options: &RequestOptions) -> Outcome
    where
        H: Host + ?Sized,
        T: Transport + ?Sized,
        B: Serialize + ?Sized,
    {
        let request = self.build_post_body(host, path, body, options);
        self.dispatch(host, transport, request, options.mask)
    }

    pub fn upload<H, T>(&self, host: &H, transport: &T, path: &str, form: &Multipart, options: &RequestOptions) -> Outcome
    where
        H: Host + ?Sized,
        T: Transport + ?Sized,
    {
        let request = self.build_upload(host, path, form, options);
        self.dispatch(host, transport, Ok(request), options.mask)
    }
}

fn encode<B: Serialize + ?Sized>(encoding: BodyEncoding, body: &B) -> Result<Vec<u8>, ApiError> {
    match encoding {
        BodyEncoding::Json => serde_json::to_vec(body).map_err(|e| ApiError::Serialization(e.to_string())),
        BodyEncoding::Form | BodyEncoding::Query => serde_urlencoded::to_string(body)
            .map(String::into_bytes)
            .map_err(|e| ApiError::Serialization(e.to_string())),
        BodyEncoding::Multipart => Err(ApiError::Serialization(
            "multipart bodies are built from a Multipart form".to_string(),
        )),
    }
}
