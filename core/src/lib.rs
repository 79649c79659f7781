//! Synchronous API client core for envelope-style JSON backends.
//!
//! # Overview
//! Builds `HttpRequest` values, runs them through a `Transport`, and
//! normalizes each response into an `Outcome`: the envelope's payload, an
//! application failure (alerted, possibly followed by a login redirect), a
//! non-200 status (alerted), or a transport error (alerted per policy).
//!
//! # Design
//! - UI collaborators live behind the `Host` trait; the core never blocks on them.
//! - `ApiClient` owns an explicit `ClientConfig`; locale and messages are
//!   re-resolved per call.
//! - The loading indicator is reference counted so overlapping calls keep it
//!   visible until the last one finishes.
//! - The envelope DTO is defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod content_type;
pub mod error;
pub mod host;
pub mod http;
pub mod loading;
pub mod messages;
pub mod normalize;
pub mod outcome;
pub mod transport;
pub mod types;

pub use client::{ApiClient, RequestOptions};
pub use config::{ClientConfig, ErrorReporting};
pub use content_type::{BodyEncoding, ContentType};
pub use error::ApiError;
pub use host::Host;
pub use http::{FailureKind, HttpMethod, HttpRequest, HttpResponse, TransportFailure};
pub use loading::{LoadingGuard, LoadingTracker};
pub use messages::{MessageCatalog, Messages};
pub use normalize::ResponseNormalizer;
pub use outcome::{Outcome, Payload};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Envelope, EnvelopeCode, FormPart, Multipart};
