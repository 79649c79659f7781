//! Verify request building and response normalization against the JSON
//! vectors stored in `test-vectors/`.
//!
//! Each normalize case describes a simulated exchange, the expected outcome,
//! and the exact sequence of host side effects.

use std::cell::RefCell;

use envelope_core::{
    ApiClient, ClientConfig, Host, HttpMethod, HttpResponse, LoadingTracker, Outcome, Payload, RequestOptions,
    ResponseNormalizer, TransportFailure,
};
use serde_json::Value;

const TIMESTAMP: u64 = 1_700_000_000_000;

fn fixed_clock() -> u64 {
    TIMESTAMP
}

struct VectorHost {
    current_url: String,
    language: String,
    events: RefCell<Vec<String>>,
}

impl VectorHost {
    fn new(current_url: &str, language: &str) -> Self {
        Self {
            current_url: current_url.to_string(),
            language: language.to_string(),
            events: RefCell::new(Vec::new()),
        }
    }

    fn record(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl Host for VectorHost {
    fn show_loading(&self) {
        self.record("show".to_string());
    }
    fn hide_loading(&self) {
        self.record("hide".to_string());
    }
    fn alert(&self, message: &str) {
        self.record(format!("alert:{message}"));
    }
    fn push_route(&self, path: &str) {
        self.record(format!("route:{path}"));
    }
    fn language(&self) -> String {
        self.language.clone()
    }
    fn current_url(&self) -> String {
        self.current_url.clone()
    }
    fn save_redirect_url(&self, url: &str) {
        self.record(format!("saved:{url}"));
    }
}

fn simulated_exchange(case: &Value) -> Result<HttpResponse, TransportFailure> {
    if let Some(message) = case["transport_error"].as_str() {
        return Err(TransportFailure::no_response(message));
    }
    let sim = &case["response"];
    let mut response = HttpResponse::new(sim["status"].as_u64().unwrap() as u16, sim["body"].as_str().unwrap())
        .with_status_text(sim["status_text"].as_str().unwrap_or_default());
    if let Some(content_type) = sim["content_type"].as_str() {
        response = response.with_header("Content-Type", content_type);
    }
    if let Some(json) = sim.get("json") {
        response = response.with_json(json.clone());
    }
    Ok(response)
}

fn assert_outcome(name: &str, outcome: &Outcome, expected: &Value) {
    match expected["kind"].as_str().unwrap() {
        "json" => assert_eq!(outcome.json(), Some(&expected["value"]), "{name}: json payload"),
        "html" => assert_eq!(
            outcome,
            &Outcome::Success(Payload::Html(expected["value"].as_str().unwrap().to_string())),
            "{name}: html payload"
        ),
        "no_content" => assert_eq!(outcome, &Outcome::NoContent, "{name}"),
        "failure" => match outcome {
            Outcome::Failure { session_expired, .. } => {
                assert_eq!(Value::Bool(*session_expired), expected["session_expired"], "{name}: sentinel")
            }
            other => panic!("{name}: expected failure, got {other:?}"),
        },
        "http_status" => match outcome {
            Outcome::HttpStatus { status, .. } => {
                assert_eq!(u64::from(*status), expected["status"].as_u64().unwrap(), "{name}: status")
            }
            other => panic!("{name}: expected http status, got {other:?}"),
        },
        "malformed" => assert!(matches!(outcome, Outcome::Malformed(_)), "{name}: {outcome:?}"),
        "transport_error" => assert!(matches!(outcome, Outcome::TransportError(_)), "{name}: {outcome:?}"),
        other => panic!("unknown expected kind: {other}"),
    }
    assert_eq!(outcome.value().is_none(), expected["kind"] != "json" && expected["kind"] != "html");
}

fn assert_events(name: &str, actual: &[String], expected: &Value) {
    let expected = expected.as_array().unwrap();
    assert_eq!(actual.len(), expected.len(), "{name}: events {actual:?}");
    for (got, want) in actual.iter().zip(expected) {
        let want = want.as_str().unwrap();
        match want.strip_prefix("alert_prefix:") {
            Some(prefix) => assert!(got.starts_with(&format!("alert:{prefix}")), "{name}: {got}"),
            None => assert_eq!(got, want, "{name}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalize
// ---------------------------------------------------------------------------

#[test]
fn normalize_test_vectors() {
    let raw = include_str!("../../test-vectors/normalize.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let current_url = vectors["current_url"].as_str().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let mut config = ClientConfig::new("https:", "api.example.com", "");
        config.debug = case["debug"].as_bool().unwrap_or(false);

        let host = VectorHost::new(current_url, "en");
        let tracker = LoadingTracker::new();
        let mut guard = tracker.acquire(&host);
        let outcome = ResponseNormalizer::new(&config).normalize(&host, &mut guard, simulated_exchange(case));
        drop(guard);

        assert_outcome(name, &outcome, &case["expected"]);
        assert_events(name, &host.events.borrow(), &case["events"]);
        assert_eq!(tracker.active(), 0, "{name}: indicator released");
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    assert_eq!(vectors["timestamp"].as_u64(), Some(TIMESTAMP));

    let config: ClientConfig = serde_json::from_value(vectors["config"].clone()).unwrap();
    let client = ApiClient::new(config).with_clock(fixed_clock);
    let host = VectorHost::new("", vectors["language"].as_str().unwrap());

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let path = case["path"].as_str().unwrap();
        let options = RequestOptions {
            external: case["external"].as_bool().unwrap_or(false),
            post_data: case["post_data"].as_bool().unwrap_or(false),
            ..RequestOptions::default()
        };
        let body = &case["body"];

        let req = match case["verb"].as_str().unwrap() {
            "get" => client.build_get(&host, path, &options),
            "post" => client.build_post(&host, path, body, &options).unwrap(),
            "put" => client.build_put(&host, path, body, &options).unwrap(),
            "delete" => client.build_delete(&host, path, body, &options).unwrap(),
            "post_body" => client.build_post_body(&host, path, body, &options).unwrap(),
            other => panic!("unknown verb: {other}"),
        };

        let expected = &case["expected"];
        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");

        let expected_headers: Vec<(String, String)> = expected["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let body = req.body.as_deref().map(|b| String::from_utf8(b.to_vec()).unwrap());
        assert_eq!(body.as_deref(), expected["body"].as_str(), "{name}: body");
    }
}
